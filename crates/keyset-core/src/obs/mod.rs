//! Observability: runtime pagination telemetry and sink abstractions.
//!
//! Paginators never touch the counters directly; every event flows through
//! `sink::record`, which also emits a `tracing` event.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, EventState, ShapeCounters, ShapeSummary};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
