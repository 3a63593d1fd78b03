//! Metrics sink boundary.
//!
//! Paginators MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::{cursor::CursorShape, obs::metrics};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    PageServed {
        shape: CursorShape,
        forward: bool,
        rows: u64,
    },
    RequestRejected,
    CursorRejected {
        shape: CursorShape,
    },
    RankingCache {
        hit: bool,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::PageServed {
                shape,
                forward,
                rows,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.pages_served = m.ops.pages_served.saturating_add(1);
                    if forward {
                        m.ops.pages_forward = m.ops.pages_forward.saturating_add(1);
                    } else {
                        m.ops.pages_backward = m.ops.pages_backward.saturating_add(1);
                    }
                    m.ops.rows_served = m.ops.rows_served.saturating_add(rows);

                    let entry = m.shapes.entry(shape.to_string()).or_default();
                    entry.pages_served = entry.pages_served.saturating_add(1);
                    entry.rows_served = entry.rows_served.saturating_add(rows);
                });
            }

            MetricsEvent::RequestRejected => {
                metrics::with_state_mut(|m| {
                    m.ops.requests_rejected = m.ops.requests_rejected.saturating_add(1);
                });
            }

            MetricsEvent::CursorRejected { shape } => {
                metrics::with_state_mut(|m| {
                    m.ops.cursors_rejected = m.ops.cursors_rejected.saturating_add(1);
                    let entry = m.shapes.entry(shape.to_string()).or_default();
                    entry.cursors_rejected = entry.cursors_rejected.saturating_add(1);
                });
            }

            MetricsEvent::RankingCache { hit } => {
                metrics::with_state_mut(|m| {
                    if hit {
                        m.ops.ranking_cache_hits = m.ops.ranking_cache_hits.saturating_add(1);
                    } else {
                        m.ops.ranking_cache_misses = m.ops.ranking_cache_misses.saturating_add(1);
                    }
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

/// Record one event with the scoped override, or the global sink.
pub(crate) fn record(event: MetricsEvent) {
    trace_event(event);

    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

fn trace_event(event: MetricsEvent) {
    match event {
        MetricsEvent::PageServed {
            shape,
            forward,
            rows,
        } => tracing::debug!(%shape, forward, rows, "page served"),
        MetricsEvent::RequestRejected => tracing::debug!("page request rejected"),
        MetricsEvent::CursorRejected { shape } => tracing::warn!(%shape, "cursor rejected"),
        MetricsEvent::RankingCache { hit } => tracing::debug!(hit, "ranking cache lookup"),
    }
}

/// Snapshot the current metrics state.
///
/// `window_start_ms` filters by window start (`EventState::since_ms`),
/// not by per-event timestamps.
#[must_use]
pub fn metrics_report(window_start_ms: Option<u64>) -> metrics::EventReport {
    metrics::report_window_start(window_start_ms)
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
///
/// The previous sink is restored on every exit, including unwind.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
