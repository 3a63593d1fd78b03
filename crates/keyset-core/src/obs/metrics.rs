use serde::{Deserialize, Serialize};
use std::{cell::RefCell, cmp::Ordering, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory pagination counters for the current thread.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub shapes: BTreeMap<String, ShapeCounters>,
    pub since_ms: u64,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            ops: EventOps::default(),
            shapes: BTreeMap::new(),
            since_ms: now_millis(),
        }
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Pages
    pub pages_served: u64,
    pub pages_forward: u64,
    pub pages_backward: u64,
    pub rows_served: u64,

    // Rejections
    pub requests_rejected: u64,
    pub cursors_rejected: u64,

    // Ranking cache
    pub ranking_cache_hits: u64,
    pub ranking_cache_misses: u64,
}

///
/// ShapeCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ShapeCounters {
    pub pages_served: u64,
    pub rows_served: u64,
    pub cursors_rejected: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters and restart the window.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}

///
/// EventReport
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    /// Ephemeral runtime counters since `since_ms`.
    pub counters: Option<EventState>,
    /// Per-shape counters and averages.
    pub shape_counters: Vec<ShapeSummary>,
}

///
/// ShapeSummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ShapeSummary {
    pub shape: String,
    pub pages_served: u64,
    pub rows_served: u64,
    pub avg_rows_per_page: f64,
    pub cursors_rejected: u64,
}

/// Build a report from the in-memory counters.
///
/// When `window_start_ms` is later than the current window's start, the
/// counters cover time outside the requested window and are omitted.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub(crate) fn report_window_start(window_start_ms: Option<u64>) -> EventReport {
    let snap = with_state(Clone::clone);
    if window_start_ms.is_some_and(|start| start > snap.since_ms) {
        return EventReport::default();
    }

    let mut shape_counters: Vec<ShapeSummary> = snap
        .shapes
        .iter()
        .map(|(shape, counters)| {
            let avg = if counters.pages_served > 0 {
                counters.rows_served as f64 / counters.pages_served as f64
            } else {
                0.0
            };

            ShapeSummary {
                shape: shape.clone(),
                pages_served: counters.pages_served,
                rows_served: counters.rows_served,
                avg_rows_per_page: avg,
                cursors_rejected: counters.cursors_rejected,
            }
        })
        .collect();

    // Busiest shapes first, then by name.
    shape_counters.sort_by(|a, b| match b.pages_served.cmp(&a.pages_served) {
        Ordering::Equal => a.shape.cmp(&b.shape),
        other => other,
    });

    EventReport {
        counters: Some(snap),
        shape_counters,
    }
}

///
/// TESTS
///

#[cfg(test)]
#[expect(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn reset_all_clears_state() {
        with_state_mut(|m| {
            m.ops.pages_served = 3;
            m.ops.cursors_rejected = 2;
            m.shapes.insert(
                "time_id".to_string(),
                ShapeCounters {
                    pages_served: 1,
                    ..Default::default()
                },
            );
        });

        reset_all();

        with_state(|m| {
            assert_eq!(m.ops.pages_served, 0);
            assert_eq!(m.ops.cursors_rejected, 0);
            assert!(m.shapes.is_empty());
        });
    }

    #[test]
    fn report_orders_shapes_by_pages_served() {
        reset_all();
        with_state_mut(|m| {
            m.shapes.insert(
                "lexical_id".to_string(),
                ShapeCounters {
                    pages_served: 2,
                    rows_served: 6,
                    ..Default::default()
                },
            );
            m.shapes.insert(
                "time_id".to_string(),
                ShapeCounters {
                    pages_served: 4,
                    rows_served: 10,
                    ..Default::default()
                },
            );
            m.shapes.insert(
                "bool_time_id".to_string(),
                ShapeCounters {
                    pages_served: 2,
                    rows_served: 2,
                    ..Default::default()
                },
            );
        });

        let report = report_window_start(None);
        let shapes: Vec<_> = report
            .shape_counters
            .iter()
            .map(|s| s.shape.as_str())
            .collect();

        assert_eq!(shapes, ["time_id", "bool_time_id", "lexical_id"]);
        assert_eq!(report.shape_counters[0].avg_rows_per_page, 2.5);
        assert_eq!(report.shape_counters[2].avg_rows_per_page, 3.0);
    }

    #[test]
    fn report_omits_counters_outside_window() {
        reset_all();
        let since = with_state(|m| m.since_ms);

        assert!(report_window_start(Some(since)).counters.is_some());
        assert!(report_window_start(Some(since + 60_000)).counters.is_none());
    }
}
