use super::{BoundedShape, CursorShape, impl_cursorer};
use crate::types::{Id, Timestamp, far_future, far_past};

///
/// TimeIdCursor
///
/// `(time, id)`: the default shape for chronological lists. The id breaks
/// ties between rows created in the same instant.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TimeIdCursor {
    pub time: Timestamp,
    pub id: Id,
}

impl TimeIdCursor {
    #[must_use]
    pub const fn new(time: Timestamp, id: Id) -> Self {
        Self { time, id }
    }
}

impl Default for TimeIdCursor {
    fn default() -> Self {
        Self::after_sentinel()
    }
}

impl From<(Timestamp, Id)> for TimeIdCursor {
    fn from((time, id): (Timestamp, Id)) -> Self {
        Self::new(time, id)
    }
}

impl BoundedShape for TimeIdCursor {
    fn before_sentinel() -> Self {
        Self::new(far_future(), Id::empty())
    }

    fn after_sentinel() -> Self {
        Self::new(far_past(), Id::empty())
    }
}

impl_cursorer!(TimeIdCursor, CursorShape::TimeId, { time, id });
