use super::{BoundedShape, CursorShape, impl_cursorer};
use crate::types::{Id, Timestamp, far_future, far_past};

/// Tag bound that sorts after every kind tag.
pub const BEFORE_TAG: i64 = i32::MAX as i64;

/// Tag bound that sorts before every kind tag.
pub const AFTER_TAG: i64 = 0;

///
/// IntTimeIdCursor
///
/// `(tag, time, id)`: feeds that interleave several row kinds. The tag is the
/// kind discriminator, so rows from different tables never compare equal.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IntTimeIdCursor {
    pub tag: i64,
    pub time: Timestamp,
    pub id: Id,
}

impl IntTimeIdCursor {
    #[must_use]
    pub const fn new(tag: i64, time: Timestamp, id: Id) -> Self {
        Self { tag, time, id }
    }
}

impl Default for IntTimeIdCursor {
    fn default() -> Self {
        Self::after_sentinel()
    }
}

impl From<(i64, Timestamp, Id)> for IntTimeIdCursor {
    fn from((tag, time, id): (i64, Timestamp, Id)) -> Self {
        Self::new(tag, time, id)
    }
}

impl BoundedShape for IntTimeIdCursor {
    fn before_sentinel() -> Self {
        Self::new(BEFORE_TAG, far_future(), Id::empty())
    }

    fn after_sentinel() -> Self {
        Self::new(AFTER_TAG, far_past(), Id::empty())
    }
}

impl_cursorer!(IntTimeIdCursor, CursorShape::IntTimeId, { tag, time, id });
