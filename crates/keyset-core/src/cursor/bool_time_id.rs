use super::{BoundedShape, CursorShape, impl_cursorer};
use crate::types::{Id, Timestamp, far_future, far_past};

///
/// BoolTimeIdCursor
///
/// `(flag, time, id)`: lists that group one boolean partition ahead of the
/// other, e.g. pinned rows before unpinned ones.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BoolTimeIdCursor {
    pub flag: bool,
    pub time: Timestamp,
    pub id: Id,
}

impl BoolTimeIdCursor {
    #[must_use]
    pub const fn new(flag: bool, time: Timestamp, id: Id) -> Self {
        Self { flag, time, id }
    }
}

impl Default for BoolTimeIdCursor {
    fn default() -> Self {
        Self::after_sentinel()
    }
}

impl From<(bool, Timestamp, Id)> for BoolTimeIdCursor {
    fn from((flag, time, id): (bool, Timestamp, Id)) -> Self {
        Self::new(flag, time, id)
    }
}

impl BoundedShape for BoolTimeIdCursor {
    fn before_sentinel() -> Self {
        Self::new(true, far_future(), Id::empty())
    }

    fn after_sentinel() -> Self {
        Self::new(false, far_past(), Id::empty())
    }
}

impl_cursorer!(BoolTimeIdCursor, CursorShape::BoolTimeId, { flag, time, id });
