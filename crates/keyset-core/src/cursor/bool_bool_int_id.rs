use super::{BoundedShape, CursorShape, impl_cursorer};
use crate::types::Id;

/// Count bound used before the first row; the shape is scanned descending.
pub const BEFORE_COUNT: i64 = -1;

/// Count bound used after the last row.
pub const AFTER_COUNT: i64 = i32::MAX as i64;

///
/// BoolBoolIntIdCursor
///
/// `(first_flag, second_flag, count, id)`: two-sided relationship lists, e.g.
/// "does A display X", "does B display X", "how many X does A own".
///
/// Lists of this shape page forward in descending order, which is why the
/// before sentinel holds the smallest tuple.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BoolBoolIntIdCursor {
    pub first_flag: bool,
    pub second_flag: bool,
    pub count: i64,
    pub id: Id,
}

impl BoolBoolIntIdCursor {
    #[must_use]
    pub const fn new(first_flag: bool, second_flag: bool, count: i64, id: Id) -> Self {
        Self {
            first_flag,
            second_flag,
            count,
            id,
        }
    }
}

impl From<(bool, bool, i64, Id)> for BoolBoolIntIdCursor {
    fn from((first_flag, second_flag, count, id): (bool, bool, i64, Id)) -> Self {
        Self::new(first_flag, second_flag, count, id)
    }
}

impl BoundedShape for BoolBoolIntIdCursor {
    fn before_sentinel() -> Self {
        Self::new(false, false, BEFORE_COUNT, Id::empty())
    }

    fn after_sentinel() -> Self {
        Self::new(true, true, AFTER_COUNT, Id::empty())
    }
}

impl_cursorer!(
    BoolBoolIntIdCursor,
    CursorShape::BoolBoolIntId,
    { first_flag, second_flag, count, id }
);
