use super::{BoundedShape, CursorShape, impl_cursorer};
use crate::types::Id;

// Keys are capped at this length by the store, so a run of 'Z' sorts last.
const BEFORE_KEY_LEN: usize = 255;
const BEFORE_KEY_CHAR: char = 'Z';

///
/// LexicalIdCursor
///
/// `(key, id)`: alphabetical lists such as usernames.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LexicalIdCursor {
    pub key: String,
    pub id: Id,
}

impl LexicalIdCursor {
    #[must_use]
    pub fn new(key: impl Into<String>, id: Id) -> Self {
        Self {
            key: key.into(),
            id,
        }
    }
}

impl From<(String, Id)> for LexicalIdCursor {
    fn from((key, id): (String, Id)) -> Self {
        Self::new(key, id)
    }
}

impl BoundedShape for LexicalIdCursor {
    fn before_sentinel() -> Self {
        Self::new(
            std::iter::repeat_n(BEFORE_KEY_CHAR, BEFORE_KEY_LEN).collect::<String>(),
            Id::empty(),
        )
    }

    fn after_sentinel() -> Self {
        Self::new(String::new(), Id::empty())
    }
}

impl_cursorer!(LexicalIdCursor, CursorShape::LexicalId, { key, id });
