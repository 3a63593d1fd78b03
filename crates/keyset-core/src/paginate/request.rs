use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// PageRequestError
///
/// Relay argument errors, raised before any query runs.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PageRequestError {
    #[error("only one of first or last may be supplied")]
    FirstAndLast,

    #[error("one of first or last must be supplied")]
    NeitherFirstNorLast,

    #[error("first must be >= 0, found {first}")]
    NegativeFirst { first: i32 },

    #[error("last must be >= 0, found {last}")]
    NegativeLast { last: i32 },

    #[error("page size {requested} exceeds max {max}")]
    PageSizeExceeded { requested: u32, max: u32 },
}

///
/// PageRequest
///
/// Relay-style `first/after/last/before` arguments for one page.
///
/// An empty cursor string is the same as no cursor, so a client may echo
/// back the `""` cursors of an empty page without tripping decode errors.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PageRequest {
    pub before: Option<String>,
    pub after: Option<String>,
    pub first: Option<i32>,
    pub last: Option<i32>,
}

impl PageRequest {
    #[must_use]
    pub const fn new(
        before: Option<String>,
        after: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Self {
        Self {
            before,
            after,
            first,
            last,
        }
    }

    /// Forward page of `n` rows.
    #[must_use]
    pub fn first(n: i32) -> Self {
        Self {
            first: Some(n),
            ..Self::default()
        }
    }

    /// Backward page of `n` rows.
    #[must_use]
    pub fn last(n: i32) -> Self {
        Self {
            last: Some(n),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    #[must_use]
    pub fn before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }

    /// The `before` cursor, if a non-empty one was supplied.
    #[must_use]
    pub fn before_cursor(&self) -> Option<&str> {
        self.before.as_deref().filter(|cursor| !cursor.is_empty())
    }

    /// The `after` cursor, if a non-empty one was supplied.
    #[must_use]
    pub fn after_cursor(&self) -> Option<&str> {
        self.after.as_deref().filter(|cursor| !cursor.is_empty())
    }

    /// True when neither cursor bounds the request (first page of a traversal).
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.before_cursor().is_none() && self.after_cursor().is_none()
    }

    /// Check the size arguments and resolve the traversal window.
    pub fn validate(&self, max_page_size: Option<u32>) -> Result<PageWindow, PageRequestError> {
        let (size, forward) = match (self.first, self.last) {
            (Some(_), Some(_)) => return Err(PageRequestError::FirstAndLast),
            (None, None) => return Err(PageRequestError::NeitherFirstNorLast),
            (Some(first), None) => match u32::try_from(first) {
                Ok(size) => (size, true),
                Err(_) => return Err(PageRequestError::NegativeFirst { first }),
            },
            (None, Some(last)) => match u32::try_from(last) {
                Ok(size) => (size, false),
                Err(_) => return Err(PageRequestError::NegativeLast { last }),
            },
        };

        if let Some(max) = max_page_size
            && size > max
        {
            return Err(PageRequestError::PageSizeExceeded {
                requested: size,
                max,
            });
        }

        Ok(PageWindow { size, forward })
    }
}

///
/// PageWindow
///
/// Validated page size and traversal direction.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageWindow {
    pub size: u32,
    pub forward: bool,
}

impl PageWindow {
    /// Rows to ask the query for: the page plus one lookahead row.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.size.saturating_add(1)
    }
}
