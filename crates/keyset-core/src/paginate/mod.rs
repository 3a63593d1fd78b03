//! Module: paginate
//! Responsibility: the generic forward/backward keyset traversal and page metadata.
//! Does not own: cursor byte layout, shape-specific bounds, or query execution.
//! Boundary: callers supply a query closure, a row → cursor closure, and an
//! optional count closure; everything else about storage stays on their side.

mod keyset;
mod loaded;
mod request;


pub use keyset::{CountFn, KeysetPaginator};
pub use loaded::paginate_loaded;
pub use request::{PageRequest, PageRequestError, PageWindow};

pub(crate) use keyset::validate;

use crate::{cursor::Cursorer, error::PaginationError};
use serde::{Deserialize, Serialize};

///
/// PageInfo
///
/// Relay page metadata. `total` is only computed for the first page of a
/// traversal (no `before`/`after`), so later pages never pay for a count.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total: Option<u64>,
    pub size: usize,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub start_cursor: String,
    pub end_cursor: String,
}

///
/// Page
///
/// One page of rows in canonical order plus its metadata.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Page<T> {
    pub nodes: Vec<T>,
    pub info: PageInfo,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn new(nodes: Vec<T>, info: PageInfo) -> Self {
        Self { nodes, info }
    }

    /// Consume the page and return `(nodes, info)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, PageInfo) {
        (self.nodes, self.info)
    }

    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            nodes: self.nodes.into_iter().map(f).collect(),
            info: self.info,
        }
    }
}

impl<T> From<Page<T>> for (Vec<T>, PageInfo) {
    fn from(page: Page<T>) -> Self {
        page.into_parts()
    }
}

// Pack the first and last rows into `(start_cursor, end_cursor)`.
pub(crate) fn boundary_cursors<T, S, C>(
    nodes: &[T],
    cursor: &C,
) -> Result<(String, String), PaginationError>
where
    S: Cursorer,
    C: Fn(&T) -> Result<S, PaginationError>,
{
    let (Some(first), Some(last)) = (nodes.first(), nodes.last()) else {
        return Ok((String::new(), String::new()));
    };

    let start = cursor(first)?.pack()?;
    let end = cursor(last)?.pack()?;

    Ok((start, end))
}
