use crate::{
    cursor::Cursorer,
    error::PaginationError,
    obs::sink::{self, MetricsEvent},
    paginate::{Page, PageInfo, PageRequest, PageWindow, boundary_cursors},
};

/// Default count closure type for paginators without a total.
pub type CountFn = fn() -> Result<u64, PaginationError>;

///
/// KeysetPaginator
///
/// The generic keyset engine. The query closure receives `(limit, forward)`
/// and must apply the caller's bounds itself, ordering ascending when paging
/// forward and descending when paging backward. `limit` is always one more
/// than the page size; the extra row only signals that another page exists.
///

#[derive(Clone, Debug)]
pub struct KeysetPaginator<Q, C, N = CountFn> {
    query: Q,
    cursor: C,
    count: Option<N>,
    max_page_size: Option<u32>,
}

impl<Q, C> KeysetPaginator<Q, C> {
    #[must_use]
    pub const fn new(query: Q, cursor: C) -> Self {
        Self {
            query,
            cursor,
            count: None,
            max_page_size: None,
        }
    }
}

impl<Q, C, N> KeysetPaginator<Q, C, N> {
    /// Attach a count closure used for `PageInfo::total`.
    #[must_use]
    pub fn with_count<M>(self, count: M) -> KeysetPaginator<Q, C, M> {
        self.counted_by(Some(count))
    }

    /// Reject requests for more than `max` rows per page.
    #[must_use]
    pub fn with_max_page_size(mut self, max: Option<u32>) -> Self {
        self.max_page_size = max;
        self
    }

    pub(crate) fn counted_by<M>(self, count: Option<M>) -> KeysetPaginator<Q, C, M> {
        KeysetPaginator {
            query: self.query,
            cursor: self.cursor,
            count,
            max_page_size: self.max_page_size,
        }
    }

    /// Fetch one page.
    pub fn paginate<T, S>(&self, request: &PageRequest) -> Result<Page<T>, PaginationError>
    where
        Q: Fn(u32, bool) -> Result<Vec<T>, PaginationError>,
        C: Fn(&T) -> Result<S, PaginationError>,
        S: Cursorer,
        N: Fn() -> Result<u64, PaginationError>,
    {
        let window = validate(request, self.max_page_size)?;

        let (nodes, has_more) = if window.size == 0 {
            (Vec::new(), false)
        } else {
            let rows = (self.query)(window.limit(), window.forward)?;
            trim(rows, window)
        };

        let total = match &self.count {
            Some(count) if request.is_unbounded() => Some(count()?),
            _ => None,
        };

        let (start_cursor, end_cursor) = boundary_cursors(&nodes, &self.cursor)?;

        sink::record(MetricsEvent::PageServed {
            shape: S::SHAPE,
            forward: window.forward,
            rows: nodes.len() as u64,
        });

        let info = PageInfo {
            total,
            size: nodes.len(),
            has_previous_page: has_more && !window.forward,
            has_next_page: has_more && window.forward,
            start_cursor,
            end_cursor,
        };

        Ok(Page::new(nodes, info))
    }
}

// Validate a request, counting rejections.
pub(crate) fn validate(
    request: &PageRequest,
    max_page_size: Option<u32>,
) -> Result<PageWindow, PaginationError> {
    request.validate(max_page_size).map_err(|err| {
        sink::record(MetricsEvent::RequestRejected);
        err.into()
    })
}

// Drop the lookahead row(s) and restore canonical order.
fn trim<T>(mut rows: Vec<T>, window: PageWindow) -> (Vec<T>, bool) {
    let size = usize::try_from(window.size).unwrap_or(usize::MAX);
    let has_more = rows.len() > size;
    rows.truncate(size);

    if !window.forward {
        rows.reverse();
    }

    (rows, has_more)
}
