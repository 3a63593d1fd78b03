//! Module: adapter
//! Responsibility: per-shape translation from Relay arguments to typed query bounds.
//! Does not own: the traversal algorithm (`paginate`) or cursor bytes (`codec`).
//! Boundary: decode `before`/`after` over sentinel defaults, hand the query a
//! typed `PagingParams`, and delegate the page itself to `KeysetPaginator`.

mod position;


pub use position::{
    AFTER_POSITION, BEFORE_POSITION, FeedPositionPaginator, FeedPositionPagingParams,
    PositionPaginator, PositionPagingParams,
};

pub(crate) use position::{bound_positions, decode_positions, window_indexes};

use crate::{
    cursor::{
        BoolBoolIntIdCursor, BoolTimeIdCursor, BoundedShape, Cursorer, IntTimeIdCursor,
        LexicalIdCursor, TimeIdCursor,
    },
    error::PaginationError,
    obs::sink::{self, MetricsEvent},
    paginate::{CountFn, KeysetPaginator, Page, PageRequest, validate},
};
use std::marker::PhantomData;

///
/// PagingParams
///
/// Decoded bounds handed to a shape query. Rows must fall strictly between
/// `after` and `before`; missing cursors are replaced by the shape's sentinels.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PagingParams<S> {
    pub limit: u32,
    pub before: S,
    pub after: S,
    pub paging_forward: bool,
}

pub type TimeIdPagingParams = PagingParams<TimeIdCursor>;
pub type BoolTimeIdPagingParams = PagingParams<BoolTimeIdCursor>;
pub type IntTimeIdPagingParams = PagingParams<IntTimeIdCursor>;
pub type LexicalPagingParams = PagingParams<LexicalIdCursor>;
pub type BoolBoolIntIdPagingParams = PagingParams<BoolBoolIntIdCursor>;

///
/// KeyOrder
///
/// Direction of the underlying sort when paging forward. Descending queries
/// start from the high end, so the sentinels trade places.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum KeyOrder {
    #[default]
    Ascending,
    Descending,
}

impl KeyOrder {
    /// `(before, after)` defaults for a missing cursor.
    #[must_use]
    pub fn sentinels<S: BoundedShape>(self) -> (S, S) {
        match self {
            Self::Ascending => (S::before_sentinel(), S::after_sentinel()),
            Self::Descending => (S::after_sentinel(), S::before_sentinel()),
        }
    }
}

///
/// ShapePaginator
///
/// Keyset paginator over one tuple shape. The query receives typed bounds;
/// the cursor closure maps a row to the shape (or to its field tuple).
///

pub struct ShapePaginator<S, Q, C, N = CountFn> {
    query: Q,
    cursor: C,
    count: Option<N>,
    order: KeyOrder,
    max_page_size: Option<u32>,
    _shape: PhantomData<fn() -> S>,
}

pub type TimeIdPaginator<Q, C, N = CountFn> = ShapePaginator<TimeIdCursor, Q, C, N>;
pub type BoolTimeIdPaginator<Q, C, N = CountFn> = ShapePaginator<BoolTimeIdCursor, Q, C, N>;
pub type IntTimeIdPaginator<Q, C, N = CountFn> = ShapePaginator<IntTimeIdCursor, Q, C, N>;
pub type LexicalPaginator<Q, C, N = CountFn> = ShapePaginator<LexicalIdCursor, Q, C, N>;
pub type BoolBoolIntIdPaginator<Q, C, N = CountFn> = ShapePaginator<BoolBoolIntIdCursor, Q, C, N>;

impl<S, Q, C> ShapePaginator<S, Q, C> {
    #[must_use]
    pub const fn new(query: Q, cursor: C) -> Self {
        Self {
            query,
            cursor,
            count: None,
            order: KeyOrder::Ascending,
            max_page_size: None,
            _shape: PhantomData,
        }
    }
}

impl<S, Q, C, N> ShapePaginator<S, Q, C, N> {
    #[must_use]
    pub fn with_count<M>(self, count: M) -> ShapePaginator<S, Q, C, M> {
        ShapePaginator {
            query: self.query,
            cursor: self.cursor,
            count: Some(count),
            order: self.order,
            max_page_size: self.max_page_size,
            _shape: PhantomData,
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: KeyOrder) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn with_max_page_size(mut self, max: Option<u32>) -> Self {
        self.max_page_size = max;
        self
    }

    /// Fetch one page.
    pub fn paginate<T, K>(&self, request: &PageRequest) -> Result<Page<T>, PaginationError>
    where
        S: BoundedShape,
        Q: Fn(PagingParams<S>) -> Result<Vec<T>, PaginationError>,
        C: Fn(&T) -> Result<K, PaginationError>,
        K: Into<S>,
        N: Fn() -> Result<u64, PaginationError>,
    {
        validate(request, self.max_page_size)?;

        let (mut before, mut after) = self.order.sentinels::<S>();
        decode_bound(&mut before, request.before_cursor())?;
        decode_bound(&mut after, request.after_cursor())?;

        let query = |limit: u32, paging_forward: bool| {
            (self.query)(PagingParams {
                limit,
                before: before.clone(),
                after: after.clone(),
                paging_forward,
            })
        };
        let cursor = |row: &T| -> Result<S, PaginationError> { (self.cursor)(row).map(Into::into) };

        KeysetPaginator::new(query, cursor)
            .counted_by(self.count.as_ref())
            .with_max_page_size(self.max_page_size)
            .paginate(request)
    }
}

// Overwrite `bound` with the decoded cursor, if one was supplied.
pub(crate) fn decode_bound<S: Cursorer>(
    bound: &mut S,
    token: Option<&str>,
) -> Result<(), PaginationError> {
    let Some(token) = token else {
        return Ok(());
    };

    bound.unpack(token).map_err(|source| {
        sink::record(MetricsEvent::CursorRejected { shape: S::SHAPE });
        PaginationError::cursor_decode(S::SHAPE, source)
    })
}
