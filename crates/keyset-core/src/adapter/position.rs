use crate::{
    adapter::decode_bound,
    cursor::{Cursorer, FeedPositionCursor, PositionCursor},
    error::PaginationError,
    paginate::{CountFn, KeysetPaginator, Page, PageRequest, validate},
    types::Id,
};

/// Position that sorts after every ranked row.
pub const BEFORE_POSITION: i64 = i32::MAX as i64;

/// Position that sorts before every ranked row.
pub const AFTER_POSITION: i64 = -1;

///
/// PositionPagingParams
///
/// Bounds for a query over a fixed ranking. `ids` is the ranking carried by
/// the supplied cursor; it is empty on the first page, where the query (or a
/// caller such as `RankedPaginator`) provides the ranking itself.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionPagingParams {
    pub limit: u32,
    pub before_pos: i64,
    pub after_pos: i64,
    pub paging_forward: bool,
    pub ids: Vec<Id>,
}

impl PositionPagingParams {
    /// The `(position, id)` pairs this query should return from `ids`, in
    /// query order: ascending when paging forward, descending otherwise.
    #[must_use]
    pub fn window(&self) -> Vec<(i64, &Id)> {
        window_indexes(
            self.ids.len(),
            (self.after_pos, self.before_pos),
            self.limit,
            self.paging_forward,
            |_| true,
        )
        .into_iter()
        .map(|(position, index)| (position, &self.ids[index]))
        .collect()
    }
}

///
/// FeedPositionPagingParams
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeedPositionPagingParams {
    pub limit: u32,
    pub before_pos: i64,
    pub after_pos: i64,
    pub paging_forward: bool,
    pub entity_kinds: Vec<i64>,
    pub ids: Vec<Id>,
}

impl FeedPositionPagingParams {
    /// Like `PositionPagingParams::window`, with each id's kind tag.
    /// Ids without a kind tag are passed over and do not count toward `limit`.
    #[must_use]
    pub fn window(&self) -> Vec<(i64, i64, &Id)> {
        window_indexes(
            self.ids.len(),
            (self.after_pos, self.before_pos),
            self.limit,
            self.paging_forward,
            |index| index < self.entity_kinds.len(),
        )
        .into_iter()
        .map(|(position, index)| {
            (position, self.entity_kinds[index], &self.ids[index])
        })
        .collect()
    }
}

// Positions strictly between `after` and `before`, clamped to `len`, limited
// to `limit` kept rows taken from the end the traversal starts at.
pub(crate) fn window_indexes(
    len: usize,
    (after, before): (i64, i64),
    limit: u32,
    forward: bool,
    keep: impl Fn(usize) -> bool,
) -> Vec<(i64, usize)> {
    let lower = usize::try_from(after.saturating_add(1)).unwrap_or(0);
    let upper = usize::try_from(before).unwrap_or(0).min(len);
    if lower >= upper {
        return Vec::new();
    }

    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let positions = (lower..upper)
        .filter(|&index| keep(index))
        .map(|index| (i64::try_from(index).unwrap_or(i64::MAX), index));

    if forward {
        positions.take(limit).collect()
    } else {
        positions.rev().take(limit).collect()
    }
}

///
/// PositionPaginator
///
/// Paginates a ranking whose order is not a column: each cursor holds the
/// row's position and the full ranking, so later pages read the same
/// snapshot even when the live ranking moves.
///

pub struct PositionPaginator<Q, C, N = CountFn> {
    query: Q,
    cursor: C,
    count: Option<N>,
    starting: (i64, i64),
    max_page_size: Option<u32>,
}

impl<Q, C> PositionPaginator<Q, C> {
    #[must_use]
    pub const fn new(query: Q, cursor: C) -> Self {
        Self {
            query,
            cursor,
            count: None,
            starting: (BEFORE_POSITION, AFTER_POSITION),
            max_page_size: None,
        }
    }
}

impl<Q, C, N> PositionPaginator<Q, C, N> {
    #[must_use]
    pub fn with_count<M>(self, count: M) -> PositionPaginator<Q, C, M> {
        PositionPaginator {
            query: self.query,
            cursor: self.cursor,
            count: Some(count),
            starting: self.starting,
            max_page_size: self.max_page_size,
        }
    }

    /// Override the positions used when `before`/`after` are absent.
    #[must_use]
    pub fn with_starting_positions(mut self, before: i64, after: i64) -> Self {
        self.starting = (before, after);
        self
    }

    #[must_use]
    pub fn with_max_page_size(mut self, max: Option<u32>) -> Self {
        self.max_page_size = max;
        self
    }

    /// Fetch one page.
    pub fn paginate<T>(&self, request: &PageRequest) -> Result<Page<T>, PaginationError>
    where
        Q: Fn(PositionPagingParams) -> Result<Vec<T>, PaginationError>,
        C: Fn(&T) -> Result<(i64, Vec<Id>), PaginationError>,
        N: Fn() -> Result<u64, PaginationError>,
    {
        validate(request, self.max_page_size)?;

        let (before_cursor, after_cursor) = decode_positions::<PositionCursor>(request)?;
        let (before_pos, after_pos) = bound_positions(
            self.starting,
            before_cursor.as_ref().map(|c| c.position),
            after_cursor.as_ref().map(|c| c.position),
        );
        // The after cursor's ranking wins when both are supplied.
        let ids = after_cursor
            .or(before_cursor)
            .map(|cursor| cursor.ids)
            .unwrap_or_default();

        let query = |limit: u32, paging_forward: bool| {
            (self.query)(PositionPagingParams {
                limit,
                before_pos,
                after_pos,
                paging_forward,
                ids: ids.clone(),
            })
        };
        let cursor = |row: &T| -> Result<PositionCursor, PaginationError> {
            (self.cursor)(row).map(PositionCursor::from)
        };

        KeysetPaginator::new(query, cursor)
            .counted_by(self.count.as_ref())
            .with_max_page_size(self.max_page_size)
            .paginate(request)
    }
}

///
/// FeedPositionPaginator
///
/// `PositionPaginator` for rankings that mix entity kinds.
///

pub struct FeedPositionPaginator<Q, C, N = CountFn> {
    query: Q,
    cursor: C,
    count: Option<N>,
    starting: (i64, i64),
    max_page_size: Option<u32>,
}

impl<Q, C> FeedPositionPaginator<Q, C> {
    #[must_use]
    pub const fn new(query: Q, cursor: C) -> Self {
        Self {
            query,
            cursor,
            count: None,
            starting: (BEFORE_POSITION, AFTER_POSITION),
            max_page_size: None,
        }
    }
}

impl<Q, C, N> FeedPositionPaginator<Q, C, N> {
    #[must_use]
    pub fn with_count<M>(self, count: M) -> FeedPositionPaginator<Q, C, M> {
        FeedPositionPaginator {
            query: self.query,
            cursor: self.cursor,
            count: Some(count),
            starting: self.starting,
            max_page_size: self.max_page_size,
        }
    }

    #[must_use]
    pub fn with_starting_positions(mut self, before: i64, after: i64) -> Self {
        self.starting = (before, after);
        self
    }

    #[must_use]
    pub fn with_max_page_size(mut self, max: Option<u32>) -> Self {
        self.max_page_size = max;
        self
    }

    /// Fetch one page.
    pub fn paginate<T>(&self, request: &PageRequest) -> Result<Page<T>, PaginationError>
    where
        Q: Fn(FeedPositionPagingParams) -> Result<Vec<T>, PaginationError>,
        C: Fn(&T) -> Result<(i64, Vec<i64>, Vec<Id>), PaginationError>,
        N: Fn() -> Result<u64, PaginationError>,
    {
        validate(request, self.max_page_size)?;

        let (before_cursor, after_cursor) = decode_positions::<FeedPositionCursor>(request)?;
        let (before_pos, after_pos) = bound_positions(
            self.starting,
            before_cursor.as_ref().map(|c| c.position),
            after_cursor.as_ref().map(|c| c.position),
        );
        let (entity_kinds, ids) = after_cursor
            .or(before_cursor)
            .map(|cursor| (cursor.entity_kinds, cursor.ids))
            .unwrap_or_default();

        let query = |limit: u32, paging_forward: bool| {
            (self.query)(FeedPositionPagingParams {
                limit,
                before_pos,
                after_pos,
                paging_forward,
                entity_kinds: entity_kinds.clone(),
                ids: ids.clone(),
            })
        };
        let cursor = |row: &T| -> Result<FeedPositionCursor, PaginationError> {
            (self.cursor)(row).map(FeedPositionCursor::from)
        };

        KeysetPaginator::new(query, cursor)
            .counted_by(self.count.as_ref())
            .with_max_page_size(self.max_page_size)
            .paginate(request)
    }
}

// Decode whichever of `before`/`after` were supplied.
pub(crate) fn decode_positions<S>(
    request: &PageRequest,
) -> Result<(Option<S>, Option<S>), PaginationError>
where
    S: Cursorer + Default,
{
    let decode = |token: Option<&str>| -> Result<Option<S>, PaginationError> {
        token
            .map(|token| {
                let mut cursor = S::default();
                decode_bound(&mut cursor, Some(token))?;
                Ok(cursor)
            })
            .transpose()
    };

    Ok((
        decode(request.before_cursor())?,
        decode(request.after_cursor())?,
    ))
}

// Fill in missing cursor positions from `starting` (before, after).
pub(crate) const fn bound_positions(
    starting: (i64, i64),
    before: Option<i64>,
    after: Option<i64>,
) -> (i64, i64) {
    let before = match before {
        Some(position) => position,
        None => starting.0,
    };
    let after = match after {
        Some(position) => position,
        None => starting.1,
    };

    (before, after)
}
