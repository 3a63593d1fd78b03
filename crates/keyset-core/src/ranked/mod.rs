//! Module: ranked
//! Responsibility: paging over an externally computed, cached ranking.
//! Does not own: scoring (caller's `rank` closure) or row loading (caller's `fetch`).
//! Boundary: the first page of a traversal reads the ranking through a
//! `RankingCache`; every later page reads it back out of its cursor.

mod cache;

#[cfg(test)]
mod tests;

pub use cache::{MemoryRankingCache, RankingCache};

use crate::{
    adapter::{AFTER_POSITION, BEFORE_POSITION, bound_positions, decode_positions, window_indexes},
    config::PaginationConfig,
    cursor::{Cursorer, PositionCursor, RankingSnapshot},
    error::PaginationError,
    obs::sink::{self, MetricsEvent},
    paginate::{KeysetPaginator, Page, PageRequest, validate},
    types::Id,
};
use std::time::Duration;

///
/// RankedPaginator
///
/// Pages through a top-N ranking (trending and similar scores). A traversal
/// is pinned to the ranking it started with: the ranking is embedded in each
/// page's cursors, so paging forward and back stays consistent while the
/// cached global ranking is refreshed underneath.
///
/// `rank` computes the full ranking best-first and is only called on a cache
/// miss. `fetch` loads rows for ids in the order given and may skip ids it
/// cannot find; the next ranked ids are fetched in their place. `row_id` maps
/// a row back to its ranked id.
///

pub struct RankedPaginator<R, F, L, I> {
    cache: R,
    key: String,
    rank: F,
    fetch: L,
    row_id: I,
    ttl: Duration,
    ranking_limit: usize,
    max_page_size: Option<u32>,
}

impl<R, F, L, I> RankedPaginator<R, F, L, I> {
    pub fn new(cache: R, key: impl Into<String>, rank: F, fetch: L, row_id: I) -> Self {
        let config = PaginationConfig::default();

        Self {
            cache,
            key: key.into(),
            rank,
            fetch,
            row_id,
            ttl: config.ranking_ttl,
            ranking_limit: config.ranking_limit,
            max_page_size: config.max_page_size,
        }
    }

    /// Apply ttl, ranking limit, and max page size from `config`.
    #[must_use]
    pub fn with_config(mut self, config: &PaginationConfig) -> Self {
        self.ttl = config.ranking_ttl;
        self.ranking_limit = config.ranking_limit;
        self.max_page_size = config.max_page_size;
        self
    }

    /// Fetch one page.
    pub fn paginate<T>(&self, request: &PageRequest) -> Result<Page<T>, PaginationError>
    where
        R: RankingCache,
        F: Fn() -> Result<Vec<Id>, PaginationError>,
        L: Fn(&[Id]) -> Result<Vec<T>, PaginationError>,
        I: Fn(&T) -> Id,
    {
        validate(request, self.max_page_size)?;

        let (before, after) = decode_positions::<PositionCursor>(request)?;
        let (before_pos, after_pos) = bound_positions(
            (BEFORE_POSITION, AFTER_POSITION),
            before.as_ref().map(|c| c.position),
            after.as_ref().map(|c| c.position),
        );
        let snapshot = match after.or(before) {
            Some(cursor) => cursor.ranking(),
            None => RankingSnapshot::new(self.load_ranking()?),
        };
        let total = snapshot.len() as u64;

        let query = |limit: u32, paging_forward: bool| {
            let candidates: Vec<Id> = window_indexes(
                snapshot.len(),
                (after_pos, before_pos),
                u32::MAX,
                paging_forward,
                |_| true,
            )
            .into_iter()
            .map(|(_, index)| snapshot.ids()[index].clone())
            .collect();

            fetch_until(&self.fetch, &candidates, limit)
        };
        let cursor = |row: &T| -> Result<PositionCursor, PaginationError> {
            let id = (self.row_id)(row);
            let position = snapshot
                .position_of(&id)
                .ok_or(PaginationError::NotInRanking { id })?;

            Ok(PositionCursor::new(position, snapshot.ids().to_vec()))
        };

        KeysetPaginator::new(query, cursor)
            .counted_by(Some(|| Ok::<u64, PaginationError>(total)))
            .with_max_page_size(self.max_page_size)
            .paginate(request)
    }

    // Read-through load of the current ranking.
    fn load_ranking(&self) -> Result<Vec<Id>, PaginationError>
    where
        R: RankingCache,
        F: Fn() -> Result<Vec<Id>, PaginationError>,
    {
        if let Some(token) = self.cache.load(&self.key)? {
            let mut cached = PositionCursor::default();
            match cached.unpack(&token) {
                Ok(()) => {
                    sink::record(MetricsEvent::RankingCache { hit: true });
                    return Ok(cached.ids);
                }
                Err(err) => {
                    tracing::warn!(key = %self.key, %err, "discarding unreadable cached ranking");
                }
            }
        }

        sink::record(MetricsEvent::RankingCache { hit: false });

        let mut ids = (self.rank)()?;
        ids.truncate(self.ranking_limit);

        let cursor = PositionCursor::new(0, ids);
        self.cache.store(&self.key, cursor.pack()?, self.ttl)?;
        tracing::debug!(key = %self.key, ids = cursor.ids.len(), "ranking recomputed");

        Ok(cursor.ids)
    }
}

// Fetch `candidates` in order until `limit` rows are found or the candidates
// run out. Ids `fetch` skips are replaced by the next ranked ids, so the
// lookahead row still reports whether another page exists.
fn fetch_until<T, L>(fetch: &L, candidates: &[Id], limit: u32) -> Result<Vec<T>, PaginationError>
where
    L: Fn(&[Id]) -> Result<Vec<T>, PaginationError>,
{
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let mut rows = Vec::with_capacity(limit.min(candidates.len()));
    let mut rest = candidates;

    while rows.len() < limit && !rest.is_empty() {
        let (batch, tail) = rest.split_at((limit - rows.len()).min(rest.len()));
        rows.extend(fetch(batch)?);
        rest = tail;
    }

    Ok(rows)
}
