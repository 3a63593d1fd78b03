use super::{MemoryRankingCache, RankedPaginator, RankingCache};
use crate::{
    config::PaginationConfig,
    cursor::{Cursorer, PositionCursor},
    error::PaginationError,
    obs::{metrics_report, metrics_reset_all},
    paginate::PageRequest,
    types::Id,
};
use std::{cell::RefCell, io, time::Duration};

const KEY: &str = "trending";

#[derive(Clone, Debug, PartialEq)]
struct Post {
    id: Id,
}

fn fetch(ids: &[Id]) -> Result<Vec<Post>, PaginationError> {
    Ok(ids
        .iter()
        .filter(|id| id.as_str() != "deleted")
        .map(|id| Post { id: id.clone() })
        .collect())
}

fn post_id(post: &Post) -> Id {
    post.id.clone()
}

fn ids(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|post| post.id.as_str()).collect()
}

fn ranking(names: &[&str]) -> Vec<Id> {
    names.iter().copied().map(Id::from).collect()
}

#[test]
fn traversal_keeps_its_ranking_after_cache_refresh() {
    let cache = MemoryRankingCache::new();
    let live = RefCell::new(ranking(&["a", "b", "c", "d"]));
    let rank = || Ok(live.borrow().clone());
    let paginator = RankedPaginator::new(&cache, KEY, rank, fetch, post_id);

    let first = paginator
        .paginate(&PageRequest::first(2))
        .expect("first page");
    assert_eq!(ids(&first.nodes), ["a", "b"]);
    assert_eq!(first.info.total, Some(4));
    assert!(first.info.has_next_page);

    // The global ranking moves; the open traversal must not notice.
    *live.borrow_mut() = ranking(&["z", "c", "a", "b"]);
    cache.invalidate(KEY);

    let second = paginator
        .paginate(&PageRequest::first(2).after(first.info.end_cursor))
        .expect("second page");
    assert_eq!(ids(&second.nodes), ["c", "d"]);
    assert!(!second.info.has_next_page);
    assert_eq!(second.info.total, None);

    let back = paginator
        .paginate(&PageRequest::last(2).before(second.info.start_cursor))
        .expect("back page");
    assert_eq!(ids(&back.nodes), ["a", "b"]);

    // A new traversal picks up the new ranking.
    let fresh = paginator
        .paginate(&PageRequest::first(2))
        .expect("fresh first page");
    assert_eq!(ids(&fresh.nodes), ["z", "c"]);
}

#[test]
fn cache_hit_skips_recompute() {
    metrics_reset_all();
    let cache = MemoryRankingCache::new();
    let computed = RefCell::new(0);
    let rank = || {
        *computed.borrow_mut() += 1;
        Ok(ranking(&["a", "b", "c"]))
    };
    let paginator = RankedPaginator::new(&cache, KEY, rank, fetch, post_id);

    for _ in 0..3 {
        paginator
            .paginate(&PageRequest::first(1))
            .expect("first page");
    }

    assert_eq!(*computed.borrow(), 1);
    let counters = metrics_report(None)
        .counters
        .expect("counters should be present");
    assert_eq!(counters.ops.ranking_cache_misses, 1);
    assert_eq!(counters.ops.ranking_cache_hits, 2);
}

#[test]
fn cached_value_is_a_packed_position_cursor() {
    let cache = MemoryRankingCache::new();
    let rank = || Ok(ranking(&["a", "b", "c", "d", "e"]));
    let config = PaginationConfig {
        ranking_limit: 3,
        ..PaginationConfig::default()
    };

    let page = RankedPaginator::new(&cache, KEY, rank, fetch, post_id)
        .with_config(&config)
        .paginate(&PageRequest::first(5))
        .expect("page should load");
    assert_eq!(ids(&page.nodes), ["a", "b", "c"]);
    assert_eq!(page.info.total, Some(3));

    let token = cache
        .load(KEY)
        .expect("memory cache never fails")
        .expect("ranking should be cached");
    let mut cached = PositionCursor::default();
    cached.unpack(&token).expect("cached ranking should unpack");
    assert_eq!(cached, PositionCursor::new(0, ranking(&["a", "b", "c"])));
}

#[test]
fn expired_entries_are_recomputed() {
    let cache = MemoryRankingCache::new();
    cache
        .store(KEY, "stale".to_string(), Duration::ZERO)
        .expect("memory cache never fails");

    assert_eq!(cache.load(KEY).expect("memory cache never fails"), None);
    assert!(cache.is_empty());
}

#[test]
fn unreadable_cache_entry_is_replaced() {
    let cache = MemoryRankingCache::new();
    cache
        .store(KEY, "%%%".to_string(), Duration::from_secs(60))
        .expect("memory cache never fails");
    let rank = || Ok(ranking(&["a"]));

    let page = RankedPaginator::new(&cache, KEY, rank, fetch, post_id)
        .paginate(&PageRequest::first(1))
        .expect("page should load");

    assert_eq!(ids(&page.nodes), ["a"]);
    let token = cache
        .load(KEY)
        .expect("memory cache never fails")
        .expect("ranking should be cached");
    assert_ne!(token, "%%%");
}

#[test]
fn rows_missing_from_fetch_are_skipped() {
    let cache = MemoryRankingCache::new();
    let rank = || Ok(ranking(&["a", "deleted", "b"]));

    let page = RankedPaginator::new(&cache, KEY, rank, fetch, post_id)
        .paginate(&PageRequest::first(3))
        .expect("page should load");

    assert_eq!(ids(&page.nodes), ["a", "b"]);
}

#[test]
fn skipped_ids_do_not_end_the_traversal() {
    let cache = MemoryRankingCache::new();
    let rank = || Ok(ranking(&["a", "deleted", "b", "c"]));
    let paginator = RankedPaginator::new(&cache, KEY, rank, fetch, post_id);

    let first = paginator
        .paginate(&PageRequest::first(2))
        .expect("first page");
    assert_eq!(ids(&first.nodes), ["a", "b"]);
    assert!(first.info.has_next_page);

    let second = paginator
        .paginate(&PageRequest::first(2).after(first.info.end_cursor))
        .expect("second page");
    assert_eq!(ids(&second.nodes), ["c"]);
    assert!(!second.info.has_next_page);

    let back = paginator
        .paginate(&PageRequest::last(2).before(second.info.start_cursor))
        .expect("back page");
    assert_eq!(ids(&back.nodes), ["a", "b"]);
    assert!(!back.info.has_previous_page);
}

#[test]
fn fetch_only_sees_ids_it_still_needs() {
    let cache = MemoryRankingCache::new();
    let rank = || Ok(ranking(&["deleted", "a", "b", "c", "d"]));
    let batches = RefCell::new(Vec::new());
    let recording = |ids: &[Id]| {
        batches.borrow_mut().push(ids.len());
        fetch(ids)
    };

    let page = RankedPaginator::new(&cache, KEY, rank, recording, post_id)
        .paginate(&PageRequest::first(2))
        .expect("page should load");

    assert_eq!(ids(&page.nodes), ["a", "b"]);
    assert!(page.info.has_next_page);
    assert_eq!(batches.into_inner(), [3, 1]);
}

#[test]
fn foreign_row_is_not_in_ranking() {
    let cache = MemoryRankingCache::new();
    let rank = || Ok(ranking(&["a"]));
    let stray = |_ids: &[Id]| Ok(vec![Post { id: Id::from("x") }]);

    let err = RankedPaginator::new(&cache, KEY, rank, stray, post_id)
        .paginate(&PageRequest::first(1))
        .expect_err("row outside the ranking should fail");

    assert!(matches!(err, PaginationError::NotInRanking { .. }));
    assert_eq!(err.to_string(), "id x is not part of the ranking");
}

#[test]
fn rank_failure_propagates_and_caches_nothing() {
    let cache = MemoryRankingCache::new();
    let rank = || -> Result<Vec<Id>, PaginationError> {
        let err = io::Error::other("scores unavailable");
        Err(PaginationError::upstream(err))
    };

    let err = RankedPaginator::new(&cache, KEY, rank, fetch, post_id)
        .paginate(&PageRequest::first(1))
        .expect_err("rank error should propagate");

    assert_eq!(err.to_string(), "scores unavailable");
    assert!(cache.is_empty());
}
