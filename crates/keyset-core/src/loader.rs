//! Module: loader
//! Responsibility: resolve a page of tagged keys into rows of two kinds.
//! Does not own: the lookups themselves or the page order (the paginator's).
//! Boundary: both lookups run concurrently and are joined before the rows
//! are put back in key order.

use crate::{error::PaginationError, types::Id};
use std::{collections::HashMap, future::Future};

///
/// OrderedKey
///
/// One row of a mixed page: its kind tag and id, in paginator order.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct OrderedKey {
    pub tag: i64,
    pub id: Id,
}

impl OrderedKey {
    #[must_use]
    pub const fn new(tag: i64, id: Id) -> Self {
        Self { tag, id }
    }
}

impl From<(i64, Id)> for OrderedKey {
    fn from((tag, id): (i64, Id)) -> Self {
        Self::new(tag, id)
    }
}

///
/// KindLookup
///
/// One kind's tag plus its batch lookup. The lookup receives that kind's ids
/// in key order and returns `(id, row)` pairs in any order; ids it cannot
/// find are simply left out.
///

pub struct KindLookup<F> {
    pub tag: i64,
    pub lookup: F,
}

impl<F> KindLookup<F> {
    pub const fn new(tag: i64, lookup: F) -> Self {
        Self { tag, lookup }
    }
}

/// Load the rows for `keys` with two concurrent lookups, one per kind, and
/// return them in key order.
///
/// A kind with no ids is not looked up. Keys whose tag matches neither kind,
/// and ids a lookup did not return, are skipped. If either lookup fails the
/// whole call fails with that error.
pub async fn load_ordered<T, FA, FB, A, B>(
    keys: &[OrderedKey],
    first: KindLookup<FA>,
    second: KindLookup<FB>,
) -> Result<Vec<T>, PaginationError>
where
    FA: FnOnce(Vec<Id>) -> A,
    FB: FnOnce(Vec<Id>) -> B,
    A: Future<Output = Result<Vec<(Id, T)>, PaginationError>>,
    B: Future<Output = Result<Vec<(Id, T)>, PaginationError>>,
{
    let KindLookup {
        tag: first_tag,
        lookup: first_lookup,
    } = first;
    let KindLookup {
        tag: second_tag,
        lookup: second_lookup,
    } = second;

    let ids_of = |tag: i64| -> Vec<Id> {
        keys.iter()
            .filter(|key| key.tag == tag)
            .map(|key| key.id.clone())
            .collect()
    };
    let first_ids = ids_of(first_tag);
    let second_ids = ids_of(second_tag);

    let first_rows = async move {
        if first_ids.is_empty() {
            Ok(Vec::new())
        } else {
            first_lookup(first_ids).await
        }
    };
    let second_rows = async move {
        if second_ids.is_empty() {
            Ok(Vec::new())
        } else {
            second_lookup(second_ids).await
        }
    };

    let (first_rows, second_rows) = futures::try_join!(first_rows, second_rows)?;

    let mut by_key: HashMap<OrderedKey, T> = HashMap::with_capacity(keys.len());
    by_key.extend(
        first_rows
            .into_iter()
            .map(|(id, row)| (OrderedKey::new(first_tag, id), row)),
    );
    by_key.extend(
        second_rows
            .into_iter()
            .map(|(id, row)| (OrderedKey::new(second_tag, id), row)),
    );

    let mut rows = Vec::with_capacity(keys.len());
    for key in keys {
        match by_key.remove(key) {
            Some(row) => rows.push(row),
            None => tracing::debug!(tag = key.tag, id = %key.id, "skipping unresolved key"),
        }
    }

    Ok(rows)
}

///
/// TESTS
///
