use super::{CursorShape, impl_cursorer};
use crate::types::Id;
use std::collections::HashMap;

///
/// PositionCursor
///
/// `(position, ids)`: an index into a fixed ranking plus the ranking itself.
///
/// Rankings computed outside the store (trending scores and the like) are
/// not a column a keyset query can seek on, so the cursor carries a snapshot
/// of the whole ranking. Every page of one traversal reads the same snapshot
/// even if the live ranking changes in between.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PositionCursor {
    pub position: i64,
    pub ids: Vec<Id>,
}

impl PositionCursor {
    #[must_use]
    pub const fn new(position: i64, ids: Vec<Id>) -> Self {
        Self { position, ids }
    }

    /// Index the embedded ranking for position lookups.
    #[must_use]
    pub fn ranking(&self) -> RankingSnapshot {
        RankingSnapshot::new(self.ids.clone())
    }
}

impl From<(i64, Vec<Id>)> for PositionCursor {
    fn from((position, ids): (i64, Vec<Id>)) -> Self {
        Self::new(position, ids)
    }
}

impl_cursorer!(PositionCursor, CursorShape::Position, { position, ids });

///
/// FeedPositionCursor
///
/// `(position, entity_kinds, ids)`: a position cursor for rankings that mix
/// entity kinds. `entity_kinds[i]` is the kind tag of `ids[i]`, so a later
/// page can route each id to the right lookup without another query.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FeedPositionCursor {
    pub position: i64,
    pub entity_kinds: Vec<i64>,
    pub ids: Vec<Id>,
}

impl FeedPositionCursor {
    #[must_use]
    pub const fn new(position: i64, entity_kinds: Vec<i64>, ids: Vec<Id>) -> Self {
        Self {
            position,
            entity_kinds,
            ids,
        }
    }
}

impl From<(i64, Vec<i64>, Vec<Id>)> for FeedPositionCursor {
    fn from((position, entity_kinds, ids): (i64, Vec<i64>, Vec<Id>)) -> Self {
        Self::new(position, entity_kinds, ids)
    }
}

impl_cursorer!(
    FeedPositionCursor,
    CursorShape::FeedPosition,
    { position, entity_kinds, ids }
);

///
/// RankingSnapshot
///
/// A fixed ranking with an id → position index. When an id appears more than
/// once its first position wins.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RankingSnapshot {
    ids: Vec<Id>,
    positions: HashMap<Id, i64>,
}

impl RankingSnapshot {
    #[must_use]
    pub fn new(ids: Vec<Id>) -> Self {
        let mut positions = HashMap::with_capacity(ids.len());
        for (position, id) in (0i64..).zip(&ids) {
            positions.entry(id.clone()).or_insert(position);
        }

        Self { ids, positions }
    }

    #[must_use]
    pub fn ids(&self) -> &[Id] {
        &self.ids
    }

    #[must_use]
    pub fn position_of(&self, id: &Id) -> Option<i64> {
        self.positions.get(id).copied()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
