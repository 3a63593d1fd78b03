//! ## Crate layout
//! - `core`: cursor codec, cursor shapes, paginators, ranking cache, and
//!   observability.
//! - `error`: the public error taxonomy API layers hand back to clients.
//!
//! The `prelude` module mirrors the surface a list endpoint uses.

pub use keyset_core as core;

pub mod error;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use core::{config::PaginationConfig, paginate::paginate_loaded};
pub use error::Error;

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        adapter::{
            BoolBoolIntIdPaginator, BoolTimeIdPaginator, FeedPositionPaginator,
            FeedPositionPagingParams, IntTimeIdPaginator, KeyOrder, LexicalPaginator, PagingParams,
            PositionPaginator, PositionPagingParams, ShapePaginator, TimeIdPaginator,
        },
        config::PaginationConfig,
        cursor::{
            BoolBoolIntIdCursor, BoolTimeIdCursor, BoundedShape as _, Cursorer as _,
            FeedPositionCursor, IntTimeIdCursor, LexicalIdCursor, PositionCursor, TimeIdCursor,
        },
        loader::{KindLookup, OrderedKey, load_ordered},
        paginate::{KeysetPaginator, Page, PageInfo, PageRequest, paginate_loaded},
        ranked::{MemoryRankingCache, RankedPaginator, RankingCache},
        types::{Id, Timestamp},
    };
    pub use crate::error::{Error, ErrorKind, ErrorOrigin};
    pub use serde::{Deserialize, Serialize};
}
