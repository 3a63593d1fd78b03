//! Core runtime for keyset: opaque cursor codec, cursor shapes, the generic
//! keyset paginator, typed shape adapters, ranked pagination, and the
//! ergonomics exported via the `prelude`.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod adapter;
pub mod codec;
pub mod config;
pub mod cursor;
pub mod error;
pub mod loader;
pub mod obs;
pub mod paginate;
pub mod ranked;
pub mod types;

///
/// Prelude
///
/// Prelude contains the vocabulary a list endpoint needs: request/page
/// types, the paginators, and the cursor shapes.
///

pub mod prelude {
    pub use crate::{
        adapter::{
            BoolBoolIntIdPaginator, BoolTimeIdPaginator, FeedPositionPaginator, IntTimeIdPaginator,
            KeyOrder, LexicalPaginator, PagingParams, PositionPaginator, ShapePaginator,
            TimeIdPaginator,
        },
        cursor::{BoundedShape, Cursorer},
        paginate::{KeysetPaginator, Page, PageInfo, PageRequest},
        ranked::RankedPaginator,
        types::{Id, Timestamp},
    };
}
