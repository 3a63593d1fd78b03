//! Module: cursor
//! Responsibility: the closed catalogue of cursor shapes and their pack/unpack.
//! Does not own: byte layout (`codec`) or traversal (`paginate`).
//! Boundary: every list endpoint orders by exactly one of these shapes.

mod bool_bool_int_id;
mod bool_time_id;
mod int_time_id;
mod lexical_id;
mod position;
mod time_id;


pub use bool_bool_int_id::BoolBoolIntIdCursor;
pub use bool_time_id::BoolTimeIdCursor;
pub use int_time_id::IntTimeIdCursor;
pub use lexical_id::LexicalIdCursor;
pub use position::{FeedPositionCursor, PositionCursor, RankingSnapshot};
pub use time_id::TimeIdCursor;

use crate::codec::{CursorDecodeError, CursorEncodeError};

///
/// Cursorer
///
/// A shape that packs itself into an opaque token and reads one back.
///
/// `unpack` is all-or-nothing: on error the value is left untouched. An empty
/// token is treated as "no bound" and also leaves the value untouched.
///

pub trait Cursorer {
    const SHAPE: CursorShape;

    fn shape(&self) -> CursorShape {
        Self::SHAPE
    }

    fn pack(&self) -> Result<String, CursorEncodeError>;

    fn unpack(&mut self, token: &str) -> Result<(), CursorDecodeError>;
}

///
/// BoundedShape
///
/// Shapes that bound a keyset scan. The sentinels stand in for a missing
/// `before`/`after` cursor so the first page behaves like an unbounded scan.
///

pub trait BoundedShape: Cursorer + Clone {
    fn before_sentinel() -> Self;

    fn after_sentinel() -> Self;
}

///
/// CursorShape
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum CursorShape {
    TimeId,
    BoolTimeId,
    IntTimeId,
    LexicalId,
    Position,
    FeedPosition,
    BoolBoolIntId,
}

impl CursorShape {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TimeId => "time_id",
            Self::BoolTimeId => "bool_time_id",
            Self::IntTimeId => "int_time_id",
            Self::LexicalId => "lexical_id",
            Self::Position => "position",
            Self::FeedPosition => "feed_position",
            Self::BoolBoolIntId => "bool_bool_int_id",
        }
    }
}

impl std::fmt::Display for CursorShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Implement `Cursorer` by packing the listed fields in order.
macro_rules! impl_cursorer {
    ($ty:ty, $shape:expr, { $($field:ident),+ $(,)? }) => {
        impl $crate::cursor::Cursorer for $ty {
            const SHAPE: $crate::cursor::CursorShape = $shape;

            fn pack(&self) -> Result<String, $crate::codec::CursorEncodeError> {
                let mut encoder = $crate::codec::CursorEncoder::new();
                $( $crate::codec::CursorField::encode(&self.$field, &mut encoder); )+

                encoder.finish()
            }

            fn unpack(&mut self, token: &str) -> Result<(), $crate::codec::CursorDecodeError> {
                if token.is_empty() {
                    return Ok(());
                }

                let mut decoder = $crate::codec::CursorDecoder::from_token(token)?;
                $( let $field = $crate::codec::CursorField::decode(&mut decoder)?; )+
                decoder.finish()?;

                $( self.$field = $field; )+

                Ok(())
            }
        }
    };
}

pub(crate) use impl_cursorer;
