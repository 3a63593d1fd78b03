use crate::{
    codec::{CursorDecodeError, CursorEncodeError},
    cursor::CursorShape,
    paginate::PageRequestError,
    types::Id,
};
use std::error::Error as StdError;
use thiserror::Error as ThisError;

/// Boxed error returned by caller-supplied query, count, and lookup functions.
pub type UpstreamError = Box<dyn StdError + Send + Sync + 'static>;

///
/// PaginationError
///
/// Every failure a paginator can surface. Nothing is logged and swallowed:
/// the first error from validation, decoding, a caller function, or
/// re-encoding aborts the call and no partial page is returned.
///

#[derive(Debug, ThisError)]
pub enum PaginationError {
    #[error(transparent)]
    Request(#[from] PageRequestError),

    #[error("invalid {shape} cursor: {source}")]
    CursorDecode {
        shape: CursorShape,
        #[source]
        source: CursorDecodeError,
    },

    #[error(transparent)]
    CursorEncode(#[from] CursorEncodeError),

    #[error("wrong node kind: expected {expected}, found {found}")]
    WrongNodeKind {
        expected: &'static str,
        found: String,
    },

    #[error("id {id} is not part of the ranking")]
    NotInRanking { id: Id },

    #[error(transparent)]
    Upstream(UpstreamError),
}

impl PaginationError {
    /// Wrap an error from a caller-supplied function verbatim.
    pub fn upstream(err: impl Into<UpstreamError>) -> Self {
        Self::Upstream(err.into())
    }

    pub fn wrong_node_kind(expected: &'static str, found: impl Into<String>) -> Self {
        Self::WrongNodeKind {
            expected,
            found: found.into(),
        }
    }

    pub(crate) const fn cursor_decode(shape: CursorShape, source: CursorDecodeError) -> Self {
        Self::CursorDecode { shape, source }
    }

    /// True for errors caused by the caller's arguments rather than the system.
    #[must_use]
    pub const fn is_bad_request(&self) -> bool {
        matches!(self, Self::Request(_) | Self::CursorDecode { .. })
    }

    /// Borrow the upstream error, if this is one.
    #[must_use]
    pub fn as_upstream(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            Self::Upstream(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

///
/// TESTS
///
