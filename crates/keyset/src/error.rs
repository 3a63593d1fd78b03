use derive_more::Display;
use keyset_core::{config::ConfigError, error::PaginationError};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///
/// Upstream errors are flattened to their message here; callers that need
/// the boxed source should match on `PaginationError` before converting.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    /// True when the caller can fix the request and retry.
    #[must_use]
    pub const fn is_bad_request(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::InvalidArguments | ErrorKind::InvalidCursor
        )
    }
}

impl From<PaginationError> for Error {
    fn from(err: PaginationError) -> Self {
        let message = err.to_string();

        match err {
            PaginationError::Request(_) => {
                Self::new(ErrorKind::InvalidArguments, ErrorOrigin::Request, message)
            }
            PaginationError::CursorDecode { .. } => {
                Self::new(ErrorKind::InvalidCursor, ErrorOrigin::Cursor, message)
            }
            PaginationError::CursorEncode(_) => {
                Self::new(ErrorKind::Internal, ErrorOrigin::Cursor, message)
            }
            PaginationError::WrongNodeKind { .. } | PaginationError::NotInRanking { .. } => {
                Self::new(ErrorKind::Internal, ErrorOrigin::Response, message)
            }
            PaginationError::Upstream(_) => {
                Self::new(ErrorKind::Upstream, ErrorOrigin::Query, message)
            }
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::Internal, ErrorOrigin::Config, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for API layers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Page arguments are malformed (first and last, negative sizes, too large).
    InvalidArguments,

    /// A cursor token could not be read as the endpoint's shape.
    InvalidCursor,

    /// A caller-supplied query, count, or lookup failed.
    Upstream,

    /// The caller cannot remediate this.
    Internal,
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Config,
    Cursor,
    Query,
    Request,
    Response,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use keyset_core::{
        codec::CursorDecodeError,
        cursor::{Cursorer, TimeIdCursor},
        paginate::PageRequestError,
    };
    use std::io;

    #[test]
    fn request_errors_map_to_invalid_arguments() {
        let err = Error::from(PaginationError::from(PageRequestError::FirstAndLast));

        assert_eq!(err.kind, ErrorKind::InvalidArguments);
        assert_eq!(err.origin, ErrorOrigin::Request);
        assert!(err.is_bad_request());
    }

    #[test]
    fn cursor_errors_map_to_invalid_cursor() {
        let decode = TimeIdCursor::default()
            .unpack("%%%")
            .expect_err("garbage token should not unpack");
        let err = Error::from(PaginationError::CursorDecode {
            shape: TimeIdCursor::SHAPE,
            source: decode,
        });

        assert_eq!(err.kind, ErrorKind::InvalidCursor);
        assert_eq!(err.origin, ErrorOrigin::Cursor);
        assert!(err.message.starts_with("invalid time_id cursor"));
    }

    #[test]
    fn upstream_errors_keep_their_message() {
        let err = Error::from(PaginationError::upstream(io::Error::other("db down")));

        assert_eq!(err.kind, ErrorKind::Upstream);
        assert_eq!(err.message, "db down");
        assert!(!err.is_bad_request());
    }

    #[test]
    fn config_errors_are_internal() {
        let err = Error::from(ConfigError::InvalidValue {
            name: "KEYSET_MAX_PAGE_SIZE".to_string(),
            message: "must be positive".to_string(),
        });

        assert_eq!(err.kind, ErrorKind::Internal);
        assert_eq!(err.origin, ErrorOrigin::Config);
    }

    #[test]
    fn error_serializes_with_stable_names() {
        let err = Error::new(
            ErrorKind::InvalidCursor,
            ErrorOrigin::Cursor,
            CursorDecodeError::Empty.to_string(),
        );
        let json = serde_json::to_value(&err).expect("error should serialize");

        assert_eq!(
            json,
            serde_json::json!({
                "kind": "InvalidCursor",
                "origin": "Cursor",
                "message": "cursor token is empty",
            })
        );

        let back: Error = serde_json::from_value(json).expect("error should deserialize");
        assert_eq!(back, err);
    }
}
