use chrono::{DateTime, FixedOffset, Utc};
use derive_more::{Deref, Display, From};
use serde::{Deserialize, Serialize};

///
/// Timestamp
///
/// Cursor timestamps keep their UTC offset; two timestamps compare equal when
/// they name the same instant.
///

pub type Timestamp = DateTime<FixedOffset>;

// Seconds for 3000-01-01T01:01:01Z.
const FAR_FUTURE_SECS: i64 = 32_503_683_661;

// Seconds for 1970-01-01T01:01:01Z.
const FAR_PAST_SECS: i64 = 3_661;

const SENTINEL_NANOS: u32 = 1;

/// A timestamp that sorts after every timestamp a store will hold.
#[must_use]
pub fn far_future() -> Timestamp {
    DateTime::<Utc>::from_timestamp(FAR_FUTURE_SECS, SENTINEL_NANOS)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
        .fixed_offset()
}

/// A timestamp that sorts before every timestamp a store will hold.
#[must_use]
pub fn far_past() -> Timestamp {
    DateTime::<Utc>::from_timestamp(FAR_PAST_SECS, SENTINEL_NANOS)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
        .fixed_offset()
}

///
/// Id
///
/// Opaque database identifier. Ids are unique, which makes them the final
/// tiebreaker of every cursor shape.
///

#[derive(
    Clone,
    Debug,
    Default,
    Deref,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The empty id, used as the id component of sentinel bounds.
    #[must_use]
    pub const fn empty() -> Self {
        Self(String::new())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{Id, far_future, far_past};

    #[test]
    fn sentinels_bracket_realistic_timestamps() {
        let now = chrono::Utc::now().fixed_offset();

        assert!(far_past() < now);
        assert!(far_future() > now);
        assert_eq!(
            far_future().to_rfc3339(),
            "3000-01-01T01:01:01.000000001+00:00"
        );
        assert_eq!(
            far_past().to_rfc3339(),
            "1970-01-01T01:01:01.000000001+00:00"
        );
    }

    #[test]
    fn id_displays_and_serializes_as_plain_string() {
        let id = Id::from("2Nf8q1");

        assert_eq!(id.to_string(), "2Nf8q1");
        assert_eq!(
            serde_json::to_string(&id).expect("id should serialize"),
            "\"2Nf8q1\""
        );
        assert!(Id::empty().is_empty());
    }
}
