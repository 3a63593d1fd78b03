use super::{
    CursorDecodeError, CursorDecoder, CursorEncodeError, CursorEncoder, CursorField,
    MAX_CURSOR_TOKEN_LEN,
};
use crate::types::{Id, Timestamp};
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use chrono::{DateTime, FixedOffset, TimeZone as _, Utc};
use proptest::prelude::*;

fn token_of(bytes: &[u8]) -> String {
    STANDARD_NO_PAD.encode(bytes)
}

fn round_trip<T: CursorField>(value: &T) -> T {
    let mut encoder = CursorEncoder::new();
    value.encode(&mut encoder);
    let token = encoder.finish().expect("field should encode");

    let mut decoder = CursorDecoder::from_token(&token).expect("token should decode");
    let decoded = T::decode(&mut decoder).expect("field should decode");
    decoder.finish().expect("payload should be fully consumed");

    decoded
}

fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
    (
        -62_135_596_800i64..253_402_300_799,
        0u32..1_000_000_000,
        -86_399i32..86_400,
    )
        .prop_map(|(secs, nanos, offset)| {
            let utc = DateTime::<Utc>::from_timestamp(secs, nanos)
                .expect("strategy range should be representable");
            let offset = FixedOffset::east_opt(offset).expect("strategy offset should be valid");

            utc.with_timezone(&offset)
        })
}

#[test]
fn bool_encodes_as_single_varint_byte() {
    let mut encoder = CursorEncoder::new();
    encoder.append_bool(true);
    encoder.append_bool(false);
    let token = encoder.finish().expect("bools should encode");

    assert_eq!(
        STANDARD_NO_PAD.decode(&token).expect("valid base64"),
        vec![1, 0]
    );
}

#[test]
fn string_is_length_prefixed() {
    let mut encoder = CursorEncoder::new();
    encoder.append_str("abc");
    let token = encoder.finish().expect("string should encode");

    assert_eq!(
        STANDARD_NO_PAD.decode(&token).expect("valid base64"),
        vec![3, b'a', b'b', b'c']
    );
}

#[test]
fn time_keeps_instant_and_offset() {
    let offset = FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("valid offset");
    let time = offset
        .with_ymd_and_hms(2024, 2, 29, 23, 59, 58)
        .single()
        .expect("unambiguous local time")
        + chrono::Duration::nanoseconds(123_456_789);

    let decoded = round_trip(&time);

    assert_eq!(decoded, time);
    assert_eq!(decoded.offset(), time.offset());
    assert_eq!(decoded.timestamp_subsec_nanos(), 123_456_789);
}

#[test]
fn empty_token_is_rejected() {
    let err = CursorDecoder::from_token("").expect_err("empty token should be rejected");
    assert_eq!(err, CursorDecodeError::Empty);
}

#[test]
fn oversized_token_is_rejected_before_decoding() {
    let token = "A".repeat(MAX_CURSOR_TOKEN_LEN + 1);
    let err = CursorDecoder::from_token(&token).expect_err("oversized token should be rejected");

    assert_eq!(
        err,
        CursorDecodeError::TooLong {
            len: MAX_CURSOR_TOKEN_LEN + 1,
            max: MAX_CURSOR_TOKEN_LEN,
        }
    );
}

#[test]
fn encoder_refuses_tokens_the_decoder_would_reject() {
    let mut encoder = CursorEncoder::new();
    encoder.append_str(&"x".repeat(MAX_CURSOR_TOKEN_LEN));
    let err = encoder
        .finish()
        .expect_err("oversized payload should not encode");

    assert!(matches!(err, CursorEncodeError::TooLong { .. }));
}

#[test]
fn malformed_base64_is_rejected() {
    for token in ["not base64!", "AA==", "A"] {
        let err = CursorDecoder::from_token(token).expect_err("malformed base64 should fail");
        assert!(
            matches!(err, CursorDecodeError::InvalidBase64 { .. }),
            "unexpected error for {token:?}: {err:?}"
        );
    }
}

#[test]
fn length_prefix_past_end_is_overrun() {
    let token = token_of(&[5, b'a', b'b']);
    let mut decoder = CursorDecoder::from_token(&token).expect("valid base64");
    let err = decoder
        .read_string()
        .expect_err("overrunning prefix should fail");

    assert_eq!(
        err,
        CursorDecodeError::LengthOverrun {
            declared: 5,
            remaining: 2,
        }
    );
}

#[test]
fn huge_list_count_fails_without_allocating() {
    let mut bytes = Vec::new();
    super::varint::put_uvarint(&mut bytes, u64::MAX);
    let token = token_of(&bytes);
    let mut decoder = CursorDecoder::from_token(&token).expect("valid base64");
    let err = decoder
        .read_list::<Id>()
        .expect_err("huge list count should fail");

    assert!(matches!(err, CursorDecodeError::LengthOverrun { .. }));
}

#[test]
fn truncated_payload_is_rejected() {
    let mut encoder = CursorEncoder::new();
    encoder.append_i64(-42);
    let token = encoder.finish().expect("i64 should encode");

    let mut decoder = CursorDecoder::from_token(&token).expect("valid base64");
    decoder.read_i64().expect("first field should decode");
    let err = decoder.read_i64().expect_err("missing field should fail");

    assert!(matches!(err, CursorDecodeError::UnexpectedEnd { .. }));
}

#[test]
fn bool_out_of_range_is_rejected() {
    let token = token_of(&[2]);
    let mut decoder = CursorDecoder::from_token(&token).expect("valid base64");

    assert_eq!(
        decoder.read_bool(),
        Err(CursorDecodeError::InvalidBool { value: 2 })
    );
}

#[test]
fn time_with_wrong_width_is_rejected() {
    let token = token_of(&[3, 0, 0, 0]);
    let mut decoder = CursorDecoder::from_token(&token).expect("valid base64");

    assert!(matches!(
        decoder.read_time(),
        Err(CursorDecodeError::InvalidTime { .. })
    ));
}

#[test]
fn time_with_impossible_offset_is_rejected() {
    let mut bytes = vec![16];
    bytes.extend_from_slice(&0i64.to_be_bytes());
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&(100_000i32).to_be_bytes());
    let token = token_of(&bytes);
    let mut decoder = CursorDecoder::from_token(&token).expect("valid base64");

    assert!(matches!(
        decoder.read_time(),
        Err(CursorDecodeError::InvalidTime { .. })
    ));
}

#[test]
fn invalid_utf8_is_rejected() {
    let token = token_of(&[2, 0xc3, 0x28]);
    let mut decoder = CursorDecoder::from_token(&token).expect("valid base64");

    assert_eq!(decoder.read_string(), Err(CursorDecodeError::InvalidUtf8));
}

#[test]
fn trailing_bytes_fail_finish() {
    let token = token_of(&[1, 7, 7]);
    let mut decoder = CursorDecoder::from_token(&token).expect("valid base64");
    decoder.read_bool().expect("bool should decode");

    assert_eq!(
        decoder.finish(),
        Err(CursorDecodeError::TrailingBytes { count: 2 })
    );
}

proptest! {
    #[test]
    fn u64_round_trips(value in any::<u64>()) {
        prop_assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn i64_round_trips(value in any::<i64>()) {
        prop_assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn bool_round_trips(value in any::<bool>()) {
        prop_assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn string_round_trips(value in ".{0,64}") {
        prop_assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn timestamp_round_trips(value in arb_timestamp()) {
        let decoded = round_trip(&value);
        prop_assert_eq!(decoded, value);
        prop_assert_eq!(decoded.offset(), value.offset());
    }

    #[test]
    fn id_list_round_trips(ids in prop::collection::vec("[a-zA-Z0-9]{1,27}", 0..32)) {
        let ids: Vec<Id> = ids.into_iter().map(Id::from).collect();
        prop_assert_eq!(round_trip(&ids), ids);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let token = token_of(&bytes);
        if let Ok(mut decoder) = CursorDecoder::from_token(&token) {
            let _ = decoder.read_time();
            let _ = decoder.read_list::<Id>();
            let _ = decoder.read_bool();
        }
    }
}
