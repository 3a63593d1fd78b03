use super::{CursorDecodeError, CursorDecoder, CursorEncoder};
use crate::types::{Id, Timestamp};

///
/// CursorField
///
/// A value that can sit in a cursor tuple. Shapes are built from these, so a
/// field type without an encoding is a compile error rather than a runtime
/// failure.
///

pub trait CursorField: Sized {
    fn encode(&self, encoder: &mut CursorEncoder);

    fn decode(decoder: &mut CursorDecoder) -> Result<Self, CursorDecodeError>;
}

impl CursorField for bool {
    fn encode(&self, encoder: &mut CursorEncoder) {
        encoder.append_bool(*self);
    }

    fn decode(decoder: &mut CursorDecoder) -> Result<Self, CursorDecodeError> {
        decoder.read_bool()
    }
}

impl CursorField for u64 {
    fn encode(&self, encoder: &mut CursorEncoder) {
        encoder.append_u64(*self);
    }

    fn decode(decoder: &mut CursorDecoder) -> Result<Self, CursorDecodeError> {
        decoder.read_u64()
    }
}

impl CursorField for i64 {
    fn encode(&self, encoder: &mut CursorEncoder) {
        encoder.append_i64(*self);
    }

    fn decode(decoder: &mut CursorDecoder) -> Result<Self, CursorDecodeError> {
        decoder.read_i64()
    }
}

impl CursorField for String {
    fn encode(&self, encoder: &mut CursorEncoder) {
        encoder.append_str(self);
    }

    fn decode(decoder: &mut CursorDecoder) -> Result<Self, CursorDecodeError> {
        decoder.read_string()
    }
}

impl CursorField for Id {
    fn encode(&self, encoder: &mut CursorEncoder) {
        encoder.append_id(self);
    }

    fn decode(decoder: &mut CursorDecoder) -> Result<Self, CursorDecodeError> {
        decoder.read_id()
    }
}

impl CursorField for Timestamp {
    fn encode(&self, encoder: &mut CursorEncoder) {
        encoder.append_time(self);
    }

    fn decode(decoder: &mut CursorDecoder) -> Result<Self, CursorDecodeError> {
        decoder.read_time()
    }
}

impl<T: CursorField> CursorField for Vec<T> {
    fn encode(&self, encoder: &mut CursorEncoder) {
        encoder.append_list(self);
    }

    fn decode(decoder: &mut CursorDecoder) -> Result<Self, CursorDecodeError> {
        decoder.read_list()
    }
}
