//! LEB128 varints with zig-zag mapping for signed values.

use super::CursorDecodeError;

// A u64 never needs more than ten 7-bit groups.
const MAX_VARINT_LEN: usize = 10;

#[expect(clippy::cast_possible_truncation)]
pub(super) fn put_uvarint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Read one varint, returning the value and the number of bytes consumed.
pub(super) fn read_uvarint(bytes: &[u8]) -> Result<(u64, usize), CursorDecodeError> {
    let mut value = 0u64;

    for (idx, &byte) in bytes.iter().enumerate() {
        // the tenth group may only carry the top bit of the value
        if idx == MAX_VARINT_LEN || (idx == MAX_VARINT_LEN - 1 && byte > 1) {
            return Err(CursorDecodeError::VarintOverflow);
        }

        value |= u64::from(byte & 0x7f) << (7 * idx);
        if byte & 0x80 == 0 {
            return Ok((value, idx + 1));
        }
    }

    Err(CursorDecodeError::UnexpectedEnd {
        needed: 1,
        remaining: 0,
    })
}

pub(super) const fn zigzag(value: i64) -> u64 {
    (value << 1).cast_unsigned() ^ (value >> 63).cast_unsigned()
}

pub(super) const fn unzigzag(raw: u64) -> i64 {
    (raw >> 1).cast_signed() ^ -((raw & 1).cast_signed())
}

///
/// TESTS
///
