//! Bit-level access to byte buffers.
//!
//! Bit `0` is the most significant bit of the first byte. Fields are packed most
//! significant bit first and freely straddle byte boundaries, so a field never
//! needs to be byte aligned.
//!
//! All functions index the buffer directly: touching a bit past its end panics
//! just like slice indexing does. Sizing the buffer is the caller's job.

/// Widest field a single call can move.
pub const MAX_FIELD_BITS: u32 = 64;

#[inline]
fn check_width(len: u32) {
    assert!(
        (1..=MAX_FIELD_BITS).contains(&len),
        "bit field width must be within 1..={}, got {}",
        MAX_FIELD_BITS,
        len
    );
}

/// Packs the low `len` bits of `value` at bit position `pos`.
///
/// Higher bits of `value` are dropped. Bits outside `[pos, pos + len)` are left
/// untouched.
///
/// # Panics
///
/// If `len` is not within `1..=64`, or the field does not fit into `buf`.
pub fn set_bits_unsigned(buf: &mut [u8], pos: usize, len: u32, value: u64) {
    check_width(len);
    for i in 0..len {
        let at = pos + i as usize;
        let mask = 0x80_u8 >> (at % 8);
        if (value >> (len - 1 - i)) & 1 == 1 {
            buf[at / 8] |= mask;
        } else {
            buf[at / 8] &= !mask;
        }
    }
}

/// Packs a two's complement value on `len` bits.
///
/// # Panics
///
/// Same conditions as [set_bits_unsigned].
pub fn set_bits_signed(buf: &mut [u8], pos: usize, len: u32, value: i64) {
    set_bits_unsigned(buf, pos, len, value as u64);
}

/// Reads `len` bits at `pos` as an unsigned value.
///
/// # Panics
///
/// If `len` is not within `1..=64`, or the field does not fit into `buf`.
pub fn get_bits_unsigned(buf: &[u8], pos: usize, len: u32) -> u64 {
    check_width(len);
    (0..len as usize).fold(0_u64, |acc, i| {
        let at = pos + i;
        let bit = (buf[at / 8] >> (7 - at % 8)) & 1;
        (acc << 1) | u64::from(bit)
    })
}

/// Reads `len` bits at `pos` and sign-extends them from bit `len - 1`.
///
/// # Panics
///
/// Same conditions as [get_bits_unsigned].
pub fn get_bits_signed(buf: &[u8], pos: usize, len: u32) -> i64 {
    sign_extend(get_bits_unsigned(buf, pos, len), len)
}

/// Sign-extends the low `len` bits of `value` to a full `i64`.
pub fn sign_extend(value: u64, len: u32) -> i64 {
    check_width(len);
    let shift = MAX_FIELD_BITS - len;
    ((value << shift) as i64) >> shift
}

/// Number of bytes needed to hold `bits` bits.
pub const fn bytes_for_bits(bits: usize) -> usize {
    bits.div_ceil(8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_across_byte_boundary() {
        let mut buf = [0_u8; 2];
        set_bits_unsigned(&mut buf, 4, 8, 0xab);
        assert_eq!(buf, [0x0a, 0xb0]);
        assert_eq!(get_bits_unsigned(&buf, 4, 8), 0xab);
    }

    #[test]
    fn neighbouring_bits_are_kept() {
        let mut buf = [0xff_u8; 2];
        set_bits_unsigned(&mut buf, 3, 7, 0);
        assert_eq!(buf, [0b1110_0000, 0b0011_1111]);
    }

    #[test]
    fn signed_nibble() {
        let mut buf = [0xff_u8];
        set_bits_signed(&mut buf, 2, 4, -3);
        assert_eq!(buf, [0b1111_0111]);
        assert_eq!(get_bits_signed(&buf, 2, 4), -3);
        assert_eq!(get_bits_unsigned(&buf, 2, 4), 0b1101);
    }

    #[test]
    fn value_wider_than_field_is_truncated() {
        let mut buf = [0_u8];
        set_bits_unsigned(&mut buf, 0, 4, 0x1f);
        assert_eq!(buf, [0xf0]);
    }

    #[test]
    fn full_width_fields() {
        let mut buf = [0_u8; 9];
        set_bits_unsigned(&mut buf, 4, 64, u64::MAX - 1);
        assert_eq!(get_bits_unsigned(&buf, 4, 64), u64::MAX - 1);
        set_bits_signed(&mut buf, 4, 64, i64::MIN);
        assert_eq!(get_bits_signed(&buf, 4, 64), i64::MIN);
        assert_eq!(buf[0] & 0xf0, 0);
    }

    #[test]
    fn sign_extension() {
        assert_eq!(sign_extend(0b1111_1111, 8), -1);
        assert_eq!(sign_extend(0b0111_1111, 8), 127);
        assert_eq!(sign_extend(1, 1), -1);
    }

    #[test]
    fn byte_count() {
        assert_eq!(bytes_for_bits(0), 0);
        assert_eq!(bytes_for_bits(1), 1);
        assert_eq!(bytes_for_bits(140), 18);
        assert_eq!(bytes_for_bits(536), 67);
    }

    #[test]
    #[should_panic(expected = "bit field width")]
    fn zero_width_is_rejected() {
        let mut buf = [0_u8; 1];
        set_bits_unsigned(&mut buf, 0, 0, 1);
    }

    #[test]
    #[should_panic(expected = "bit field width")]
    fn oversized_width_is_rejected() {
        let buf = [0_u8; 16];
        get_bits_unsigned(&buf, 0, 65);
    }

    #[test]
    #[should_panic]
    fn write_past_end_panics() {
        let mut buf = [0_u8; 1];
        set_bits_unsigned(&mut buf, 4, 8, 0xff);
    }
}
