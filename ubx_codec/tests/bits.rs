use proptest::prelude::*;
use ubx_codec::bits::{
    get_bits_signed, get_bits_unsigned, set_bits_signed, set_bits_unsigned, sign_extend,
};

fn low_bits(value: u64, len: u32) -> u64 {
    if len == 64 {
        value
    } else {
        value & ((1 << len) - 1)
    }
}

fn assert_outside_untouched(before: &[u8], after: &[u8], pos: usize, len: u32) {
    for bit in 0..before.len() * 8 {
        if (pos..pos + len as usize).contains(&bit) {
            continue;
        }
        assert_eq!(
            get_bits_unsigned(before, bit, 1),
            get_bits_unsigned(after, bit, 1),
            "bit {} changed writing {} bits at {}",
            bit,
            len,
            pos
        );
    }
}

#[test]
fn test_bits_straddle_bytes() {
    let mut buf = [0_u8; 4];
    set_bits_unsigned(&mut buf, 4, 12, 0xabc);
    assert_eq!(buf, [0x0a, 0xbc, 0x00, 0x00]);
    set_bits_signed(&mut buf, 19, 10, -2);
    assert_eq!(get_bits_signed(&buf, 19, 10), -2);
    assert_eq!(get_bits_unsigned(&buf, 19, 10), 0x3fe);
    assert_eq!(get_bits_unsigned(&buf, 4, 12), 0xabc);
}

#[test]
fn test_bits_truncate_to_width() {
    let mut buf = [0_u8; 2];
    set_bits_unsigned(&mut buf, 0, 4, 0x1f);
    assert_eq!(buf, [0xf0, 0x00]);
    set_bits_signed(&mut buf, 8, 3, 5);
    // 0b101 read back on 3 bits is -3
    assert_eq!(get_bits_signed(&buf, 8, 3), -3);
}

proptest! {
    #[test]
    fn test_bits_unsigned_round_trip(
        len in 1_u32..=64,
        pos in 0_usize..64,
        raw in any::<u64>(),
        init in any::<[u8; 16]>(),
    ) {
        let value = low_bits(raw, len);
        let mut buf = init;
        set_bits_unsigned(&mut buf, pos, len, value);
        prop_assert_eq!(get_bits_unsigned(&buf, pos, len), value);
        assert_outside_untouched(&init, &buf, pos, len);
    }

    #[test]
    fn test_bits_signed_round_trip(
        len in 1_u32..=64,
        pos in 0_usize..64,
        raw in any::<u64>(),
        init in any::<[u8; 16]>(),
    ) {
        let value = sign_extend(raw, len);
        let mut buf = init;
        set_bits_signed(&mut buf, pos, len, value);
        prop_assert_eq!(get_bits_signed(&buf, pos, len), value);
        prop_assert_eq!(get_bits_unsigned(&buf, pos, len), low_bits(raw, len));
        assert_outside_untouched(&init, &buf, pos, len);
    }
}
