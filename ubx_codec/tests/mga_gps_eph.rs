use byteorder::{BigEndian, WriteBytesExt};
use proptest::prelude::*;
use ubx_codec::{DecodeError, EncodeError, MgaGpsEph, ReturnCode, UbxBitPacket, UbxPacketMeta};

fn fixture() -> MgaGpsEph {
    MgaGpsEph {
        msg_type: 1,
        version: 1,
        sv_id: 3,
        fit_interval: 4,
        ura_index: 9,
        sv_health: 8,
        tgd: 15,
        iodc: 9,
        toc: 2512,
        af2: 100,
        af1: 200,
        af0: 300,
        crs: 44,
        delta_n: 45,
        m0: 46,
        cuc: -5,
        cus: -9,
        e: 4,
        sqrt_a: 0,
        toe: 1981,
        cic: 22,
        omega0: 200,
        cis: 23,
        crc: 24,
        i0: 25,
        omega: 34,
        omega_dot: 35,
        idot: 36,
        ..Default::default()
    }
}

/// Every field is byte aligned, so the expected wire image is a plain
/// big-endian serialization.
fn reference_bytes(eph: &MgaGpsEph) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u8(0x13).unwrap();
    out.write_u8(0x00).unwrap();
    out.write_u8(eph.msg_type).unwrap();
    out.write_u8(eph.version).unwrap();
    out.write_u8(eph.sv_id).unwrap();
    out.write_u8(eph.fit_interval).unwrap();
    out.write_u8(eph.ura_index).unwrap();
    out.write_u8(eph.sv_health).unwrap();
    out.write_i8(eph.tgd).unwrap();
    out.write_u16::<BigEndian>(eph.iodc).unwrap();
    out.write_u16::<BigEndian>(eph.toc).unwrap();
    out.write_u8(0).unwrap();
    out.write_i8(eph.af2).unwrap();
    out.write_i16::<BigEndian>(eph.af1).unwrap();
    out.write_i32::<BigEndian>(eph.af0).unwrap();
    out.write_i16::<BigEndian>(eph.crs).unwrap();
    out.write_i16::<BigEndian>(eph.delta_n).unwrap();
    out.write_i32::<BigEndian>(eph.m0).unwrap();
    out.write_i16::<BigEndian>(eph.cuc).unwrap();
    out.write_i16::<BigEndian>(eph.cus).unwrap();
    out.write_i32::<BigEndian>(eph.e).unwrap();
    out.write_i32::<BigEndian>(eph.sqrt_a).unwrap();
    out.write_u16::<BigEndian>(eph.toe).unwrap();
    out.write_i16::<BigEndian>(eph.cic).unwrap();
    out.write_i32::<BigEndian>(eph.omega0).unwrap();
    out.write_i16::<BigEndian>(eph.cis).unwrap();
    out.write_i16::<BigEndian>(eph.crc).unwrap();
    out.write_i32::<BigEndian>(eph.i0).unwrap();
    out.write_i32::<BigEndian>(eph.omega).unwrap();
    out.write_i32::<BigEndian>(eph.omega_dot).unwrap();
    out.write_i16::<BigEndian>(eph.idot).unwrap();
    out
}

#[test]
fn test_mga_gps_eph_fixture() {
    let eph = fixture();
    let mut buf = [0_u8; 1024];
    assert_eq!(eph.encode(&mut buf), 536);
    assert_eq!(&buf[..67], &reference_bytes(&eph)[..]);
    assert_eq!(MgaGpsEph::decode(&buf), Ok(eph));
}

#[test]
fn test_mga_gps_eph_exact_buffer() {
    let eph = fixture();
    let mut buf = [0_u8; 67];
    assert_eq!(eph.try_encode(&mut buf), Ok(536));
    assert_eq!(MgaGpsEph::decode(&buf), Ok(eph));
    assert_eq!(
        MgaGpsEph::decode(&buf[..66]),
        Err(DecodeError::InvalidPacketLen {
            packet: "MGA-GPS-EPH",
            expect: 67,
            got: 66
        })
    );
}

#[test]
fn test_mga_gps_eph_short_encode_buffer() {
    let mut buf = [0_u8; 40];
    assert_eq!(
        fixture().try_encode(&mut buf),
        Err(EncodeError::NotEnoughMem {
            packet: "MGA-GPS-EPH",
            expect: 67,
            got: 40
        })
    );
}

#[test]
fn test_mga_gps_eph_ignores_reserved_content() {
    let eph = fixture();
    let mut buf = eph.to_bytes();
    // reserved byte right after toc
    buf[13] = 0xaa;
    assert_eq!(MgaGpsEph::decode(&buf), Ok(eph));
}

#[test]
fn test_mga_gps_eph_rejects_rawx() {
    let mut buf = fixture().to_bytes();
    buf[0] = 0x02;
    buf[1] = 0x15;
    let res = MgaGpsEph::decode(&buf);
    assert_eq!(
        res,
        Err(DecodeError::TypeMismatch {
            packet: "MGA-GPS-EPH",
            expect: (0x13, 0x00),
            got: (0x02, 0x15)
        })
    );
    assert_eq!(i8::from(ReturnCode::of(&res)), -1);
}

fn mga_gps_eph_strategy() -> impl Strategy<Value = MgaGpsEph> {
    (
        (
            any::<[u8; 6]>(),
            any::<i8>(),
            any::<u16>(),
            any::<u16>(),
            any::<i8>(),
            any::<i16>(),
            any::<i32>(),
            any::<i16>(),
            any::<i16>(),
        ),
        (
            any::<i32>(),
            any::<i16>(),
            any::<i16>(),
            any::<i32>(),
            any::<i32>(),
            any::<u16>(),
            any::<i16>(),
            any::<i32>(),
        ),
        (
            any::<i16>(),
            any::<i16>(),
            any::<i32>(),
            any::<i32>(),
            any::<i32>(),
            any::<i16>(),
        ),
    )
        .prop_map(
            |(
                (bytes, tgd, iodc, toc, af2, af1, af0, crs, delta_n),
                (m0, cuc, cus, e, sqrt_a, toe, cic, omega0),
                (cis, crc, i0, omega, omega_dot, idot),
            )| MgaGpsEph {
                msg_type: bytes[0],
                version: bytes[1],
                sv_id: bytes[2],
                fit_interval: bytes[3],
                ura_index: bytes[4],
                sv_health: bytes[5],
                tgd,
                iodc,
                toc,
                af2,
                af1,
                af0,
                crs,
                delta_n,
                m0,
                cuc,
                cus,
                e,
                sqrt_a,
                toe,
                cic,
                omega0,
                cis,
                crc,
                i0,
                omega,
                omega_dot,
                idot,
                ..Default::default()
            },
        )
}

proptest! {
    #[test]
    fn test_mga_gps_eph_matches_reference(eph in mga_gps_eph_strategy()) {
        let bytes = eph.to_bytes();
        prop_assert_eq!(&bytes, &reference_bytes(&eph));
        prop_assert_eq!(MgaGpsEph::decode(&bytes), Ok(eph));
    }

    #[test]
    fn test_mga_gps_eph_type_mismatch_on_any_content(
        class in any::<u8>(),
        id in any::<u8>(),
        rest in prop::collection::vec(any::<u8>(), 0..100),
    ) {
        prop_assume!((class, id) != (MgaGpsEph::CLASS, MgaGpsEph::ID));
        let mut buf = vec![class, id];
        buf.extend_from_slice(&rest);
        let res = MgaGpsEph::decode(&buf);
        prop_assert_eq!(ReturnCode::of(&res), ReturnCode::MessageTypeMismatch);
    }
}
