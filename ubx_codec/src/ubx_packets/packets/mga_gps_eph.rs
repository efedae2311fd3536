use crate::{
    error::DecodeError,
    field::{BitRecord, Reserved},
    layout::MessageLayout,
    ubx_packets::{decode_record, encode_record, UbxBitPacket, UbxPacketMeta},
};

ubx_bit_record! {
    /// GPS ephemeris assistance (MGA-GPS-EPH)
    ///
    /// Every field is an unscaled integer exactly as broadcast; applying the
    /// scale factors is left to the caller.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MgaGpsEph {
        pub msg_type: u8,
        pub version: u8,
        pub sv_id: u8,
        pub fit_interval: u8,
        pub ura_index: u8,
        pub sv_health: u8,
        /// Group delay differential
        pub tgd: i8,
        /// Issue of data, clock
        pub iodc: u16,
        /// Clock data reference time
        pub toc: u16,
        #[cfg_attr(feature = "serde", serde(skip))]
        pub reserved1: Reserved<8>,
        pub af2: i8,
        pub af1: i16,
        pub af0: i32,
        pub crs: i16,
        /// Mean motion difference
        pub delta_n: i16,
        /// Mean anomaly at reference time
        pub m0: i32,
        pub cuc: i16,
        pub cus: i16,
        /// Eccentricity
        pub e: i32,
        pub sqrt_a: i32,
        /// Ephemeris reference time
        pub toe: u16,
        pub cic: i16,
        pub omega0: i32,
        pub cis: i16,
        pub crc: i16,
        pub i0: i32,
        /// Argument of perigee
        pub omega: i32,
        pub omega_dot: i32,
        pub idot: i16,
    }
}

const MGA_GPS_EPH_LAYOUT: MessageLayout = MessageLayout {
    name: "MGA-GPS-EPH",
    class: 0x13,
    id: 0x00,
    fields: <MgaGpsEph as BitRecord>::FIELDS,
    group: None,
};

impl UbxPacketMeta for MgaGpsEph {
    const CLASS: u8 = MGA_GPS_EPH_LAYOUT.class;
    const ID: u8 = MGA_GPS_EPH_LAYOUT.id;
    const LAYOUT: &'static MessageLayout = &MGA_GPS_EPH_LAYOUT;
}

impl UbxBitPacket for MgaGpsEph {
    fn encoded_bits(&self) -> usize {
        Self::LAYOUT.header_bits()
    }

    fn encode(&self, buf: &mut [u8]) -> usize {
        encode_record(self, buf)
    }

    fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        decode_record(buf)
    }
}
