//! Raw measurement data (RXM-RAWX).
//!
//! The payload carries the receiver time followed by up to [MAX_NUM_SATS]
//! per-signal measurement blocks. Carrier phase is passed through as reported:
//! ambiguity rollover and code/carrier divergence are not handled here.

use bitflags::bitflags;
use core::fmt;
use log::trace;

use crate::{
    constants::MAX_NUM_SATS,
    error::{CapacityError, DecodeError},
    field::{BitRecord, Reserved},
    layout::{MessageLayout, RepeatedGroup},
    ubx_packets::{open_packet, start_packet, UbxBitPacket, UbxPacketMeta},
};

ubx_bit_record! {
    struct RxmRawxHeader {
        rcv_tow: f64,
        week: u16,
        leap_s: i16,
        num_meas: u8,
        rec_stat: u8,
        version: u8,
        reserved1: Reserved<4>,
    }
}

ubx_bit_record! {
    /// One block of the [RxmRawx] message
    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct RxmRawxMeas {
        /// Pseudorange measurement (m)
        pub pr_mes: f64,
        /// Carrier phase measurement (cycles)
        pub cp_mes: f64,
        /// Doppler measurement (Hz)
        pub do_mes: f32,
        pub gnss_id: u8,
        pub sv_id: u8,
        pub sig_id: u8,
        /// GLONASS frequency slot
        pub freq_id: i8,
        pub lock_time: u8,
        /// Carrier-to-noise density ratio (dB-Hz)
        pub cno: u16,
        pub pr_stdev: u8,
        pub cp_stdev: u8,
        pub do_stdev: u8,
        pub trk_stat: u8,
        #[cfg_attr(feature = "serde", serde(skip))]
        pub reserved2: Reserved<8>,
    }
}

impl RxmRawxMeas {
    pub fn pr_stdev_flags(&self) -> StdevFlags {
        StdevFlags::from_bits_retain(self.pr_stdev)
    }

    pub fn cp_stdev_flags(&self) -> StdevFlags {
        StdevFlags::from_bits_retain(self.cp_stdev)
    }

    pub fn do_stdev_flags(&self) -> StdevFlags {
        StdevFlags::from_bits_retain(self.do_stdev)
    }

    pub fn trk_stat_flags(&self) -> TrkStatFlags {
        TrkStatFlags::from_bits_retain(self.trk_stat)
    }
}

bitflags! {
    /// Receiver tracking status bitfield
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RecStatFlags: u8 {
        /// Leap seconds have been determined
        const LEAP_SEC = 0x1;
        /// Clock reset applied.
        const CLK_RESET = 0x2;
    }
}

bitflags! {
    /// Estimated standard deviation, low nibble of the stdev fields
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StdevFlags: u8 {
        const STD_1 = 0x01;
        const STD_2 = 0x02;
        const STD_3 = 0x04;
        const STD_4 = 0x08;
    }
}

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TrkStatFlags: u8 {
        const PR_VALID = 0x01;
        const CP_VALID = 0x02;
        const HALF_CYCLE = 0x04;
        const SUB_HALF_CYCLE = 0x08;
    }
}

const RXM_RAWX_LAYOUT: MessageLayout = MessageLayout {
    name: "RXM-RAWX",
    class: 0x02,
    id: 0x15,
    fields: <RxmRawxHeader as BitRecord>::FIELDS,
    group: Some(RepeatedGroup {
        name: "measurements",
        count_field: "num_meas",
        capacity: MAX_NUM_SATS,
        fields: <RxmRawxMeas as BitRecord>::FIELDS,
    }),
};

/// Multi-GNSS raw measurement data
///
/// Measurements keep their insertion order, which is the order they take on
/// the wire. At most [MAX_NUM_SATS] can be stored, so the encoded
/// `num_meas` always matches the number of blocks that follow it.
#[derive(Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "RxmRawxRepr", try_from = "RxmRawxRepr")
)]
pub struct RxmRawx {
    /// Measurement time of week in receiver local time approximately aligned to the GPS time system.
    pub rcv_tow: f64,
    /// GPS week number in receiver local time.
    pub week: u16,
    /// GPS leap seconds (GPS-UTC)
    pub leap_s: i16,
    /// Receiver tracking status bitfield, see [RecStatFlags]
    pub rec_stat: u8,
    /// Message version
    pub version: u8,
    num_meas: u8,
    meas: [RxmRawxMeas; MAX_NUM_SATS],
}

impl RxmRawx {
    /// Message with the given header and no measurements yet; add them with
    /// [Self::push] or [Self::with_measurements].
    pub fn new(rcv_tow: f64, week: u16, leap_s: i16, rec_stat: u8, version: u8) -> Self {
        Self {
            rcv_tow,
            week,
            leap_s,
            rec_stat,
            version,
            num_meas: 0,
            meas: [RxmRawxMeas::default(); MAX_NUM_SATS],
        }
    }

    pub fn num_meas(&self) -> u8 {
        self.num_meas
    }

    pub fn measurements(&self) -> &[RxmRawxMeas] {
        &self.meas[..usize::from(self.num_meas)]
    }

    pub fn measurements_mut(&mut self) -> &mut [RxmRawxMeas] {
        &mut self.meas[..usize::from(self.num_meas)]
    }

    pub fn is_full(&self) -> bool {
        usize::from(self.num_meas) == MAX_NUM_SATS
    }

    /// Appends a measurement after the ones already stored.
    pub fn push(&mut self, meas: RxmRawxMeas) -> Result<(), CapacityError> {
        let slot = self
            .meas
            .get_mut(usize::from(self.num_meas))
            .ok_or(CapacityError {
                capacity: MAX_NUM_SATS,
            })?;
        *slot = meas;
        self.num_meas += 1;
        Ok(())
    }

    pub fn with_measurements<I>(mut self, measurements: I) -> Result<Self, CapacityError>
    where
        I: IntoIterator<Item = RxmRawxMeas>,
    {
        for meas in measurements {
            self.push(meas)?;
        }
        Ok(self)
    }

    pub fn clear(&mut self) {
        self.measurements_mut().fill(RxmRawxMeas::default());
        self.num_meas = 0;
    }

    pub fn rec_stat_flags(&self) -> RecStatFlags {
        RecStatFlags::from_bits_retain(self.rec_stat)
    }

    fn header(&self) -> RxmRawxHeader {
        RxmRawxHeader {
            rcv_tow: self.rcv_tow,
            week: self.week,
            leap_s: self.leap_s,
            num_meas: self.num_meas,
            rec_stat: self.rec_stat,
            version: self.version,
            reserved1: Reserved,
        }
    }
}

impl Default for RxmRawx {
    fn default() -> Self {
        Self::new(0.0, 0, 0, 0, 0)
    }
}

impl PartialEq for RxmRawx {
    fn eq(&self, other: &Self) -> bool {
        self.rcv_tow == other.rcv_tow
            && self.week == other.week
            && self.leap_s == other.leap_s
            && self.rec_stat == other.rec_stat
            && self.version == other.version
            && self.measurements() == other.measurements()
    }
}

impl fmt::Debug for RxmRawx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RxmRawx")
            .field("rcv_tow", &self.rcv_tow)
            .field("week", &self.week)
            .field("leap_s", &self.leap_s)
            .field("num_meas", &self.num_meas)
            .field("rec_stat", &self.rec_stat_flags())
            .field("version", &self.version)
            .field("measurements", &self.measurements())
            .finish()
    }
}

impl UbxPacketMeta for RxmRawx {
    const CLASS: u8 = RXM_RAWX_LAYOUT.class;
    const ID: u8 = RXM_RAWX_LAYOUT.id;
    const LAYOUT: &'static MessageLayout = &RXM_RAWX_LAYOUT;
}

impl UbxBitPacket for RxmRawx {
    fn encoded_bits(&self) -> usize {
        Self::LAYOUT.total_bits(usize::from(self.num_meas))
    }

    fn encode(&self, buf: &mut [u8]) -> usize {
        let mut writer = start_packet::<Self>(buf, self.encoded_bits());
        writer.put_record(&self.header());
        for meas in self.measurements() {
            writer.put_record(meas);
        }
        let bits = writer.position();
        trace!(
            "{}: encoded {} measurements in {} bits",
            Self::LAYOUT.name,
            self.num_meas,
            bits
        );
        bits
    }

    fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = open_packet::<Self>(buf)?;
        let header: RxmRawxHeader = reader.get_record();

        let count = usize::from(header.num_meas);
        if count > MAX_NUM_SATS {
            return Err(Self::LAYOUT.count_overflow(count));
        }
        Self::LAYOUT.check_len(buf, Self::LAYOUT.total_bits(count))?;

        let mut msg = Self::new(
            header.rcv_tow,
            header.week,
            header.leap_s,
            header.rec_stat,
            header.version,
        );
        msg.num_meas = header.num_meas;
        for slot in msg.measurements_mut() {
            *slot = reader.get_record();
        }
        Ok(msg)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RxmRawxRepr {
    rcv_tow: f64,
    week: u16,
    leap_s: i16,
    rec_stat: u8,
    version: u8,
    measurements: alloc::vec::Vec<RxmRawxMeas>,
}

#[cfg(feature = "serde")]
impl From<RxmRawx> for RxmRawxRepr {
    fn from(msg: RxmRawx) -> Self {
        Self {
            rcv_tow: msg.rcv_tow,
            week: msg.week,
            leap_s: msg.leap_s,
            rec_stat: msg.rec_stat,
            version: msg.version,
            measurements: msg.measurements().to_vec(),
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<RxmRawxRepr> for RxmRawx {
    type Error = CapacityError;

    fn try_from(repr: RxmRawxRepr) -> Result<Self, Self::Error> {
        RxmRawx::new(
            repr.rcv_tow,
            repr.week,
            repr.leap_s,
            repr.rec_stat,
            repr.version,
        )
        .with_measurements(repr.measurements)
    }
}
