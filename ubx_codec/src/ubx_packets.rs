use crate::{
    constants::UBX_IDENT_BITS,
    error::{DecodeError, EncodeError},
    field::{BitReader, BitRecord, BitWriter},
    layout::MessageLayout,
};
use log::{debug, trace};

/// Defines a run of scalar fields once and derives from it both the wire
/// layout ([BitRecord::FIELDS]) and the encode/decode bodies, so the two can
/// never disagree. Field order is wire order; each field's width is the width
/// of its type (see [crate::BitField]).
macro_rules! ubx_bit_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::field::BitRecord for $name {
            const FIELDS: &'static [$crate::field::FieldDesc] = &[
                $($crate::field::FieldDesc::of::<$ty>(stringify!($field)),)*
            ];

            fn write_fields(&self, writer: &mut $crate::field::BitWriter<'_>) {
                $(writer.put(&self.$field);)*
            }

            fn read_fields(reader: &mut $crate::field::BitReader<'_>) -> Self {
                Self {
                    $($field: reader.get(),)*
                }
            }
        }
    };
}

mod packets;

pub use packets::*;

/// Information about concrete UBX protocol's packet
pub trait UbxPacketMeta {
    const CLASS: u8;
    const ID: u8;
    const LAYOUT: &'static MessageLayout;
}

/// Bit-packed codec of a message, class/id pair included.
pub trait UbxBitPacket: UbxPacketMeta + Sized {
    /// Exact number of bits [Self::encode] produces for this value
    fn encoded_bits(&self) -> usize;

    fn encoded_len(&self) -> usize {
        self.encoded_bits().div_ceil(8)
    }

    /// Packs the message at the start of `buf` and returns the number of bits
    /// written. Only those bits are modified.
    ///
    /// # Panics
    ///
    /// If `buf` is shorter than [Self::encoded_len]; see [Self::try_encode].
    fn encode(&self, buf: &mut [u8]) -> usize;

    fn try_encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        let expect = self.encoded_len();
        if buf.len() < expect {
            return Err(EncodeError::NotEnoughMem {
                packet: Self::LAYOUT.name,
                expect,
                got: buf.len(),
            });
        }
        Ok(self.encode(buf))
    }

    /// Unpacks a buffer starting at the class/id pair.
    fn decode(buf: &[u8]) -> Result<Self, DecodeError>;

    #[cfg(feature = "alloc")]
    fn to_bytes(&self) -> alloc::vec::Vec<u8> {
        let mut buf = alloc::vec![0; self.encoded_len()];
        self.encode(&mut buf);
        buf
    }
}

pub(crate) fn assert_room(packet: &'static str, need: usize, got: usize) {
    assert!(
        got >= need,
        "{} needs {} bytes of buffer, got {}",
        packet,
        need,
        got
    );
}

/// Writes the class/id pair of `P` and hands back the writer positioned
/// right after it.
pub(crate) fn start_packet<P: UbxPacketMeta>(buf: &mut [u8], bits: usize) -> BitWriter<'_> {
    assert_room(P::LAYOUT.name, bits.div_ceil(8), buf.len());
    let mut writer = BitWriter::new(buf);
    writer.put(&P::CLASS);
    writer.put(&P::ID);
    writer
}

/// Validates identity and header length, returning a reader positioned right
/// after the class/id pair.
pub(crate) fn open_packet<P: UbxPacketMeta>(buf: &[u8]) -> Result<BitReader<'_>, DecodeError> {
    P::LAYOUT.check_ident(buf)?;
    P::LAYOUT.check_len(buf, P::LAYOUT.header_bits())?;
    let mut reader = BitReader::new(buf);
    reader.skip(UBX_IDENT_BITS);
    Ok(reader)
}

/// Encoder for messages made of a single [BitRecord].
pub(crate) fn encode_record<P: UbxPacketMeta + BitRecord>(packet: &P, buf: &mut [u8]) -> usize {
    let mut writer = start_packet::<P>(buf, P::LAYOUT.header_bits());
    writer.put_record(packet);
    let bits = writer.position();
    trace!("{}: encoded {} bits", P::LAYOUT.name, bits);
    bits
}

pub(crate) fn decode_record<P: UbxPacketMeta + BitRecord>(buf: &[u8]) -> Result<P, DecodeError> {
    let mut reader = open_packet::<P>(buf)?;
    Ok(reader.get_record())
}

/// Closed set of message types this crate knows the layout of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    RxmRawx,
    MgaGpsEph,
}

impl MessageKind {
    pub const ALL: [MessageKind; 2] = [MessageKind::RxmRawx, MessageKind::MgaGpsEph];

    pub fn layout(self) -> &'static MessageLayout {
        match self {
            MessageKind::RxmRawx => RxmRawx::LAYOUT,
            MessageKind::MgaGpsEph => MgaGpsEph::LAYOUT,
        }
    }

    pub fn from_ids(class: u8, id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| {
            let layout = kind.layout();
            layout.class == class && layout.id == id
        })
    }

    /// Message type of a buffer starting at a class/id pair.
    pub fn identify(buf: &[u8]) -> Result<Self, DecodeError> {
        match buf {
            [class, id, ..] => Self::from_ids(*class, *id).ok_or_else(|| {
                debug!("no layout for {:#04x}/{:#04x}", class, id);
                DecodeError::UnknownMessage {
                    class: *class,
                    id: *id,
                }
            }),
            _ => Err(DecodeError::InvalidPacketLen {
                packet: "UBX",
                expect: crate::constants::UBX_IDENT_LEN,
                got: buf.len(),
            }),
        }
    }
}

/// Any message this crate can encode or decode.
#[allow(
    clippy::large_enum_variant,
    reason = "RXM-RAWX keeps its measurements inline so decoding never allocates"
)]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UbxMessage {
    RxmRawx(RxmRawx),
    MgaGpsEph(MgaGpsEph),
}

impl UbxMessage {
    /// Decodes a buffer, picking the codec from its class/id pair.
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        match MessageKind::identify(buf)? {
            MessageKind::RxmRawx => RxmRawx::decode(buf).map(UbxMessage::RxmRawx),
            MessageKind::MgaGpsEph => MgaGpsEph::decode(buf).map(UbxMessage::MgaGpsEph),
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            UbxMessage::RxmRawx(_) => MessageKind::RxmRawx,
            UbxMessage::MgaGpsEph(_) => MessageKind::MgaGpsEph,
        }
    }

    pub fn encoded_bits(&self) -> usize {
        match self {
            UbxMessage::RxmRawx(msg) => msg.encoded_bits(),
            UbxMessage::MgaGpsEph(msg) => msg.encoded_bits(),
        }
    }

    pub fn encoded_len(&self) -> usize {
        self.encoded_bits().div_ceil(8)
    }

    /// # Panics
    ///
    /// If `buf` is shorter than [Self::encoded_len].
    pub fn encode(&self, buf: &mut [u8]) -> usize {
        match self {
            UbxMessage::RxmRawx(msg) => msg.encode(buf),
            UbxMessage::MgaGpsEph(msg) => msg.encode(buf),
        }
    }

    pub fn try_encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        match self {
            UbxMessage::RxmRawx(msg) => msg.try_encode(buf),
            UbxMessage::MgaGpsEph(msg) => msg.try_encode(buf),
        }
    }

    #[cfg(feature = "alloc")]
    pub fn to_bytes(&self) -> alloc::vec::Vec<u8> {
        match self {
            UbxMessage::RxmRawx(msg) => msg.to_bytes(),
            UbxMessage::MgaGpsEph(msg) => msg.to_bytes(),
        }
    }
}

impl From<RxmRawx> for UbxMessage {
    fn from(msg: RxmRawx) -> Self {
        UbxMessage::RxmRawx(msg)
    }
}

impl From<MgaGpsEph> for UbxMessage {
    fn from(msg: MgaGpsEph) -> Self {
        UbxMessage::MgaGpsEph(msg)
    }
}
