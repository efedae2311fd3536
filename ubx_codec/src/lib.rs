//! # ubx_codec
//!
//! Bit-packed codec for the payloads of two u-blox UBX messages, RXM-RAWX (raw
//! measurements) and MGA-GPS-EPH (GPS ephemeris).
//!
//! Every field is written big-endian, most significant bit first, at a fixed
//! bit offset right after the class/id pair. Fields do not have to be byte
//! aligned: RXM-RAWX carries a 4-bit reserved nibble that shifts all of its
//! measurement blocks by half a byte. Framing (sync chars, length, checksum) is
//! left to the transport that carries the payload.
//!
//! Encoding
//! ========
//!
//! ```
//! use ubx_codec::{RxmRawx, RxmRawxMeas, UbxBitPacket};
//!
//! let mut rawx = RxmRawx::new(415374000.0, 2015, 15, 7, 9);
//! rawx.push(RxmRawxMeas {
//!     pr_mes: 2179844.3,
//!     sv_id: 15,
//!     freq_id: -6,
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let mut buf = [0; 1024];
//! let bits = rawx.encode(&mut buf);
//! assert_eq!(bits, 140 + 256);
//! assert_eq!(&buf[..2], &[0x02, 0x15]);
//! ```
//!
//! Decoding
//! ========
//!
//! Typed decoders check the class/id pair first, [UbxMessage::decode] picks the
//! decoder from it:
//! ```
//! use ubx_codec::{DecodeError, MgaGpsEph, UbxBitPacket, UbxMessage};
//!
//! let eph = MgaGpsEph { sv_id: 3, toc: 2512, cuc: -5, ..Default::default() };
//! let mut buf = [0; 128];
//! eph.encode(&mut buf);
//!
//! assert_eq!(UbxMessage::decode(&buf), Ok(UbxMessage::MgaGpsEph(eph)));
//! assert!(matches!(
//!     ubx_codec::RxmRawx::decode(&buf),
//!     Err(DecodeError::TypeMismatch { .. })
//! ));
//! ```
//!
//! no_std Support
//! ==============
//!
//! Disable the default `std` feature to use the crate without the standard
//! library. Codecs never allocate; the `alloc` feature only adds helpers such
//! as [UbxBitPacket::to_bytes] and [RawMessage].

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;
extern crate core;
#[cfg(feature = "serde")]
extern crate serde;

pub use crate::{
    constants::{MAX_NUM_SATS, UBX_IDENT_BITS, UBX_IDENT_LEN},
    error::{CapacityError, DecodeError, EncodeError, ReturnCode},
    field::{BitField, BitReader, BitRecord, BitWriter, FieldDesc, FieldKind, Reserved},
    layout::{MessageLayout, RepeatedGroup},
    ubx_packets::*,
};

#[cfg(feature = "alloc")]
pub use crate::layout::{FieldValue, RawField, RawMessage};

pub mod bits;
mod constants;
mod error;
mod field;
pub mod layout;
mod ubx_packets;
