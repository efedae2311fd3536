//! Wire layouts as data.
//!
//! Every message type publishes a [MessageLayout]: its class/id pair, the
//! ordered header fields that follow the pair, and at most one repeated
//! group whose item count is carried by a header field. Typed codecs use the
//! layout for size and identity checks; [RawMessage] walks it directly.

use crate::{
    bits::bytes_for_bits,
    constants::{UBX_CLASS_OFFSET, UBX_IDENT_BITS, UBX_IDENT_LEN, UBX_MSG_ID_OFFSET},
    error::DecodeError,
    field::{fields_bits, FieldDesc},
};
use log::debug;

/// Repeated block of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatedGroup {
    pub name: &'static str,
    /// Header field holding the number of items
    pub count_field: &'static str,
    pub capacity: usize,
    pub fields: &'static [FieldDesc],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageLayout {
    pub name: &'static str,
    pub class: u8,
    pub id: u8,
    /// Fields following the class/id pair, in wire order
    pub fields: &'static [FieldDesc],
    pub group: Option<RepeatedGroup>,
}

impl MessageLayout {
    /// Bits up to the end of the header, class/id pair included
    pub const fn header_bits(&self) -> usize {
        UBX_IDENT_BITS + fields_bits(self.fields)
    }

    /// Bits of a single repeated item, `0` without a repeated group
    pub const fn block_bits(&self) -> usize {
        match self.group {
            Some(ref group) => fields_bits(group.fields),
            None => 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        match self.group {
            Some(ref group) => group.capacity,
            None => 0,
        }
    }

    pub const fn total_bits(&self, count: usize) -> usize {
        self.header_bits() + count * self.block_bits()
    }

    /// Size in bytes of the largest message this layout can describe
    pub const fn max_len(&self) -> usize {
        bytes_for_bits(self.total_bits(self.capacity()))
    }

    /// Header fields with the bit offset of each one from the start of the
    /// message.
    pub fn header_offsets(&self) -> impl Iterator<Item = (usize, &'static FieldDesc)> {
        with_offsets(self.fields, UBX_IDENT_BITS)
    }

    /// Bit offset and descriptor of the field counting the repeated items.
    pub fn count_field(&self) -> Option<(usize, &'static FieldDesc)> {
        let group = self.group.as_ref()?;
        self.header_offsets()
            .find(|(_, field)| field.name == group.count_field)
    }

    /// Checks the class/id pair at the start of `buf`.
    pub fn check_ident(&self, buf: &[u8]) -> Result<(), DecodeError> {
        if buf.len() < UBX_IDENT_LEN {
            return Err(self.short_buffer(UBX_IDENT_LEN, buf.len()));
        }
        let got = (buf[UBX_CLASS_OFFSET], buf[UBX_MSG_ID_OFFSET]);
        if got != (self.class, self.id) {
            debug!(
                "{}: class/id {:#04x}/{:#04x} does not match",
                self.name, got.0, got.1
            );
            return Err(DecodeError::TypeMismatch {
                packet: self.name,
                expect: (self.class, self.id),
                got,
            });
        }
        Ok(())
    }

    /// Checks that `buf` holds at least `bits` bits.
    pub fn check_len(&self, buf: &[u8], bits: usize) -> Result<(), DecodeError> {
        let expect = bytes_for_bits(bits);
        if buf.len() < expect {
            return Err(self.short_buffer(expect, buf.len()));
        }
        Ok(())
    }

    fn short_buffer(&self, expect: usize, got: usize) -> DecodeError {
        debug!("{}: buffer holds {} bytes, need {}", self.name, got, expect);
        DecodeError::InvalidPacketLen {
            packet: self.name,
            expect,
            got,
        }
    }

    /// Error for a repeated item count above the group capacity.
    pub(crate) fn count_overflow(&self, count: usize) -> DecodeError {
        let field = self.group.as_ref().map_or("", |group| group.count_field);
        debug!(
            "{}: {} = {} exceeds capacity {}",
            self.name,
            field,
            count,
            self.capacity()
        );
        DecodeError::InvalidField {
            packet: self.name,
            field,
        }
    }
}

/// Pairs each field with its bit offset, starting at `start`.
pub fn with_offsets(
    fields: &'static [FieldDesc],
    start: usize,
) -> impl Iterator<Item = (usize, &'static FieldDesc)> {
    fields.iter().scan(start, |pos, field| {
        let at = *pos;
        *pos += field.bits as usize;
        Some((at, field))
    })
}

#[cfg(feature = "alloc")]
pub use self::raw::{FieldValue, RawField, RawMessage};

#[cfg(feature = "alloc")]
mod raw {
    use super::{with_offsets, MessageLayout};
    use crate::{
        bits::{get_bits_signed, get_bits_unsigned},
        error::DecodeError,
        field::{FieldDesc, FieldKind},
        ubx_packets::MessageKind,
    };
    use alloc::vec::Vec;
    use core::fmt;

    /// A decoded field, widened to 64 bits.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum FieldValue {
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    impl FieldValue {
        /// Reads the field described by `desc` at bit `pos`, `None` for padding.
        ///
        /// # Panics
        ///
        /// If `desc` is a float narrower or wider than `f32`/`f64`.
        pub fn read(buf: &[u8], pos: usize, desc: &FieldDesc) -> Option<Self> {
            let value = match desc.kind {
                FieldKind::Unsigned => Self::Unsigned(get_bits_unsigned(buf, pos, desc.bits)),
                FieldKind::Signed => Self::Signed(get_bits_signed(buf, pos, desc.bits)),
                FieldKind::Float => match desc.bits {
                    32 => Self::Float(f64::from(f32::from_bits(
                        get_bits_unsigned(buf, pos, 32) as u32,
                    ))),
                    64 => Self::Float(f64::from_bits(get_bits_unsigned(buf, pos, 64))),
                    bits => unreachable!(
                        "float field `{}` must be 32 or 64 bits wide, got {}",
                        desc.name, bits
                    ),
                },
                FieldKind::Reserved => return None,
            };
            Some(value)
        }

        pub fn as_u64(&self) -> Option<u64> {
            match *self {
                Self::Unsigned(value) => Some(value),
                Self::Signed(value) => u64::try_from(value).ok(),
                Self::Float(_) => None,
            }
        }
    }

    impl fmt::Display for FieldValue {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Unsigned(value) => write!(f, "{}", value),
                Self::Signed(value) => write!(f, "{}", value),
                Self::Float(value) => write!(f, "{}", value),
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct RawField {
        pub name: &'static str,
        pub value: FieldValue,
    }

    /// A message decoded by walking its layout rather than through its typed
    /// struct. Padding fields are left out.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RawMessage {
        pub kind: MessageKind,
        pub fields: Vec<RawField>,
        /// One entry per repeated item, in wire order
        pub items: Vec<Vec<RawField>>,
    }

    impl RawMessage {
        pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
            let kind = MessageKind::identify(buf)?;
            let layout = kind.layout();
            layout.check_len(buf, layout.header_bits())?;

            let fields = read_fields(buf, layout.fields, super::UBX_IDENT_BITS);
            let mut items = Vec::new();
            if let Some(group) = &layout.group {
                let count = item_count(layout, &fields)?;
                layout.check_len(buf, layout.total_bits(count))?;
                let block_bits = layout.block_bits();
                items.reserve(count);
                for i in 0..count {
                    let start = layout.header_bits() + i * block_bits;
                    items.push(read_fields(buf, group.fields, start));
                }
            }

            Ok(Self {
                kind,
                fields,
                items,
            })
        }

        pub fn field(&self, name: &str) -> Option<FieldValue> {
            self.fields
                .iter()
                .find(|field| field.name == name)
                .map(|field| field.value)
        }
    }

    fn read_fields(buf: &[u8], fields: &'static [FieldDesc], start: usize) -> Vec<RawField> {
        with_offsets(fields, start)
            .filter_map(|(pos, desc)| {
                FieldValue::read(buf, pos, desc).map(|value| RawField {
                    name: desc.name,
                    value,
                })
            })
            .collect()
    }

    fn item_count(layout: &MessageLayout, fields: &[RawField]) -> Result<usize, DecodeError> {
        let count = layout
            .group
            .as_ref()
            .and_then(|group| fields.iter().find(|field| field.name == group.count_field))
            .and_then(|field| field.value.as_u64())
            .and_then(|count| usize::try_from(count).ok())
            .ok_or(DecodeError::InvalidField {
                packet: layout.name,
                field: layout.group.as_ref().map_or("", |group| group.count_field),
            })?;
        if count > layout.capacity() {
            return Err(layout.count_overflow(count));
        }
        Ok(count)
    }
}
