//! Typed fields and the cursors that move them in and out of a bit buffer.

use crate::bits::{get_bits_signed, get_bits_unsigned, set_bits_signed, set_bits_unsigned};

/// How the bits of a field are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Unsigned,
    Signed,
    /// IEEE-754 bit pattern of the field's width
    Float,
    /// Written as zeros, skipped on read
    Reserved,
}

/// One entry of a wire layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDesc {
    pub name: &'static str,
    pub bits: u32,
    pub kind: FieldKind,
}

impl FieldDesc {
    pub const fn new(name: &'static str, bits: u32, kind: FieldKind) -> Self {
        Self { name, bits, kind }
    }

    /// Descriptor of a field stored as `T`.
    pub const fn of<T: BitField>(name: &'static str) -> Self {
        Self::new(name, T::BITS, T::KIND)
    }
}

/// Total width of a run of fields.
pub const fn fields_bits(fields: &[FieldDesc]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < fields.len() {
        total += fields[i].bits as usize;
        i += 1;
    }
    total
}

/// A value with a fixed wire width.
///
/// The width of every integer field is the width of its Rust type, so a typed
/// message can never hold a value its wire slot would truncate.
pub trait BitField: Sized {
    const BITS: u32;
    const KIND: FieldKind;

    /// Bit pattern to pack; only the low [Self::BITS] bits reach the wire
    fn to_raw(&self) -> u64;
    fn from_raw(raw: u64) -> Self;
}

macro_rules! impl_unsigned_field {
    ($($ty:ty),*) => {
        $(
            impl BitField for $ty {
                const BITS: u32 = <$ty>::BITS;
                const KIND: FieldKind = FieldKind::Unsigned;

                fn to_raw(&self) -> u64 {
                    u64::from(*self)
                }

                fn from_raw(raw: u64) -> Self {
                    raw as $ty
                }
            }
        )*
    };
}

macro_rules! impl_signed_field {
    ($($ty:ty),*) => {
        $(
            impl BitField for $ty {
                const BITS: u32 = <$ty>::BITS;
                const KIND: FieldKind = FieldKind::Signed;

                fn to_raw(&self) -> u64 {
                    i64::from(*self) as u64
                }

                fn from_raw(raw: u64) -> Self {
                    raw as $ty
                }
            }
        )*
    };
}

impl_unsigned_field!(u8, u16, u32, u64);
impl_signed_field!(i8, i16, i32, i64);

impl BitField for f32 {
    const BITS: u32 = 32;
    const KIND: FieldKind = FieldKind::Float;

    fn to_raw(&self) -> u64 {
        u64::from(self.to_bits())
    }

    fn from_raw(raw: u64) -> Self {
        f32::from_bits(raw as u32)
    }
}

impl BitField for f64 {
    const BITS: u32 = 64;
    const KIND: FieldKind = FieldKind::Float;

    fn to_raw(&self) -> u64 {
        self.to_bits()
    }

    fn from_raw(raw: u64) -> Self {
        f64::from_bits(raw)
    }
}

/// `N` padding bits, always zero on the wire.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reserved<const N: u32>;

impl<const N: u32> BitField for Reserved<N> {
    const BITS: u32 = N;
    const KIND: FieldKind = FieldKind::Reserved;

    fn to_raw(&self) -> u64 {
        0
    }

    fn from_raw(_raw: u64) -> Self {
        Reserved
    }
}

/// A run of scalar fields with a fixed layout.
///
/// Implemented through `ubx_bit_record!`, which derives [Self::FIELDS] and the
/// two methods from a single field list.
pub trait BitRecord: Sized {
    const FIELDS: &'static [FieldDesc];
    const BITS: usize = fields_bits(Self::FIELDS);

    fn write_fields(&self, writer: &mut BitWriter<'_>);
    fn read_fields(reader: &mut BitReader<'_>) -> Self;
}

/// Sequential field writer.
#[derive(Debug)]
pub struct BitWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> BitWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bits written so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Packs `value` at the current position and advances past it.
    ///
    /// # Panics
    ///
    /// If the field runs past the end of the buffer.
    pub fn put<T: BitField>(&mut self, value: &T) {
        match T::KIND {
            FieldKind::Signed => {
                set_bits_signed(self.buf, self.pos, T::BITS, value.to_raw() as i64)
            },
            FieldKind::Reserved => set_bits_unsigned(self.buf, self.pos, T::BITS, 0),
            FieldKind::Unsigned | FieldKind::Float => {
                set_bits_unsigned(self.buf, self.pos, T::BITS, value.to_raw())
            },
        }
        self.pos += T::BITS as usize;
    }

    pub fn put_record<R: BitRecord>(&mut self, record: &R) {
        record.write_fields(self);
    }
}

/// Sequential field reader.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn skip(&mut self, bits: usize) {
        self.pos += bits;
    }

    /// Reads the next field as `T`.
    ///
    /// # Panics
    ///
    /// If the field runs past the end of the buffer.
    pub fn get<T: BitField>(&mut self) -> T {
        let raw = match T::KIND {
            FieldKind::Signed => get_bits_signed(self.buf, self.pos, T::BITS) as u64,
            FieldKind::Reserved => 0,
            FieldKind::Unsigned | FieldKind::Float => {
                get_bits_unsigned(self.buf, self.pos, T::BITS)
            },
        };
        self.pos += T::BITS as usize;
        T::from_raw(raw)
    }

    pub fn get_record<R: BitRecord>(&mut self) -> R {
        R::read_fields(self)
    }
}
