use core::fmt;

/// Error that possible during payload decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The class/id pair at the start of the buffer belongs to another message
    TypeMismatch {
        packet: &'static str,
        expect: (u8, u8),
        got: (u8, u8),
    },
    /// No registered message uses this class/id pair
    UnknownMessage { class: u8, id: u8 },
    /// A structural field holds a value the layout cannot accept
    InvalidField {
        packet: &'static str,
        field: &'static str,
    },
    /// The buffer ends before the last field of the layout
    InvalidPacketLen {
        packet: &'static str,
        expect: usize,
        got: usize,
    },
}

impl DecodeError {
    /// Numeric outcome understood by transport layers built around the
    /// reference return codes.
    pub fn return_code(&self) -> ReturnCode {
        match self {
            DecodeError::TypeMismatch { .. } | DecodeError::UnknownMessage { .. } => {
                ReturnCode::MessageTypeMismatch
            },
            DecodeError::InvalidField { .. } | DecodeError::InvalidPacketLen { .. } => {
                ReturnCode::InvalidMessage
            },
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::TypeMismatch { packet, expect, got } => write!(
                f,
                "Message type mismatch for {}, expect {:#04x}/{:#04x}, got {:#04x}/{:#04x}",
                packet, expect.0, expect.1, got.0, got.1
            ),
            DecodeError::UnknownMessage { class, id } => {
                write!(f, "Unknown message {:#04x}/{:#04x}", class, id)
            },
            DecodeError::InvalidField { packet, field } => {
                write!(f, "Invalid field {} of packet {}", field, packet)
            },
            DecodeError::InvalidPacketLen {
                packet,
                expect,
                got,
            } => write!(
                f,
                "Invalid packet({}) length, expect {} bytes, got {}",
                packet, expect, got
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// Status codes of the decoders, `0` on success and negative on failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum ReturnCode {
    Ok = 0,
    MessageTypeMismatch = -1,
    InvalidMessage = -2,
}

impl ReturnCode {
    pub fn of<T>(result: &Result<T, DecodeError>) -> Self {
        match result {
            Ok(_) => ReturnCode::Ok,
            Err(err) => err.return_code(),
        }
    }
}

impl From<ReturnCode> for i8 {
    fn from(code: ReturnCode) -> i8 {
        code as i8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// Output buffer is shorter than the encoded message
    NotEnoughMem {
        packet: &'static str,
        expect: usize,
        got: usize,
    },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::NotEnoughMem {
                packet,
                expect,
                got,
            } => write!(
                f,
                "Not enough memory to encode {}, need {} bytes, got {}",
                packet, expect, got
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

/// A repeated block is already holding as many items as the wire format allows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {
    pub capacity: usize,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "capacity of {} items exceeded", self.capacity)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CapacityError {}
