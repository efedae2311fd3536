/// Largest number of measurements a RXM-RAWX payload may carry
pub const MAX_NUM_SATS: usize = 32;

pub(crate) const UBX_CLASS_OFFSET: usize = 0;
pub(crate) const UBX_MSG_ID_OFFSET: usize = 1; // After CLASS
pub const UBX_IDENT_LEN: usize = 2;
pub const UBX_IDENT_BITS: usize = UBX_IDENT_LEN * 8;
