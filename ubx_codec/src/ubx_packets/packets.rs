pub mod mga_gps_eph;
pub mod rxm_rawx;

pub use mga_gps_eph::MgaGpsEph;
pub use rxm_rawx::{RecStatFlags, RxmRawx, RxmRawxMeas, StdevFlags, TrkStatFlags};
