//! otpd Common: types and helpers shared by every otpd crate.

pub mod api;
pub mod error;
pub mod http;
pub mod paths;
pub mod persist;
