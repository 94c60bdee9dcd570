//! Select/enable register bus master.
//!
//! Drives two-phase register transactions against a device exposing an
//! `io_apb_*` slave port. Timing comes from [`BusTiming`](crate::config::BusTiming).

/// Transaction driver.
pub mod bus;

pub use bus::{ApbBus, ApbPins};

/// PWM enable register.
pub const REG_ENABLE: u64 = 0x00;
/// PWM duty-cycle register.
pub const REG_DUTY: u64 = 0x04;
/// PWM period register.
pub const REG_PERIOD: u64 = 0x08;
