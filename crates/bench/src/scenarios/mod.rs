//! End-to-end stimulus procedures, one per device family.
//!
//! Each scenario resolves the signals it needs by their fixed names, starts
//! its clocks, sequences reset and then drives and checks the device until it
//! either passes (returning a report) or fails with the first [`BenchError`].
//!
//! [`BenchError`]: crate::common::BenchError

/// 4-bit counter with clear.
pub mod counter;

/// Dual-clock memory summer.
pub mod memory_sum;

/// PWM behind the register bus.
pub mod pwm;

/// Oversampling UART receiver.
pub mod uart_rx;

pub use counter::CounterReport;
pub use memory_sum::MemorySumReport;
pub use pwm::PwmReport;
pub use uart_rx::UartReport;
