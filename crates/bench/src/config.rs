//! Configuration system for the testbench engine.
//!
//! This module defines all configuration structures used to parameterize the
//! stimulus engine and the scenarios. It provides:
//! 1. **Defaults:** Baseline constants taken from the reference testbenches.
//! 2. **Structures:** Frame, bus, and one section per scenario.
//! 3. **Loading:** JSON deserialization from a string or a file, plus validation.
//!
//! Every field has a serde default, so an empty JSON object yields `Config::default()`.

use std::path::Path;

use serde::Deserialize;

use crate::common::{BenchError, BenchResult, SimTime, TimeUnit};
use crate::uart::FaultPlan;

/// Default configuration constants.
///
/// These values reproduce the reference testbenches when not explicitly
/// overridden.
mod defaults {
    /// Simulated-time budget for any wait without an explicit timeout (10 ms).
    pub const WATCHDOG_US: u64 = 10_000;

    /// Longest span any single time field may configure (one simulated hour).
    pub const MAX_SPAN_US: u64 = 3_600_000_000;

    /// UART line rate in bits per second.
    pub const BAUD_RATE: u32 = 115_200;

    /// Oversamples taken per bit by the receiver's majority vote.
    pub const SAMPLES_PER_BIT: u32 = 8;

    /// Bus setup delay after the aligning clock edge.
    pub const BUS_SETUP_NS: u64 = 1;

    /// Bus access phase: select/enable held with address and data stable.
    pub const BUS_ACCESS_NS: u64 = 10;

    /// Bus recovery time after deassertion.
    pub const BUS_RECOVERY_NS: u64 = 10;

    /// Counter clock period (1 ns, toggling every 0.5 ns).
    pub const COUNTER_CLOCK_PS: u64 = 1_000;

    /// Counter reset pulse, and the quiet gap before the clock starts.
    pub const COUNTER_RESET_NS: u64 = 1;

    /// Counter cycles checked against the model.
    pub const COUNTER_CYCLES: u32 = 256;

    /// Probability of asserting clear on any cycle.
    pub const COUNTER_CLEAR_PROBABILITY: f64 = 0.03;

    /// PWM and UART clock period (100 MHz).
    pub const CLOCK_PERIOD_NS: u64 = 10;

    /// PWM reset pulse.
    pub const PWM_RESET_NS: u64 = 20;

    /// Duty-cycle register value.
    pub const PWM_DUTY: u64 = 0x40;

    /// Period register value for the first pass.
    pub const PWM_PERIOD: u64 = 0x80;

    /// Period register value for the reprogramming pass.
    pub const PWM_SECOND_PERIOD: u64 = 0x40;

    /// Time allowed for the PWM to start toggling after enable.
    pub const PWM_SETTLE_NS: u64 = 1_000;

    /// Gap between disabling and re-enabling during reprogramming.
    pub const PWM_REPROGRAM_GAP_NS: u64 = 200;

    /// Clock cycles observed per pass.
    pub const PWM_OBSERVE_CYCLES: u32 = 100;

    /// UART reset pulse.
    pub const UART_RESET_NS: u64 = 100;

    /// Payload sent by the default UART scenario (0b0101_0101).
    pub const UART_PAYLOAD: u8 = 0x55;

    /// Budget for the receive-valid indicator once a frame has been driven.
    pub const UART_VALID_TIMEOUT_NS: u64 = 100_000;

    /// Quiet time after the last check before the scenario ends.
    pub const UART_TAIL_US: u64 = 100;

    /// Memory write clock period.
    pub const WRITE_CLOCK_NS: u64 = 10;

    /// Summing clock period.
    pub const SUM_CLOCK_NS: u64 = 20;

    /// Asynchronous reset pulse of the summing domain.
    pub const SUM_RESET_NS: u64 = 50;

    /// Number of sequential addresses written before summing.
    pub const MEMORY_DEPTH: u32 = 256;

    /// Summing-clock cycles allowed for the done flag.
    pub const SUM_DONE_TIMEOUT_CYCLES: u32 = 2_048;

    /// Summing-clock cycles run after the result was checked.
    pub const SUM_TAIL_CYCLES: u32 = 10;
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Kernel-wide settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// UART frame format and fixed noise location.
    #[serde(default)]
    pub frame: FrameConfig,
    /// Register-bus timing.
    #[serde(default)]
    pub bus: BusTiming,
    /// Counter scenario.
    #[serde(default)]
    pub counter: CounterConfig,
    /// PWM scenario.
    #[serde(default)]
    pub pwm: PwmConfig,
    /// UART receive scenario.
    #[serde(default)]
    pub uart: UartConfig,
    /// Memory summing scenario.
    #[serde(default)]
    pub memory_sum: MemorySumConfig,
}

impl Config {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> BenchResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> BenchResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks cross-field invariants of every section.
    pub fn validate(&self) -> BenchResult<()> {
        self.general.validate()?;
        self.frame.validate()?;
        self.bus.validate()?;
        self.counter.validate()?;
        self.pwm.validate()?;
        self.uart.validate(&self.frame)?;
        self.memory_sum.validate()
    }
}

/// Kernel-wide settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Budget for waits that have no explicit timeout, in microseconds.
    #[serde(default = "GeneralConfig::default_watchdog_us")]
    pub watchdog_us: u64,

    /// Seed for every randomized choice. A fresh seed is drawn per run when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GeneralConfig {
    fn default_watchdog_us() -> u64 {
        defaults::WATCHDOG_US
    }

    /// Watchdog as simulated time.
    pub const fn watchdog(&self) -> SimTime {
        SimTime::from_us(self.watchdog_us)
    }

    fn validate(&self) -> BenchResult<()> {
        check_span("general.watchdog_us", self.watchdog_us, TimeUnit::Us)
    }
}

/// Rejects a time field longer than the simulated horizon, so deadlines and
/// slot arithmetic derived from it stay exact.
fn check_span(field: &str, amount: u64, unit: TimeUnit) -> BenchResult<()> {
    let limit = SimTime::from_us(defaults::MAX_SPAN_US);
    match SimTime::checked_new(amount, unit) {
        Some(span) if span <= limit => Ok(()),
        _ => Err(BenchError::InvalidConfig(format!(
            "{field} = {amount} exceeds the simulated-time limit of {limit}"
        ))),
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            watchdog_us: defaults::WATCHDOG_US,
            seed: None,
        }
    }
}

/// Serial frame format and optional fixed noise location.
///
/// `noisy_sample` is only meaningful when `noisy_bit` is set. Bit positions are
/// 0 for the start bit, 1..=8 for data bits LSB-first and 9 for the stop bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FrameConfig {
    /// Line rate in bits per second.
    #[serde(default = "FrameConfig::default_baud_rate")]
    pub baud_rate: u32,

    /// Oversamples per bit.
    #[serde(default = "FrameConfig::default_samples_per_bit")]
    pub samples_per_bit: u32,

    /// Frame bit that receives one corrupted sample.
    #[serde(default)]
    pub noisy_bit: Option<u8>,

    /// Index of the corrupted sample within `noisy_bit`.
    #[serde(default)]
    pub noisy_sample: Option<u32>,
}

impl FrameConfig {
    fn default_baud_rate() -> u32 {
        defaults::BAUD_RATE
    }

    fn default_samples_per_bit() -> u32 {
        defaults::SAMPLES_PER_BIT
    }

    /// Clean frame at the given rate and oversampling.
    pub const fn new(baud_rate: u32, samples_per_bit: u32) -> Self {
        Self {
            baud_rate,
            samples_per_bit,
            noisy_bit: None,
            noisy_sample: None,
        }
    }

    /// Same format with one corrupted sample at (`bit`, `sample`).
    #[must_use]
    pub const fn with_noise(mut self, bit: u8, sample: u32) -> Self {
        self.noisy_bit = Some(bit);
        self.noisy_sample = Some(sample);
        self
    }

    /// Same format with no noise.
    #[must_use]
    pub const fn clean(mut self) -> Self {
        self.noisy_bit = None;
        self.noisy_sample = None;
        self
    }

    /// Duration of one bit.
    pub fn bit_period(&self) -> BenchResult<SimTime> {
        SimTime::bit_period(self.baud_rate)
            .ok_or_else(|| BenchError::InvalidConfig("baud_rate must be positive".into()))
    }

    /// Spacing between successive oversamples (bit period / samples per bit).
    pub fn sample_period(&self) -> BenchResult<SimTime> {
        self.bit_period()?
            .divide(self.samples_per_bit)
            .ok_or_else(|| BenchError::InvalidConfig("samples_per_bit must be at least 1".into()))
    }

    /// Checks ranges and the noise-location invariant.
    pub fn validate(&self) -> BenchResult<()> {
        let sample_period = self.sample_period()?;
        if sample_period == SimTime::ZERO {
            return Err(BenchError::InvalidConfig(format!(
                "{} samples per bit at {} baud leaves no time between samples",
                self.samples_per_bit, self.baud_rate
            )));
        }
        match (self.noisy_bit, self.noisy_sample) {
            (None, None) => Ok(()),
            (None, Some(_)) => Err(BenchError::InvalidConfig(
                "noisy_sample requires noisy_bit".into(),
            )),
            (Some(bit), _) if bit > 9 => Err(BenchError::InvalidConfig(format!(
                "noisy_bit {bit} outside the 10-bit frame"
            ))),
            (Some(_), Some(sample)) if sample >= self.samples_per_bit => {
                Err(BenchError::InvalidConfig(format!(
                    "noisy_sample {sample} outside 0..{}",
                    self.samples_per_bit
                )))
            }
            (Some(_), _) => Ok(()),
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self::new(defaults::BAUD_RATE, defaults::SAMPLES_PER_BIT)
    }
}

/// Two-phase register bus timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BusTiming {
    /// Delay after the aligning clock edge before the bus is driven.
    #[serde(default = "BusTiming::default_setup_ns")]
    pub setup_ns: u64,

    /// Time select and enable stay asserted with address/data stable.
    #[serde(default = "BusTiming::default_access_ns")]
    pub access_ns: u64,

    /// Idle time after deassertion before the next transaction.
    #[serde(default = "BusTiming::default_recovery_ns")]
    pub recovery_ns: u64,
}

impl BusTiming {
    fn default_setup_ns() -> u64 {
        defaults::BUS_SETUP_NS
    }

    fn default_access_ns() -> u64 {
        defaults::BUS_ACCESS_NS
    }

    fn default_recovery_ns() -> u64 {
        defaults::BUS_RECOVERY_NS
    }

    /// Setup delay as simulated time.
    pub const fn setup(&self) -> SimTime {
        SimTime::from_ns(self.setup_ns)
    }

    /// Access phase as simulated time.
    pub const fn access(&self) -> SimTime {
        SimTime::from_ns(self.access_ns)
    }

    /// Recovery time as simulated time.
    pub const fn recovery(&self) -> SimTime {
        SimTime::from_ns(self.recovery_ns)
    }

    fn validate(&self) -> BenchResult<()> {
        check_span("bus.setup_ns", self.setup_ns, TimeUnit::Ns)?;
        check_span("bus.access_ns", self.access_ns, TimeUnit::Ns)?;
        check_span("bus.recovery_ns", self.recovery_ns, TimeUnit::Ns)?;
        if self.access_ns == 0 {
            return Err(BenchError::InvalidConfig(
                "bus access phase must be longer than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for BusTiming {
    fn default() -> Self {
        Self {
            setup_ns: defaults::BUS_SETUP_NS,
            access_ns: defaults::BUS_ACCESS_NS,
            recovery_ns: defaults::BUS_RECOVERY_NS,
        }
    }
}

/// Counter scenario settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CounterConfig {
    /// Clock period in picoseconds.
    #[serde(default = "CounterConfig::default_clock_period_ps")]
    pub clock_period_ps: u64,

    /// Reset pulse width, also used as the gap before the clock starts.
    #[serde(default = "CounterConfig::default_reset_ns")]
    pub reset_ns: u64,

    /// Number of cycles checked.
    #[serde(default = "CounterConfig::default_cycles")]
    pub cycles: u32,

    /// Per-cycle probability of asserting clear.
    #[serde(default = "CounterConfig::default_clear_probability")]
    pub clear_probability: f64,
}

impl CounterConfig {
    fn default_clock_period_ps() -> u64 {
        defaults::COUNTER_CLOCK_PS
    }

    fn default_reset_ns() -> u64 {
        defaults::COUNTER_RESET_NS
    }

    fn default_cycles() -> u32 {
        defaults::COUNTER_CYCLES
    }

    fn default_clear_probability() -> f64 {
        defaults::COUNTER_CLEAR_PROBABILITY
    }

    fn validate(&self) -> BenchResult<()> {
        check_span("counter.clock_period_ps", self.clock_period_ps, TimeUnit::Ps)?;
        check_span("counter.reset_ns", self.reset_ns, TimeUnit::Ns)?;
        if self.clock_period_ps < 2 {
            return Err(BenchError::InvalidConfig(
                "counter clock period must be at least 2 ps".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.clear_probability) {
            return Err(BenchError::InvalidConfig(format!(
                "clear_probability {} outside [0, 1]",
                self.clear_probability
            )));
        }
        Ok(())
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            clock_period_ps: defaults::COUNTER_CLOCK_PS,
            reset_ns: defaults::COUNTER_RESET_NS,
            cycles: defaults::COUNTER_CYCLES,
            clear_probability: defaults::COUNTER_CLEAR_PROBABILITY,
        }
    }
}

/// PWM scenario settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PwmConfig {
    /// Clock period in nanoseconds.
    #[serde(default = "PwmConfig::default_clock_period_ns")]
    pub clock_period_ns: u64,

    /// Reset pulse width.
    #[serde(default = "PwmConfig::default_reset_ns")]
    pub reset_ns: u64,

    /// Duty-cycle register value.
    #[serde(default = "PwmConfig::default_duty")]
    pub duty: u64,

    /// Period register value for the first pass.
    #[serde(default = "PwmConfig::default_period")]
    pub period: u64,

    /// Period register value for the reprogramming pass; `None` skips the pass.
    #[serde(default = "PwmConfig::default_second_period")]
    pub second_period: Option<u64>,

    /// Wait after enabling before observation starts.
    #[serde(default = "PwmConfig::default_settle_ns")]
    pub settle_ns: u64,

    /// Wait between disable and re-enable during reprogramming.
    #[serde(default = "PwmConfig::default_reprogram_gap_ns")]
    pub reprogram_gap_ns: u64,

    /// Clock cycles observed per pass.
    #[serde(default = "PwmConfig::default_observe_cycles")]
    pub observe_cycles: u32,
}

impl PwmConfig {
    fn default_clock_period_ns() -> u64 {
        defaults::CLOCK_PERIOD_NS
    }

    fn default_reset_ns() -> u64 {
        defaults::PWM_RESET_NS
    }

    fn default_duty() -> u64 {
        defaults::PWM_DUTY
    }

    fn default_period() -> u64 {
        defaults::PWM_PERIOD
    }

    fn default_second_period() -> Option<u64> {
        Some(defaults::PWM_SECOND_PERIOD)
    }

    fn default_settle_ns() -> u64 {
        defaults::PWM_SETTLE_NS
    }

    fn default_reprogram_gap_ns() -> u64 {
        defaults::PWM_REPROGRAM_GAP_NS
    }

    fn default_observe_cycles() -> u32 {
        defaults::PWM_OBSERVE_CYCLES
    }

    fn validate(&self) -> BenchResult<()> {
        check_span("pwm.clock_period_ns", self.clock_period_ns, TimeUnit::Ns)?;
        check_span("pwm.reset_ns", self.reset_ns, TimeUnit::Ns)?;
        check_span("pwm.settle_ns", self.settle_ns, TimeUnit::Ns)?;
        check_span("pwm.reprogram_gap_ns", self.reprogram_gap_ns, TimeUnit::Ns)?;
        if self.clock_period_ns == 0 {
            return Err(BenchError::InvalidConfig(
                "PWM clock period must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            clock_period_ns: defaults::CLOCK_PERIOD_NS,
            reset_ns: defaults::PWM_RESET_NS,
            duty: defaults::PWM_DUTY,
            period: defaults::PWM_PERIOD,
            second_period: Some(defaults::PWM_SECOND_PERIOD),
            settle_ns: defaults::PWM_SETTLE_NS,
            reprogram_gap_ns: defaults::PWM_REPROGRAM_GAP_NS,
            observe_cycles: defaults::PWM_OBSERVE_CYCLES,
        }
    }
}

/// UART receive scenario settings.
#[derive(Debug, Clone, Deserialize)]
pub struct UartConfig {
    /// Receiver clock period in nanoseconds.
    #[serde(default = "UartConfig::default_clock_period_ns")]
    pub clock_period_ns: u64,

    /// Reset pulse width.
    #[serde(default = "UartConfig::default_reset_ns")]
    pub reset_ns: u64,

    /// Bytes transmitted, one frame each.
    #[serde(default = "UartConfig::default_payloads")]
    pub payloads: Vec<u8>,

    /// How the noise location is chosen for each frame.
    #[serde(default)]
    pub fault: FaultPlan,

    /// Idle-line oversamples driven before every frame.
    #[serde(default)]
    pub idle_samples: u32,

    /// Budget for the receive-valid indicator after a frame.
    #[serde(default = "UartConfig::default_valid_timeout_ns")]
    pub valid_timeout_ns: u64,

    /// Quiet time after the last byte was verified.
    #[serde(default = "UartConfig::default_tail_us")]
    pub tail_us: u64,
}

impl UartConfig {
    fn default_clock_period_ns() -> u64 {
        defaults::CLOCK_PERIOD_NS
    }

    fn default_reset_ns() -> u64 {
        defaults::UART_RESET_NS
    }

    fn default_payloads() -> Vec<u8> {
        vec![defaults::UART_PAYLOAD]
    }

    fn default_valid_timeout_ns() -> u64 {
        defaults::UART_VALID_TIMEOUT_NS
    }

    fn default_tail_us() -> u64 {
        defaults::UART_TAIL_US
    }

    /// Checks the receiver clock against the sample slot of `frame`.
    ///
    /// The strobe pulse takes up to two receiver clock periods and must fit
    /// inside one sample slot.
    pub fn validate(&self, frame: &FrameConfig) -> BenchResult<()> {
        check_span("uart.clock_period_ns", self.clock_period_ns, TimeUnit::Ns)?;
        check_span("uart.reset_ns", self.reset_ns, TimeUnit::Ns)?;
        check_span("uart.valid_timeout_ns", self.valid_timeout_ns, TimeUnit::Ns)?;
        check_span("uart.tail_us", self.tail_us, TimeUnit::Us)?;
        if self.clock_period_ns == 0 {
            return Err(BenchError::InvalidConfig(
                "UART clock period must be positive".into(),
            ));
        }
        let strobe = SimTime::from_ns(self.clock_period_ns).times(2);
        let slot = frame.sample_period()?;
        if strobe >= slot {
            return Err(BenchError::InvalidConfig(format!(
                "sample period {slot} is too short for a strobe pulse of up to {strobe}"
            )));
        }
        Ok(())
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            clock_period_ns: defaults::CLOCK_PERIOD_NS,
            reset_ns: defaults::UART_RESET_NS,
            payloads: vec![defaults::UART_PAYLOAD],
            fault: FaultPlan::default(),
            idle_samples: 0,
            valid_timeout_ns: defaults::UART_VALID_TIMEOUT_NS,
            tail_us: defaults::UART_TAIL_US,
        }
    }
}

/// Memory summing scenario settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MemorySumConfig {
    /// Write-port clock period.
    #[serde(default = "MemorySumConfig::default_write_clock_ns")]
    pub write_clock_ns: u64,

    /// Summing-domain clock period.
    #[serde(default = "MemorySumConfig::default_sum_clock_ns")]
    pub sum_clock_ns: u64,

    /// Asynchronous reset pulse of the summing domain.
    #[serde(default = "MemorySumConfig::default_reset_ns")]
    pub reset_ns: u64,

    /// Number of sequential addresses written (data == address).
    #[serde(default = "MemorySumConfig::default_depth")]
    pub depth: u32,

    /// Summing-clock cycles allowed for the done flag.
    #[serde(default = "MemorySumConfig::default_done_timeout_cycles")]
    pub done_timeout_cycles: u32,

    /// Summing-clock cycles run after the check.
    #[serde(default = "MemorySumConfig::default_tail_cycles")]
    pub tail_cycles: u32,
}

impl MemorySumConfig {
    fn default_write_clock_ns() -> u64 {
        defaults::WRITE_CLOCK_NS
    }

    fn default_sum_clock_ns() -> u64 {
        defaults::SUM_CLOCK_NS
    }

    fn default_reset_ns() -> u64 {
        defaults::SUM_RESET_NS
    }

    fn default_depth() -> u32 {
        defaults::MEMORY_DEPTH
    }

    fn default_done_timeout_cycles() -> u32 {
        defaults::SUM_DONE_TIMEOUT_CYCLES
    }

    fn default_tail_cycles() -> u32 {
        defaults::SUM_TAIL_CYCLES
    }

    fn validate(&self) -> BenchResult<()> {
        check_span("memory_sum.write_clock_ns", self.write_clock_ns, TimeUnit::Ns)?;
        check_span("memory_sum.sum_clock_ns", self.sum_clock_ns, TimeUnit::Ns)?;
        check_span("memory_sum.reset_ns", self.reset_ns, TimeUnit::Ns)?;
        if self.write_clock_ns == 0 || self.sum_clock_ns == 0 {
            return Err(BenchError::InvalidConfig(
                "memory summing clocks must have a positive period".into(),
            ));
        }
        if self.depth == 0 {
            return Err(BenchError::InvalidConfig(
                "memory depth must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MemorySumConfig {
    fn default() -> Self {
        Self {
            write_clock_ns: defaults::WRITE_CLOCK_NS,
            sum_clock_ns: defaults::SUM_CLOCK_NS,
            reset_ns: defaults::SUM_RESET_NS,
            depth: defaults::MEMORY_DEPTH,
            done_timeout_cycles: defaults::SUM_DONE_TIMEOUT_CYCLES,
            tail_cycles: defaults::SUM_TAIL_CYCLES,
        }
    }
}
