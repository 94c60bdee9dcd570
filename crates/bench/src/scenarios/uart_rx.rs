//! Oversampling UART receiver.
//!
//! Holds the receiver in reset with the line idle, then transmits every
//! configured payload as one frame with the planned noise and checks the byte
//! the receiver reports for each of them.

use crate::common::{BenchResult, SimTime};
use crate::config::{FrameConfig, UartConfig};
use crate::sim::{Dut, Simulator};
use crate::uart::{FaultRng, UartPins, UartTransmitter, UartVerifier, VerificationResult};

/// Outcome of a receive run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UartReport {
    /// Frames whose byte matched.
    pub bytes_verified: u32,
    /// Frames sent with one corrupted sample.
    pub faults_injected: u32,
    /// Seed of the fault generator.
    pub seed: u64,
    /// One comparison per payload, in transmission order.
    pub results: Vec<VerificationResult>,
}

/// Resets the receiver, then sends and verifies every payload.
///
/// # Arguments
///
/// * `sim` - Kernel bound to the receiver.
/// * `frame` - Line format; its noise location is used by `FaultPlan::Fixed`.
/// * `config` - Payloads, clocking, fault plan and timeouts.
/// * `rng` - Generator for random noise locations; its seed is reported.
pub fn run<D: Dut>(
    sim: &mut Simulator<D>,
    frame: &FrameConfig,
    config: &UartConfig,
    rng: &mut FaultRng,
) -> BenchResult<UartReport> {
    let _span = tracing::info_span!("uart_rx", seed = rng.seed()).entered();
    config.validate(frame)?;
    let pins = UartPins::resolve(sim)?;
    let transmitter = UartTransmitter::new(pins);
    let verifier = UartVerifier::new(pins, SimTime::from_ns(config.valid_timeout_ns));

    transmitter.idle_line(sim);
    sim.start_clock(pins.clk, SimTime::from_ns(config.clock_period_ns))?;
    sim.set_level(pins.reset, true);
    sim.timer(SimTime::from_ns(config.reset_ns));
    sim.set_level(pins.reset, false);
    tracing::info!(at = %sim.now(), plan = ?config.fault, "reset released");

    let mut report = UartReport {
        bytes_verified: 0,
        faults_injected: 0,
        seed: rng.seed(),
        results: Vec::with_capacity(config.payloads.len()),
    };
    for &payload in &config.payloads {
        if config.idle_samples > 0 {
            transmitter.send_idle(sim, frame, config.idle_samples)?;
        }
        let resolved = config.fault.resolve(frame, rng);
        let record = transmitter.send_frame(sim, &resolved, payload)?;
        if let Some(fault) = record.fault {
            report.faults_injected += 1;
            tracing::info!(payload = format_args!("{payload:#04x}"), %fault, "frame sent");
        } else {
            tracing::info!(payload = format_args!("{payload:#04x}"), "frame sent");
        }
        let result = verifier.verify(sim, &record, report.seed)?;
        report.bytes_verified += 1;
        report.results.push(result);
    }

    sim.timer(SimTime::from_us(config.tail_us));
    sim.stats().log("uart_rx");
    Ok(report)
}
