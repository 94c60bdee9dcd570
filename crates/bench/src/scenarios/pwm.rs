//! PWM peripheral behind the register bus.
//!
//! Programs duty cycle, period and enable, checks each register reads back,
//! then watches the output against the internal timer: it must be high when
//! the timer is 0 and low when the timer equals the duty value. An optional
//! second pass disables the block, shortens the period and observes again.

use crate::apb::{ApbBus, REG_DUTY, REG_ENABLE, REG_PERIOD};
use crate::common::{BenchError, BenchResult, SimTime, TimeUnit};
use crate::config::{BusTiming, PwmConfig};
use crate::sim::{Dut, SignalId, Simulator};

/// PWM clock (shared with the bus).
pub const CLK: &str = "clk";
/// Reset, active high.
pub const RESET: &str = "reset";
/// PWM output.
pub const PWM: &str = "io_pwm";
/// Internal period counter.
pub const TIMER: &str = "logic_timer";

/// Outcome of a PWM run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PwmReport {
    /// Observation passes completed.
    pub passes: u32,
    /// Register writes confirmed by read-back.
    pub readbacks: u32,
    /// Clock cycles observed over all passes.
    pub cycles_observed: u32,
    /// Cycles on which the timer was 0 and the output was checked high.
    pub high_checks: u32,
    /// Cycles on which the timer equalled the duty and the output was checked low.
    pub low_checks: u32,
}

/// Runs the programming pass and, if configured, the reprogramming pass.
pub fn run<D: Dut>(
    sim: &mut Simulator<D>,
    config: &PwmConfig,
    timing: BusTiming,
) -> BenchResult<PwmReport> {
    let _span = tracing::info_span!("pwm", duty = config.duty, period = config.period).entered();
    let clk = sim.id(CLK)?;
    let reset = sim.id(RESET)?;
    let pwm = sim.id(PWM)?;
    let timer = sim.id(TIMER)?;
    let bus = ApbBus::attach(sim, timing)?;
    let mut report = PwmReport::default();

    bus.idle(sim);
    sim.start_clock(clk, SimTime::from_ns(config.clock_period_ns))?;
    sim.set_level(reset, true);
    sim.timer_in(config.reset_ns, TimeUnit::Ns);
    sim.set_level(reset, false);
    tracing::info!(at = %sim.now(), "reset released");

    program(sim, &bus, REG_DUTY, config.duty, "duty cycle", &mut report)?;
    program(sim, &bus, REG_PERIOD, config.period, "period", &mut report)?;
    program(sim, &bus, REG_ENABLE, 1, "enable", &mut report)?;
    sim.timer(SimTime::from_ns(config.settle_ns));
    observe(sim, clk, pwm, timer, config, &mut report)?;

    if let Some(period) = config.second_period {
        tracing::info!(period, "reprogramming period");
        bus.write(sim, REG_ENABLE, 0)?;
        program(sim, &bus, REG_PERIOD, period, "period", &mut report)?;
        sim.timer(SimTime::from_ns(config.reprogram_gap_ns));
        bus.write(sim, REG_ENABLE, 1)?;
        sim.timer(SimTime::from_ns(config.settle_ns));
        observe(sim, clk, pwm, timer, config, &mut report)?;
    }

    tracing::info!(
        passes = report.passes,
        high_checks = report.high_checks,
        low_checks = report.low_checks,
        "pwm passed"
    );
    sim.stats().log("pwm");
    Ok(report)
}

/// Writes a register and confirms it through a read.
fn program<D: Dut>(
    sim: &mut Simulator<D>,
    bus: &ApbBus,
    addr: u64,
    value: u64,
    what: &str,
    report: &mut PwmReport,
) -> BenchResult<()> {
    bus.write(sim, addr, value)?;
    let readback = bus.read(sim, addr)?;
    if readback != value {
        return Err(BenchError::mismatch(format!("{what} readback"), value, readback));
    }
    tracing::debug!(register = what, value, "register programmed");
    report.readbacks += 1;
    Ok(())
}

fn observe<D: Dut>(
    sim: &mut Simulator<D>,
    clk: SignalId,
    pwm: SignalId,
    timer: SignalId,
    config: &PwmConfig,
    report: &mut PwmReport,
) -> BenchResult<()> {
    for _ in 0..config.observe_cycles {
        sim.rising_edge(clk)?;
        let count = sim.get(timer);
        let level = sim.get(pwm);
        let required = if count == 0 && config.duty > 0 {
            report.high_checks += 1;
            Some(1)
        } else if count == config.duty {
            report.low_checks += 1;
            Some(0)
        } else {
            None
        };
        if let Some(expected) = required.filter(|&expected| expected != level) {
            return Err(BenchError::ProtocolTiming {
                signal: PWM.to_owned(),
                expected,
                actual: level,
                timer: count,
            });
        }
        report.cycles_observed += 1;
    }
    report.passes += 1;
    Ok(())
}
