//! Simulator: owns the device, its signals and the clock generators side by side.
//!
//! The kernel is single-threaded and cooperative. A stimulus procedure holds the
//! only `&mut Simulator` and suspends by calling one of the wait points
//! (`rising_edge`, `timer`, `wait_until`, ...). A wait point runs the clock
//! generators and the device's edge reactions up to the awaited condition, then
//! hands control back. Writes made between wait points land in the signal bag
//! immediately and are settled into the device before the next wait point, so no
//! assertion is ever reordered across a suspension.
//!
//! Values read right after `rising_edge` returns are post-edge values: the device
//! has already reacted to that edge.

use super::clock::ClockGen;
use super::dut::Dut;
use super::signals::{SignalBag, SignalId};
use crate::common::{BenchError, BenchResult, Edge, SimTime, TimeUnit};
use crate::config::GeneralConfig;
use crate::stats::SimStats;

/// Budget for waits without an explicit timeout when no configuration is given.
const DEFAULT_WATCHDOG: SimTime = SimTime::from_us(10_000);

/// Rising edges of one signal recorded across wait points, each with the value
/// a companion signal held at that instant.
#[derive(Debug)]
struct RiseLatch {
    trigger: SignalId,
    capture: SignalId,
    last: bool,
    captured: Vec<u64>,
}

/// Top-level simulation kernel for one device.
#[derive(Debug)]
pub struct Simulator<D: Dut> {
    dut: D,
    signals: SignalBag,
    clocks: Vec<ClockGen>,
    latches: Vec<RiseLatch>,
    now: SimTime,
    watchdog: SimTime,
    stats: SimStats,
}

impl<D: Dut> Simulator<D> {
    /// Binds `dut` to a fresh signal bag built from its port declarations.
    pub fn new(mut dut: D) -> BenchResult<Self> {
        let mut signals = SignalBag::from_ports(&dut.ports())?;
        dut.bind(&signals)?;
        dut.settle(&mut signals);
        tracing::debug!(device = dut.name(), ports = signals.len(), "device bound");
        Ok(Self {
            dut,
            signals,
            clocks: Vec::new(),
            latches: Vec::new(),
            now: SimTime::ZERO,
            watchdog: DEFAULT_WATCHDOG,
            stats: SimStats::default(),
        })
    }

    /// Binds `dut` and applies the kernel-wide settings.
    pub fn with_config(dut: D, general: &GeneralConfig) -> BenchResult<Self> {
        Ok(Self::new(dut)?.with_watchdog(general.watchdog()))
    }

    /// Replaces the budget used by waits that have no explicit timeout.
    #[must_use]
    pub fn with_watchdog(mut self, watchdog: SimTime) -> Self {
        self.watchdog = watchdog;
        self
    }

    /// Current simulated time.
    pub const fn now(&self) -> SimTime {
        self.now
    }

    /// Budget used by waits without an explicit timeout.
    pub const fn watchdog(&self) -> SimTime {
        self.watchdog
    }

    /// The device.
    pub const fn dut(&self) -> &D {
        &self.dut
    }

    /// Consumes the kernel and returns the device.
    pub fn into_dut(self) -> D {
        self.dut
    }

    /// Current signal values.
    pub const fn signals(&self) -> &SignalBag {
        &self.signals
    }

    /// Activity counters.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Resolves a signal name.
    pub fn id(&self, name: &str) -> BenchResult<SignalId> {
        self.signals.id(name)
    }

    /// Current value of a signal.
    pub fn get(&self, id: SignalId) -> u64 {
        self.signals.get(id)
    }

    /// Current level of a one-bit signal.
    pub fn level(&self, id: SignalId) -> bool {
        self.signals.level(id)
    }

    /// Current value by name.
    pub fn read(&self, name: &str) -> BenchResult<u64> {
        self.signals.read(name)
    }

    /// Drives a signal and lets the device settle.
    pub fn set(&mut self, id: SignalId, value: u64) {
        self.signals.set(id, value);
        self.stats.signal_writes += 1;
        self.settle();
    }

    /// Drives a one-bit level and lets the device settle.
    pub fn set_level(&mut self, id: SignalId, level: bool) {
        self.set(id, u64::from(level));
    }

    /// Drives a signal by name and lets the device settle.
    pub fn write(&mut self, name: &str, value: u64) -> BenchResult<()> {
        let id = self.id(name)?;
        self.set(id, value);
        Ok(())
    }

    fn settle(&mut self) {
        self.dut.settle(&mut self.signals);
        self.stats.settles += 1;
        for latch in &mut self.latches {
            let level = self.signals.level(latch.trigger);
            if level && !latch.last {
                latch.captured.push(self.signals.get(latch.capture));
            }
            latch.last = level;
        }
    }

    /// Starts recording every rising edge of `trigger` together with the value
    /// of `capture` at that instant, replacing any latch already on `trigger`.
    ///
    /// Edges are seen on every settle, including those inside wait points, so a
    /// one-cycle pulse is caught even when no stimulus is looking at the signal.
    pub fn latch_rising(&mut self, trigger: SignalId, capture: SignalId) {
        self.latches.retain(|latch| latch.trigger != trigger);
        self.latches.push(RiseLatch {
            trigger,
            capture,
            last: self.signals.level(trigger),
            captured: Vec::new(),
        });
    }

    /// Stops recording on `trigger` and returns the captured values, oldest first.
    pub fn release_latch(&mut self, trigger: SignalId) -> Vec<u64> {
        let Some(index) = self.latches.iter().position(|latch| latch.trigger == trigger) else {
            return Vec::new();
        };
        self.latches.swap_remove(index).captured
    }

    /// Starts a free-running clock on `id`.
    ///
    /// The clock is driven low now and rises half a period later.
    pub fn start_clock(&mut self, id: SignalId, period: SimTime) -> BenchResult<()> {
        if self.clocks.iter().any(|clock| clock.signal() == id) {
            return Err(BenchError::ClockAlreadyRunning(
                self.signals.name(id).to_owned(),
            ));
        }
        let clock = ClockGen::new(id, period, self.now)?;
        tracing::debug!(clock = self.signals.name(id), %period, at = %self.now, "clock started");
        self.signals.set_level(id, false);
        self.settle();
        self.clocks.push(clock);
        Ok(())
    }

    /// Starts a free-running clock by signal name.
    pub fn start_clock_named(&mut self, name: &str, period: SimTime) -> BenchResult<()> {
        let id = self.id(name)?;
        self.start_clock(id, period)
    }

    /// Stops the clock on `id`, leaving the signal at its current level.
    pub fn stop_clock(&mut self, id: SignalId) {
        self.clocks.retain(|clock| clock.signal() != id);
    }

    /// Time of the earliest pending clock transition.
    pub fn next_event(&self) -> Option<SimTime> {
        self.clocks.iter().map(ClockGen::next_toggle).min()
    }

    /// Dispatches every clock transition scheduled at `at`, in clock start order.
    fn step(&mut self, at: SimTime) {
        self.now = at;
        for clock in &mut self.clocks {
            if clock.next_toggle() != at {
                continue;
            }
            let signal = clock.signal();
            let edge = clock.toggle();
            self.signals.set_level(signal, edge.level_after());
            self.stats.clock_edges += 1;
            #[cfg(feature = "sample-trace")]
            tracing::trace!(clock = self.signals.name(signal), %edge, %at, "clock edge");
            self.dut.clock_edge(signal, edge, &mut self.signals);
        }
        self.settle();
        self.stats.sim_time = at;
    }

    /// Processes every event up to and including `target`, then parks time there.
    pub fn advance_to(&mut self, target: SimTime) {
        while let Some(at) = self.next_event().filter(|&at| at <= target) {
            self.step(at);
        }
        if target > self.now {
            self.now = target;
            self.stats.sim_time = target;
        }
    }

    /// Suspends for a fixed span of simulated time.
    pub fn timer(&mut self, span: SimTime) {
        self.stats.wait_points += 1;
        self.advance_to(self.now + span);
    }

    /// Suspends for `amount` of `unit`.
    pub fn timer_in(&mut self, amount: u64, unit: TimeUnit) {
        self.timer(SimTime::new(amount, unit));
    }

    /// Suspends until the next rising edge of `id`.
    pub fn rising_edge(&mut self, id: SignalId) -> BenchResult<()> {
        self.wait_edge(id, Edge::Rising, self.watchdog)
    }

    /// Suspends until the next falling edge of `id`.
    pub fn falling_edge(&mut self, id: SignalId) -> BenchResult<()> {
        self.wait_edge(id, Edge::Falling, self.watchdog)
    }

    /// Suspends for `cycles` rising edges of `id`.
    pub fn clock_cycles(&mut self, id: SignalId, cycles: u32) -> BenchResult<()> {
        for _ in 0..cycles {
            self.rising_edge(id)?;
        }
        Ok(())
    }

    /// Suspends until `id` makes an `edge` transition, or fails after `timeout`.
    ///
    /// Only transitions caused by the kernel (clock edges and the device's
    /// reactions to them) count; a level already present does not.
    pub fn wait_edge(&mut self, id: SignalId, edge: Edge, timeout: SimTime) -> BenchResult<()> {
        let mut last = self.signals.get(id);
        self.run_until(
            timeout,
            |signals| format!("{edge} edge on {}", signals.name(id)),
            |signals| {
                let value = signals.get(id);
                let hit = Edge::between(last, value) == Some(edge);
                last = value;
                hit
            },
        )
    }

    /// Suspends until `id` rises, or fails after `timeout`.
    pub fn wait_for_rising(&mut self, id: SignalId, timeout: SimTime) -> BenchResult<()> {
        self.wait_edge(id, Edge::Rising, timeout)
    }

    /// Suspends until `id` holds `value`; returns at once if it already does.
    pub fn wait_for_level(&mut self, id: SignalId, value: u64, timeout: SimTime) -> BenchResult<()> {
        if self.signals.get(id) == value {
            self.stats.wait_points += 1;
            return Ok(());
        }
        self.run_until(
            timeout,
            |signals| format!("{} == {value:#x}", signals.name(id)),
            |signals| signals.get(id) == value,
        )
    }

    /// Suspends until `condition` holds; returns at once if it already does.
    ///
    /// # Arguments
    ///
    /// * `what` - Description used in the timeout error.
    /// * `timeout` - Simulated-time budget from now.
    /// * `condition` - Checked after every batch of clock events.
    pub fn wait_until(
        &mut self,
        what: &str,
        timeout: SimTime,
        mut condition: impl FnMut(&SignalBag) -> bool,
    ) -> BenchResult<()> {
        if condition(&self.signals) {
            self.stats.wait_points += 1;
            return Ok(());
        }
        self.run_until(timeout, |_| what.to_owned(), condition)
    }

    /// Runs event batches until `done` holds after one of them.
    fn run_until(
        &mut self,
        timeout: SimTime,
        describe: impl Fn(&SignalBag) -> String,
        mut done: impl FnMut(&SignalBag) -> bool,
    ) -> BenchResult<()> {
        self.stats.wait_points += 1;
        let deadline = self.now + timeout;
        loop {
            let Some(at) = self.next_event() else {
                self.stats.timeouts += 1;
                return Err(BenchError::Stalled {
                    waiting_for: describe(&self.signals),
                    at: self.now,
                });
            };
            if at > deadline {
                self.advance_to(deadline);
                self.stats.timeouts += 1;
                return Err(BenchError::Timeout {
                    waiting_for: describe(&self.signals),
                    after: timeout,
                });
            }
            self.step(at);
            if done(&self.signals) {
                return Ok(());
            }
        }
    }
}
