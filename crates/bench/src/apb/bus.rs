//! Register transactions.
//!
//! Both directions follow the same sequence:
//! 1. **Align:** wait for a rising edge of the bus clock, then the setup delay.
//! 2. **Access:** present address (and data), assert select and enable (and the
//!    write strobe for writes), hold for the access time.
//! 3. **Release:** sample read data (reads), deassert every control line, then
//!    wait out the recovery time.
//!
//! A read drives the write strobe low for the whole access.

use crate::common::BenchResult;
use crate::config::BusTiming;
use crate::sim::{Dut, SignalId, Simulator};

/// Bus clock.
pub const CLK: &str = "clk";
/// Slave select.
pub const PSEL: &str = "io_apb_PSEL";
/// Access enable.
pub const PENABLE: &str = "io_apb_PENABLE";
/// Write strobe.
pub const PWRITE: &str = "io_apb_PWRITE";
/// Register address.
pub const PADDR: &str = "io_apb_PADDR";
/// Write data.
pub const PWDATA: &str = "io_apb_PWDATA";
/// Read data.
pub const PRDATA: &str = "io_apb_PRDATA";

/// Resolved slave port.
#[derive(Debug, Clone, Copy)]
pub struct ApbPins {
    /// Bus clock.
    pub clk: SignalId,
    /// Select.
    pub psel: SignalId,
    /// Enable.
    pub penable: SignalId,
    /// Write strobe.
    pub pwrite: SignalId,
    /// Address.
    pub paddr: SignalId,
    /// Write data.
    pub pwdata: SignalId,
    /// Read data.
    pub prdata: SignalId,
}

impl ApbPins {
    /// Looks up the slave port by its fixed signal names.
    pub fn resolve<D: Dut>(sim: &Simulator<D>) -> BenchResult<Self> {
        Ok(Self {
            clk: sim.id(CLK)?,
            psel: sim.id(PSEL)?,
            penable: sim.id(PENABLE)?,
            pwrite: sim.id(PWRITE)?,
            paddr: sim.id(PADDR)?,
            pwdata: sim.id(PWDATA)?,
            prdata: sim.id(PRDATA)?,
        })
    }
}

/// Bus master bound to one slave port.
#[derive(Debug, Clone, Copy)]
pub struct ApbBus {
    pins: ApbPins,
    timing: BusTiming,
}

impl ApbBus {
    /// Master on resolved pins with the given timing.
    pub const fn new(pins: ApbPins, timing: BusTiming) -> Self {
        Self { pins, timing }
    }

    /// Master on the fixed signal names.
    pub fn attach<D: Dut>(sim: &Simulator<D>, timing: BusTiming) -> BenchResult<Self> {
        Ok(Self::new(ApbPins::resolve(sim)?, timing))
    }

    /// Pins in use.
    pub const fn pins(&self) -> &ApbPins {
        &self.pins
    }

    /// Drives every control line low.
    pub fn idle<D: Dut>(&self, sim: &mut Simulator<D>) {
        sim.set_level(self.pins.psel, false);
        sim.set_level(self.pins.penable, false);
        sim.set_level(self.pins.pwrite, false);
    }

    /// Writes `data` to register `addr`.
    ///
    /// The transfer starts on the next rising clock edge; address, data and
    /// direction settle during the setup delay, select and enable are held for
    /// the access phase, then everything returns low for the recovery time.
    ///
    /// # Arguments
    ///
    /// * `sim` - The kernel driving the slave.
    /// * `addr` - Register address (`PADDR`).
    /// * `data` - Value to store (`PWDATA`).
    pub fn write<D: Dut>(&self, sim: &mut Simulator<D>, addr: u64, data: u64) -> BenchResult<()> {
        self.begin(sim, addr)?;
        sim.set(self.pins.pwdata, data);
        sim.set_level(self.pins.pwrite, true);
        self.select(sim);
        sim.timer(self.timing.access());
        self.release(sim);
        tracing::trace!(addr = format_args!("{addr:#04x}"), data = format_args!("{data:#x}"), "bus write");
        Ok(())
    }

    /// Reads register `addr`, sampling `PRDATA` at the end of the access phase.
    pub fn read<D: Dut>(&self, sim: &mut Simulator<D>, addr: u64) -> BenchResult<u64> {
        self.begin(sim, addr)?;
        sim.set_level(self.pins.pwrite, false);
        self.select(sim);
        sim.timer(self.timing.access());
        let data = sim.get(self.pins.prdata);
        self.release(sim);
        tracing::trace!(addr = format_args!("{addr:#04x}"), data = format_args!("{data:#x}"), "bus read");
        Ok(data)
    }

    fn begin<D: Dut>(&self, sim: &mut Simulator<D>, addr: u64) -> BenchResult<()> {
        sim.rising_edge(self.pins.clk)?;
        sim.timer(self.timing.setup());
        sim.set(self.pins.paddr, addr);
        Ok(())
    }

    fn select<D: Dut>(&self, sim: &mut Simulator<D>) {
        sim.set_level(self.pins.psel, true);
        sim.set_level(self.pins.penable, true);
    }

    fn release<D: Dut>(&self, sim: &mut Simulator<D>) {
        self.idle(sim);
        sim.timer(self.timing.recovery());
    }
}
