//! Device-under-test trait.
//!
//! This module defines the `Dut` trait implemented by whatever sits behind the
//! signal interface: an RTL simulator binding, a behavioral model, or a mock. It
//! provides:
//! 1. **Identification:** `name` and the declared `ports`.
//! 2. **Binding:** `bind` resolves port names to handles once.
//! 3. **Reaction:** `clock_edge` for registered logic, `settle` for combinational
//!    and asynchronous logic after the testbench drives inputs.
//!
//! The kernel never inspects device state; everything flows through the
//! [`SignalBag`].

use super::signals::{Port, SignalBag, SignalId};
use crate::common::{BenchResult, Edge};

/// A device driven by the simulation kernel.
pub trait Dut {
    /// Returns a short name for this device (e.g. `"UartRx"`).
    fn name(&self) -> &str;

    /// Declares every signal of the device interface.
    fn ports(&self) -> Vec<Port>;

    /// Resolves the handles the device needs. Called once, before time zero.
    fn bind(&mut self, signals: &SignalBag) -> BenchResult<()>;

    /// Reacts to a transition of a clock signal.
    ///
    /// `signals` already holds the new clock level. Inputs reflect whatever the
    /// testbench drove before this edge.
    fn clock_edge(&mut self, clock: SignalId, edge: Edge, signals: &mut SignalBag);

    /// Re-evaluates combinational outputs and asynchronous controls.
    ///
    /// Called after every testbench write and after every batch of clock edges.
    fn settle(&mut self, _signals: &mut SignalBag) {}
}

impl<D: Dut + ?Sized> Dut for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn ports(&self) -> Vec<Port> {
        (**self).ports()
    }

    fn bind(&mut self, signals: &SignalBag) -> BenchResult<()> {
        (**self).bind(signals)
    }

    fn clock_edge(&mut self, clock: SignalId, edge: Edge, signals: &mut SignalBag) {
        (**self).clock_edge(clock, edge, signals);
    }

    fn settle(&mut self, signals: &mut SignalBag) {
        (**self).settle(signals);
    }
}
