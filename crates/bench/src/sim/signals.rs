//! The device's signal interface as an opaque bag of named words.
//!
//! The stimulus side and the device side share one [`SignalBag`]. Names are
//! resolved to [`SignalId`] handles once so that hot loops (one strobe per
//! oversample, one edge per half clock) index a vector instead of hashing.

use std::collections::HashMap;

use crate::common::logic::width_mask;
use crate::common::{BenchError, BenchResult};

/// Handle to one signal in a [`SignalBag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(usize);

impl SignalId {
    /// Position of the signal in declaration order.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Who drives a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Driven by the testbench (clocks, resets, stimulus).
    Input,
    /// Driven by the device.
    Output,
    /// Device-internal state exposed for probing (e.g. a PWM timer).
    Internal,
}

/// Declaration of one signal of a device interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    /// Signal name as it appears in the device netlist.
    pub name: String,
    /// Width in bits (1..=64).
    pub width: u8,
    /// Driver of the signal.
    pub direction: Direction,
    /// Value before anything drives the signal.
    pub initial: u64,
}

impl Port {
    /// Testbench-driven port, initially zero.
    pub fn input(name: impl Into<String>, width: u8) -> Self {
        Self::new(name, width, Direction::Input)
    }

    /// Device-driven port, initially zero.
    pub fn output(name: impl Into<String>, width: u8) -> Self {
        Self::new(name, width, Direction::Output)
    }

    /// Probed internal signal, initially zero.
    pub fn internal(name: impl Into<String>, width: u8) -> Self {
        Self::new(name, width, Direction::Internal)
    }

    fn new(name: impl Into<String>, width: u8, direction: Direction) -> Self {
        Self {
            name: name.into(),
            width,
            direction,
            initial: 0,
        }
    }

    /// Overrides the power-on value (masked to the port width).
    #[must_use]
    pub fn with_initial(mut self, value: u64) -> Self {
        self.initial = value & width_mask(self.width);
        self
    }
}

#[derive(Debug, Clone)]
struct Slot {
    port: Port,
    mask: u64,
    value: u64,
}

/// Current values of every signal of one device.
#[derive(Debug, Clone, Default)]
pub struct SignalBag {
    by_name: HashMap<String, SignalId>,
    slots: Vec<Slot>,
}

impl SignalBag {
    /// Builds a bag from port declarations.
    ///
    /// Fails on duplicate names and on widths outside 1..=64.
    pub fn from_ports(ports: &[Port]) -> BenchResult<Self> {
        let mut bag = Self::default();
        for port in ports {
            if port.width == 0 || port.width > 64 {
                return Err(BenchError::InvalidConfig(format!(
                    "port '{}' has unsupported width {}",
                    port.name, port.width
                )));
            }
            let id = SignalId(bag.slots.len());
            if bag.by_name.insert(port.name.clone(), id).is_some() {
                return Err(BenchError::InvalidConfig(format!(
                    "port '{}' declared twice",
                    port.name
                )));
            }
            let mask = width_mask(port.width);
            bag.slots.push(Slot {
                port: port.clone(),
                mask,
                value: port.initial & mask,
            });
        }
        Ok(bag)
    }

    /// Resolves a name to its handle.
    pub fn id(&self, name: &str) -> BenchResult<SignalId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| BenchError::UnknownSignal(name.to_owned()))
    }

    /// Declaration of the signal behind `id`.
    pub fn port(&self, id: SignalId) -> &Port {
        &self.slots[id.0].port
    }

    /// Name of the signal behind `id`.
    pub fn name(&self, id: SignalId) -> &str {
        &self.slots[id.0].port.name
    }

    /// Current value.
    pub fn get(&self, id: SignalId) -> u64 {
        self.slots[id.0].value
    }

    /// Current value of the least-significant bit.
    pub fn level(&self, id: SignalId) -> bool {
        self.slots[id.0].value & 1 == 1
    }

    /// Drives a value, truncated to the port width.
    pub fn set(&mut self, id: SignalId, value: u64) {
        let slot = &mut self.slots[id.0];
        slot.value = value & slot.mask;
    }

    /// Drives a one-bit level.
    pub fn set_level(&mut self, id: SignalId, level: bool) {
        self.set(id, u64::from(level));
    }

    /// Current value by name.
    pub fn read(&self, name: &str) -> BenchResult<u64> {
        Ok(self.get(self.id(name)?))
    }

    /// Drives a value by name.
    pub fn write(&mut self, name: &str, value: u64) -> BenchResult<()> {
        let id = self.id(name)?;
        self.set(id, value);
        Ok(())
    }

    /// Number of declared signals.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when the device declares no signals.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Declarations in order.
    pub fn ports(&self) -> impl Iterator<Item = &Port> + '_ {
        self.slots.iter().map(|slot| &slot.port)
    }
}
