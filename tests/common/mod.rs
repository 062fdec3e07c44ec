#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use qcom_pmic_charger::RegisterBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Read(u16),
    Write(u16, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

#[derive(Default)]
struct State {
    regs: HashMap<u16, u8>,
    scripted: HashMap<u16, VecDeque<u8>>,
    log: Vec<Op>,
    fail_reads: HashSet<u16>,
    fail_writes: HashSet<u16>,
}

/// In-memory register file. Clones share state, so a test keeps a handle
/// while the driver owns another.
#[derive(Clone, Default)]
pub struct FakeBus {
    state: Rc<RefCell<State>>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, addr: u16, value: u8) {
        self.state.borrow_mut().regs.insert(addr, value);
    }

    pub fn get(&self, addr: u16) -> u8 {
        self.state.borrow().regs.get(&addr).copied().unwrap_or(0)
    }

    /// Successive reads of `addr` return `values` in order, then fall back to the register value.
    pub fn script(&self, addr: u16, values: &[u8]) {
        self.state
            .borrow_mut()
            .scripted
            .entry(addr)
            .or_default()
            .extend(values.iter().copied());
    }

    pub fn fail_reads(&self, addr: u16) {
        self.state.borrow_mut().fail_reads.insert(addr);
    }

    pub fn fail_writes(&self, addr: u16) {
        self.state.borrow_mut().fail_writes.insert(addr);
    }

    pub fn log(&self) -> Vec<Op> {
        self.state.borrow().log.clone()
    }

    pub fn clear_log(&self) {
        self.state.borrow_mut().log.clear();
    }

    pub fn writes(&self) -> Vec<(u16, u8)> {
        self.state
            .borrow()
            .log
            .iter()
            .filter_map(|op| match *op {
                Op::Write(addr, value) => Some((addr, value)),
                Op::Read(_) => None,
            })
            .collect()
    }

    /// Values written to `addr`, in order.
    pub fn writes_to(&self, addr: u16) -> Vec<u8> {
        self.writes()
            .into_iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, v)| v)
            .collect()
    }

    pub fn reads_of(&self, addr: u16) -> usize {
        self.state
            .borrow()
            .log
            .iter()
            .filter(|op| **op == Op::Read(addr))
            .count()
    }
}

impl RegisterBus for FakeBus {
    type Error = BusFault;

    fn read(&mut self, reg: u16) -> Result<u8, BusFault> {
        let mut state = self.state.borrow_mut();
        state.log.push(Op::Read(reg));
        if state.fail_reads.contains(&reg) {
            return Err(BusFault);
        }
        if let Some(value) = state.scripted.get_mut(&reg).and_then(VecDeque::pop_front) {
            return Ok(value);
        }
        Ok(state.regs.get(&reg).copied().unwrap_or(0))
    }

    fn write(&mut self, reg: u16, value: u8) -> Result<(), BusFault> {
        let mut state = self.state.borrow_mut();
        state.log.push(Op::Write(reg, value));
        if state.fail_writes.contains(&reg) {
            return Err(BusFault);
        }
        state.regs.insert(reg, value);
        Ok(())
    }

    fn bulk_read(&mut self, reg: u16, data: &mut [u8]) -> Result<(), BusFault> {
        for (i, byte) in data.iter_mut().enumerate() {
            *byte = self.read(reg + i as u16)?;
        }
        Ok(())
    }
}

/// `DelayNs` that only accumulates the requested time.
#[derive(Clone, Default)]
pub struct FakeDelay {
    total_ns: Rc<Cell<u64>>,
}

impl FakeDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ns.get() / 1_000_000
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns.set(self.total_ns.get() + ns as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.total_ns.set(self.total_ns.get() + us as u64 * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns.set(self.total_ns.get() + ms as u64 * 1_000_000);
    }
}
