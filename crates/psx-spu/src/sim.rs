//! In-memory stand-in for the SPU hardware
//!
//! [`SimBus`] stores register values in a map and records every write in
//! order, so driver logic can be exercised on a host without a console.
//! A small amount of hardware behaviour is modelled:
//!
//! - Writing the DMA channel control word with the start bit set records a
//!   [`Transfer`] and clears the busy bit, as if the transfer finished
//!   instantly. [`SimBus::stall_dma`] disables this.
//! - The status register can report busy voices for a number of polls
//!   ([`SimBus::busy_for`]) before going idle.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::regs::{self, ChannelControl, Reg16, Reg32, Registers};

/// One recorded register write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Write16 { addr: u32, value: u16 },
    Write32 { addr: u32, value: u32 },
}

/// A DMA transfer the simulated channel accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    /// Source address in main RAM (MADR)
    pub source: u32,
    /// Block count / block size word (BCR)
    pub bcr: u32,
    /// Destination in sound RAM, in bytes
    pub destination: u32,
}

impl Transfer {
    /// Bytes moved by this transfer
    pub fn len(&self) -> usize {
        let blocks = (self.bcr >> 16) as usize;
        let words = (self.bcr & 0xFFFF) as usize;
        blocks * words * 4
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Simulated register file
#[derive(Debug, Default)]
pub struct SimBus {
    halves: BTreeMap<u32, u16>,
    words: BTreeMap<u32, u32>,
    log: Vec<Access>,
    transfers: Vec<Transfer>,
    dma_stalled: bool,
    busy_polls: u32,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave DMA transfers running forever
    pub fn stall_dma(mut self) -> Self {
        self.dma_stalled = true;
        self
    }

    /// Report busy voices for the next `polls` status reads
    pub fn busy_for(&mut self, polls: u32) {
        self.busy_polls = polls;
    }

    /// Every write so far, oldest first
    pub fn writes(&self) -> &[Access] {
        &self.log
    }

    /// Writes to one 16-bit register, oldest first
    pub fn writes_to(&self, reg: Reg16) -> Vec<u16> {
        self.log
            .iter()
            .filter_map(|access| match *access {
                Access::Write16 { addr, value } if addr == reg.addr() => Some(value),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded writes, keeping register contents
    pub fn clear_writes(&mut self) {
        self.log.clear();
    }

    /// DMA transfers accepted so far
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Current value of a 16-bit register without side effects
    pub fn peek16(&self, reg: Reg16) -> u16 {
        self.halves.get(&reg.addr()).copied().unwrap_or(0)
    }

    /// Current value of a 32-bit register without side effects
    pub fn peek32(&self, reg: Reg32) -> u32 {
        self.words.get(&reg.addr()).copied().unwrap_or(0)
    }

    /// Set a 16-bit register without recording a write
    pub fn poke16(&mut self, reg: Reg16, value: u16) {
        self.halves.insert(reg.addr(), value);
    }

    /// Set a 32-bit register without recording a write
    pub fn poke32(&mut self, reg: Reg32, value: u32) {
        self.words.insert(reg.addr(), value);
    }

    fn start_transfer(&mut self, command: u32) -> u32 {
        let transfer = Transfer {
            source: self.peek32(regs::DMA_SPU_MADR),
            bcr: self.peek32(regs::DMA_SPU_BCR),
            destination: u32::from(self.peek16(regs::RAM_TRANSFER_ADDR)) << 3,
        };
        log::trace!("sim: DMA transfer {transfer:?}");
        self.transfers.push(transfer);

        if self.dma_stalled {
            command
        } else {
            command & !ChannelControl::START_BUSY.bits()
        }
    }
}

impl Registers for SimBus {
    fn read16(&mut self, reg: Reg16) -> u16 {
        if reg == regs::STATUS && self.busy_polls > 0 {
            self.busy_polls -= 1;
            return self.peek16(reg) | regs::STATUS_BUSY_MASK;
        }
        self.peek16(reg)
    }

    fn write16(&mut self, reg: Reg16, value: u16) {
        self.log.push(Access::Write16 { addr: reg.addr(), value });
        self.halves.insert(reg.addr(), value);
    }

    fn read32(&mut self, reg: Reg32) -> u32 {
        self.peek32(reg)
    }

    fn write32(&mut self, reg: Reg32, value: u32) {
        self.log.push(Access::Write32 { addr: reg.addr(), value });

        let stored = if reg == regs::DMA_SPU_CHCR && value & ChannelControl::START_BUSY.bits() != 0 {
            self.start_transfer(value)
        } else {
            value
        };
        self.words.insert(reg.addr(), stored);
    }
}
