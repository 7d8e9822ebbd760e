//! Wires the real `r68k` crate (a Musashi-derived 68000 core) behind
//! this crate's `CpuCore`/`Bus` boundary (`machine::cpu_core`).
//!
//! `r68k::ram::AddressBus` is the well-documented half of this adapter:
//! it's the trait the core actually calls back into, qualified by a
//! supervisor/user + program/data `AddressSpace` that this machine does
//! not distinguish (the 68000 in the Voyage 200 always runs in
//! supervisor mode from the guest OS's perspective, and the flash/RAM/IO
//! banks don't care which function code issued the access).
//!
//! `r68k`'s core mirrors Musashi's own register layout: sixteen general
//! registers (`dar[0..8]` = D0-D7, `dar[8..16]` = A0-A7) plus `pc`, built
//! through a per-variant constructor (`ConfiguredCore::new_mc68000`) and
//! stepped one instruction at a time via `execute1`. This matches the
//! shape the teacher uses for its own CPU crate: `mos6502::cpu::CPU`
//! owns its memory generically and is driven with repeated
//! `cpu.single_step()` calls (`player/mod.rs`'s `run_until`). Because
//! `CpuCore::execute` hands this adapter a fresh `&mut dyn Bus` borrow
//! on every call rather than letting the core own memory for its whole
//! lifetime, registers are kept here between calls and round-tripped
//! into a transient `ConfiguredCore` built over a thin `DynBusAdapter`
//! wrapping that borrow.

use r68k::cpu::ConfiguredCore;
use r68k::interrupts::AutoInterruptController;
use r68k::ram::{AddressBus as R68kAddressBus, AddressSpace};

use crate::machine::cpu_core::{Bus, CpuCore, CpuRegister};

/// Adapts a live `&mut dyn Bus` borrow into the `r68k::ram::AddressBus`
/// shape the core requires, without the core needing to own the bus for
/// its whole lifetime.
struct DynBusAdapter<'a> {
    bus: &'a mut dyn Bus,
}

impl R68kAddressBus for DynBusAdapter<'_> {
    fn copy_from(&mut self, _other: &Self) {
        // Never used: the core is never cloned mid-run.
    }

    fn read_byte(&self, _space: AddressSpace, address: u32) -> u32 {
        self.bus.read8(address) as u32
    }

    fn read_word(&self, _space: AddressSpace, address: u32) -> u32 {
        self.bus.read16(address) as u32
    }

    fn read_long(&self, space: AddressSpace, address: u32) -> u32 {
        let hi = self.read_word(space, address);
        let lo = self.read_word(space, address + 2);
        (hi << 16) | lo
    }

    fn write_byte(&mut self, _space: AddressSpace, address: u32, value: u32) {
        self.bus.write8(address, value as u8);
    }

    fn write_word(&mut self, _space: AddressSpace, address: u32, value: u32) {
        self.bus.write16(address, value as u16);
    }

    fn write_long(&mut self, space: AddressSpace, address: u32, value: u32) {
        self.write_word(space, address, value >> 16);
        self.write_word(space, address + 2, value);
    }
}

/// D0-D7 occupy `dar[0..8]`, A0-A7 occupy `dar[8..16]`; A7 is the stack
/// pointer, matching Musashi's own register file layout.
const SP_INDEX: usize = 15;

/// Adapts `r68k`'s Musashi-derived core to this crate's `CpuCore` trait.
///
/// Registers persist here (`dar`, `pc`) between `execute` calls; each
/// call seeds a transient `ConfiguredCore` with them, steps instructions
/// with `execute1` until the cycle budget is exhausted, then copies the
/// updated registers back out.
pub struct R68kCore {
    dar: [u32; 16],
    pc: u32,
    irq_pending: Option<u8>,
}

impl R68kCore {
    pub fn new() -> Self {
        Self {
            dar: [0; 16],
            pc: 0,
            irq_pending: None,
        }
    }
}

impl Default for R68kCore {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuCore for R68kCore {
    fn reset(&mut self, bus: &mut dyn Bus) {
        self.irq_pending = None;
        let mut core =
            ConfiguredCore::new_with(0, AutoInterruptController::new(), DynBusAdapter { bus });
        core.reset();
        self.dar = core.dar;
        self.pc = core.pc;
    }

    fn execute(&mut self, bus: &mut dyn Bus, max_cycles: u32) -> u32 {
        let mut int_ctrl = AutoInterruptController::new();
        if let Some(level) = self.irq_pending.take() {
            int_ctrl.request_interrupt(level);
        }

        let mut core = ConfiguredCore::new_with(self.pc, int_ctrl, DynBusAdapter { bus });
        core.dar = self.dar;
        core.pc = self.pc;

        let mut cycles_used: u32 = 0;
        while cycles_used < max_cycles {
            let cycles = core.execute1().0;
            if cycles <= 0 {
                break;
            }
            cycles_used += cycles as u32;
        }

        self.dar = core.dar;
        self.pc = core.pc;
        cycles_used
    }

    fn get_reg(&self, reg: CpuRegister) -> u32 {
        match reg {
            CpuRegister::Pc => self.pc,
            CpuRegister::Sp => self.dar[SP_INDEX],
        }
    }

    fn set_reg(&mut self, reg: CpuRegister, value: u32) {
        match reg {
            CpuRegister::Pc => self.pc = value,
            CpuRegister::Sp => self.dar[SP_INDEX] = value,
        }
    }

    fn raise_irq(&mut self, level: u8) {
        self.irq_pending = Some(level);
    }
}
