//! Machine façade — owns every bank and exposes the four entry points
//! the CPU core calls into.

pub mod bank;
pub mod cpu_core;
pub mod decoder;
pub mod flash;
pub mod io;
pub mod keyboard;
pub mod ram;
pub mod rom_loader;

use bank::Bank;
use cpu_core::{Bus, CpuRegister};
use decoder::{decode, MemoryRegion, FLASH_BASE, IO_BASE, RAM_BASE};
use flash::FlashBank;
use io::IoBlock;
use keyboard::Keyboard;
use ram::RamBank;

pub struct Machine {
    pub ram: RamBank,
    pub flash: FlashBank,
    pub io: IoBlock,
    pub keyboard: Keyboard,
}

impl Machine {
    pub fn new() -> Self {
        Self {
            ram: RamBank::new(),
            flash: FlashBank::new(),
            io: IoBlock::new(),
            keyboard: Keyboard::new(),
        }
    }

    /// Load a v2u image into flash. Does not touch RAM or reset CPU
    /// registers; call `reset_cpu` afterwards.
    pub fn load_rom(&mut self, data: &[u8]) -> Result<(), String> {
        rom_loader::load(data, &mut self.flash)
    }

    /// Read the initial SP/PC from the boot vector table and write them
    /// into the CPU core's registers.
    pub fn reset_cpu(&mut self, core: &mut dyn cpu_core::CpuCore) {
        let sp = self.read32(FLASH_BASE);
        let pc = self.read32(FLASH_BASE + 4);
        core.set_reg(CpuRegister::Sp, sp);
        core.set_reg(CpuRegister::Pc, pc);
    }

    fn read32(&self, addr: u32) -> u32 {
        let hi = self.read16(addr) as u32;
        let lo = self.read16(addr.wrapping_add(2)) as u32;
        (hi << 16) | lo
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for Machine {
    fn read8(&self, addr: u32) -> u8 {
        match decode(addr) {
            MemoryRegion::Ram => self.ram.read8(addr - RAM_BASE),
            MemoryRegion::Flash => self.flash.read8(addr - FLASH_BASE),
            MemoryRegion::Io => self.io.read8(addr - IO_BASE, &self.keyboard),
            MemoryRegion::Unmapped => {
                log::warn!("unmapped read8 @ {addr:#08x}");
                0
            }
        }
    }

    fn read16(&self, addr: u32) -> u16 {
        match decode(addr) {
            MemoryRegion::Ram => self.ram.read16(addr - RAM_BASE),
            MemoryRegion::Flash => self.flash.read16(addr - FLASH_BASE),
            MemoryRegion::Io => {
                // Preserves the source's bit-placement quirk: the high
                // byte lands in bits 23..16, not 15..8. Truncating to
                // u16 here reproduces the same observable behaviour the
                // original 32-bit-returning function had for callers
                // that only look at the low 16 bits.
                self.io.read16_quirky(addr - IO_BASE, &self.keyboard) as u16
            }
            MemoryRegion::Unmapped => {
                log::warn!("unmapped read16 @ {addr:#08x}");
                0
            }
        }
    }

    fn write8(&mut self, addr: u32, value: u8) {
        match decode(addr) {
            MemoryRegion::Ram => self.ram.write8(addr - RAM_BASE, value),
            MemoryRegion::Flash => {
                log::warn!("flash byte write: {value:#04x} @ {addr:#08x} (?!)");
            }
            MemoryRegion::Io => self.io.write8(addr - IO_BASE, value),
            MemoryRegion::Unmapped => {
                log::warn!("unmapped write8 {value:#04x} -> {addr:#08x}");
            }
        }
    }

    fn write16(&mut self, addr: u32, value: u16) {
        match decode(addr) {
            MemoryRegion::Ram => self.ram.write16(addr - RAM_BASE, value),
            MemoryRegion::Flash => self.flash.write16(addr - FLASH_BASE, value),
            MemoryRegion::Io => self.io.write16(addr - IO_BASE, value),
            MemoryRegion::Unmapped => {
                log::warn!("unmapped write16 {value:#06x} -> {addr:#08x}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::cpu_core::test_support::{Op, ScriptedCpuCore};
    use super::cpu_core::CpuCore;
    use super::*;

    #[test]
    fn reset_cpu_loads_sp_and_pc_from_boot_vector() {
        let mut machine = Machine::new();
        machine.flash.raw_mut()[0..4].copy_from_slice(&0x0020_0000u32.to_be_bytes());
        machine.flash.raw_mut()[4..8].copy_from_slice(&0x0020_1000u32.to_be_bytes());
        let mut core = ScriptedCpuCore::new(vec![], 0);
        machine.reset_cpu(&mut core);
        assert_eq!(core.get_reg(CpuRegister::Sp), 0x0020_0000);
        assert_eq!(core.get_reg(CpuRegister::Pc), 0x0020_1000);
    }

    #[test]
    fn end_to_end_scripted_write_lands_in_ram() {
        let mut machine = Machine::new();
        let mut core = ScriptedCpuCore::new(
            vec![Op::Write8(0x100, 0xDE), Op::Write8(0x101, 0xAD), Op::Write8(0x102, 0xBE), Op::Write8(0x103, 0xEF)],
            12_000,
        );
        core.execute(&mut machine, 300_000);
        assert_eq!(&machine.ram.as_slice()[0x100..0x104], &[0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn unmapped_read_returns_zero_and_write_is_discarded() {
        let mut machine = Machine::new();
        assert_eq!(machine.read8(0x900000), 0);
        machine.write8(0x900000, 0x42); // must not panic, effect is a no-op
    }
}
