//! 32-byte I/O register file, including the two overridden read paths.

use super::decoder::IO_MASK;
use super::keyboard::Keyboard;

const HARDWARE_PRESENT_REG: u32 = 0x00;
const HARDWARE_PRESENT_BIT: u8 = 0x04;
const KEYBOARD_SCAN_REG: u32 = 0x1B;
const ROW_MASK_HI_REG: u32 = 0x18;
const ROW_MASK_LO_REG: u32 = 0x19;

pub struct IoBlock {
    regs: [u8; 32],
}

impl IoBlock {
    pub fn new() -> Self {
        Self { regs: [0; 32] }
    }

    pub fn reset(&mut self) {
        self.regs.fill(0);
    }

    fn idx(addr: u32) -> usize {
        (addr & IO_MASK) as usize
    }

    pub fn read8(&self, addr: u32, keyboard: &Keyboard) -> u8 {
        let idx = Self::idx(addr);
        match idx as u32 {
            HARDWARE_PRESENT_REG => self.regs[idx] | HARDWARE_PRESENT_BIT,
            KEYBOARD_SCAN_REG => {
                let mask = ((self.regs[Self::idx(ROW_MASK_HI_REG)] as u16) << 8)
                    | self.regs[Self::idx(ROW_MASK_LO_REG)] as u16;
                keyboard.scan(mask)
            }
            _ => self.regs[idx],
        }
    }

    pub fn write8(&mut self, addr: u32, value: u8) {
        self.regs[Self::idx(addr)] = value;
    }

    /// Preserves the source's bit-placement quirk verbatim: the high
    /// byte ends up in bits 23..16 of the returned value rather than
    /// 15..8. See SPEC_FULL.md §4.4.
    pub fn read16_quirky(&self, addr: u32, keyboard: &Keyboard) -> u32 {
        (self.read8(addr, keyboard) as u32) << 16 | self.read8(addr.wrapping_add(1), keyboard) as u32
    }

    pub fn write16(&mut self, addr: u32, value: u16) {
        self.write8(addr, (value >> 8) as u8);
        self.write8(addr.wrapping_add(1), value as u8);
    }
}

impl Default for IoBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_zero_always_ors_hardware_present_bit() {
        let io = IoBlock::new();
        let kbd = Keyboard::new();
        assert_eq!(io.read8(0x00, &kbd) & HARDWARE_PRESENT_BIT, HARDWARE_PRESENT_BIT);

        let mut io2 = IoBlock::new();
        io2.write8(0x00, 0x00);
        assert_eq!(io2.read8(0x00, &kbd), HARDWARE_PRESENT_BIT);
    }

    #[test]
    fn register_0x1b_reads_keyboard_scan() {
        let mut io = IoBlock::new();
        let mut kbd = Keyboard::new();
        kbd.set_pressed(3, true);
        io.write8(0x18, 0xFF);
        io.write8(0x19, 0xFE); // row 0 selected
        assert_eq!(io.read8(0x1B, &kbd), 0xEF);
    }

    #[test]
    fn write_to_0x1b_does_not_affect_next_read() {
        let mut io = IoBlock::new();
        let kbd = Keyboard::new();
        io.write8(0x1B, 0x42);
        assert_eq!(io.read8(0x1B, &kbd), 0xFF); // still the keyboard scan, not 0x42
    }

    #[test]
    fn mirrors_by_addr_and_0x1f() {
        let mut io = IoBlock::new();
        io.write8(0x05, 0x99);
        let kbd = Keyboard::new();
        assert_eq!(io.read8(0x05, &kbd), io.read8(0x05 + 0x20, &kbd));
    }
}
