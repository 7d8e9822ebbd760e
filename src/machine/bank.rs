//! The core `Bank` trait — byte/word interface shared by every
//! memory-mapped storage bank (RAM, flash).

/// A memory-mapped storage bank addressed by a byte offset within itself.
///
/// Implementors only need to provide the byte primitives; `read16`/
/// `write16` default to two big-endian byte accesses, which is correct
/// for RAM but deliberately overridden by the flash bank (word writes
/// there drive the command state machine rather than a plain store).
pub trait Bank {
    fn read8(&self, offset: u32) -> u8;
    fn write8(&mut self, offset: u32, value: u8);

    fn read16(&self, offset: u32) -> u16 {
        let hi = self.read8(offset) as u16;
        let lo = self.read8(offset.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    fn write16(&mut self, offset: u32, value: u16) {
        self.write8(offset, (value >> 8) as u8);
        self.write8(offset.wrapping_add(1), value as u8);
    }
}
