//! CPU core boundary — the capability the 68000 decoder/executor is
//! parameterised over, per SPEC_FULL.md §4.9.
//!
//! The decoder/executor itself is out of scope: production wiring uses
//! the `r68k` crate (see `crate::cpu_adapter`); this trait exists so the
//! machine model can be exercised in tests without linking a real core.

/// Registers the machine façade touches directly (reset, dumps).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuRegister {
    Pc,
    Sp,
}

/// The four-method bus capability the CPU core calls back into.
pub trait Bus {
    fn read8(&self, addr: u32) -> u8;
    fn read16(&self, addr: u32) -> u16;
    fn write8(&mut self, addr: u32, value: u8);
    fn write16(&mut self, addr: u32, value: u16);
}

/// The external 68000 core, treated as a black box.
pub trait CpuCore {
    fn reset(&mut self, bus: &mut dyn Bus);
    /// Execute up to `max_cycles` cycles; returns the number actually
    /// consumed. Zero means the core made no forward progress (halted
    /// or a bus-error state) — the frame driver treats that as fatal.
    fn execute(&mut self, bus: &mut dyn Bus, max_cycles: u32) -> u32;
    fn get_reg(&self, reg: CpuRegister) -> u32;
    fn set_reg(&mut self, reg: CpuRegister, value: u32);
    fn raise_irq(&mut self, level: u8);
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    /// A scripted stand-in for the real decoder: replays a fixed list of
    /// bus operations per `execute` call and reports a fixed cycle cost.
    /// Enough to drive the machine model's testable properties (§8)
    /// without a real 68000 in the loop.
    pub enum Op {
        Write8(u32, u8),
        Write16(u32, u16),
    }

    pub struct ScriptedCpuCore {
        pc: u32,
        sp: u32,
        script: Vec<Op>,
        cycles_per_call: u32,
        irqs_raised: Vec<u8>,
        halted: bool,
    }

    impl ScriptedCpuCore {
        pub fn new(script: Vec<Op>, cycles_per_call: u32) -> Self {
            Self {
                pc: 0,
                sp: 0,
                script,
                cycles_per_call,
                irqs_raised: Vec::new(),
                halted: false,
            }
        }

        pub fn halt_after_script(mut self) -> Self {
            self.halted = true;
            self
        }

        pub fn irqs_raised(&self) -> &[u8] {
            &self.irqs_raised
        }
    }

    impl CpuCore for ScriptedCpuCore {
        fn reset(&mut self, _bus: &mut dyn Bus) {}

        fn execute(&mut self, bus: &mut dyn Bus, max_cycles: u32) -> u32 {
            if self.halted && self.script.is_empty() {
                return 0;
            }
            for op in self.script.drain(..) {
                match op {
                    Op::Write8(addr, v) => bus.write8(addr, v),
                    Op::Write16(addr, v) => bus.write16(addr, v),
                }
            }
            self.cycles_per_call.min(max_cycles)
        }

        fn get_reg(&self, reg: CpuRegister) -> u32 {
            match reg {
                CpuRegister::Pc => self.pc,
                CpuRegister::Sp => self.sp,
            }
        }

        fn set_reg(&mut self, reg: CpuRegister, value: u32) {
            match reg {
                CpuRegister::Pc => self.pc = value,
                CpuRegister::Sp => self.sp = value,
            }
        }

        fn raise_irq(&mut self, level: u8) {
            self.irqs_raised.push(level);
        }
    }
}
