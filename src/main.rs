mod cpu_adapter;
mod display;
mod frame;
mod host;
mod input;
mod machine;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use cpu_adapter::R68kCore;
use display::{DisplaySink, FrameBuffer, NullDisplaySink};
use frame::{FixedCadenceTimer, FrameDriver, InputSource};
use host::MinifbHost;
use machine::Machine;

/// TI Voyage 200 / TI-89 flash-image emulator.
#[derive(Parser, Debug)]
#[command(name = "v200", about = "Run a v2u flash image on an emulated Voyage 200")]
struct Cli {
    /// Path to the v2u ROM image.
    rom: PathBuf,

    /// Override the number of frames to run, then exit (0 = run forever).
    #[arg(long, default_value_t = 0)]
    frames: u64,

    /// Run without opening a display window; implies a finite --frames.
    #[arg(long)]
    headless: bool,

    /// Integer scale factor for the host window (display only, no effect headless).
    #[arg(long, default_value_t = 2)]
    scale: u32,

    /// Write screen.pbm / memory.bin / flash.bin on clean exit.
    #[arg(long)]
    dump_on_exit: bool,
}

/// Headless host: no window, no real input, runs for a fixed frame count.
struct HeadlessHost {
    display: NullDisplaySink,
}

impl DisplaySink for HeadlessHost {
    fn present(&mut self, frame: &FrameBuffer) {
        self.display.present(frame);
    }
}

impl InputSource for HeadlessHost {
    fn poll(&mut self, _deadline: std::time::Instant) -> Vec<display::KeyEvent> {
        Vec::new()
    }

    fn close_requested(&self) -> bool {
        false
    }
}

fn load_rom(path: &PathBuf) -> Result<Vec<u8>, String> {
    std::fs::read(path).map_err(|e| format!("{}: {e}", path.display()))
}

fn dump_diagnostics(machine: &Machine) -> Result<(), String> {
    let frame = display::FrameBuffer::from_ram(machine.ram.framebuffer());
    std::fs::write("screen.pbm", frame.to_pbm()).map_err(|e| format!("dump_screen: {e}"))?;
    std::fs::write("memory.bin", machine.ram.as_slice()).map_err(|e| format!("dump_memory: {e}"))?;
    std::fs::write("flash.bin", machine.flash.as_slice()).map_err(|e| format!("dump_flash: {e}"))?;
    log::info!("wrote screen.pbm, memory.bin, flash.bin");
    Ok(())
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();

    let rom_data = load_rom(&cli.rom)?;
    let mut machine = Machine::new();
    machine.load_rom(&rom_data)?;

    let mut core = R68kCore::new();
    machine.reset_cpu(&mut core);
    log::info!("loaded {}", cli.rom.display());

    let timer = FixedCadenceTimer { period: 31 };

    if cli.headless {
        let host = HeadlessHost {
            display: NullDisplaySink,
        };
        let mut driver = FrameDriver::new(machine, core, host, timer);
        let ran = if cli.frames == 0 {
            driver.run_for(1)
        } else {
            driver.run_for(cli.frames)
        };
        log::info!("ran {ran} frames headless");
        if cli.dump_on_exit {
            dump_diagnostics(driver.machine())?;
        }
    } else {
        let host = MinifbHost::new("v200", cli.scale as usize).map_err(|e| format!("display init: {e}"))?;
        let mut driver = FrameDriver::new(machine, core, host, timer);
        let ran = if cli.frames == 0 {
            driver.run()
        } else {
            driver.run_for(cli.frames)
        };
        log::info!("ran {ran} frames");
        if cli.dump_on_exit {
            dump_diagnostics(driver.machine())?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
