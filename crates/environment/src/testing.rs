//! Deterministic stand-in for an emulation core.
//!
//! RAM layout used by the tests:
//! - `0x00` low byte of the tick counter
//! - `0x02` ticks spent with player A fire held
//! - `0x03` ticks spent with the console reset switch held
//! - `0x04` ticks spent with player A up held
//!
//! Everything else stays as poked by the test. Bytes registered with
//! [`ToyCore::hold`] are rewritten on every tick and survive resets.

use ale_core::archive::{ArchiveError, ArchiveReader, ArchiveWriter};
use ale_core::input::{AnalogInput, DigitalInput};
use ale_core::{EmulationCore, MemoryView};

pub const TOY_MD5: &str = "0123456789abcdef0123456789abcdef";
pub const TOY_HEIGHT: usize = 4;
pub const TOY_WIDTH: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum ToyError {
    #[error("corrupt toy state: {0}")]
    Archive(#[from] ArchiveError),
    #[error("toy RAM image has {0} bytes")]
    RamSize(usize),
}

#[derive(Debug, Clone)]
pub struct ToyCore {
    md5: String,
    ram: [u8; 128],
    frame: Vec<u8>,
    ticks: u64,
    paddles: bool,
    pub swapped: bool,
    pub reset_count: u32,
    digital: DigitalInput,
    analog: AnalogInput,
    pub digital_log: Vec<DigitalInput>,
    pub analog_log: Vec<AnalogInput>,
    held: Vec<(u8, u8)>,
}

impl ToyCore {
    pub fn new() -> Self {
        Self {
            md5: TOY_MD5.to_string(),
            ram: [0; 128],
            frame: vec![0; TOY_HEIGHT * TOY_WIDTH],
            ticks: 0,
            paddles: false,
            swapped: false,
            reset_count: 0,
            digital: DigitalInput::default(),
            analog: AnalogInput::default(),
            digital_log: Vec::new(),
            analog_log: Vec::new(),
            held: Vec::new(),
        }
    }

    pub fn with_paddles() -> Self {
        Self {
            paddles: true,
            ..Self::new()
        }
    }

    pub fn with_md5(md5: &str) -> Self {
        Self {
            md5: md5.to_string(),
            ..Self::new()
        }
    }

    /// Write a RAM byte, `offset` relative to 0x80.
    pub fn poke(&mut self, offset: u8, value: u8) {
        self.ram[usize::from(offset & 0x7F)] = value;
    }

    /// Keep a RAM byte at `value` from the next tick on.
    pub fn hold(&mut self, offset: u8, value: u8) {
        self.held.push((offset, value));
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn tick(&mut self) {
        self.ticks += 1;
        self.ram[0] = self.ticks as u8;
        let (fire, up, reset) = if self.paddles {
            (self.analog.left_fire, false, self.analog.switches.reset)
        } else {
            (
                self.digital.player_a.fire,
                self.digital.player_a.up,
                self.digital.switches.reset,
            )
        };
        if fire {
            self.ram[2] = self.ram[2].wrapping_add(1);
        }
        if reset {
            self.ram[3] = self.ram[3].wrapping_add(1);
        }
        if up {
            self.ram[4] = self.ram[4].wrapping_add(1);
        }
        for &(offset, value) in &self.held {
            self.ram[usize::from(offset & 0x7F)] = value;
        }
        for (i, pixel) in self.frame.iter_mut().enumerate() {
            *pixel = ((self.ticks as usize + i) * 2 % 256) as u8;
        }
    }
}

impl MemoryView for ToyCore {
    fn peek(&self, address: u16) -> u8 {
        self.ram[usize::from(address & 0x7F)]
    }
}

impl EmulationCore for ToyCore {
    type Error = ToyError;

    fn reset(&mut self) {
        self.ram = [0; 128];
        self.ticks = 0;
        self.frame.iter_mut().for_each(|p| *p = 0);
        self.reset_count += 1;
    }

    fn advance(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    fn framebuffer(&self) -> &[u8] {
        &self.frame
    }

    fn screen_height(&self) -> usize {
        TOY_HEIGHT
    }

    fn screen_width(&self) -> usize {
        TOY_WIDTH
    }

    fn capture_state(&self) -> Vec<u8> {
        let mut out = ArchiveWriter::new();
        out.write(&self.ticks)
            .write_bytes(&self.ram)
            .write_bytes(&self.frame);
        out.into_bytes()
    }

    fn restore_state(&mut self, blob: &[u8]) -> Result<(), ToyError> {
        let mut input = ArchiveReader::new(blob);
        let ticks = input.read()?;
        let ram = input.read_bytes()?;
        let frame = input.read_bytes()?;
        self.ram = ram
            .as_slice()
            .try_into()
            .map_err(|_| ToyError::RamSize(ram.len()))?;
        self.ticks = ticks;
        self.frame = frame;
        Ok(())
    }

    fn cartridge_md5(&self) -> &str {
        &self.md5
    }

    fn set_digital_input(&mut self, input: &DigitalInput) {
        self.digital = *input;
        self.digital_log.push(*input);
    }

    fn set_analog_input(&mut self, input: &AnalogInput) {
        self.analog = *input;
        self.analog_log.push(*input);
    }

    fn uses_paddles(&self) -> bool {
        self.paddles
    }

    fn swap_ports(&mut self) {
        self.swapped = !self.swapped;
    }
}
