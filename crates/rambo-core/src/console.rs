//! NES Console Implementation.
//!
//! The Console struct provides the high-level emulation API, driving the
//! CPU, PPU, APU, and mapper from a single PPU-cycle-granular master clock.

use crate::bus::{ControllerState, NesBus};
use rambo_cpu::Cpu;
use rambo_mappers::{Mapper, Rom, RomError, create_mapper};

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

/// NES emulation timing constants.
pub mod timing {
    /// Master clock frequency (NTSC).
    pub const MASTER_CLOCK_NTSC: u32 = 21_477_272;
    /// CPU clock frequency (NTSC).
    pub const CPU_CLOCK_NTSC: u32 = MASTER_CLOCK_NTSC / 12;
    /// PPU clock frequency (NTSC).
    pub const PPU_CLOCK_NTSC: u32 = MASTER_CLOCK_NTSC / 4;
    /// PPU dots per scanline.
    pub const PPU_DOTS_PER_SCANLINE: u16 = 341;
    /// Total scanlines (including vblank).
    pub const PPU_SCANLINES: u16 = 262;
    /// PPU dots per frame on the visible (non-skipped) frame.
    pub const PPU_DOTS_PER_FRAME: u32 = PPU_DOTS_PER_SCANLINE as u32 * PPU_SCANLINES as u32;
    /// Approximate CPU cycles per frame (NTSC average; odd frames are one
    /// dot shorter). `Console::step_frame` uses the PPU's own frame-complete
    /// signal rather than this fixed budget, but it remains useful for
    /// diagnostics and buffer sizing.
    pub const CPU_CYCLES_PER_FRAME: u32 = 29_780;
    /// Target frame rate (NTSC).
    pub const FRAME_RATE_NTSC: f64 = 60.0988;
}

/// Console construction/runtime error.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// ROM loading error.
    #[error("ROM error: {0}")]
    Rom(#[from] RomError),
    /// Invalid state for the requested operation.
    #[error("invalid console state: {0}")]
    InvalidState(String),
}

/// NES console emulator.
pub struct Console {
    /// 6502 CPU.
    cpu: Cpu,
    /// System bus (PPU, APU, mapper, RAM).
    bus: NesBus,
    /// Frame buffer (256x240 RGBA).
    framebuffer: Vec<u8>,
    /// Audio sample buffer.
    audio_buffer: Vec<f32>,
    /// Total CPU cycles executed.
    total_cycles: u64,
    /// Frame counter.
    frame_count: u64,
    /// Is emulation running?
    running: bool,
    /// Dots elapsed since the last CPU-aligned (every-3rd) cycle boundary.
    dot_phase: u8,
}

impl Console {
    /// Create a new console with the given ROM.
    ///
    /// # Errors
    ///
    /// Returns an error if the ROM cannot be loaded or uses an unsupported mapper.
    pub fn new(rom_data: &[u8]) -> Result<Self, ConsoleError> {
        let rom = Rom::load(rom_data)?;
        let mapper = create_mapper(&rom)?;
        Self::with_mapper(mapper)
    }

    /// Create a new console from ROM bytes (alias for `new`).
    ///
    /// # Errors
    ///
    /// Returns an error if the ROM cannot be loaded or uses an unsupported mapper.
    pub fn from_rom_bytes(rom_data: &[u8]) -> Result<Self, ConsoleError> {
        Self::new(rom_data)
    }

    /// Create a new console from ROM bytes with sample rate configuration.
    ///
    /// The sample rate is currently unused; the APU handles resampling
    /// internally at a fixed 44.1 kHz.
    ///
    /// # Errors
    ///
    /// Returns an error if the ROM cannot be loaded or uses an unsupported mapper.
    pub fn from_rom_bytes_with_sample_rate(
        rom_data: &[u8],
        _sample_rate: u32,
    ) -> Result<Self, ConsoleError> {
        Self::new(rom_data)
    }

    /// Create a console with a pre-created mapper.
    ///
    /// # Errors
    ///
    /// Returns an error if the console cannot be initialized.
    pub fn with_mapper(mapper: Box<dyn Mapper>) -> Result<Self, ConsoleError> {
        let mut bus = NesBus::new(mapper);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);

        Ok(Self {
            cpu,
            bus,
            framebuffer: vec![0; 256 * 240 * 4],
            audio_buffer: Vec::with_capacity(2048),
            total_cycles: 0,
            frame_count: 0,
            running: true,
            dot_phase: 0,
        })
    }

    /// Reset the console to initial state (RAM contents are preserved).
    pub fn reset(&mut self) {
        self.bus.reset();
        self.cpu.reset(&mut self.bus);
        self.total_cycles = 0;
        self.dot_phase = 0;
        self.running = true;
    }

    /// Power on the console (cold boot). RAM is freshly seeded since this
    /// replaces the bus entirely.
    pub fn power_on(&mut self) {
        self.reset();
    }

    /// Advance the master clock by exactly one PPU dot, running the
    /// 7-step per-dot orchestration:
    ///
    /// 1. PPU tick (always)
    /// 2. Interrupt line update (NMI edge from the PPU, IRQ level from APU/mapper)
    /// 3. DMC DMA arm check
    /// 4. OAM DMA byte-transfer consume
    /// 5. DMC DMA stall decrement/fetch
    /// 6. CPU microstep (only on the CPU-aligned dot)
    /// 7. APU tick (only on the CPU-aligned dot)
    ///
    /// Returns `true` if this dot completed a video frame.
    fn tick_dot(&mut self) -> bool {
        let (frame_complete, nmi) = self.bus.step_ppu_dot();
        if nmi {
            self.cpu.trigger_nmi();
        }

        self.dot_phase += 1;
        if self.dot_phase < 3 {
            return frame_complete;
        }
        self.dot_phase = 0;

        self.cpu.set_irq(self.bus.irq_line());

        if self.bus.apu.dmc_needs_sample() && self.bus.dmc_dma_may_arm() {
            self.bus.arm_dmc_dma();
        }

        if self.bus.dmc_dma_active() {
            self.bus.service_dmc_dma_cycle();
        } else if self.bus.oam_dma_active() {
            self.bus.service_oam_dma_cycle();
        } else {
            self.cpu.tick(&mut self.bus);
        }

        if let Some(sample) = self.bus.step_apu() {
            self.audio_buffer.push(sample);
        }
        self.bus.tick_cpu_cycle_bookkeeping();
        self.total_cycles += 1;

        frame_complete
    }

    /// Run emulation for one CPU instruction's worth of dots (at least one
    /// CPU-aligned cycle). Returns the number of CPU cycles executed.
    pub fn step(&mut self) -> u8 {
        if !self.running {
            return 0;
        }

        let cycles_before = self.total_cycles;
        loop {
            self.tick_dot();
            if self.total_cycles > cycles_before {
                break;
            }
        }
        (self.total_cycles - cycles_before) as u8
    }

    /// Run emulation for one full video frame.
    ///
    /// Returns the number of CPU cycles executed during the frame.
    pub fn step_frame(&mut self) -> u64 {
        let start_cycles = self.total_cycles;

        while self.running {
            if self.tick_dot() {
                break;
            }
        }

        self.update_framebuffer();
        self.frame_count += 1;

        self.total_cycles - start_cycles
    }

    /// Run emulation for one frame with cycle-accurate timing.
    ///
    /// This is an alias for `step_frame()` for API compatibility.
    pub fn step_frame_accurate(&mut self) -> u64 {
        self.step_frame()
    }

    /// Update the framebuffer from PPU output.
    fn update_framebuffer(&mut self) {
        let ppu_buffer = self.bus.ppu.frame_buffer();

        for (i, &palette_idx) in ppu_buffer.iter().enumerate() {
            let rgb = crate::palette::NES_PALETTE[palette_idx as usize & 0x3F];
            let offset = i * 4;
            self.framebuffer[offset] = rgb.0;
            self.framebuffer[offset + 1] = rgb.1;
            self.framebuffer[offset + 2] = rgb.2;
            self.framebuffer[offset + 3] = 255;
        }
    }

    /// Get the current framebuffer (256x240 RGBA).
    #[must_use]
    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    /// Take the audio buffer (drains accumulated samples).
    pub fn take_audio(&mut self) -> Vec<f32> {
        core::mem::take(&mut self.audio_buffer)
    }

    /// Get the audio buffer without draining.
    #[must_use]
    pub fn audio_buffer(&self) -> &[f32] {
        &self.audio_buffer
    }

    /// Get audio samples (alias for `audio_buffer`).
    #[must_use]
    pub fn audio_samples(&self) -> &[f32] {
        &self.audio_buffer
    }

    /// Clear the audio sample buffer.
    pub fn clear_audio_samples(&mut self) {
        self.audio_buffer.clear();
    }

    /// Set controller 1 state from button byte.
    pub fn set_controller_1(&mut self, buttons: u8) {
        self.bus.controller1 = ControllerState { buttons };
    }

    /// Set controller 2 state from button byte.
    pub fn set_controller_2(&mut self, buttons: u8) {
        self.bus.controller2 = ControllerState { buttons };
    }

    /// Set controller 1 state.
    pub fn set_controller1(&mut self, state: ControllerState) {
        self.bus.controller1 = state;
    }

    /// Set controller 2 state.
    pub fn set_controller2(&mut self, state: ControllerState) {
        self.bus.controller2 = state;
    }

    /// Get controller 1 state.
    #[must_use]
    pub fn controller1(&self) -> ControllerState {
        self.bus.controller1
    }

    /// Get controller 2 state.
    #[must_use]
    pub fn controller2(&self) -> ControllerState {
        self.bus.controller2
    }

    /// Get the total CPU cycles executed.
    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Get the frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Check if emulation is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Pause emulation.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Resume emulation.
    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Get a reference to the CPU for debugging.
    #[must_use]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Get a reference to the PPU for debugging.
    #[must_use]
    pub fn ppu(&self) -> &rambo_ppu::Ppu {
        &self.bus.ppu
    }

    /// Get a reference to the APU for debugging.
    #[must_use]
    pub fn apu(&self) -> &rambo_apu::Apu {
        &self.bus.apu
    }

    /// Peek at memory without side effects.
    #[must_use]
    pub fn peek_memory(&self, addr: u16) -> u8 {
        self.bus.peek(addr)
    }

    /// Get a reference to the bus for debugging.
    #[must_use]
    pub fn bus(&self) -> &NesBus {
        &self.bus
    }

    /// Get a mutable reference to the bus (e.g. to set `bus.region`).
    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.bus
    }

    /// Get the mapper number.
    #[must_use]
    pub fn mapper_number(&self) -> u16 {
        self.bus.mapper.mapper_number()
    }

    /// Get the mapper name.
    #[must_use]
    pub fn mapper_name(&self) -> &'static str {
        self.bus.mapper.mapper_name()
    }

    /// Check if the ROM has battery-backed RAM.
    #[must_use]
    pub fn has_battery(&self) -> bool {
        self.bus.mapper.has_battery()
    }

    /// Get battery-backed RAM for saving.
    #[must_use]
    pub fn battery_ram(&self) -> Option<&[u8]> {
        self.bus.mapper.battery_ram()
    }

    /// Load battery-backed RAM.
    pub fn load_battery_ram(&mut self, data: &[u8]) {
        self.bus.mapper.set_battery_ram(data);
    }
}
