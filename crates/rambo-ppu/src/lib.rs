//! NES 2C02 PPU (Picture Processing Unit) emulation.
//!
//! This crate provides a cycle-accurate implementation of the NES PPU,
//! responsible for all graphics rendering.
//!
//! # Overview
//!
//! The PPU operates at 3x the CPU clock rate and generates a 256x240 pixel
//! image. It consists of several subsystems:
//!
//! - **Registers**: Control, Mask, Status, OAM Address, Scroll, Address, Data
//! - **Background rendering**: Nametables, pattern tables, attribute tables
//! - **Sprite rendering**: OAM, sprite evaluation, sprite 0 hit detection
//! - **Palette**: 32-byte palette RAM with mirroring
//! - **VBlank ledger**: resolves the same-cycle PPUSTATUS read race
//!
//! # Timing
//!
//! NTSC timing (the primary target):
//! - Master clock: 21.477272 MHz
//! - PPU clock: 5.369318 MHz (master / 4)
//! - 341 dots per scanline
//! - 262 scanlines per frame
//! - 89,341-89,342 dots per frame (odd frame skip)
//!
//! # Usage
//!
//! ```no_run
//! use rambo_ppu::{Mirroring, Ppu, PpuBus};
//!
//! // Implement PpuBus for your memory system
//! struct MyBus;
//!
//! impl PpuBus for MyBus {
//!     fn read(&mut self, _addr: u16) -> u8 {
//!         0
//!     }
//!
//!     fn write(&mut self, _addr: u16, _value: u8) {}
//! }
//!
//! let mut ppu = Ppu::new(Mirroring::Horizontal);
//! let mut bus = MyBus;
//!
//! // Step the PPU one dot at a time (call 3 times per CPU cycle for NTSC)
//! let (_frame_complete, nmi) = ppu.step(&mut bus);
//! if nmi {
//!     // Trigger NMI in CPU
//! }
//!
//! // Access registers from CPU
//! ppu.write_register(0x2000, 0x80, &mut bus); // Enable NMI
//! let _status = ppu.read_register(0x2002, &mut bus);
//! ```
//!
//! # Features
//!
//! - `serde`: Enable serialization support for save states

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod background;
mod oam;
mod ppu;
mod registers;
mod scroll;
mod sprites;
mod timing;
mod vblank_ledger;
mod vram;

pub use ppu::{FRAME_HEIGHT, FRAME_SIZE, FRAME_WIDTH, Ppu, PpuBus};
pub use registers::{PpuCtrl, PpuMask, PpuStatus};
pub use sprites::{SpriteEvaluator, SpriteRenderer};
pub use timing::Timing;
pub use vblank_ledger::VBlankLedger;
pub use vram::Mirroring;
