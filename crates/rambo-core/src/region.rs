//! TV timing region configuration.
//!
//! There is no config file or CLI layer in this crate; callers construct a
//! [`Console`](crate::Console) and set `console.bus_mut().region` directly.
//! Region currently governs the NTSC-only DMC DMA bus-corruption quirk; the
//! differing CPU:PPU clock ratio and APU period tables PAL hardware also
//! needs are out of scope for now (see `DESIGN.md`).

/// NES television standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    /// NTSC (60 Hz, 3 PPU dots per CPU cycle).
    #[default]
    Ntsc,
    /// PAL (50 Hz).
    Pal,
}
