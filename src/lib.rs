//! Driver library for the Raydium RM690B0 AMOLED display controller, spoken to over its
//! QSPI-framed command protocol.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(test)]
#[macro_use]
extern crate std;

extern crate embedded_hal as hal;

// Declared first so the test macros are visible to the modules below.
#[macro_use]
pub mod interface;

pub mod color;
pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod init;
pub mod panel;

// Re-exports for primary API.
pub use color::{ColorDepth, RawColor};
pub use config::Config;
pub use display::image::ImageSource;
pub use display::{Display, PixelCoord};
pub use error::Error;
pub use interface::spi::SpiInterface;
pub use interface::DisplayInterface;
pub use panel::Panel;
