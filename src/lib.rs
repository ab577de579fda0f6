//! Driver library for the Solomon Systech SSD1327 128x128 16-gray-level
//! OLED display controller.
//!
//! The controller packs two 4-bit pixels into each RAM byte, with the even
//! column in the low nibble. The driver keeps a [`Framebuffer`] staging
//! copy of that RAM: draw into the buffer (directly, or through the
//! `embedded-graphics` `DrawTarget` impl behind the default `graphics`
//! feature), then [`Display::flush`] or [`Display::flush_region`] uploads
//! it over the bus.
//!
//! The bus itself sits behind the [`DisplayInterface`] trait. The primary
//! transport is an 8080-style 8-bit parallel bus ([`ParallelInterface`]),
//! which distinguishes command from data bytes with a dedicated D/C line;
//! a 4-wire SPI transport ([`SpiInterface`]) carries the same framing.
//! Everything is blocking and single-threaded: the caller owns the
//! [`Display`] and each method returns only once its bus traffic is done.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod interface;
pub mod region;

// Re-exports for primary API.
pub use command::{
    consts, ColumnRemap, ComLayout, ComScanDirection, DisplayMode, IncrementAxis, NibbleRemap,
};
pub use config::ProductVariant;
pub use display::{Display, Display128x128, POWER_ON_SETTLE_MS};
pub use error::Error;
pub use framebuffer::{buffer_len, Framebuffer};
pub use interface::parallel::ParallelInterface;
pub use interface::spi::SpiInterface;
pub use interface::DisplayInterface;
pub use region::{AddressWindow, Region};
