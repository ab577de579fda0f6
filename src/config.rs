//! Per-product startup configuration.
//!
//! Display modules built around the same controller differ in how the driver
//! ribbon is bonded to the glass: some mirror the column order, some scan the
//! COM rows bottom-up, and the interleaved COM routing means nearly all of
//! them need the odd/even split enabled. Each supported module gets a row in
//! a table of remap commands; [`Display::init`](crate::display::Display::init)
//! looks its variant up there and replays the commands after the panel wakes.

use crate::command::{
    ColumnRemap, ComLayout, ComScanDirection, Command, IncrementAxis, NibbleRemap,
};

/// A display module (panel + bonded driver glass) this crate knows how to
/// configure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProductVariant {
    /// Raystar REX128128B series, 128x128.
    RaystarRex128128B,
    /// Waveshare 1.5 inch grayscale module, 128x128.
    Waveshare1in5,
}

/// Remap and start-line commands each variant needs on top of the common
/// power-up sequence, in send order.
static VARIANT_STARTUP: &[(ProductVariant, &[Command])] = &[
    (
        ProductVariant::RaystarRex128128B,
        &[
            Command::SetRemapping(
                IncrementAxis::Horizontal,
                ColumnRemap::Forward,
                NibbleRemap::Forward,
                ComScanDirection::RowZeroFirst,
                ComLayout::SplitOddEven,
            ),
            Command::SetStartLine(0),
        ],
    ),
    (
        ProductVariant::Waveshare1in5,
        &[
            Command::SetRemapping(
                IncrementAxis::Horizontal,
                ColumnRemap::Reverse,
                NibbleRemap::Forward,
                ComScanDirection::RowZeroLast,
                ComLayout::SplitOddEven,
            ),
            Command::SetStartLine(0),
        ],
    ),
];

/// The startup commands for a variant, or `None` when no table row covers
/// it.
pub fn startup_commands(variant: ProductVariant) -> Option<&'static [Command]> {
    VARIANT_STARTUP
        .iter()
        .find(|(candidate, _)| *candidate == variant)
        .map(|(_, commands)| *commands)
}
