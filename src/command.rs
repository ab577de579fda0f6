//! The command set for the SSD1327.
//!
//! Note 1: The display RAM of the SSD1327 is arranged in 128 rows and 64
//! columns, where each column is one byte covering 2 adjacent pixels in the
//! row at 4 bits/16 intensity levels each, for a total max resolution of
//! 128x128. Thus, anywhere there is a "column" address, these refer to
//! horizontal packed pairs of pixels, not to individual pixels.
//!
//! Note 2: Unlike driver chips that take their command arguments in data
//! mode, the SSD1327 expects every argument byte with the data/command line
//! still in command mode. Data mode is reserved for display RAM image
//! writes, which need no opcode at all: bytes sent in data mode always land
//! at the current RAM address pointer.

use crate::error::Error;
use crate::interface::DisplayInterface;

/// Geometry of the controller's display RAM.
pub mod consts {
    pub const NUM_PIXEL_COLS: u8 = 128;
    pub const NUM_PIXEL_ROWS: u8 = 128;
    pub const NUM_BUF_COLS: u8 = NUM_PIXEL_COLS / 2;
    pub const PIXEL_COL_MAX: u8 = NUM_PIXEL_COLS - 1;
    pub const PIXEL_ROW_MAX: u8 = NUM_PIXEL_ROWS - 1;
    pub const BUF_COL_MAX: u8 = NUM_BUF_COLS - 1;
}

use self::consts::*;

/// The address increment orientation when writing image data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IncrementAxis {
    /// The column address will increment as image data is written, writing
    /// packed pixel pairs from left to right in the range set by
    /// `SetColumnAddress`, and then top to bottom in the range set by
    /// `SetRowAddress`.
    Horizontal,
    /// The row address will increment as image data is written, writing
    /// (still *horizontal*) packed pixel pairs from top to bottom first.
    Vertical,
}

/// Setting of column address remapping. Changing this setting will flip the
/// image horizontally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColumnRemap {
    /// Column addresses 0->63 map to segments 0,1->126,127.
    Forward,
    /// Column addresses 0->63 map to segments 126,127->0,1. The two pixels
    /// within each column keep their order; `NibbleRemap` controls that.
    Reverse,
}

/// Setting of data nibble remapping, i.e. which of a byte's two pixels is
/// the left one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NibbleRemap {
    /// A RAM byte 0xAB maps (in L->R order) to pixels B,A: the low nibble
    /// is the even (left) pixel. Matches the framebuffer packing rule.
    Forward,
    /// A RAM byte 0xAB maps (in L->R order) to pixels A,B.
    Reverse,
}

/// Setting of the COM line scanning of rows. Changing this setting will
/// flip the image vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComScanDirection {
    /// COM lines scan row addresses top to bottom, so that row address 0 is
    /// the first row of the display.
    RowZeroFirst,
    /// COM lines scan row addresses bottom to top, so that row address 0 is
    /// the last row of the display.
    RowZeroLast,
}

/// Setting the layout of the COM lines to the display rows. This setting is
/// dictated by how the display module itself wires the OLED matrix to the
/// driver chip, and changing it to anything other than the correct setting
/// for your module will yield a corrupted image. See the display module
/// datasheet for the correct value to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComLayout {
    /// COM lines are connected to display rows in a progressive
    /// arrangement, so that COM lines 0->127 map to display rows 0->127.
    Progressive,
    /// Odd and even COM lines are split between the two sides of the
    /// matrix, the arrangement most 128x128 modules wire.
    SplitOddEven,
}

/// Setting of the display operating mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// The display operates normally, showing the image in the display RAM.
    Normal,
    /// The display is blanked with all pixels turned ON (to grayscale level
    /// 15), regardless of the display RAM contents.
    BlankBright,
    /// The display is blanked with all pixels turned OFF (to grayscale
    /// level 0), regardless of the display RAM contents.
    BlankDark,
    /// The display shows the image in the display RAM with the grayscale
    /// levels inverted (level 0->15, 1->14, ..., 15->0).
    Inverse,
}

/// Commands the driver sends, each one opcode byte plus zero to two
/// argument bytes (all in command mode, see Note 2).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Set the column start and end address range when writing to the
    /// display RAM. The column address pointer is reset to the start column
    /// address such that following data writes will begin there. Range is
    /// 0-63. (Note 1)
    SetColumnAddress(u8, u8),
    /// Set the row start and end address range when writing to the display
    /// RAM. The row address pointer is reset to the start row address such
    /// that following data writes will begin there. Range is 0-127.
    SetRowAddress(u8, u8),
    /// Set the contrast current. Range 0-255.
    SetContrast(u8),
    /// Set the direction of display address increment, column address
    /// remapping, data nibble remapping, COM scan direction, and COM line
    /// layout. See documentation for each enum for details.
    SetRemapping(
        IncrementAxis,
        ColumnRemap,
        NibbleRemap,
        ComScanDirection,
        ComLayout,
    ),
    /// Set the display start line, rolling the displayed image upwards by
    /// the given number of rows. Range is 0-127.
    SetStartLine(u8),
    /// Set the display operating mode. See enum for details.
    SetDisplayMode(DisplayMode),
    /// Control sleep mode. Sleeping switches the matrix drive off; display
    /// RAM and register contents survive.
    SetSleepMode(bool),
}

impl Command {
    /// Transmit the command encoded by `self` to the display.
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error>
    where
        DI: DisplayInterface,
    {
        let (bytes, len): ([u8; 3], usize) = match self {
            Command::SetColumnAddress(start, end) => match (start, end) {
                (0..=BUF_COL_MAX, 0..=BUF_COL_MAX) => ([0x15, start, end], 3),
                _ => return Err(Error::OutOfBounds),
            },
            Command::SetRowAddress(start, end) => match (start, end) {
                (0..=PIXEL_ROW_MAX, 0..=PIXEL_ROW_MAX) => ([0x75, start, end], 3),
                _ => return Err(Error::OutOfBounds),
            },
            Command::SetContrast(current) => ([0x81, current, 0], 2),
            Command::SetRemapping(
                increment_axis,
                column_remap,
                nibble_remap,
                com_scan_direction,
                com_layout,
            ) => {
                let ia = match increment_axis {
                    IncrementAxis::Horizontal => 0x00,
                    IncrementAxis::Vertical => 0x04,
                };
                let cr = match column_remap {
                    ColumnRemap::Forward => 0x00,
                    ColumnRemap::Reverse => 0x01,
                };
                let nr = match nibble_remap {
                    NibbleRemap::Forward => 0x00,
                    NibbleRemap::Reverse => 0x02,
                };
                let csd = match com_scan_direction {
                    ComScanDirection::RowZeroFirst => 0x00,
                    ComScanDirection::RowZeroLast => 0x10,
                };
                let cl = match com_layout {
                    ComLayout::Progressive => 0x00,
                    ComLayout::SplitOddEven => 0x40,
                };
                ([0xA0, ia | cr | nr | csd | cl, 0], 2)
            }
            Command::SetStartLine(line) => match line {
                0..=PIXEL_ROW_MAX => ([0xA1, line, 0], 2),
                _ => return Err(Error::OutOfBounds),
            },
            Command::SetDisplayMode(mode) => (
                [
                    match mode {
                        DisplayMode::Normal => 0xA4,
                        DisplayMode::BlankBright => 0xA5,
                        DisplayMode::BlankDark => 0xA6,
                        DisplayMode::Inverse => 0xA7,
                    },
                    0,
                    0,
                ],
                1,
            ),
            Command::SetSleepMode(ena) => (
                [
                    match ena {
                        true => 0xAE,
                        false => 0xAF,
                    },
                    0,
                    0,
                ],
                1,
            ),
        };
        for byte in &bytes[..len] {
            iface.send_command(*byte)?;
        }
        Ok(())
    }
}
