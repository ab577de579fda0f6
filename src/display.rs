//! The main API to the display driver. It owns the bus interface and a
//! staging framebuffer, and provides the power-up sequence plus full-frame
//! and windowed uploads of the buffer into the controller's RAM.

use embedded_hal::delay::DelayNs;
use itertools::iproduct;

use crate::command::{Command, DisplayMode};
use crate::config::{startup_commands, ProductVariant};
use crate::error::Error;
use crate::framebuffer::{buffer_len, Framebuffer};
use crate::interface::DisplayInterface;
use crate::region::Region;

/// Time to wait after releasing sleep mode before the charge pump output is
/// stable enough for the panel to be configured and driven.
pub const POWER_ON_SETTLE_MS: u32 = 100;

/// A driver for one display module of `W` x `H` pixels.
///
/// The driver owns its bus interface and a [`Framebuffer`] staging copy of
/// the display RAM. Drawing happens locally in the buffer; nothing reaches
/// the panel until [`flush`](Display::flush) or
/// [`flush_region`](Display::flush_region) uploads it. All methods block
/// until their bus traffic has completed, and the driver holds no state
/// beyond the buffer, so it can live wherever the caller keeps it.
pub struct Display<DI, const W: usize, const H: usize, const N: usize>
where
    DI: DisplayInterface,
{
    iface: DI,
    frame: Framebuffer<W, H, N>,
    variant: ProductVariant,
}

/// The driver at the controller's full RAM size, which the supported
/// modules all use.
pub type Display128x128<DI> = Display<DI, 128, 128, { buffer_len(128, 128) }>;

impl<DI, const W: usize, const H: usize, const N: usize> Display<DI, W, H, N>
where
    DI: DisplayInterface,
{
    /// Construct a driver for the display module `variant`, connected on
    /// `iface`. The display is left untouched until [`init`](Display::init)
    /// runs the power-up sequence.
    pub fn new(iface: DI, variant: ProductVariant) -> Self {
        Display {
            iface,
            frame: Framebuffer::new(),
            variant,
        }
    }

    /// Run the power-up sequence: release sleep mode, wait out the charge
    /// pump settle time, select normal (RAM-driven) output, and apply the
    /// variant's remap commands.
    ///
    /// When no remap table entry covers the variant this returns
    /// `Error::UnsupportedVariant` after the common sequence has been sent;
    /// the panel is lit and usable, but its orientation is whatever the
    /// chip reset to.
    pub fn init<D>(&mut self, delay: &mut D) -> Result<(), Error>
    where
        D: DelayNs,
    {
        Command::SetSleepMode(false).send(&mut self.iface)?;
        delay.delay_ms(POWER_ON_SETTLE_MS);
        Command::SetDisplayMode(DisplayMode::Normal).send(&mut self.iface)?;
        let Some(commands) = startup_commands(self.variant) else {
            return Err(Error::UnsupportedVariant);
        };
        for command in commands {
            command.send(&mut self.iface)?;
        }
        Ok(())
    }

    /// Set one staged pixel to a gray level (masked to 4 bits). Takes
    /// effect on the panel at the next flush.
    pub fn set_pixel(&mut self, x: u8, y: u8, level: u8) -> Result<(), Error> {
        self.frame.set_pixel(x, y, level)
    }

    /// The staged gray level at `(x, y)`, or `None` outside the display
    /// area. This reads the local buffer; the bus has no read-back path.
    pub fn pixel(&self, x: u8, y: u8) -> Option<u8> {
        self.frame.pixel(x, y)
    }

    pub const fn width(&self) -> u8 {
        W as u8
    }

    pub const fn height(&self) -> u8 {
        H as u8
    }

    /// The staging buffer, for bulk inspection.
    pub fn frame(&self) -> &Framebuffer<W, H, N> {
        &self.frame
    }

    /// The staging buffer, for drawing code that wants more than single
    /// pixel writes (with the `graphics` feature this is a
    /// `DrawTarget`).
    pub fn frame_mut(&mut self) -> &mut Framebuffer<W, H, N> {
        &mut self.frame
    }

    /// Upload the whole staging buffer into the display RAM: reset the
    /// address window to the full frame, then stream every packed byte in
    /// row-major order.
    pub fn flush(&mut self) -> Result<(), Error> {
        let window = Region::new(0, 0, W as u8 - 1, H as u8 - 1).address_window(W as u8, H as u8)?;
        Command::SetColumnAddress(window.col_start, window.col_stop).send(&mut self.iface)?;
        Command::SetRowAddress(window.row_start, window.row_stop).send(&mut self.iface)?;
        self.iface.send_data(self.frame.as_bytes())
    }

    /// Upload only the packed bytes covering `region`, top-to-bottom and
    /// left-to-right within each row. Cheaper than [`flush`](Display::flush)
    /// when a small area changed; note that odd region edges widen to the
    /// containing packed byte, refreshing up to one extra pixel column on
    /// either side.
    ///
    /// An invalid region fails with `Error::OutOfBounds` before anything is
    /// put on the bus.
    pub fn flush_region(&mut self, region: Region) -> Result<(), Error> {
        let window = region.address_window(W as u8, H as u8)?;
        Command::SetColumnAddress(window.col_start, window.col_stop).send(&mut self.iface)?;
        Command::SetRowAddress(window.row_start, window.row_stop).send(&mut self.iface)?;

        let Self { iface, frame, .. } = self;
        let raw = frame.as_bytes();
        let mut bytes = iproduct!(
            window.row_start..=window.row_stop,
            window.col_start..=window.col_stop
        )
        .map(|(row, col)| raw[col as usize + row as usize * (W / 2)]);

        // Paint the window in constant memory by alternately filling a
        // chunk buffer from the iterator and writing it to the display.
        let mut buf = [0u8; 32];
        loop {
            let mut chunk_len = 0;
            for slot in buf.iter_mut() {
                match bytes.next() {
                    Some(byte) => {
                        *slot = byte;
                        chunk_len += 1;
                    }
                    None => break,
                }
            }
            if chunk_len > 0 {
                iface.send_data(&buf[..chunk_len])?;
            }
            // A short chunk means the window has been painted in full.
            if chunk_len != buf.len() {
                return Ok(());
            }
        }
    }

    /// Blank the display: zero the staging buffer and flush it.
    pub fn clear(&mut self) -> Result<(), Error> {
        self.frame.clear();
        self.flush()
    }

    /// Set the output drive contrast (256 steps).
    pub fn set_contrast(&mut self, value: u8) -> Result<(), Error> {
        Command::SetContrast(value).send(&mut self.iface)
    }
}
