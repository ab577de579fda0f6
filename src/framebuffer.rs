//! In-memory staging buffer for the display RAM, packed two pixels per byte.

use crate::error::Error;

/// Smallest display dimension the controller family is built for.
pub const MIN_DIMENSION: usize = 16;
/// Largest display dimension the controller RAM covers.
pub const MAX_DIMENSION: usize = 128;

/// Length in bytes of a packed framebuffer for a `width` x `height` display.
pub const fn buffer_len(width: usize, height: usize) -> usize {
    width * height / 2
}

/// A `W` x `H` pixel staging buffer in the display RAM layout: row-major
/// packed bytes, each byte covering two horizontally-adjacent 4-bit pixels.
/// The even-x pixel lives in bits [3:0] and the odd-x pixel in bits [7:4],
/// so the byte for `(x, y)` sits at index `x/2 + y*(W/2)`.
///
/// `N` must equal [`buffer_len`]`(W, H)`, and the dimensions must be even
/// values within `16..=128`. Violations are rejected when a buffer is first
/// instantiated, at compile time, not at run time.
pub struct Framebuffer<const W: usize, const H: usize, const N: usize> {
    buf: [u8; N],
}

impl<const W: usize, const H: usize, const N: usize> Framebuffer<W, H, N> {
    /// Create a buffer with every pixel at gray level 0.
    pub fn new() -> Self {
        const {
            assert!(
                W >= MIN_DIMENSION && W <= MAX_DIMENSION,
                "width must be within 16..=128"
            );
            assert!(
                H >= MIN_DIMENSION && H <= MAX_DIMENSION,
                "height must be within 16..=128"
            );
            assert!(W % 2 == 0, "width must cover whole packed bytes");
            assert!(
                N == buffer_len(W, H),
                "buffer length must be width * height / 2"
            );
        }
        Framebuffer { buf: [0; N] }
    }

    pub const fn width(&self) -> u8 {
        W as u8
    }

    pub const fn height(&self) -> u8 {
        H as u8
    }

    /// Set the pixel at `(x, y)` to a gray level, which is masked to its
    /// low four bits. Modifies only the addressed nibble; the neighboring
    /// pixel sharing the byte is untouched. Fails with `Error::OutOfBounds`
    /// (leaving the buffer as it was) when the coordinate is outside the
    /// display area.
    pub fn set_pixel(&mut self, x: u8, y: u8, level: u8) -> Result<(), Error> {
        if x as usize >= W || y as usize >= H {
            return Err(Error::OutOfBounds);
        }
        let index = Self::index(x, y);
        let level = level & 0x0F;
        self.buf[index] = if x % 2 == 1 {
            (level << 4) | (self.buf[index] & 0x0F)
        } else {
            level | (self.buf[index] & 0xF0)
        };
        Ok(())
    }

    /// The gray level stored for `(x, y)`, or `None` outside the display
    /// area.
    pub fn pixel(&self, x: u8, y: u8) -> Option<u8> {
        if x as usize >= W || y as usize >= H {
            return None;
        }
        let byte = self.buf[Self::index(x, y)];
        Some(if x % 2 == 1 { byte >> 4 } else { byte & 0x0F })
    }

    /// Reset every pixel to gray level 0.
    pub fn clear(&mut self) {
        self.buf.fill(0);
    }

    /// The packed bytes in display RAM order. Sub-ranges by slicing; the
    /// view is read-only and tied to the buffer's borrow.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    fn index(x: u8, y: u8) -> usize {
        x as usize / 2 + y as usize * (W / 2)
    }
}

impl<const W: usize, const H: usize, const N: usize> Default for Framebuffer<W, H, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "graphics")]
mod graphics {
    //! The buffer as an embedded-graphics draw target, so external drawing
    //! code consumes the pixel surface and its dimensions without knowing
    //! the packing.

    use embedded_graphics_core::draw_target::DrawTarget;
    use embedded_graphics_core::geometry::{OriginDimensions, Size};
    use embedded_graphics_core::pixelcolor::{Gray4, GrayColor};
    use embedded_graphics_core::Pixel;

    use super::Framebuffer;

    impl<const W: usize, const H: usize, const N: usize> OriginDimensions for Framebuffer<W, H, N> {
        fn size(&self) -> Size {
            Size::new(W as u32, H as u32)
        }
    }

    impl<const W: usize, const H: usize, const N: usize> DrawTarget for Framebuffer<W, H, N> {
        type Color = Gray4;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                // Pixels outside the area are dropped, per the DrawTarget
                // contract.
                if point.x >= 0
                    && point.y >= 0
                    && (point.x as usize) < W
                    && (point.y as usize) < H
                {
                    let _ = self.set_pixel(point.x as u8, point.y as u8, color.luma());
                }
            }
            Ok(())
        }

        fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
            let level = color.luma() & 0x0F;
            self.buf.fill((level << 4) | level);
            Ok(())
        }
    }
}
