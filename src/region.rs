//! Rectangular pixel regions and their translation to controller addressing.

use crate::error::Error;

/// A rectangular region of the display area, in pixel coordinates with both
/// bounds inclusive: the region `(0, 0, 1, 1)` covers four pixels.
///
/// The controller addresses columns as packed two-pixel bytes, so a region
/// is only byte-exact horizontally when `x_start` is even and `x_stop` is
/// odd. Odd edges are widened to the containing byte by
/// [`Region::address_window`]; they are never rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Region {
    pub x_start: u8,
    pub y_start: u8,
    pub x_stop: u8,
    pub y_stop: u8,
}

impl Region {
    pub const fn new(x_start: u8, y_start: u8, x_stop: u8, y_stop: u8) -> Self {
        Region {
            x_start,
            y_start,
            x_stop,
            y_stop,
        }
    }

    /// Translate the region into the column/row window the controller
    /// addresses, for a display of the given dimensions.
    ///
    /// Column addresses count packed two-pixel bytes, so the x coordinates
    /// are halved (rounding toward zero on both edges, which widens odd
    /// edges to their full byte); row addresses map one to one. Fails with
    /// `Error::OutOfBounds`, rather than clamping, when any coordinate
    /// reaches past the display area or the bounds are unordered.
    pub fn address_window(self, width: u8, height: u8) -> Result<AddressWindow, Error> {
        if false
            || self.x_start >= width
            || self.y_start >= height
            || self.x_stop >= width
            || self.y_stop >= height
            || self.x_start > self.x_stop
            || self.y_start > self.y_stop
        {
            return Err(Error::OutOfBounds);
        }
        Ok(AddressWindow {
            col_start: self.x_start / 2,
            col_stop: self.x_stop / 2,
            row_start: self.y_start,
            row_stop: self.y_stop,
        })
    }
}

/// Column and row address ranges selecting a window of display RAM, in the
/// controller's units: packed-byte columns, pixel rows, bounds inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressWindow {
    pub col_start: u8,
    pub col_stop: u8,
    pub row_start: u8,
    pub row_stop: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_frame_window() {
        let window = Region::new(0, 0, 127, 127).address_window(128, 128).unwrap();
        assert_eq!(
            window,
            AddressWindow {
                col_start: 0,
                col_stop: 63,
                row_start: 0,
                row_stop: 127,
            }
        );
    }

    #[test]
    fn columns_are_halved_rows_pass_through() {
        let window = Region::new(2, 10, 9, 11).address_window(128, 128).unwrap();
        assert_eq!(
            window,
            AddressWindow {
                col_start: 1,
                col_stop: 4,
                row_start: 10,
                row_stop: 11,
            }
        );
    }

    #[test]
    fn odd_edges_widen_to_the_containing_byte() {
        let window = Region::new(1, 0, 5, 0).address_window(128, 128).unwrap();
        assert_eq!(window.col_start, 0);
        assert_eq!(window.col_stop, 2);
    }

    #[test]
    fn single_pixel_region() {
        let window = Region::new(7, 3, 7, 3).address_window(128, 128).unwrap();
        assert_eq!(
            window,
            AddressWindow {
                col_start: 3,
                col_stop: 3,
                row_start: 3,
                row_stop: 3,
            }
        );
    }

    #[test]
    fn coordinates_past_the_display_area_are_rejected() {
        assert_eq!(
            Region::new(128, 0, 128, 0).address_window(128, 128),
            Err(Error::OutOfBounds)
        );
        assert_eq!(
            Region::new(0, 128, 0, 128).address_window(128, 128),
            Err(Error::OutOfBounds)
        );
        assert_eq!(
            Region::new(0, 0, 128, 0).address_window(128, 128),
            Err(Error::OutOfBounds)
        );
        assert_eq!(
            Region::new(0, 0, 0, 128).address_window(128, 128),
            Err(Error::OutOfBounds)
        );
        // Same rule against smaller configured dimensions.
        assert_eq!(
            Region::new(0, 0, 96, 10).address_window(96, 64),
            Err(Error::OutOfBounds)
        );
        assert!(Region::new(0, 0, 95, 10).address_window(96, 64).is_ok());
    }

    #[test]
    fn unordered_bounds_are_rejected() {
        assert_eq!(
            Region::new(5, 0, 4, 0).address_window(128, 128),
            Err(Error::OutOfBounds)
        );
        assert_eq!(
            Region::new(0, 5, 0, 4).address_window(128, 128),
            Err(Error::OutOfBounds)
        );
    }
}
