//! The driver's error vocabulary.

/// Errors reported by the driver.
///
/// The bus carries no acknowledgment channel, so there are no transient or
/// retryable failures; every variant reflects a condition the caller can
/// correct before retrying.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A pixel or region coordinate lies outside the display area, or a
    /// command argument exceeds the controller's address range.
    #[error("pixel or region coordinates outside the display area")]
    OutOfBounds,

    /// The product variant has no entry in the remap table. The panel still
    /// runs, but is left at the controller's default orientation.
    #[error("product variant has no remap table entry")]
    UnsupportedVariant,

    /// The transport refused a bus write.
    #[error("bus write rejected by the transport")]
    BusWrite,
}
