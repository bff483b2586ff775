//! Errors reported by the driver.

use core::fmt;

/// Maximum GRAM columns addressable by the RM690B0.
pub const MAX_COLUMNS: u16 = 600;

/// Maximum GRAM rows addressable by the RM690B0.
pub const MAX_ROWS: u16 = 600;

/// Errors that can occur when driving the panel.
///
/// Generic over the interface's error type so callers can match on the underlying bus failure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Error<E> {
    /// The bus interface failed.
    Interface(E),
    /// The configured panel does not fit the controller's GRAM, or has a zero dimension.
    InvalidDimensions {
        /// Requested width in pixels
        width: u16,
        /// Requested height in pixels
        height: u16,
    },
    /// A region's corners are out of order.
    InvalidWindow,
    /// A command parameter has no encoding on this controller.
    InvalidArgument,
    /// A region reaches outside the visible panel.
    OutOfBounds,
    /// An image source holds fewer bytes than the requested rectangle needs.
    BufferTooSmall {
        /// Required length in bytes
        required: usize,
        /// Provided length in bytes
        provided: usize,
    },
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::Interface(e)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Interface(e) => write!(f, "Interface error: {:?}", e),
            Error::InvalidDimensions { width, height } => write!(
                f,
                "Invalid dimensions {}x{} (max {}x{})",
                width, height, MAX_COLUMNS, MAX_ROWS
            ),
            Error::InvalidWindow => write!(f, "Window corners out of order"),
            Error::InvalidArgument => write!(f, "Invalid command argument"),
            Error::OutOfBounds => write!(f, "Region outside the panel"),
            Error::BufferTooSmall { required, provided } => write!(
                f,
                "Buffer too small: required {} bytes, provided {}",
                required, provided
            ),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}
