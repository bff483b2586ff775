//! Region abstraction for drawing into rectangular regions of the display.

use hal::blocking::delay::DelayMs;

use crate::color::RawColor;
use crate::command::PixelWrite;
use crate::display::{Display, PixelCoord};
use crate::error::Error;
use crate::interface;
use crate::panel::Panel;

/// A handle to a rectangular region of a display which can be drawn into.
pub struct Region<'di, DI, DELAY>
where
    DI: 'di + interface::DisplayInterface,
    DELAY: 'di + DelayMs<u8>,
{
    disp: &'di mut Display<DI, DELAY>,
    left: u16,
    top: u16,
    cols: u16,
    rows: u16,
}

impl<'di, DI, DELAY> Region<'di, DI, DELAY>
where
    DI: 'di + interface::DisplayInterface,
    DELAY: 'di + DelayMs<u8>,
{
    /// Construct a new region. This is only called by the factory methods on `Display`, which
    /// check that the region coordinates are ordered and within the panel.
    pub(super) fn new(
        disp: &'di mut Display<DI, DELAY>,
        upper_left: PixelCoord,
        lower_right: PixelCoord,
    ) -> Self {
        Self {
            disp,
            left: upper_left.0 as u16,
            top: upper_left.1 as u16,
            cols: (lower_right.0 - upper_left.0) as u16,
            rows: (lower_right.1 - upper_left.1) as u16,
        }
    }

    /// Draw raw colors into the region, left-to-right and top-to-bottom. Drawing stops when the
    /// region is full or the iterator runs out, whichever comes first.
    pub fn draw<I>(&mut self, mut iter: I) -> Result<(), Error<DI::Error>>
    where
        I: Iterator<Item = RawColor>,
    {
        let depth = self.disp.color_depth();
        let px_bytes = depth.bytes();

        let (left, top, cols, rows) = (self.left, self.top, self.cols, self.rows);
        self.disp.write_section(|disp| {
            disp.set_window(left, top, left + cols - 1, top + rows - 1)?;

            // Paint the region using constant memory by allocating a chunk buffer and
            // alternately filling it from the iterator and writing it to the display. 48 bytes
            // hold a whole number of pixels at every depth.
            let region_total = cols as usize * rows as usize;
            let mut total_written = 0;
            disp.pixel_stream(PixelWrite::Start, |disp| {
                let mut buf = [0u8; 48];
                loop {
                    let mut chunk_len = 0;
                    for slot in buf.chunks_exact_mut(px_bytes) {
                        // Break early if we have copied enough pixels to exactly fill the region.
                        if total_written >= region_total {
                            break;
                        }
                        match iter.next() {
                            Some(raw) => {
                                slot.copy_from_slice(&depth.to_wire(raw)[..px_bytes]);
                                chunk_len += px_bytes;
                                total_written += 1;
                            }
                            None => break,
                        }
                    }

                    if chunk_len > 0 {
                        disp.stream_data(&buf[..chunk_len])?;
                    }

                    // Done once a chunk comes back short: the region is full or the iterator
                    // exhausted.
                    if chunk_len != buf.len() {
                        return Ok(());
                    }
                }
            })?;
            disp.track_alignment(total_written);
            Ok(())
        })
    }
}
