//! Block transfers from a pixel buffer already in the panel's color depth.

use hal::blocking::delay::DelayMs;
use log::trace;

use crate::color::RawColor;
use crate::command::PixelWrite;
use crate::display::Display;
use crate::error::Error;
use crate::interface;
use crate::panel::Panel;

/// A view of a pixel buffer laid out row by row, `stride` pixels per row, with each pixel
/// encoded in the current write depth. The block copied starts at `(src_x, src_y)`.
#[derive(Clone, Copy, Debug)]
pub struct ImageSource<'a> {
    data: &'a [u8],
    stride: u16,
    src_x: u16,
    src_y: u16,
    transparent: Option<RawColor>,
}

impl<'a> ImageSource<'a> {
    pub fn new(data: &'a [u8], stride: u16) -> Self {
        ImageSource {
            data,
            stride,
            src_x: 0,
            src_y: 0,
            transparent: None,
        }
    }

    /// Start copying at column `x`, row `y` of the buffer.
    pub fn at(self, x: u16, y: u16) -> Self {
        Self {
            src_x: x,
            src_y: y,
            ..self
        }
    }

    /// Skip pixels equal to `raw` instead of writing them.
    pub fn transparent(self, raw: RawColor) -> Self {
        Self {
            transparent: Some(raw),
            ..self
        }
    }

    /// Copy a `w` x `h` block to `(x, y)` on `disp`.
    pub(crate) fn write_to<DI, DELAY>(
        &self,
        disp: &mut Display<DI, DELAY>,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        use_dma: bool,
    ) -> Result<(), Error<DI::Error>>
    where
        DI: interface::DisplayInterface,
        DELAY: DelayMs<u8>,
    {
        if w == 0 || h == 0 {
            return Ok(());
        }
        let depth = disp.color_depth();
        let bytes = depth.bytes();
        let row_bytes = w as usize * bytes;
        let row_step = self.stride as usize * bytes;
        let start = (self.src_y as usize * self.stride as usize + self.src_x as usize) * bytes;
        let required = start + (h as usize - 1) * row_step + row_bytes;
        if self.data.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: self.data.len(),
            });
        }
        let rows = (0..h as usize).map(|row| {
            let at = start + row * row_step;
            &self.data[at..at + row_bytes]
        });
        trace!("image {}x{} at {},{}, dma: {}", w, h, x, y, use_dma);

        let key = match self.transparent {
            Some(raw) => depth.to_wire(raw),
            None => {
                disp.set_window(x, y, x.saturating_add(w - 1), y.saturating_add(h - 1))?;
                return if self.stride == w || h == 1 {
                    disp.write_bytes(&self.data[start..required], use_dma)?;
                    disp.track_alignment(w as usize * h as usize);
                    Ok(())
                } else if use_dma {
                    disp.track_alignment(w as usize * h as usize);
                    disp.write_dma_rows(rows)
                } else {
                    for (idx, row) in rows.enumerate() {
                        let header = if idx == 0 {
                            PixelWrite::Start
                        } else {
                            PixelWrite::Continue
                        };
                        disp.pixel_stream(header, |disp| disp.stream_data(row))?;
                    }
                    disp.track_alignment(w as usize * h as usize);
                    Ok(())
                };
            }
        };
        let key = &key[..bytes];

        // Each run of opaque pixels gets a one-row window of its own.
        for (idx, row) in rows.enumerate() {
            let row_y = y.saturating_add(idx as u16);
            let mut pixels = row.chunks_exact(bytes).enumerate().peekable();
            while let Some((first, _)) = pixels.find(|(_, px)| *px != key) {
                let mut len = 1;
                while pixels.next_if(|(_, px)| *px != key).is_some() {
                    len += 1;
                }
                let col = x.saturating_add(first as u16);
                let end = col.saturating_add(len as u16 - 1);
                disp.set_window(col, row_y, end, row_y)?;
                disp.write_bytes(&row[first * bytes..(first + len) * bytes], use_dma)?;
                disp.track_alignment(len);
            }
        }
        Ok(())
    }
}
