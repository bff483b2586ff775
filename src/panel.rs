//! The operations a rendering pipeline expects from any panel driver.
//!
//! Coordinates are logical, i.e. after rotation. "Preclipped" operations trust the caller to have
//! clipped them against `width()` and `height()` already.

use crate::color::{ColorDepth, RawColor};
use crate::display::image::ImageSource;

pub trait Panel {
    type Error;

    /// Bring the controller from power-on (or reset) to a state that accepts pixel data.
    fn init(&mut self, use_reset: bool) -> Result<(), Self::Error>;

    /// Claim the bus. Nested calls are ignored until `end_transaction`.
    fn begin_transaction(&mut self) -> Result<(), Self::Error>;

    /// Release the bus, first flushing a pending half-unit of data on 16-bit buses.
    fn end_transaction(&mut self) -> Result<(), Self::Error>;

    /// Open a write section. Sections nest; only the outermost touches the bus transaction.
    fn start_write(&mut self) -> Result<(), Self::Error>;

    /// Close a write section opened with `start_write`.
    fn end_write(&mut self) -> Result<(), Self::Error>;

    fn width(&self) -> u16;

    fn height(&self) -> u16;

    fn rotation(&self) -> u8;

    fn color_depth(&self) -> ColorDepth;

    fn set_brightness(&mut self, brightness: u8) -> Result<(), Self::Error>;

    /// Change the logical orientation, 0 to 3 in quarter turns plus 4 to mirror. Only the
    /// driver's coordinate mapping changes, the controller is not touched.
    fn set_rotation(&mut self, rotation: u8);

    fn set_invert(&mut self, invert: bool) -> Result<(), Self::Error>;

    fn set_sleep(&mut self, sleep: bool) -> Result<(), Self::Error>;

    fn set_power_save(&mut self, save: bool) -> Result<(), Self::Error>;

    /// Block until the panel finished any internal refresh.
    fn wait_display(&mut self);

    fn display_busy(&self) -> bool;

    /// Select the pixel format of subsequent writes. Unsupported depths leave the current one in
    /// place; the depth in effect afterwards is returned.
    fn set_color_depth(&mut self, depth: ColorDepth) -> Result<ColorDepth, Self::Error>;

    /// Address the inclusive rectangle `xs..=xe`, `ys..=ye` and prepare the controller for a
    /// memory write into it.
    fn set_window(&mut self, xs: u16, ys: u16, xe: u16, ye: u16) -> Result<(), Self::Error>;

    /// Write `len` pixels of `raw` into the current window.
    fn write_block(&mut self, raw: RawColor, len: u32) -> Result<(), Self::Error>;

    /// Write pixel bytes already in the current color depth into the current window.
    fn write_pixels(&mut self, data: &[u8], use_dma: bool) -> Result<(), Self::Error>;

    fn draw_pixel_preclipped(&mut self, x: u16, y: u16, raw: RawColor) -> Result<(), Self::Error>;

    fn write_fill_rect_preclipped(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        raw: RawColor,
    ) -> Result<(), Self::Error>;

    /// Copy a `w` x `h` block of `image` to `(x, y)`.
    fn write_image(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        image: &ImageSource<'_>,
        use_dma: bool,
    ) -> Result<(), Self::Error>;

    fn read_command(&mut self, cmd: u16, index: u8, len: u8) -> u32;

    fn read_data(&mut self, index: u8, len: u8) -> u32;

    fn read_rect(&mut self, x: u16, y: u16, w: u16, h: u16, dst: &mut [u8]);
}
