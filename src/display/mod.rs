//! The main API to the display driver. `Display` implements `Panel` for the RM690B0, and offers
//! methods for obtaining `Region` instances which can be used to stream colors to the panel.

pub mod image;
pub mod overscanned_region;
pub mod region;

use hal::blocking::delay::DelayMs;
use log::{debug, trace};

use crate::color::{ColorDepth, RawColor};
use crate::command::{Command, PixelWrite};
use crate::config::Config;
use crate::display::image::ImageSource;
use crate::display::overscanned_region::OverscannedRegion;
use crate::display::region::Region;
use crate::error::Error;
use crate::init;
use crate::interface;
use crate::panel::Panel;

/// A pixel coordinate pair of `column` and `row` in the rotated, logical coordinate space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelCoord(pub i16, pub i16);

/// Milliseconds the controller needs after sleep out before it accepts commands.
const SLEEP_OUT_DELAY_MS: u8 = 150;

/// Internal rotations that mirror the row axis: 1, 2, 4 and 7.
const ROW_MIRRORED: u8 = 0b1001_0110;

/// A driver for an RM690B0 panel.
pub struct Display<DI, DELAY>
where
    DI: interface::DisplayInterface,
    DELAY: DelayMs<u8>,
{
    iface: DI,
    delay: DELAY,
    config: Config,
    width: u16,
    height: u16,
    rotation: u8,
    internal_rotation: u8,
    col_start: u16,
    row_start: u16,
    window: Option<[u16; 4]>,
    write_depth: ColorDepth,
    write_count: u32,
    in_transaction: bool,
    has_align_data: bool,
}

impl<DI, DELAY> Display<DI, DELAY>
where
    DI: interface::DisplayInterface,
    DELAY: DelayMs<u8>,
{
    /// Construct a new display driver for the panel described by `config`, connected to the
    /// interface `iface`. `delay` times the reset pulse and the wake from sleep.
    ///
    /// Nothing is sent until `Panel::init`.
    pub fn new(iface: DI, delay: DELAY, config: Config) -> Result<Self, Error<DI::Error>> {
        config.validate::<DI::Error>()?;
        let mut disp = Display {
            iface,
            delay,
            config,
            width: config.panel_width,
            height: config.panel_height,
            rotation: 0,
            internal_rotation: 0,
            col_start: 0,
            row_start: 0,
            window: None,
            write_depth: ColorDepth::default(),
            write_count: 0,
            in_transaction: false,
            has_align_data: false,
        };
        disp.set_rotation(0);
        Ok(disp)
    }

    /// Tear the driver down, handing back the interface and delay.
    pub fn release(self) -> (DI, DELAY) {
        (self.iface, self.delay)
    }

    /// The last window sent to the controller in GRAM coordinates, or `None` if the window was
    /// invalidated by a rotation since.
    pub fn window(&self) -> Option<[u16; 4]> {
        self.window
    }

    /// Construct a rectangular region onto which to stream colors. `lower_right` is exclusive.
    /// The region must lie within the rotated panel.
    ///
    /// Regions are intended to be short-lived, and mutably borrow the display so clashing writes
    /// are prevented.
    pub fn region<'di>(
        &'di mut self,
        upper_left: PixelCoord,
        lower_right: PixelCoord,
    ) -> Result<Region<'di, DI, DELAY>, Error<DI::Error>> {
        if upper_left.0 >= lower_right.0 || upper_left.1 >= lower_right.1 {
            return Err(Error::InvalidWindow);
        }
        if false
            || upper_left.0 < 0
            || upper_left.1 < 0
            || lower_right.0 > self.width as i16
            || lower_right.1 > self.height as i16
        {
            return Err(Error::OutOfBounds);
        }
        Ok(Region::new(self, upper_left, lower_right))
    }

    /// Construct a rectangular region onto which to stream colors which silently discards
    /// overscan. An overscanned region *need not* lie within the panel, as it will automatically
    /// crop non-viewable pixels.
    ///
    /// Regions are intended to be short-lived, and mutably borrow the display so clashing writes
    /// are prevented.
    pub fn overscanned_region<'di>(
        &'di mut self,
        upper_left: PixelCoord,
        lower_right: PixelCoord,
    ) -> Result<OverscannedRegion<'di, DI, DELAY>, Error<DI::Error>> {
        if upper_left.0 >= lower_right.0 || upper_left.1 >= lower_right.1 {
            return Err(Error::InvalidWindow);
        }
        let viewable = PixelCoord(self.width as i16, self.height as i16);
        Ok(OverscannedRegion::new(self, upper_left, lower_right, viewable))
    }

    /// Run `body` inside a write section. The section is closed even when `body` fails, and
    /// the first error is returned.
    pub(crate) fn write_section<T, F>(&mut self, body: F) -> Result<T, Error<DI::Error>>
    where
        F: FnOnce(&mut Self) -> Result<T, Error<DI::Error>>,
    {
        self.start_write()?;
        let res = body(self);
        let end = self.end_write();
        let value = res?;
        end?;
        Ok(value)
    }

    /// Send one chip-select framed pixel stream: `header`, whatever `body` writes, then the
    /// stream trailer. Chip-select is released even when the stream fails part way.
    pub(crate) fn pixel_stream<F>(
        &mut self,
        header: PixelWrite,
        body: F,
    ) -> Result<(), Error<DI::Error>>
    where
        F: FnOnce(&mut Self) -> Result<(), Error<DI::Error>>,
    {
        self.iface.select()?;
        let res = self.stream_frame(header, body);
        let deselect = self.iface.deselect();
        res?;
        deselect?;
        Ok(())
    }

    fn stream_frame<F>(&mut self, header: PixelWrite, body: F) -> Result<(), Error<DI::Error>>
    where
        F: FnOnce(&mut Self) -> Result<(), Error<DI::Error>>,
    {
        self.iface.write_command(&header.header())?;
        nb::block!(self.iface.flush())?;
        body(self)?;
        nb::block!(self.iface.flush())?;
        self.iface.write_command(&PixelWrite::Stop.header())?;
        nb::block!(self.iface.flush())?;
        Ok(())
    }

    pub(crate) fn stream_data(&mut self, data: &[u8]) -> Result<(), Error<DI::Error>> {
        self.iface.write_data(data)?;
        Ok(())
    }

    /// Write `data` as one complete pixel stream starting at the window origin.
    pub(crate) fn write_bytes(
        &mut self,
        data: &[u8],
        use_dma: bool,
    ) -> Result<(), Error<DI::Error>> {
        self.pixel_stream(PixelWrite::Start, |disp| {
            if use_dma {
                disp.iface.add_dma_queue(data)?;
                disp.iface.exec_dma_queue()?;
            } else {
                disp.iface.write_data(data)?;
            }
            Ok(())
        })
    }

    /// Write the DMA queue entries `rows` as one pixel stream.
    pub(crate) fn write_dma_rows<'a, I>(&mut self, rows: I) -> Result<(), Error<DI::Error>>
    where
        I: Iterator<Item = &'a [u8]>,
    {
        self.pixel_stream(PixelWrite::Start, |disp| {
            for row in rows {
                disp.iface.add_dma_queue(row)?;
            }
            disp.iface.exec_dma_queue()?;
            Ok(())
        })
    }

    /// Account for a write of `pixels` pixels on a bus that moves 16-bit units.
    pub(crate) fn track_alignment(&mut self, pixels: usize) {
        if self.config.dlen_16bit && self.write_depth.bits() & 15 != 0 && pixels & 1 != 0 {
            self.has_align_data = !self.has_align_data;
        }
    }
}

impl<DI, DELAY> Panel for Display<DI, DELAY>
where
    DI: interface::DisplayInterface,
    DELAY: DelayMs<u8>,
{
    type Error = Error<DI::Error>;

    /// Initialize the controller: optionally pulse reset, then load the power-on register table
    /// followed by the options in the `Config`. The panel stays asleep and blank; call
    /// `set_sleep(false)` and `set_power_save(false)` to show GRAM.
    fn init(&mut self, use_reset: bool) -> Result<(), Self::Error> {
        debug!(
            "init {}x{} panel, reset: {}",
            self.config.panel_width, self.config.panel_height, use_reset
        );
        if use_reset {
            self.iface.reset(&mut self.delay)?;
        }
        let rotation = self.rotation;
        self.set_rotation(rotation);

        self.write_section(|disp| {
            for (reg, value) in init::sequence() {
                Command::WriteRegister(reg, value).send(&mut disp.iface)?;
            }
            disp.config.send(&mut disp.iface)?;
            if let Some(depth) = disp.config.color_depth {
                disp.set_color_depth(depth)?;
            }
            Ok(())
        })
    }

    fn begin_transaction(&mut self) -> Result<(), Self::Error> {
        if self.in_transaction {
            return Ok(());
        }
        self.in_transaction = true;
        self.iface.begin_transaction()?;
        Ok(())
    }

    fn end_transaction(&mut self) -> Result<(), Self::Error> {
        if !self.in_transaction {
            return Ok(());
        }
        self.in_transaction = false;
        if self.has_align_data {
            self.has_align_data = false;
            self.iface.write_data(&[0])?;
        }
        self.iface.end_transaction()?;
        Ok(())
    }

    fn start_write(&mut self) -> Result<(), Self::Error> {
        self.write_count += 1;
        if self.write_count == 1 {
            self.begin_transaction()?;
        }
        Ok(())
    }

    fn end_write(&mut self) -> Result<(), Self::Error> {
        if self.write_count == 0 {
            return Ok(());
        }
        self.write_count -= 1;
        if self.write_count == 0 {
            self.end_transaction()?;
        }
        Ok(())
    }

    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn rotation(&self) -> u8 {
        self.rotation
    }

    fn color_depth(&self) -> ColorDepth {
        self.write_depth
    }

    fn set_brightness(&mut self, brightness: u8) -> Result<(), Self::Error> {
        self.write_section(|disp| Command::SetBrightness(brightness).send(&mut disp.iface))
    }

    fn set_rotation(&mut self, rotation: u8) {
        let r = rotation & 7;
        let offset = self.config.offset_rotation;
        self.rotation = r;
        self.internal_rotation = ((r + offset) & 3) | ((r & 4) ^ (offset & 4));

        let cfg = &self.config;
        let (mut ox, mut oy) = (cfg.offset_x, cfg.offset_y);
        let (mut pw, mut ph) = (cfg.panel_width, cfg.panel_height);
        let (mut mw, mut mh) = (cfg.memory_width, cfg.memory_height);
        if self.internal_rotation & 1 != 0 {
            core::mem::swap(&mut ox, &mut oy);
            core::mem::swap(&mut pw, &mut ph);
            core::mem::swap(&mut mw, &mut mh);
        }
        self.width = pw;
        self.height = ph;
        self.col_start = if self.internal_rotation & 2 != 0 {
            mw.saturating_sub(pw + ox)
        } else {
            ox
        };
        self.row_start = if (1 << self.internal_rotation) & ROW_MIRRORED != 0 {
            mh.saturating_sub(ph + oy)
        } else {
            oy
        };
        self.window = None;
        debug!(
            "rotation {} (internal {}): {}x{}, start {},{}",
            r, self.internal_rotation, pw, ph, self.col_start, self.row_start
        );
    }

    fn set_invert(&mut self, invert: bool) -> Result<(), Self::Error> {
        Command::SetInversion(invert).send(&mut self.iface)
    }

    fn set_sleep(&mut self, sleep: bool) -> Result<(), Self::Error> {
        debug!("sleep: {}", sleep);
        if sleep {
            Command::SleepIn.send(&mut self.iface)
        } else {
            Command::SleepOut.send(&mut self.iface)?;
            self.delay.delay_ms(SLEEP_OUT_DELAY_MS);
            Ok(())
        }
    }

    fn set_power_save(&mut self, save: bool) -> Result<(), Self::Error> {
        debug!("power save: {}", save);
        Command::SetDisplayOn(!save).send(&mut self.iface)
    }

    fn wait_display(&mut self) {}

    fn display_busy(&self) -> bool {
        false
    }

    fn set_color_depth(&mut self, depth: ColorDepth) -> Result<ColorDepth, Self::Error> {
        if depth.pixel_format().is_none() {
            return Ok(self.write_depth);
        }
        self.write_depth = depth;
        debug!("color depth: {:?}", depth);

        self.write_section(|disp| Command::SetPixelFormat(depth).send(&mut disp.iface))?;
        Ok(self.write_depth)
    }

    fn set_window(&mut self, xs: u16, ys: u16, xe: u16, ye: u16) -> Result<(), Self::Error> {
        let (mut xs, mut xe, mut ys, mut ye) = (xs, xe, ys, ye);
        if xe.wrapping_sub(xs) >= self.width {
            xs = 0;
            xe = self.width - 1;
        }
        if ye.wrapping_sub(ys) >= self.height {
            ys = 0;
            ye = self.height - 1;
        }
        let xs = xs.saturating_add(self.col_start);
        let xe = xe.saturating_add(self.col_start);
        let ys = ys.saturating_add(self.row_start);
        let ye = ye.saturating_add(self.row_start);
        trace!("window {},{} - {},{}", xs, ys, xe, ye);

        Command::SetColumnAddress(xs, xe).send(&mut self.iface)?;
        Command::SetRowAddress(ys, ye).send(&mut self.iface)?;
        Command::MemoryWrite.send(&mut self.iface)?;
        self.window = Some([xs, ys, xe, ye]);
        Ok(())
    }

    fn write_block(&mut self, raw: RawColor, len: u32) -> Result<(), Self::Error> {
        let depth = self.write_depth;
        self.pixel_stream(PixelWrite::Start, |disp| {
            disp.iface
                .write_data_repeat(&depth.to_wire(raw)[..depth.bytes()], len)?;
            Ok(())
        })
    }

    fn write_pixels(&mut self, data: &[u8], use_dma: bool) -> Result<(), Self::Error> {
        self.write_bytes(data, use_dma)?;
        self.track_alignment(data.len() / self.write_depth.bytes());
        Ok(())
    }

    fn draw_pixel_preclipped(&mut self, x: u16, y: u16, raw: RawColor) -> Result<(), Self::Error> {
        self.set_window(x, y, x, y)?;
        if self.config.dlen_16bit {
            self.has_align_data = self.write_depth.bits() & 15 != 0;
        }
        let depth = self.write_depth;
        self.pixel_stream(PixelWrite::Start, |disp| {
            disp.iface.write_data(&depth.to_wire(raw)[..depth.bytes()])?;
            Ok(())
        })
    }

    fn write_fill_rect_preclipped(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        raw: RawColor,
    ) -> Result<(), Self::Error> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        self.set_window(x, y, x.saturating_add(w - 1), y.saturating_add(h - 1))?;
        self.write_block(raw, w as u32 * h as u32)
    }

    fn write_image(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        image: &ImageSource<'_>,
        use_dma: bool,
    ) -> Result<(), Self::Error> {
        image.write_to(self, x, y, w, h, use_dma)
    }

    fn read_command(&mut self, _cmd: u16, _index: u8, _len: u8) -> u32 {
        0
    }

    fn read_data(&mut self, _index: u8, _len: u8) -> u32 {
        0
    }

    fn read_rect(&mut self, _x: u16, _y: u16, _w: u16, _h: u16, _dst: &mut [u8]) {}
}

#[cfg(test)]
mod tests {
    use super::{PixelCoord as Px, *};
    use crate::interface::test_spy::{Sent, TestDelay, TestSpyInterface};
    use std::vec::Vec;

    type TestDisplay = Display<TestSpyInterface, TestDelay>;

    fn display(cfg: Config) -> (TestSpyInterface, TestDelay, TestDisplay) {
        let di = TestSpyInterface::new();
        let delay = TestDelay::new();
        let disp = Display::new(di.split(), delay.split(), cfg).unwrap();
        (di, delay, disp)
    }

    fn init_table() -> Vec<Sent> {
        init::sequence().flat_map(|(r, v)| reg!(r, v)).collect()
    }

    #[test]
    fn new_validates_config() {
        let di = TestSpyInterface::new();
        let res = Display::new(di.split(), TestDelay::new(), Config::new(450, 601));
        assert_eq!(
            res.err(),
            Some(Error::InvalidDimensions {
                width: 450,
                height: 601
            })
        );
        di.check_multi(&[]);
    }

    #[test]
    fn init_defaults() {
        let (di, delay, mut disp) = display(Config::new(450, 600));
        disp.init(false).unwrap();
        let expect = [vec![Sent::Begin], init_table(), vec![Sent::End]].concat();
        di.check_multi(&expect);
        assert!(delay.waited().is_empty());
        assert_eq!((disp.width(), disp.height()), (450, 600));
        assert_eq!(disp.color_depth(), ColorDepth::Rgb565);
    }

    #[test]
    fn init_with_reset() {
        let (di, _delay, mut disp) = display(Config::new(450, 600));
        disp.init(true).unwrap();
        let sent = di.sent();
        assert_eq!(sent[..2], [Sent::Reset, Sent::Begin]);
        assert_eq!(sent.len(), 2 + init_table().len() + 1);
    }

    #[test]
    fn init_many_options() {
        let cfg = Config::new(450, 600)
            .inverted(true)
            .brightness(0x80)
            .color_depth(ColorDepth::Rgb888);
        let (di, _delay, mut disp) = display(cfg);
        disp.init(false).unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        let expect = [
            vec![Sent::Begin],
            init_table(),
            dcs!(0x21),       // inversion on
            dcs!(0x51, 0x80), // brightness
            dcs!(0x3A, 0x77), // 24 bits per pixel
            vec![Sent::End],
        ]
        .concat();
        di.check_multi(&expect);
        assert_eq!(disp.color_depth(), ColorDepth::Rgb888);
    }

    #[test]
    fn failed_init_closes_write_section() {
        let (di, _delay, mut disp) = display(Config::new(450, 600));
        di.fail_command_after(2);
        assert_eq!(disp.init(false), Err(Error::Interface(())));
        let expect = [
            vec![Sent::Begin],
            init_table()[..6].to_vec(),
            vec![Sent::Select, Sent::Deselect, Sent::End],
        ]
        .concat();
        di.check_multi(&expect);

        // The section count is back to zero, so the next call opens its own transaction.
        di.clear();
        disp.set_brightness(0x40).unwrap();
        di.check_multi(&[vec![Sent::Begin], dcs!(0x51, 0x40), vec![Sent::End]].concat());
    }

    #[test]
    fn failed_fill_releases_chip_select() {
        let (di, _delay, mut disp) = display(Config::new(450, 600));
        // Three window commands, then the stream header fails.
        di.fail_command_after(3);
        assert_eq!(
            disp.write_fill_rect_preclipped(0, 0, 2, 2, 0xF800),
            Err(Error::Interface(()))
        );
        let expect = [
            window!(0u16, 0u16, 1u16, 1u16),
            vec![Sent::Select, Sent::Deselect],
        ]
        .concat();
        di.check_multi(&expect);
    }

    #[test]
    fn simple_commands() {
        let (di, delay, mut disp) = display(Config::new(450, 600));
        disp.set_invert(false).unwrap();
        disp.set_sleep(true).unwrap();
        disp.set_sleep(false).unwrap();
        disp.set_power_save(true).unwrap();
        disp.set_power_save(false).unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(&[
            dcs!(0x20), // inversion off
            dcs!(0x10), // sleep in
            dcs!(0x11), // sleep out
            dcs!(0x28), // display off
            dcs!(0x29), // display on
        ].concat());
        assert_eq!(delay.waited(), [150]);
    }

    #[test]
    fn brightness_in_write_section() {
        let (di, _delay, mut disp) = display(Config::new(450, 600));
        disp.set_brightness(0xFF).unwrap();
        di.check_multi(&[vec![Sent::Begin], dcs!(0x51, 0xFF), vec![Sent::End]].concat());
    }

    #[test]
    fn color_depth() {
        let (di, _delay, mut disp) = display(Config::new(450, 600));
        assert_eq!(disp.set_color_depth(ColorDepth::Rgb666), Ok(ColorDepth::Rgb666));
        di.check_multi(&[vec![Sent::Begin], dcs!(0x3A, 0x66), vec![Sent::End]].concat());
        di.clear();
        assert_eq!(disp.set_color_depth(ColorDepth::Argb8888), Ok(ColorDepth::Rgb666));
        assert_eq!(disp.set_color_depth(ColorDepth::Grayscale8), Ok(ColorDepth::Rgb666));
        di.check_multi(&[]);
    }

    #[test]
    fn write_sections_nest() {
        let (di, _delay, mut disp) = display(Config::new(450, 600));
        disp.end_write().unwrap();
        disp.end_transaction().unwrap();
        di.check_multi(&[]);
        disp.start_write().unwrap();
        disp.start_write().unwrap();
        disp.end_write().unwrap();
        di.check_multi(&[Sent::Begin]);
        disp.end_write().unwrap();
        di.check_multi(&[Sent::Begin, Sent::End]);
        disp.begin_transaction().unwrap();
        disp.begin_transaction().unwrap();
        disp.end_transaction().unwrap();
        disp.end_transaction().unwrap();
        di.check_multi(&[Sent::Begin, Sent::End, Sent::Begin, Sent::End]);
    }

    #[test]
    fn set_window_plain() {
        let (di, _delay, mut disp) = display(Config::new(450, 600));
        disp.set_window(10, 20, 0x1C1, 0x257).unwrap();
        di.check_multi(&window!(10u16, 20u16, 0x1C1u16, 0x257u16));
        assert_eq!(disp.window(), Some([10, 20, 0x1C1, 0x257]));
    }

    #[test]
    fn set_window_clips_to_panel() {
        let (di, _delay, mut disp) = display(Config::new(450, 600));
        // Inverted spans wrap around and select the whole axis.
        disp.set_window(100, 50, 99, 60).unwrap();
        di.check_multi(&window!(0u16, 50u16, 449u16, 60u16));
        di.clear();
        disp.set_window(0, 0, 450, 600).unwrap();
        di.check_multi(&window!(0u16, 0u16, 449u16, 599u16));
    }

    #[test]
    fn set_window_applies_offsets() {
        let cfg = Config::new(450, 600).memory_size(480, 600).offset(16, 0);
        let (di, _delay, mut disp) = display(cfg);
        disp.set_window(0, 0, 9, 9).unwrap();
        di.check_multi(&window!(16u16, 0u16, 25u16, 9u16));
    }

    #[test]
    fn rotation_geometry() {
        let cfg = Config::new(450, 600).memory_size(480, 600).offset(16, 0);
        let (di, _delay, mut disp) = display(cfg);
        disp.set_window(0, 0, 0, 0).unwrap();
        assert!(disp.window().is_some());

        disp.set_rotation(1);
        assert_eq!((disp.width(), disp.height(), disp.rotation()), (600, 450, 1));
        assert_eq!(disp.window(), None);
        assert_eq!((disp.col_start, disp.row_start), (0, 14));

        disp.set_rotation(2);
        assert_eq!((disp.width(), disp.height()), (450, 600));
        assert_eq!((disp.col_start, disp.row_start), (14, 0));

        disp.set_rotation(3);
        assert_eq!((disp.col_start, disp.row_start), (0, 16));

        disp.set_rotation(4);
        assert_eq!((disp.width(), disp.height(), disp.rotation()), (450, 600, 4));
        assert_eq!((disp.col_start, disp.row_start), (16, 0));

        // Only the low three bits count.
        disp.set_rotation(9);
        assert_eq!(disp.rotation(), 1);
        di.clear();
        disp.set_window(0, 0, 0, 0).unwrap();
        di.check_multi(&window!(0u16, 14u16, 0u16, 14u16));
    }

    #[test]
    fn offset_rotation_adds() {
        let (_di, _delay, mut disp) = display(Config::new(450, 600).offset_rotation(1));
        assert_eq!((disp.width(), disp.height()), (600, 450));
        disp.set_rotation(3);
        assert_eq!(disp.internal_rotation, 0);
        assert_eq!((disp.width(), disp.height()), (450, 600));
        disp.set_rotation(7);
        assert_eq!(disp.internal_rotation, 4);
    }

    #[test]
    fn draw_pixel() {
        let (di, _delay, mut disp) = display(Config::new(450, 600));
        disp.draw_pixel_preclipped(3, 4, 0xF800).unwrap();
        di.check_multi(&[window!(3u16, 4u16, 3u16, 4u16), pixels!(0xF8, 0x00)].concat());
    }

    #[test]
    fn fill_rect() {
        let (di, _delay, mut disp) = display(Config::new(450, 600));
        disp.write_fill_rect_preclipped(1, 2, 3, 1, 0x07E0).unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(&[
            window!(1u16, 2u16, 3u16, 2u16),
            pixels!(0x07, 0xE0, 0x07, 0xE0, 0x07, 0xE0),
        ].concat());
        di.clear();
        disp.write_fill_rect_preclipped(1, 2, 0, 5, 0x07E0).unwrap();
        disp.write_fill_rect_preclipped(1, 2, 5, 0, 0x07E0).unwrap();
        di.check_multi(&[]);
    }

    #[test]
    fn write_block_and_pixels() {
        let (di, _delay, mut disp) = display(Config::new(450, 600));
        disp.write_block(0x001F, 2).unwrap();
        di.check_multi(&pixels!(0x00, 0x1F, 0x00, 0x1F));
        di.clear();
        disp.write_pixels(&[1, 2, 3, 4], false).unwrap();
        di.check_multi(&pixels!(1, 2, 3, 4));
        di.clear();
        disp.write_pixels(&[1, 2], true).unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(&[
            Sent::Select,
            Sent::Cmd(vec![0x32, 0x00, 0x2C, 0x00]),
            Sent::Dma(vec![1, 2]),
            Sent::ExecDma,
            Sent::Cmd(vec![0x32, 0x00, 0x00, 0x00]),
            Sent::Deselect,
        ]);
    }

    #[test]
    fn odd_writes_pad_on_16bit_bus() {
        let cfg = Config::new(450, 600).dlen_16bit(true);
        let (di, _delay, mut disp) = display(cfg);
        disp.set_color_depth(ColorDepth::Rgb888).unwrap();
        di.clear();

        disp.start_write().unwrap();
        disp.write_pixels(&[1, 2, 3], false).unwrap();
        disp.end_write().unwrap();
        let expect = [vec![Sent::Begin], pixels!(1, 2, 3), vec![Sent::Data(vec![0]), Sent::End]];
        di.check_multi(&expect.concat());
        di.clear();

        // Two odd writes make an even one.
        disp.start_write().unwrap();
        disp.write_pixels(&[1, 2, 3], false).unwrap();
        disp.write_pixels(&[4, 5, 6], false).unwrap();
        disp.end_write().unwrap();
        assert_eq!(di.sent().last(), Some(&Sent::End));
        assert!(!di.sent().contains(&Sent::Data(vec![0])));
    }

    #[test]
    fn single_pixel_pads_on_16bit_bus() {
        let cfg = Config::new(450, 600).dlen_16bit(true);
        let (di, _delay, mut disp) = display(cfg);
        disp.start_write().unwrap();
        disp.draw_pixel_preclipped(0, 0, 0xFFFF).unwrap();
        disp.end_write().unwrap();
        // 16-bit pixels fill whole units.
        assert_eq!(di.sent().last(), Some(&Sent::End));
        assert!(!di.sent().contains(&Sent::Data(vec![0])));

        disp.set_color_depth(ColorDepth::Rgb666).unwrap();
        di.clear();
        disp.start_write().unwrap();
        disp.draw_pixel_preclipped(0, 0, 0x3F_3F3F).unwrap();
        disp.end_write().unwrap();
        let sent = di.sent();
        assert_eq!(sent[sent.len() - 2..], [Sent::Data(vec![0]), Sent::End]);
    }

    #[test]
    fn reads_are_stubbed() {
        let (di, _delay, mut disp) = display(Config::new(450, 600));
        assert_eq!(disp.read_command(0x04, 0, 4), 0);
        assert_eq!(disp.read_data(0, 4), 0);
        let mut dst = [0xAAu8; 8];
        disp.read_rect(0, 0, 2, 2, &mut dst);
        assert_eq!(dst, [0xAA; 8]);
        disp.wait_display();
        assert!(!disp.display_busy());
        di.check_multi(&[]);
    }

    #[test]
    fn region_build() {
        let (_di, _delay, mut disp) = display(Config::new(450, 600));

        // In range and correctly ordered.
        assert!(disp.region(Px(12, 10), Px(20, 12)).is_ok());
        assert!(disp.region(Px(0, 0), Px(450, 600)).is_ok());

        // Incorrectly ordered.
        assert_eq!(disp.region(Px(20, 10), Px(12, 12)).err(), Some(Error::InvalidWindow));
        assert_eq!(disp.region(Px(12, 12), Px(20, 12)).err(), Some(Error::InvalidWindow));

        // Out of range.
        assert_eq!(disp.region(Px(440, 4), Px(452, 6)).err(), Some(Error::OutOfBounds));
        assert_eq!(disp.region(Px(-1, 4), Px(4, 6)).err(), Some(Error::OutOfBounds));

        // Rotated panels swap the bounds.
        disp.set_rotation(1);
        assert!(disp.region(Px(0, 0), Px(600, 450)).is_ok());
        assert!(disp.region(Px(0, 0), Px(450, 600)).is_err());
    }

    #[test]
    fn overscanned_region_build() {
        let (_di, _delay, mut disp) = display(Config::new(450, 600));

        assert!(disp.overscanned_region(Px(12, 10), Px(20, 12)).is_ok());
        assert!(disp.overscanned_region(Px(-8, 4), Px(12, 6)).is_ok());
        assert!(disp.overscanned_region(Px(440, 590), Px(460, 620)).is_ok());
        assert!(disp.overscanned_region(Px(-16, 700), Px(-4, 760)).is_ok());

        assert!(disp.overscanned_region(Px(20, 10), Px(12, 12)).is_err());
        assert!(disp.overscanned_region(Px(12, 12), Px(20, 10)).is_err());
    }
}
