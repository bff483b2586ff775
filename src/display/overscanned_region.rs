//! Extended region abstraction that allows requesting regions that "overscan" the display, i.e.
//! portions of the region may lie outside the displayable area. Colors written into overscanned
//! regions are silently discarded there, to relieve the user from having to consider boundary
//! conditions in code where the region rectangle is dynamically computed.

use hal::blocking::delay::DelayMs;
use itertools::iproduct;

use crate::color::RawColor;
use crate::display::region::Region;
use crate::display::{Display, PixelCoord};
use crate::error::Error;
use crate::interface;

/// A handle to a rectangular region which can be drawn into, but which is permitted to have
/// portions that lie outside the viewable area of the display. Pixels that fall outside the
/// viewable area are automatically dropped.
///
/// The functionality is separated into its own kind of region so that the cost of the cropping
/// logic is not paid when it is known to be unnecessary.
///
/// These are intended to be short-lived, and contain a mutable borrow of the display that issued
/// them so clashing writes are prevented.
pub struct OverscannedRegion<'di, DI, DELAY>
where
    DI: 'di + interface::DisplayInterface,
    DELAY: 'di + DelayMs<u8>,
{
    viewable_region: Option<Region<'di, DI, DELAY>>,
    upper_left: PixelCoord,
    lower_right: PixelCoord,
    viewable: PixelCoord,
}

/// Clip a value between some low and high limit.
fn clip<T: PartialOrd>(lo: T, x: T, hi: T) -> T {
    match () {
        _ if x > hi => hi,
        _ if x < lo => lo,
        _ => x,
    }
}

fn in_range<T: PartialOrd>(x: T, lo: T, hi: T) -> bool {
    x >= lo && x < hi
}

impl<'di, DI, DELAY> OverscannedRegion<'di, DI, DELAY>
where
    DI: 'di + interface::DisplayInterface,
    DELAY: 'di + DelayMs<u8>,
{
    /// Construct a new region. This is only called by the factory method
    /// `Display::overscanned_region`, which checks the region coordinates are correctly ordered.
    /// `viewable` is the exclusive lower-right corner of the rotated panel.
    pub(super) fn new(
        disp: &'di mut Display<DI, DELAY>,
        upper_left: PixelCoord,
        lower_right: PixelCoord,
        viewable: PixelCoord,
    ) -> Self {
        let viewable_ul = PixelCoord(
            clip(0, upper_left.0, viewable.0),
            clip(0, upper_left.1, viewable.1),
        );
        let viewable_lr = PixelCoord(
            clip(0, lower_right.0, viewable.0),
            clip(0, lower_right.1, viewable.1),
        );
        let viewable_region = if viewable_ul.0 == viewable_lr.0 || viewable_ul.1 == viewable_lr.1 {
            None
        } else {
            Some(Region::new(disp, viewable_ul, viewable_lr))
        };
        Self {
            viewable_region,
            upper_left,
            lower_right,
            viewable,
        }
    }

    /// Draw raw colors into the region, left-to-right and top-to-bottom. The sequence of pixels
    /// is filtered such that only pixels which intersect the displayable area are transmitted to
    /// the hardware.
    pub fn draw<I>(&mut self, iter: I) -> Result<(), Error<DI::Error>>
    where
        I: Iterator<Item = RawColor>,
    {
        let (ul, lr, viewable) = (self.upper_left, self.lower_right, self.viewable);
        let region = match self.viewable_region.as_mut() {
            Some(region) => region,
            None => return Ok(()),
        };
        let only_viewable = iproduct!(ul.1..lr.1, ul.0..lr.0)
            .zip(iter)
            .filter(|((r, c), _)| in_range(*r, 0, viewable.1) && in_range(*c, 0, viewable.0))
            .map(|(_, raw)| raw);
        region.draw(only_viewable)
    }
}
