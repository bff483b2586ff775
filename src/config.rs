//! Defines the static description of a panel module: how big the glass is, where it sits in the
//! controller's GRAM, and which optional commands go out at init time.

use crate::color::ColorDepth;
use crate::command::Command;
use crate::error::{Error, MAX_COLUMNS, MAX_ROWS};
use crate::interface;

/// A configuration for the panel. Builder methods offer a declarative way to either send a
/// configuration command at init time, or to leave it at the chip's POR default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    pub(crate) panel_width: u16,
    pub(crate) panel_height: u16,
    pub(crate) memory_width: u16,
    pub(crate) memory_height: u16,
    pub(crate) offset_x: u16,
    pub(crate) offset_y: u16,
    pub(crate) offset_rotation: u8,
    pub(crate) dlen_16bit: bool,
    pub(crate) color_depth: Option<ColorDepth>,
    invert_cmd: Option<Command>,
    brightness_cmd: Option<Command>,
}

impl Config {
    /// Create a new configuration for a panel with `width` x `height` visible pixels. The GRAM
    /// is assumed to be exactly the size of the panel, with the panel at its origin, until
    /// `memory_size` and `offset` say otherwise.
    pub fn new(width: u16, height: u16) -> Self {
        Config {
            panel_width: width,
            panel_height: height,
            memory_width: width,
            memory_height: height,
            offset_x: 0,
            offset_y: 0,
            offset_rotation: 0,
            dlen_16bit: false,
            color_depth: None,
            invert_cmd: None,
            brightness_cmd: None,
        }
    }

    /// Extend this `Config` with the size of the controller's GRAM, when the glass covers only
    /// part of it.
    pub fn memory_size(self, width: u16, height: u16) -> Self {
        Self {
            memory_width: width,
            memory_height: height,
            ..self
        }
    }

    /// Extend this `Config` with the GRAM column and row of the panel's first pixel.
    pub fn offset(self, x: u16, y: u16) -> Self {
        Self {
            offset_x: x,
            offset_y: y,
            ..self
        }
    }

    /// Extend this `Config` with a rotation applied on top of every `set_rotation` request.
    /// Values 0 to 3 turn the picture in quarter turns, bit 2 mirrors it.
    pub fn offset_rotation(self, rotation: u8) -> Self {
        Self {
            offset_rotation: rotation & 7,
            ..self
        }
    }

    /// Extend this `Config` for a bus that transfers data in 16-bit units. Writes ending on half
    /// a unit are padded with a zero byte when the transaction ends.
    pub fn dlen_16bit(self, enabled: bool) -> Self {
        Self {
            dlen_16bit: enabled,
            ..self
        }
    }

    /// Extend this `Config` to select the interface pixel format at init. See
    /// `Panel::set_color_depth`.
    pub fn color_depth(self, depth: ColorDepth) -> Self {
        Self {
            color_depth: Some(depth),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure display inversion. See
    /// `Command::SetInversion`.
    pub fn inverted(self, invert: bool) -> Self {
        Self {
            invert_cmd: Some(Command::SetInversion(invert)),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure display brightness. See
    /// `Command::SetBrightness`.
    pub fn brightness(self, level: u8) -> Self {
        Self {
            brightness_cmd: Some(Command::SetBrightness(level)),
            ..self
        }
    }

    /// Check that the panel fits inside its GRAM, and the GRAM inside the controller.
    pub(crate) fn validate<E>(&self) -> Result<(), Error<E>> {
        let fits = |panel: u16, offset: u16, memory: u16, max: u16| {
            panel > 0
                && memory <= max
                && panel
                    .checked_add(offset)
                    .map_or(false, |end| end <= memory)
        };
        if !fits(self.panel_width, self.offset_x, self.memory_width, MAX_COLUMNS)
            || !fits(self.panel_height, self.offset_y, self.memory_height, MAX_ROWS)
        {
            return Err(Error::InvalidDimensions {
                width: self.panel_width,
                height: self.panel_height,
            });
        }
        match self.color_depth {
            Some(depth) if depth.pixel_format().is_none() => Err(Error::InvalidArgument),
            _ => Ok(()),
        }
    }

    /// Transmit the optional commands necessary to put the display into the configuration
    /// encoded in `self`.
    pub(crate) fn send<DI>(&self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: interface::DisplayInterface,
    {
        self.invert_cmd.map_or(Ok(()), |c| c.send(iface))?;
        self.brightness_cmd.map_or(Ok(()), |c| c.send(iface))
    }
}
