//! The command set of the RM690B0 and its QSPI frame encoding.
//!
//! Note 1: the controller addresses registers with 16 bits. Manufacturer registers use both
//! bytes (`0xF000`, `0xD1xx`, ...), while the MIPI DCS user commands sit in the high byte with
//! a zero low byte, so DCS command `0x2A` is register `0x2A00`. A register write frame is
//! `[0x02, 0x00, reg_hi, reg_lo, params...]` with chip-select held for the whole frame.

use crate::color::ColorDepth;
use crate::interface::DisplayInterface;

pub mod consts {
    /// First byte of a frame that writes a register on the single command lane.
    pub const WRITE_REGISTER: u8 = 0x02;
    /// First byte of a frame that streams pixel data on the quad lanes.
    pub const WRITE_PIXELS: u8 = 0x32;

    pub const SLEEP_IN: u8 = 0x10;
    pub const SLEEP_OUT: u8 = 0x11;
    pub const INVERSION_OFF: u8 = 0x20;
    pub const INVERSION_ON: u8 = 0x21;
    pub const DISPLAY_OFF: u8 = 0x28;
    pub const DISPLAY_ON: u8 = 0x29;
    pub const COLUMN_ADDRESS: u8 = 0x2A;
    pub const ROW_ADDRESS: u8 = 0x2B;
    pub const MEMORY_WRITE: u8 = 0x2C;
    pub const PIXEL_FORMAT: u8 = 0x3A;
    pub const MEMORY_WRITE_CONTINUE: u8 = 0x3C;
    pub const BRIGHTNESS: u8 = 0x51;
}

use self::consts::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Write one byte into a 16-bit addressed register. Used for the manufacturer command pages
    /// during initialization. (Note 1)
    WriteRegister(u16, u8),
    /// Enter sleep mode. The panel stops scanning and the charge pumps shut down.
    SleepIn,
    /// Leave sleep mode. The controller needs 150 ms before it accepts further commands.
    SleepOut,
    /// Display the GRAM contents with every bit inverted, or return to normal.
    SetInversion(bool),
    /// Blank the panel without touching GRAM, or show GRAM again.
    SetDisplayOn(bool),
    /// Set the inclusive column start and end address of the GRAM write window.
    SetColumnAddress(u16, u16),
    /// Set the inclusive row start and end address of the GRAM write window.
    SetRowAddress(u16, u16),
    /// Reset the GRAM write pointer to the window origin.
    MemoryWrite,
    /// Set the interface pixel format. Only depths with a `ColorDepth::pixel_format` value are
    /// accepted.
    SetPixelFormat(ColorDepth),
    /// Set display brightness, 0 (dark) to 255.
    SetBrightness(u8),
}

/// An address pair was out of order, or the requested pixel format has no register value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvalidArgument;

/// Build the 4-byte header addressing `reg` in a frame starting with `lead`.
fn header(lead: u8, reg: u16) -> [u8; 4] {
    let [hi, lo] = reg.to_be_bytes();
    [lead, 0x00, hi, lo]
}

fn dcs(cmd: u8) -> u16 {
    (cmd as u16) << 8
}

impl Command {
    /// Encode the command into `buf` and return the used prefix.
    pub fn encode(self, buf: &mut [u8; 9]) -> Result<&[u8], InvalidArgument> {
        let mut params = [0u8; 4];
        let (reg, n) = match self {
            Command::WriteRegister(reg, value) => {
                params[0] = value;
                (reg, 1)
            }
            Command::SleepIn => (dcs(SLEEP_IN), 0),
            Command::SleepOut => (dcs(SLEEP_OUT), 0),
            Command::SetInversion(true) => (dcs(INVERSION_ON), 0),
            Command::SetInversion(false) => (dcs(INVERSION_OFF), 0),
            Command::SetDisplayOn(true) => (dcs(DISPLAY_ON), 0),
            Command::SetDisplayOn(false) => (dcs(DISPLAY_OFF), 0),
            Command::SetColumnAddress(start, end) | Command::SetRowAddress(start, end) => {
                if start > end {
                    return Err(InvalidArgument);
                }
                let [s_hi, s_lo] = start.to_be_bytes();
                let [e_hi, e_lo] = end.to_be_bytes();
                params = [s_hi, s_lo, e_hi, e_lo];
                let cmd = match self {
                    Command::SetColumnAddress(..) => COLUMN_ADDRESS,
                    _ => ROW_ADDRESS,
                };
                (dcs(cmd), 4)
            }
            Command::MemoryWrite => (dcs(MEMORY_WRITE), 0),
            Command::SetPixelFormat(depth) => {
                params[0] = depth.pixel_format().ok_or(InvalidArgument)?;
                (dcs(PIXEL_FORMAT), 1)
            }
            Command::SetBrightness(level) => {
                params[0] = level;
                (dcs(BRIGHTNESS), 1)
            }
        };
        buf[..4].copy_from_slice(&header(WRITE_REGISTER, reg));
        buf[4..4 + n].copy_from_slice(&params[..n]);
        Ok(&buf[..4 + n])
    }

    /// Send the command as one chip-select framed transaction.
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), crate::error::Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let mut buf = [0u8; 9];
        let frame = self
            .encode(&mut buf)
            .map_err(|_| crate::error::Error::InvalidArgument)?;
        iface.select()?;
        let res = iface
            .write_command(frame)
            .and_then(|_| nb::block!(iface.flush()));
        // Release chip-select before reporting a failed frame.
        let deselect = iface.deselect();
        res?;
        deselect?;
        Ok(())
    }
}

/// The headers that open and close a pixel stream frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PixelWrite {
    /// Start writing at the window origin.
    Start,
    /// Keep writing where the previous stream stopped.
    Continue,
    /// Trailer sent before chip-select is released.
    Stop,
}

impl PixelWrite {
    pub fn header(self) -> [u8; 4] {
        let reg = match self {
            PixelWrite::Start => dcs(MEMORY_WRITE),
            PixelWrite::Continue => dcs(MEMORY_WRITE_CONTINUE),
            PixelWrite::Stop => 0x0000,
        };
        header(WRITE_PIXELS, reg)
    }
}
