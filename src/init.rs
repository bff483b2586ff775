//! The power-on register programming of the RM690B0.
//!
//! The controller keeps its manufacturer registers in pages selected by writing the key
//! `55 AA 52 08` followed by the page number to `0xF000..=0xF004`. Page 1 holds gamma and
//! power settings, page 0 display timing, page 2 oscillator and source driver trims.

use itertools::iproduct;

/// A single `(register, value)` write, sent as `Command::WriteRegister`.
pub type RegisterWrite = (u16, u8);

/// Gamma curve for one color channel. The same curve is loaded into all six gamma register
/// banks `0xD1..=0xD6`, one register per entry.
pub const GAMMA_CURVE: [u8; 53] = [
    0x00, 0x00, 0x1B, 0x44, 0x62, 0x00, 0x7B, 0xA1, 0xC0, 0xEE, 0x55, 0x10, 0x2C, 0x43, 0x57,
    0x55, 0x68, 0x78, 0x87, 0x94, 0x55, 0xA0, 0xAC, 0xB6, 0xC1, 0x55, 0xCB, 0xCD, 0xD6, 0xDF,
    0x95, 0xE8, 0xF1, 0xFA, 0x02, 0xAA, 0x0B, 0x13, 0x1D, 0x26, 0xAA, 0x30, 0x3C, 0x4A, 0x63,
    0xEA, 0x79, 0xA6, 0xD0, 0x20, 0x0F, 0x8E, 0xFF,
];

const GAMMA_BANKS: core::ops::RangeInclusive<u16> = 0xD1..=0xD6;

/// Page 1 after the gamma banks: AVDD/AVEE levels, pump ratios, VGL, gamma reference and
/// VCOM.
const PAGE1_POWER: &[RegisterWrite] = &[
    (0xB000, 0x05),
    (0xB001, 0x05),
    (0xB002, 0x05),
    (0xB100, 0x05),
    (0xB101, 0x05),
    (0xB102, 0x05),
    // AVDD pump ratio
    (0xB600, 0x34),
    (0xB601, 0x34),
    (0xB603, 0x34),
    (0xB700, 0x24),
    (0xB701, 0x24),
    (0xB702, 0x24),
    (0xB800, 0x24),
    (0xB801, 0x24),
    (0xB802, 0x24),
    (0xBA00, 0x14),
    (0xBA01, 0x14),
    (0xBA02, 0x14),
    (0xB900, 0x24),
    (0xB901, 0x24),
    (0xB902, 0x24),
    // VGMP / VGMN = 5.0 V
    (0xBC00, 0x00),
    (0xBC01, 0xA0),
    (0xBC02, 0x00),
    (0xBD00, 0x00),
    (0xBD01, 0xA0),
    (0xBD02, 0x00),
    (0xBE01, 0x3D),
];

/// Page 0: vivid color, Z-inversion, gate equalization, display timing, PWM and back porch.
const PAGE0_TIMING: &[RegisterWrite] = &[
    (0xB400, 0x10),
    (0xBC00, 0x05),
    (0xBC01, 0x05),
    (0xBC02, 0x05),
    (0xB700, 0x22),
    (0xB701, 0x22),
    (0xC80B, 0x2A),
    (0xC80C, 0x2A),
    (0xC80F, 0x2A),
    (0xC810, 0x2A),
    (0xD000, 0x01),
    (0xB300, 0x10),
    (0xBD02, 0x07),
    (0xBE02, 0x07),
    (0xBF02, 0x07),
];

/// Page 2: source regulator, drive strength and oscillator trim.
const PAGE2_TRIM: &[RegisterWrite] = &[(0xC301, 0xA9), (0xFE01, 0x94), (0xF600, 0x60)];

/// Tearing effect line on, V-blank only.
const TEARING_ON: RegisterWrite = (0x3500, 0x00);

/// The five writes that switch the manufacturer command page.
fn select_page(page: u8) -> [RegisterWrite; 5] {
    [
        (0xF000, 0x55),
        (0xF001, 0xAA),
        (0xF002, 0x52),
        (0xF003, 0x08),
        (0xF004, page),
    ]
}

/// Every register write of the initialization sequence, in transmission order.
pub fn sequence() -> impl Iterator<Item = RegisterWrite> {
    let gamma = iproduct!(GAMMA_BANKS, GAMMA_CURVE.iter().enumerate())
        .map(|(bank, (idx, &value))| ((bank << 8) | idx as u16, value));

    IntoIterator::into_iter(select_page(1))
        .chain(gamma)
        .chain(PAGE1_POWER.iter().cloned())
        .chain(IntoIterator::into_iter(select_page(0)))
        .chain(PAGE0_TIMING.iter().cloned())
        .chain(IntoIterator::into_iter(select_page(2)))
        .chain(PAGE2_TRIM.iter().cloned())
        .chain(core::iter::once(TEARING_ON))
}
