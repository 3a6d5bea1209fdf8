/*
 *  glyphs.rs
 *
 *  screend - worth the squeeze
 *	(c) 2020-26 Stuart Hunter
 *
 *	5x8 column font and signal icons for the 21 column text grid
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

/// Columns per glyph, the spacer column is added by the driver
pub const GLYPH_WIDTH: usize = 5;

/// Columns per signal level icon
pub const SIGNAL_WIDTH: usize = 13;

/// Number of discrete signal levels
pub const SIGNAL_LEVELS: usize = 4;

/// First character covered by the font
const FIRST_CHAR: u32 = ' ' as u32;

/// Column patterns, LSB is the top pixel row. Indexed from `' '`.
const FONT: [[u8; GLYPH_WIDTH]; 65] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // space
    [0x00, 0x00, 0xBE, 0x00, 0x00], // !
    [0x00, 0x06, 0x00, 0x06, 0x00], // "
    [0x28, 0xFE, 0x28, 0xFE, 0x28], // #
    [0x00, 0x5C, 0xFE, 0x74, 0x00], // $
    [0x0C, 0x2C, 0x10, 0x68, 0x60], // %
    [0x48, 0xB4, 0xA4, 0x40, 0xA0], // &
    [0x00, 0x00, 0x06, 0x00, 0x00], // '
    [0x00, 0x00, 0x7C, 0x82, 0x00], // (
    [0x00, 0x82, 0x7C, 0x00, 0x00], // )
    [0x6C, 0x38, 0x7C, 0x38, 0x6C], // *
    [0x10, 0x10, 0x7C, 0x10, 0x10], // +
    [0x00, 0x80, 0xE0, 0x60, 0x00], // ,
    [0x10, 0x10, 0x10, 0x10, 0x10], // -
    [0x00, 0x00, 0xC0, 0xC0, 0x00], // .
    [0x80, 0x60, 0x10, 0x0C, 0x02], // /
    [0x7C, 0xA2, 0x92, 0x8A, 0x7C], // 0
    [0x00, 0x84, 0xFE, 0x80, 0x00], // 1
    [0xE4, 0x92, 0x92, 0x92, 0x8C], // 2
    [0x44, 0x92, 0x92, 0x92, 0x6C], // 3
    [0x30, 0x28, 0x24, 0xFE, 0x20], // 4
    [0x5E, 0x92, 0x92, 0x92, 0x62], // 5
    [0x7C, 0x92, 0x92, 0x92, 0x64], // 6
    [0x06, 0x02, 0xE2, 0x12, 0x0E], // 7
    [0x6C, 0x92, 0x92, 0x92, 0x6C], // 8
    [0x4C, 0x92, 0x92, 0x92, 0x7C], // 9
    [0x00, 0x00, 0x6C, 0x6C, 0x00], // :
    [0x00, 0x80, 0xEC, 0x6C, 0x00], // ;
    [0x10, 0x28, 0x28, 0x44, 0x44], // <
    [0x28, 0x28, 0x28, 0x28, 0x28], // =
    [0x44, 0x44, 0x28, 0x28, 0x10], // >
    [0x04, 0x02, 0xA2, 0x12, 0x0C], // ?
    [0x7C, 0x82, 0xBA, 0xAA, 0xBC], // @
    [0xF8, 0x24, 0x22, 0x24, 0xF8], // A
    [0xFE, 0x92, 0x92, 0x92, 0x6C], // B
    [0x7C, 0x82, 0x82, 0x82, 0x44], // C
    [0x82, 0xFE, 0x82, 0x82, 0x7C], // D
    [0xFE, 0x92, 0x92, 0x92, 0x82], // E
    [0xFE, 0x12, 0x12, 0x12, 0x02], // F
    [0x7C, 0x82, 0x82, 0xA2, 0x64], // G
    [0xFE, 0x10, 0x10, 0x10, 0xFE], // H
    [0x00, 0x82, 0xFE, 0x82, 0x00], // I
    [0x40, 0x80, 0x82, 0x7E, 0x02], // J
    [0xFE, 0x10, 0x28, 0x44, 0x82], // K
    [0xFE, 0x80, 0x80, 0x80, 0x80], // L
    [0xFE, 0x0C, 0x18, 0x0C, 0xFE], // M
    [0xFE, 0x0C, 0x38, 0x60, 0xFE], // N
    [0x7C, 0x82, 0x82, 0x82, 0x7C], // O
    [0xFE, 0x12, 0x12, 0x12, 0x0C], // P
    [0x7C, 0x82, 0xA2, 0xC2, 0xFC], // Q
    [0xFE, 0x12, 0x32, 0x52, 0x8C], // R
    [0x4C, 0x92, 0x92, 0x92, 0x64], // S
    [0x02, 0x02, 0xFE, 0x02, 0x02], // T
    [0x7E, 0x80, 0x80, 0x80, 0x7E], // U
    [0x1E, 0x60, 0x80, 0x60, 0x1E], // V
    [0x7E, 0x80, 0x70, 0x80, 0x7E], // W
    [0xC6, 0x28, 0x10, 0x28, 0xC6], // X
    [0x0E, 0x10, 0xE0, 0x10, 0x0E], // Y
    [0xC6, 0xA2, 0x92, 0x8A, 0xC6], // Z
    [0x00, 0x00, 0xFE, 0x82, 0x00], // [
    [0x02, 0x0C, 0x10, 0x60, 0x80], // \
    [0x00, 0x82, 0xFE, 0x00, 0x00], // ]
    [0x1C, 0x3E, 0xFC, 0x3E, 0x1C], // ^ drawn as a heart
    [0x80, 0x80, 0x80, 0x80, 0x80], // _
    [0x00, 0x02, 0x06, 0x00, 0x00], // `
];

/// Boxed outline shown for anything the font does not cover
pub const GLYPH_UNKNOWN: [u8; GLYPH_WIDTH] = [0xFE, 0x82, 0x92, 0x82, 0xFE];

const SIGNAL_ICONS: [[u8; SIGNAL_WIDTH]; SIGNAL_LEVELS] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    [0x00, 0x00, 0x00, 0x00, 0x40, 0x20, 0xA0, 0x20, 0x40, 0x00, 0x00, 0x00, 0x00],
    [0x00, 0x00, 0x20, 0x10, 0x48, 0x28, 0xA4, 0x28, 0x48, 0x10, 0x20, 0x00, 0x00],
    [0x10, 0x08, 0x24, 0x12, 0x4A, 0x29, 0xA5, 0x29, 0x4A, 0x12, 0x24, 0x08, 0x10],
];

/// Look up the column pattern for `ch`.
///
/// There are no lowercase entries, callers upper-case first. Anything
/// outside `' '..='`'` gets [`GLYPH_UNKNOWN`].
pub fn glyph(ch: char) -> &'static [u8; GLYPH_WIDTH] {
    (ch as u32)
        .checked_sub(FIRST_CHAR)
        .and_then(|idx| FONT.get(idx as usize))
        .unwrap_or(&GLYPH_UNKNOWN)
}

/// Signal icon for `level`, clamped into `0..SIGNAL_LEVELS`.
pub fn signal_icon(level: i32) -> &'static [u8; SIGNAL_WIDTH] {
    let idx = level.clamp(0, SIGNAL_LEVELS as i32 - 1) as usize;
    &SIGNAL_ICONS[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_covers_printable_range() {
        assert_eq!(glyph(' '), &[0x00; GLYPH_WIDTH]);
        assert_eq!(glyph('A'), &[0xF8, 0x24, 0x22, 0x24, 0xF8]);
        assert_eq!(glyph('0'), &[0x7C, 0xA2, 0x92, 0x8A, 0x7C]);
        assert_eq!(glyph('`'), &[0x00, 0x02, 0x06, 0x00, 0x00]);
    }

    #[test]
    fn test_glyph_unknown_outside_table() {
        // lowercase is past the table, so is control and non-ascii input
        assert_eq!(glyph('a'), &GLYPH_UNKNOWN);
        assert_eq!(glyph('{'), &GLYPH_UNKNOWN);
        assert_eq!(glyph('\n'), &GLYPH_UNKNOWN);
        assert_eq!(glyph('é'), &GLYPH_UNKNOWN);
    }

    #[test]
    fn test_signal_icon_clamps() {
        assert_eq!(signal_icon(-5), &SIGNAL_ICONS[0]);
        assert_eq!(signal_icon(2), &SIGNAL_ICONS[2]);
        assert_eq!(signal_icon(99), &SIGNAL_ICONS[SIGNAL_LEVELS - 1]);
    }
}
