/*
 *  screen/image.rs
 *
 *  screend - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  PNG to page-packed monochrome conversion
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

//! Rasterizes a full frame image into the controller's page layout.
//!
//! The panel is written one page at a time, a page being an 8 pixel tall
//! band. Each byte is one column of that band with the most significant bit
//! holding the bottom row. Decoding goes through `tiny_skia::Pixmap` and
//! anything darker than mid grey lights a pixel.

use log::debug;
use tiny_skia::Pixmap;

use crate::screen::error::ScreenError;
use crate::screen::{PAGES, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Luma threshold, pixels below it are drawn
const DARK_THRESHOLD: u32 = 0x80;

/// A frame ready to be written page by page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoImage {
    pages: [[u8; SCREEN_WIDTH]; PAGES],
}

impl MonoImage {
    /// Decode PNG bytes, rejecting anything that is not exactly
    /// `SCREEN_WIDTH` x `SCREEN_HEIGHT`.
    pub fn from_png(data: &[u8]) -> Result<Self, ScreenError> {
        let pixmap = Pixmap::decode_png(data)
            .map_err(|e| ScreenError::Format(format!("Failed to decode PNG: {}", e)))?;
        Self::from_pixmap(&pixmap)
    }

    /// Pack an already decoded pixmap.
    pub fn from_pixmap(pixmap: &Pixmap) -> Result<Self, ScreenError> {
        let (width, height) = (pixmap.width(), pixmap.height());
        if width as usize != SCREEN_WIDTH || height as usize != SCREEN_HEIGHT {
            return Err(ScreenError::Format(format!(
                "Image should have size {}x{}, got {}x{}",
                SCREEN_WIDTH, SCREEN_HEIGHT, width, height
            )));
        }

        let mut pages = [[0u8; SCREEN_WIDTH]; PAGES];
        for (page, columns) in pages.iter_mut().enumerate() {
            let top = (page * 8) as u32;
            for (x, column) in columns.iter_mut().enumerate() {
                let mut packed = 0u8;
                for row in (0..8).rev() {
                    packed <<= 1;
                    if is_dark(pixmap, x as u32, top + row) {
                        packed |= 1;
                    }
                }
                *column = packed;
            }
        }

        debug!("Packed {}x{} image into {} pages", width, height, PAGES);
        Ok(Self { pages })
    }

    /// All pages, top first
    pub fn pages(&self) -> impl Iterator<Item = &[u8; SCREEN_WIDTH]> {
        self.pages.iter()
    }

    /// Number of lit pixels, handy for checks and logging
    pub fn lit_pixels(&self) -> u32 {
        self.pages.iter().flatten().map(|b| b.count_ones()).sum()
    }
}

/// Grey conversion on the premultiplied channels, so transparent reads as black.
fn is_dark(pixmap: &Pixmap, x: u32, y: u32) -> bool {
    match pixmap.pixel(x, y) {
        Some(px) => {
            let luma = (299 * px.red() as u32 + 587 * px.green() as u32 + 114 * px.blue() as u32) / 1000;
            luma < DARK_THRESHOLD
        }
        None => false,
    }
}
