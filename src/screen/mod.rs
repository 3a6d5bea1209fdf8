/*
 *  screen/mod.rs
 *
 *  screend - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Screen driver abstraction for the 128x64 text/graphics OLED
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

pub mod error;
pub mod factory;
pub mod i2c;
pub mod image;
pub mod mock;

pub use error::ScreenError;
pub use factory::{BoxedScreen, ScreenFactory};
pub use i2c::{I2cOpener, I2cScreen};
pub use image::MonoImage;
pub use mock::{MockOpener, MockScreen, MockScreenState};

/// Visible width in pixels
pub const SCREEN_WIDTH: usize = 128;

/// Visible height in pixels
pub const SCREEN_HEIGHT: usize = 64;

/// 8 pixel tall bands, one per text line
pub const PAGES: usize = SCREEN_HEIGHT / 8;

/// Text lines, one per page
pub const LINES: usize = PAGES;

/// Characters per text line (6 columns each, glyph plus spacer)
pub const COLUMNS: usize = 21;

/// Minimal hardware abstraction - every screen variant implements this
///
/// `line` is a page index and `offset` a pixel column. Both are masked to
/// the panel by the driver, they are not validated here.
pub trait Screen: Send {
    /// Render `text` on `line` starting at pixel column `offset`.
    ///
    /// Text past [`COLUMNS`] characters is dropped, lowercase is folded to
    /// uppercase and anything outside the font renders as the unknown glyph.
    fn print(&mut self, line: usize, offset: usize, text: &str) -> Result<(), ScreenError>;

    /// Render one of the signal level icons, `level` is clamped.
    fn display_signal_level(&mut self, line: usize, offset: usize, level: i32) -> Result<(), ScreenError>;

    /// Write an already rasterized frame.
    fn display_pages(&mut self, image: &MonoImage) -> Result<(), ScreenError>;

    /// Decode a PNG and write it as a full frame.
    ///
    /// Images that are not exactly [`SCREEN_WIDTH`] x [`SCREEN_HEIGHT`] are
    /// rejected with [`ScreenError::Format`] before anything is written.
    fn display_image(&mut self, png: &[u8]) -> Result<(), ScreenError> {
        let image = MonoImage::from_png(png)?;
        self.display_pages(&image)
    }

    /// Blank the whole display RAM.
    fn clear(&mut self) -> Result<(), ScreenError>;

    /// Release the connection. Closing twice is logged, never an error.
    fn close(&mut self) -> Result<(), ScreenError>;
}

/// Strategy for opening a connection to a screen
pub trait Opener {
    /// Open and initialise the screen
    fn open(&self) -> Result<BoxedScreen, ScreenError>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Clip to [`COLUMNS`] characters and fold to the font's case.
pub(crate) fn prepare_text(text: &str) -> String {
    let clipped: String = text.chars().take(COLUMNS).collect();
    clipped.to_uppercase().chars().take(COLUMNS).collect()
}
