/*
 *  lib.rs
 *
 *  screend - worth the squeeze
 *	(c) 2020-26 Stuart Hunter
 *
 *	8 line OLED message display: state engine and screen drivers
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

pub mod config;
pub mod engine;
pub mod glyphs;
pub mod screen;

// Re-exports for convenience
pub use engine::{Engine, EngineError, IMAGE_MARKER};
pub use screen::{
    BoxedScreen, I2cOpener, I2cScreen, MockOpener, MockScreen, MonoImage, Opener, Screen,
    ScreenError, ScreenFactory, COLUMNS, LINES,
};
