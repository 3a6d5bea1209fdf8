/*
 *  screen/error.rs
 *
 *  screend - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error types for the screen driver
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

use thiserror::Error;

/// Unified error type for all screen operations
#[derive(Debug, Error)]
pub enum ScreenError {
    /// Bus open or controller init failed, fatal to that driver instance
    #[error("Screen connection failed: {0}")]
    Connection(String),

    /// Image input that cannot be shown, nothing was written
    #[error("Image format error: {0}")]
    Format(String),

    /// Write failed part way through a command, the panel may be inconsistent
    #[error("I2C write error: {0}")]
    Io(String),

    /// Operation on a screen that has been closed
    #[error("Screen is closed")]
    Closed,
}

impl ScreenError {
    /// Wrap a bus level error from any embedded-hal implementation
    pub(crate) fn io<E: core::fmt::Debug>(context: &str, err: E) -> Self {
        ScreenError::Io(format!("{}: {:?}", context, err))
    }
}
