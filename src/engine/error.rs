/*
 *  engine/error.rs
 *
 *  screend - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Errors reported by the display state engine
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

use crate::screen::{ScreenError, LINES};

/// Everything the engine reports to its callers
///
/// `NotConnected` and `Driver` are hardware failures, the line model has
/// already been updated when they are returned.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No screen, either it never connected or it was shut down
    #[error("screen not connected")]
    NotConnected,

    /// The screen rejected or failed a write
    #[error("screen write failed: {0}")]
    Driver(#[source] ScreenError),

    /// Image input rejected before anything changed
    #[error("unusable image: {0}")]
    Format(String),

    /// Only returned by the checked read
    #[error("line {0} is out of range (0..{max})", max = LINES)]
    LineOutOfRange(usize),
}

impl EngineError {
    /// True for the hardware side failures, model state is still valid
    pub fn is_driver_error(&self) -> bool {
        matches!(self, EngineError::NotConnected | EngineError::Driver(_))
    }
}

impl From<ScreenError> for EngineError {
    fn from(err: ScreenError) -> Self {
        match err {
            ScreenError::Format(msg) => EngineError::Format(msg),
            other => EngineError::Driver(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_is_not_a_driver_error() {
        let err = EngineError::from(ScreenError::Format("Image should have size 128x64".into()));
        assert!(matches!(err, EngineError::Format(_)));
        assert!(!err.is_driver_error());
    }

    #[test]
    fn test_io_maps_to_driver() {
        let err = EngineError::from(ScreenError::Io("boom".into()));
        assert!(err.is_driver_error());
        assert_eq!(err.to_string(), "screen write failed: I2C write error: boom");
    }

    #[test]
    fn test_range_message() {
        assert_eq!(EngineError::LineOutOfRange(9).to_string(), "line 9 is out of range (0..8)");
    }
}
