/*
 *  screen/factory.rs
 *
 *  screend - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Picks and opens a screen from configuration
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

use crate::config::{BusConfig, DisplayConfig, DriverKind};
use crate::screen::error::ScreenError;
use crate::screen::i2c::I2cOpener;
use crate::screen::mock::MockOpener;
use crate::screen::{Opener, Screen};
use log::{debug, info};

/// Type alias for boxed screen trait objects
pub type BoxedScreen = Box<dyn Screen>;

/// Factory for creating screens from configuration
pub struct ScreenFactory;

impl ScreenFactory {
    /// Open a connection through the given strategy
    pub fn open(opener: &dyn Opener) -> Result<BoxedScreen, ScreenError> {
        info!("Opening screen via {}", opener.describe());
        opener.open()
    }

    /// Select the opener described by `config`
    ///
    /// No driver means the hardware panel, no bus means the default
    /// `/dev/i2c-1` at 0x3C.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let config = DisplayConfig {
    ///     driver: Some(DriverKind::Sh1106),
    ///     bus: Some(BusConfig::I2c {
    ///         bus: "/dev/i2c-1".to_string(),
    ///         address: 0x3C,
    ///     }),
    /// };
    ///
    /// let opener = ScreenFactory::opener_from_config(&config);
    /// ```
    pub fn opener_from_config(config: &DisplayConfig) -> Box<dyn Opener + Send + Sync> {
        match config.driver.as_ref().unwrap_or(&DriverKind::Sh1106) {
            DriverKind::Mock => {
                debug!("Mock driver selected, bus configuration ignored");
                Box::new(MockOpener::new())
            }
            DriverKind::Sh1106 => match config.bus.as_ref() {
                Some(BusConfig::I2c { bus, address }) => Box::new(I2cOpener::new(bus.clone(), *address)),
                None => Box::new(I2cOpener::default()),
            },
        }
    }

    /// Create a screen from configuration
    pub fn create_from_config(config: &DisplayConfig) -> Result<BoxedScreen, ScreenError> {
        Self::open(Self::opener_from_config(config).as_ref())
    }
}
