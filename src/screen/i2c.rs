/*
 *  screen/i2c.rs
 *
 *  screend - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  SH1106 class OLED over I2C, raw command framing
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

use embedded_hal::i2c::I2c;
use linux_embedded_hal::I2cdev;
use log::{debug, info, warn};

use crate::glyphs::{glyph, signal_icon};
use crate::screen::error::ScreenError;
use crate::screen::factory::BoxedScreen;
use crate::screen::image::MonoImage;
use crate::screen::{prepare_text, Opener, Screen, PAGES};

/// Control byte, the following bytes are commands
const CONTROL_COMMAND: u8 = 0x00;
/// Control byte, the following bytes go to display RAM
const CONTROL_DATA: u8 = 0x40;

const CMD_DISPLAY_OFF: u8 = 0xAE;
const CMD_DISPLAY_ON: u8 = 0xAF;
const CMD_SEGMENT_REMAP: u8 = 0xA1;
const CMD_COM_SCAN_DEC: u8 = 0xC8;
const CMD_START_LINE_0: u8 = 0x40;
const CMD_PAGE_ADDRESS: u8 = 0xB0;
const CMD_COLUMN_HIGH: u8 = 0x10;

/// The controller RAM is 132 columns wide, the glass shows 2..130
pub const RAM_WIDTH: usize = 132;
const COLUMN_BIAS: usize = 2;

/// Default bus and address for the panel
pub const DEFAULT_BUS: &str = "/dev/i2c-1";
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Hardware screen on any embedded-hal I2C bus
///
/// Commands are written exactly as the controller expects them, no
/// framebuffer is kept. Partial writes are not rolled back, after an
/// [`ScreenError::Io`] the caller should assume the panel needs a clear.
pub struct I2cScreen<I: I2c> {
    bus: Option<I>,
    address: u8,
}

impl<I: I2c> I2cScreen<I> {
    /// Take ownership of `bus` and run the controller init sequence
    ///
    /// # Arguments
    ///
    /// * `bus` - an I2C bus with the panel on it
    /// * `address` - 7 bit device address (typically 0x3C or 0x3D)
    pub fn new(bus: I, address: u8) -> Result<Self, ScreenError> {
        let mut screen = Self { bus: Some(bus), address };
        screen.init()?;
        Ok(screen)
    }

    fn init(&mut self) -> Result<(), ScreenError> {
        self.command(&[CMD_DISPLAY_OFF])
            .map_err(|e| ScreenError::Connection(format!("Failed to turn off: {}", e)))?;
        self.command(&[CMD_SEGMENT_REMAP])
            .map_err(|e| ScreenError::Connection(format!("Failed to rotate: {}", e)))?;
        self.command(&[CMD_COM_SCAN_DEC])
            .map_err(|e| ScreenError::Connection(format!("Failed to flip: {}", e)))?;
        self.command(&[CMD_START_LINE_0])
            .map_err(|e| ScreenError::Connection(format!("Failed to set offset: {}", e)))?;
        self.clear_ram()
            .map_err(|e| ScreenError::Connection(format!("Failed to clean: {}", e)))?;
        self.command(&[CMD_DISPLAY_ON])
            .map_err(|e| ScreenError::Connection(format!("Failed to turn on: {}", e)))?;
        Ok(())
    }

    /// Zero every page, including the columns hidden by the bias
    fn clear_ram(&mut self) -> Result<(), ScreenError> {
        let mut empty = [0u8; RAM_WIDTH + 1];
        empty[0] = CONTROL_DATA;
        for page in 0..PAGES {
            self.write(
                &[CONTROL_COMMAND, CMD_PAGE_ADDRESS | page as u8, COLUMN_BIAS as u8, CMD_COLUMN_HIGH],
                "Failed to set page",
            )?;
            self.write(&empty, "Failed to clear page")?;
        }
        Ok(())
    }

    /// Give the bus back, mainly so tests can inspect what was written
    pub fn release(mut self) -> Option<I> {
        self.bus.take()
    }

    fn write(&mut self, bytes: &[u8], context: &str) -> Result<(), ScreenError> {
        let address = self.address;
        let bus = self.bus.as_mut().ok_or(ScreenError::Closed)?;
        bus.write(address, bytes).map_err(|e| ScreenError::io(context, e))
    }

    fn command(&mut self, commands: &[u8]) -> Result<(), ScreenError> {
        let mut frame = Vec::with_capacity(commands.len() + 1);
        frame.push(CONTROL_COMMAND);
        frame.extend_from_slice(commands);
        self.write(&frame, "Failed to send command")
    }

    /// Point the RAM cursor at `page`, pixel column `column` of the glass
    fn set_position(&mut self, page: usize, column: usize) -> Result<(), ScreenError> {
        let col = column + COLUMN_BIAS;
        let frame = [
            CONTROL_COMMAND,
            CMD_PAGE_ADDRESS | (page & 0x07) as u8,
            (col & 0x0F) as u8,
            CMD_COLUMN_HIGH | ((col >> 4) & 0x0F) as u8,
        ];
        self.write(&frame, "Failed to set page and offset")
    }
}

impl<I: I2c + Send> Screen for I2cScreen<I> {
    fn print(&mut self, line: usize, offset: usize, text: &str) -> Result<(), ScreenError> {
        self.set_position(line, offset)?;
        let text = prepare_text(text);
        debug!("i2c print line {} offset {}: {:?}", line, offset, text);
        for ch in text.chars() {
            let mut frame = Vec::with_capacity(7);
            frame.push(CONTROL_DATA);
            frame.extend_from_slice(glyph(ch));
            frame.push(0x00);
            self.write(&frame, &format!("Failed to print {}", ch))?;
        }
        Ok(())
    }

    fn display_signal_level(&mut self, line: usize, offset: usize, level: i32) -> Result<(), ScreenError> {
        self.set_position(line, offset)?;
        let icon = signal_icon(level);
        let mut frame = Vec::with_capacity(icon.len() + 1);
        frame.push(CONTROL_DATA);
        frame.extend_from_slice(icon);
        self.write(&frame, "Failed to display signal level")
    }

    fn display_pages(&mut self, image: &MonoImage) -> Result<(), ScreenError> {
        for (page, columns) in image.pages().enumerate() {
            self.set_position(page, 0)?;
            let mut frame = Vec::with_capacity(columns.len() + 2);
            frame.push(CONTROL_DATA);
            frame.extend_from_slice(columns);
            frame.push(0x00);
            self.write(&frame, "Failed to output")?;
        }
        debug!("i2c image written, {} pixels lit", image.lit_pixels());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ScreenError> {
        self.clear_ram()
    }

    fn close(&mut self) -> Result<(), ScreenError> {
        match self.bus.take() {
            Some(bus) => {
                drop(bus);
                info!("I2C screen at 0x{:02X} closed", self.address);
            }
            None => warn!("Attempt to close an already closed screen"),
        }
        Ok(())
    }
}

/// Opens the panel on a Linux I2C character device
#[derive(Debug, Clone)]
pub struct I2cOpener {
    pub bus: String,
    pub address: u8,
}

impl I2cOpener {
    pub fn new(bus: impl Into<String>, address: u8) -> Self {
        Self { bus: bus.into(), address }
    }
}

impl Default for I2cOpener {
    fn default() -> Self {
        Self::new(DEFAULT_BUS, DEFAULT_ADDRESS)
    }
}

impl Opener for I2cOpener {
    fn open(&self) -> Result<BoxedScreen, ScreenError> {
        info!("Initializing screen on {} at address 0x{:02X}", self.bus, self.address);
        let dev = I2cdev::new(&self.bus)
            .map_err(|e| ScreenError::Connection(format!("Failed to open {}: {}", self.bus, e)))?;
        // on init failure the device is dropped, which closes the fd
        let screen = I2cScreen::new(dev, self.address)?;
        info!("Screen initialized successfully");
        Ok(Box::new(screen))
    }

    fn describe(&self) -> String {
        format!("i2c {} @ 0x{:02X}", self.bus, self.address)
    }
}
