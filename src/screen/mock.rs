/*
 *  screen/mock.rs
 *
 *  screend - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Logging screen for running without hardware
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

use log::{info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::screen::error::ScreenError;
use crate::screen::factory::BoxedScreen;
use crate::screen::image::MonoImage;
use crate::screen::{prepare_text, Opener, Screen, LINES};

/// Mock screen
///
/// Performs no bus traffic, every call is logged. It's useful for:
/// - Unit and integration tests
/// - Development machines without an I2C bus
///
/// Everything it was asked to show is recorded in a shared
/// [`MockScreenState`] so tests can inspect it after the engine took
/// ownership of the screen.
#[derive(Debug, Clone)]
pub struct MockScreen {
    state: Arc<Mutex<MockScreenState>>,
}

/// Internal state for the mock screen (shared for inspection in tests)
#[derive(Debug, Default, Clone)]
pub struct MockScreenState {
    /// False once close() was called
    pub open: bool,

    /// Number of times clear() was called
    pub clear_count: usize,

    /// Number of times close() was called
    pub close_count: usize,

    /// Every print as (line, offset, text as rendered)
    pub prints: Vec<(usize, usize, String)>,

    /// Last rendered text per line, cleared by clear() and images
    pub lines: [String; LINES],

    /// Last signal level shown, as (line, offset, level)
    pub last_signal: Option<(usize, usize, i32)>,

    /// Last full frame written
    pub last_image: Option<MonoImage>,

    /// Make every write fail with an I/O error
    pub simulate_write_failure: bool,

    /// Make clear() alone fail, to exercise fallbacks
    pub simulate_clear_failure: bool,
}

impl MockScreen {
    /// Create an open mock screen
    pub fn new() -> Self {
        let state = MockScreenState { open: true, ..Default::default() };
        info!("Mock screen opened");
        Self { state: Arc::new(Mutex::new(state)) }
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockScreenState>> {
        Arc::clone(&self.state)
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> MockScreenState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockScreenState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the state and fail the same way the hardware would
    fn writable(&self) -> Result<MutexGuard<'_, MockScreenState>, ScreenError> {
        let state = self.lock();
        if !state.open {
            return Err(ScreenError::Closed);
        }
        if state.simulate_write_failure {
            return Err(ScreenError::Io("Simulated write failure".to_string()));
        }
        Ok(state)
    }
}

impl Default for MockScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for MockScreen {
    fn print(&mut self, line: usize, offset: usize, text: &str) -> Result<(), ScreenError> {
        let mut state = self.writable()?;
        let rendered = prepare_text(text);
        info!(
            "Mock screen is now displaying message \"{}\" at line {}, offset {}",
            rendered.trim_end(),
            line,
            offset
        );
        state.lines[line & 0x07] = rendered.clone();
        state.prints.push((line, offset, rendered));
        Ok(())
    }

    fn display_signal_level(&mut self, line: usize, offset: usize, level: i32) -> Result<(), ScreenError> {
        let mut state = self.writable()?;
        info!("Mock screen is now displaying signal level {} at line {}, offset {}", level, line, offset);
        state.last_signal = Some((line, offset, level));
        Ok(())
    }

    fn display_pages(&mut self, image: &MonoImage) -> Result<(), ScreenError> {
        let mut state = self.writable()?;
        info!("Mock screen is now displaying an image with {} pixels lit", image.lit_pixels());
        state.lines = Default::default();
        state.last_image = Some(image.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ScreenError> {
        let mut state = self.writable()?;
        if state.simulate_clear_failure {
            return Err(ScreenError::Io("Simulated clear failure".to_string()));
        }
        state.clear_count += 1;
        state.lines = Default::default();
        state.last_image = None;
        info!("Mock screen cleared");
        Ok(())
    }

    fn close(&mut self) -> Result<(), ScreenError> {
        let mut state = self.lock();
        if !state.open {
            warn!("Attempt to close an already closed screen");
        }
        state.open = false;
        state.close_count += 1;
        info!("Mock screen closed");
        Ok(())
    }
}

/// Opens a [`MockScreen`], optionally handing out a shared view of its state
#[derive(Debug, Clone, Default)]
pub struct MockOpener {
    state: Arc<Mutex<Option<Arc<Mutex<MockScreenState>>>>>,
}

impl MockOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of the most recently opened screen, if any
    pub fn last_opened(&self) -> Option<Arc<Mutex<MockScreenState>>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Opener for MockOpener {
    fn open(&self) -> Result<BoxedScreen, ScreenError> {
        let screen = MockScreen::new();
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = Some(screen.state());
        Ok(Box::new(screen))
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}
