/*
 *  engine/mod.rs
 *
 *  screend - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display state engine: the 8 line model, its writers and expiry
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

//! The engine owns what every line of the display shows and the one
//! connection to the screen. All state sits behind a single async mutex
//! that every operation holds for its whole duration, reads included.
//!
//! Temporary content is reverted by a spawned task per line, plus one for
//! the whole frame. Arming a new expiry aborts the task it replaces. A task
//! that still gets to run re-checks, under the lock, that the slot carries
//! the instant it was armed with and leaves the slot alone otherwise.
//!
//! The model is the source of truth. Hardware failures are reported to the
//! caller but never undo a model update, so an engine without a screen
//! still answers reads.

pub mod error;
pub mod slot;

use std::sync::{Arc, Weak};
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::config::EngineConfig;
use crate::screen::{BoxedScreen, MonoImage, Opener, ScreenError, ScreenFactory, COLUMNS, LINES};

pub use error::EngineError;
pub use slot::Slot;

/// Model text for lines covered by an image
pub const IMAGE_MARKER: &str = "<IMAGE>";

/// Shown when the shutdown clear fails
const SHUTDOWN_MESSAGE: &str = "Shutting down...";

/// Deadline used when `now + duration` does not fit in an [`Instant`]
const DISTANT_FUTURE: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// `now + duration`, saturating at [`DISTANT_FUTURE`]
fn deadline_after(duration: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(duration.min(DISTANT_FUTURE)).unwrap_or(now)
}

/// Appended to every line so leftovers from longer text are overwritten
fn padded(text: &str) -> String {
    format!("{}{}", text, " ".repeat(COLUMNS))
}

/// Handle to the display state engine
///
/// Cheap to clone, every clone talks to the same model and screen. Build
/// one at startup with [`Engine::connect`] and hand clones to consumers.
#[derive(Clone)]
pub struct Engine {
    shared: Arc<Shared>,
}

struct Shared {
    frame: Mutex<FrameState>,
    grace: Duration,
}

struct FrameState {
    slots: [Slot; LINES],
    cursor: usize,
    screen: Option<BoxedScreen>,
    connection_error: Option<String>,
    line_timers: [Option<JoinHandle<()>>; LINES],
    frame_timer: Option<JoinHandle<()>>,
}

impl FrameState {
    fn screen(&mut self) -> Result<&mut BoxedScreen, EngineError> {
        self.screen.as_mut().ok_or(EngineError::NotConnected)
    }

    fn render_line(&mut self, line: usize) -> Result<(), EngineError> {
        let text = padded(&self.slots[line].text);
        self.screen()?.print(line, 0, &text)?;
        Ok(())
    }

    fn cancel_line_timer(&mut self, line: usize) {
        if let Some(timer) = self.line_timers[line].take() {
            timer.abort();
        }
    }

    fn cancel_all_timers(&mut self) {
        for line in 0..LINES {
            self.cancel_line_timer(line);
        }
        if let Some(timer) = self.frame_timer.take() {
            timer.abort();
        }
    }

    /// Reset `line` to empty and blank it on the panel, failures are logged
    fn revert(&mut self, line: usize) {
        self.slots[line] = Slot::default();
        if self.screen.is_none() {
            return;
        }
        if let Err(e) = self.render_line(line) {
            error!("Failed to erase line {}: {}", line, e);
        }
    }
}

impl Engine {
    /// Build an engine around the outcome of opening a screen
    ///
    /// A failed open is recorded and the engine runs without hardware:
    /// every write still updates the model and then reports
    /// [`EngineError::NotConnected`].
    pub fn new(screen: Result<BoxedScreen, ScreenError>, config: &EngineConfig) -> Self {
        let (screen, connection_error) = match screen {
            Ok(screen) => (Some(screen), None),
            Err(e) => {
                warn!("Screen unavailable, continuing without hardware: {}", e);
                (None, Some(e.to_string()))
            }
        };

        let frame = FrameState {
            slots: Default::default(),
            cursor: 0,
            screen,
            connection_error,
            line_timers: Default::default(),
            frame_timer: None,
        };

        Self {
            shared: Arc::new(Shared { frame: Mutex::new(frame), grace: config.grace() }),
        }
    }

    /// Open the screen through `opener` and wrap it
    pub fn connect(opener: &dyn Opener, config: &EngineConfig) -> Self {
        Self::new(ScreenFactory::open(opener), config)
    }

    /// True while a screen connection is held
    pub async fn is_connected(&self) -> bool {
        self.shared.frame.lock().await.screen.is_some()
    }

    /// Why the connection could not be made, if it failed
    pub async fn connection_error(&self) -> Option<String> {
        self.shared.frame.lock().await.connection_error.clone()
    }

    /// Text on `line`, empty for lines that do not exist
    pub async fn get_line(&self, line: usize) -> String {
        let frame = self.shared.frame.lock().await;
        frame.slots.get(line).map(|slot| slot.text.clone()).unwrap_or_default()
    }

    /// Like [`Engine::get_line`] but tells a missing line from an empty one
    pub async fn try_get_line(&self, line: usize) -> Result<String, EngineError> {
        let frame = self.shared.frame.lock().await;
        frame
            .slots
            .get(line)
            .map(|slot| slot.text.clone())
            .ok_or(EngineError::LineOutOfRange(line))
    }

    /// Text of every line, top first
    pub async fn lines(&self) -> [String; LINES] {
        let frame = self.shared.frame.lock().await;
        frame.slots.clone().map(|slot| slot.text)
    }

    /// Latest instant any temporary content is due to expire
    pub async fn last_expiry(&self) -> Option<Instant> {
        let frame = self.shared.frame.lock().await;
        frame.slots.iter().filter_map(|slot| slot.expires_at).max()
    }

    /// Put `text` on `line` until something replaces it
    pub async fn set_line(&self, text: &str, line: usize) -> Result<(), EngineError> {
        if line >= LINES {
            warn!("Ignoring message for line {}, only 0..{} exist", line, LINES);
            return Ok(());
        }
        let mut frame = self.shared.frame.lock().await;
        Self::write_permanent(&mut frame, text, line)
    }

    /// Put `text` on `line` and erase it after `duration`
    ///
    /// A zero duration expires as soon as the grace period has passed.
    /// Any later write to the line supersedes the pending erase.
    pub async fn set_line_temporary(&self, text: &str, line: usize, duration: Duration) -> Result<(), EngineError> {
        if line >= LINES {
            warn!("Ignoring message for line {}, only 0..{} exist", line, LINES);
            return Ok(());
        }
        let mut frame = self.shared.frame.lock().await;
        info!("Displaying message \"{}\" on line {} for {:?}...", text, line, duration);

        let expires_at = deadline_after(duration);
        frame.slots[line] = Slot::temporary(text, expires_at);
        let timer = tokio::spawn(revert_line(Arc::downgrade(&self.shared), line, expires_at, self.shared.grace));
        if let Some(previous) = frame.line_timers[line].replace(timer) {
            previous.abort();
        }
        frame.render_line(line)
    }

    /// Blank `line`, cancelling anything pending on it
    pub async fn clear_line(&self, line: usize) -> Result<(), EngineError> {
        if line >= LINES {
            warn!("Ignoring clear for line {}, only 0..{} exist", line, LINES);
            return Ok(());
        }
        let mut frame = self.shared.frame.lock().await;
        info!("Clearing message on line {}...", line);
        Self::write_permanent(&mut frame, "", line)
    }

    /// Write `text` on the next line in round-robin order
    ///
    /// The cursor moves and the line is written under one lock, so
    /// concurrent appends always land on different lines.
    pub async fn append_line(&self, text: &str) -> Result<(), EngineError> {
        let mut frame = self.shared.frame.lock().await;
        let line = frame.cursor;
        frame.cursor = (line + 1) % LINES;
        Self::write_permanent(&mut frame, text, line)
    }

    /// Blank every line and the whole panel
    pub async fn clear_all(&self) -> Result<(), EngineError> {
        let mut frame = self.shared.frame.lock().await;
        info!("Clearing screen...");
        frame.cancel_all_timers();
        frame.slots = Default::default();
        frame.screen()?.clear()?;
        Ok(())
    }

    /// Show a 128x64 PNG until something replaces it
    ///
    /// The image is checked before anything changes, a rejected image
    /// leaves every line as it was.
    pub async fn display_image(&self, png: &[u8]) -> Result<(), EngineError> {
        let image = MonoImage::from_png(png)?;
        let mut frame = self.shared.frame.lock().await;
        info!("Displaying image...");
        frame.cancel_all_timers();
        frame.slots = std::array::from_fn(|_| Slot::permanent(IMAGE_MARKER));
        frame.screen()?.display_pages(&image)?;
        Ok(())
    }

    /// Show a 128x64 PNG for `duration`
    ///
    /// On expiry only the lines still showing the image are blanked, a
    /// line written in the meantime keeps its text.
    pub async fn display_image_temporary(&self, png: &[u8], duration: Duration) -> Result<(), EngineError> {
        let image = MonoImage::from_png(png)?;
        let mut frame = self.shared.frame.lock().await;
        info!("Displaying image for {:?}...", duration);

        let expires_at = deadline_after(duration);
        frame.cancel_all_timers();
        frame.slots = std::array::from_fn(|_| Slot::temporary(IMAGE_MARKER, expires_at));
        frame.frame_timer = Some(tokio::spawn(revert_frame(
            Arc::downgrade(&self.shared),
            expires_at,
            self.shared.grace,
        )));
        frame.screen()?.display_pages(&image)?;
        Ok(())
    }

    /// Blank the panel and let go of it
    ///
    /// Pending expiries are cancelled and the model keeps the text it held,
    /// as permanent content. If the clear fails a last message is attempted
    /// instead, errors are only logged. Safe to call more than once, reads
    /// keep working.
    pub async fn shutdown(&self) {
        let mut frame = self.shared.frame.lock().await;
        frame.cancel_all_timers();
        for slot in frame.slots.iter_mut().filter(|slot| slot.is_temporary()) {
            slot.expires_at = None;
        }
        let Some(mut screen) = frame.screen.take() else {
            debug!("Shutdown requested, screen already released");
            return;
        };
        info!("Shutting down...");
        if let Err(e) = screen.clear() {
            warn!("Failed to clear screen on shutdown: {}", e);
            if let Err(e) = screen.print(0, 0, &padded(SHUTDOWN_MESSAGE)) {
                warn!("Failed to show shutdown message: {}", e);
            }
        }
        if let Err(e) = screen.close() {
            warn!("Failed to close screen: {}", e);
        }
    }

    fn write_permanent(frame: &mut FrameState, text: &str, line: usize) -> Result<(), EngineError> {
        if !text.is_empty() {
            info!("Displaying message \"{}\" on line {}...", text, line);
        }
        frame.cancel_line_timer(line);
        frame.slots[line] = Slot::permanent(text);
        frame.render_line(line)
    }
}

/// Erase `line` once `expires_at` has passed, unless it was rewritten
async fn revert_line(shared: Weak<Shared>, line: usize, expires_at: Instant, grace: Duration) {
    sleep_until(expires_at.checked_add(grace).unwrap_or(expires_at)).await;
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let mut frame = shared.frame.lock().await;
    if !frame.slots[line].armed_at(expires_at) {
        debug!("Expiry for line {} superseded", line);
        return;
    }
    info!("Erasing message on line {}...", line);
    // this task's own handle, dropping it detaches nothing else
    frame.line_timers[line] = None;
    frame.revert(line);
}

/// Erase every line still carrying the image expiry
async fn revert_frame(shared: Weak<Shared>, expires_at: Instant, grace: Duration) {
    sleep_until(expires_at.checked_add(grace).unwrap_or(expires_at)).await;
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let mut frame = shared.frame.lock().await;
    info!("Erasing image");
    frame.frame_timer = None;
    for line in 0..LINES {
        if frame.slots[line].armed_at(expires_at) {
            frame.revert(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::image::tests::png_with_dark_pixels;
    use crate::screen::{MockScreen, MockScreenState};
    use std::sync::Mutex as StdMutex;

    const GRACE: Duration = Duration::from_millis(10);

    fn engine_with_mock() -> (Engine, Arc<StdMutex<MockScreenState>>) {
        let mock = MockScreen::new();
        let state = mock.state();
        (Engine::new(Ok(Box::new(mock)), &EngineConfig::default()), state)
    }

    fn disconnected() -> Engine {
        Engine::new(Err(ScreenError::Connection("no bus".into())), &EngineConfig::default())
    }

    fn rendered(state: &Arc<StdMutex<MockScreenState>>, line: usize) -> String {
        state.lock().unwrap().lines[line].trim_end().to_string()
    }

    #[tokio::test]
    async fn test_new_engine_is_empty() {
        let (engine, _) = engine_with_mock();
        assert!(engine.is_connected().await);
        assert!(engine.connection_error().await.is_none());
        assert_eq!(engine.lines().await, <[String; LINES]>::default());
        assert!(engine.last_expiry().await.is_none());
    }

    #[tokio::test]
    async fn test_set_line_renders_padded() {
        let (engine, state) = engine_with_mock();
        engine.set_line("hello", 3).await.unwrap();

        assert_eq!(engine.get_line(3).await, "hello");
        let state = state.lock().unwrap();
        let (line, offset, text) = state.prints.last().unwrap();
        assert_eq!((*line, *offset), (3, 0));
        assert_eq!(text.len(), COLUMNS);
        assert_eq!(text.trim_end(), "HELLO");
    }

    #[tokio::test]
    async fn test_set_line_without_screen_keeps_model() {
        let engine = disconnected();
        assert!(!engine.is_connected().await);
        assert_eq!(engine.connection_error().await.as_deref(), Some("Screen connection failed: no bus"));

        for line in 0..LINES {
            let err = engine.set_line(&format!("line {}", line), line).await.unwrap_err();
            assert!(matches!(err, EngineError::NotConnected));
        }
        for line in 0..LINES {
            assert_eq!(engine.get_line(line).await, format!("line {}", line));
        }
    }

    #[tokio::test]
    async fn test_driver_failure_keeps_model() {
        let (engine, state) = engine_with_mock();
        state.lock().unwrap().simulate_write_failure = true;

        let err = engine.set_line("still here", 1).await.unwrap_err();
        assert!(matches!(err, EngineError::Driver(ScreenError::Io(_))));
        assert_eq!(engine.get_line(1).await, "still here");
    }

    #[tokio::test]
    async fn test_out_of_range_is_ignored() {
        let (engine, state) = engine_with_mock();
        engine.set_line("nowhere", 8).await.unwrap();
        engine.set_line_temporary("nowhere", 42, Duration::from_secs(1)).await.unwrap();
        engine.clear_line(9).await.unwrap();

        assert_eq!(engine.get_line(8).await, "");
        assert!(matches!(engine.try_get_line(8).await, Err(EngineError::LineOutOfRange(8))));
        assert_eq!(engine.try_get_line(0).await.unwrap(), "");
        assert!(state.lock().unwrap().prints.is_empty());
    }

    #[tokio::test]
    async fn test_clear_line() {
        let (engine, state) = engine_with_mock();
        engine.set_line("gone soon", 5).await.unwrap();
        engine.clear_line(5).await.unwrap();

        assert_eq!(engine.get_line(5).await, "");
        let state = state.lock().unwrap();
        let (_, _, text) = state.prints.last().unwrap();
        assert_eq!(text, &" ".repeat(COLUMNS));
    }

    #[tokio::test]
    async fn test_append_wraps() {
        let (engine, _) = engine_with_mock();
        for i in 0..LINES {
            engine.append_line(&format!("msg {}", i)).await.unwrap();
        }
        for i in 0..LINES {
            assert_eq!(engine.get_line(i).await, format!("msg {}", i));
        }

        engine.append_line("wrapped").await.unwrap();
        assert_eq!(engine.get_line(0).await, "wrapped");
        assert_eq!(engine.get_line(1).await, "msg 1");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_use_distinct_lines() {
        let (engine, _) = engine_with_mock();
        let tasks: Vec<_> = (0..LINES)
            .map(|i| {
                let engine = engine.clone();
                tokio::spawn(async move { engine.append_line(&format!("task {}", i)).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let mut lines = engine.lines().await.to_vec();
        lines.sort();
        let mut expected: Vec<String> = (0..LINES).map(|i| format!("task {}", i)).collect();
        expected.sort();
        assert_eq!(lines, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_temporary_message_expires() {
        let (engine, state) = engine_with_mock();
        engine.set_line_temporary("X", 2, Duration::from_secs(1)).await.unwrap();
        assert_eq!(engine.get_line(2).await, "X");
        assert_eq!(rendered(&state, 2), "X");

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(engine.get_line(2).await, "X");

        tokio::time::sleep(Duration::from_millis(500) + GRACE * 2).await;
        assert_eq!(engine.get_line(2).await, "");
        assert_eq!(rendered(&state, 2), "");
        assert!(engine.last_expiry().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_expires_after_grace() {
        let (engine, _) = engine_with_mock();
        engine.set_line_temporary("blink", 0, Duration::ZERO).await.unwrap();
        assert_eq!(engine.get_line(0).await, "blink");

        tokio::time::sleep(GRACE * 2).await;
        assert_eq!(engine.get_line(0).await, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_write_supersedes_expiry() {
        let (engine, _) = engine_with_mock();
        engine.set_line_temporary("X", 4, Duration::from_secs(5)).await.unwrap();
        engine.set_line("Y", 4).await.unwrap();

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(engine.get_line(4).await, "Y");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_uses_latest_expiry() {
        let (engine, _) = engine_with_mock();
        engine.set_line_temporary("first", 1, Duration::from_secs(5)).await.unwrap();
        engine.set_line_temporary("second", 1, Duration::from_secs(10)).await.unwrap();

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(engine.get_line(1).await, "second");

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(engine.get_line(1).await, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_revert_is_a_no_op() {
        let (engine, _) = engine_with_mock();
        let armed = Instant::now() + Duration::from_secs(1);
        engine.set_line("kept", 6).await.unwrap();

        // a revert that lost its slot to a later write must leave it alone
        revert_line(Arc::downgrade(&engine.shared), 6, armed, GRACE).await;
        assert_eq!(engine.get_line(6).await, "kept");
    }

    #[tokio::test(start_paused = true)]
    async fn test_temporary_without_screen_still_expires() {
        let engine = disconnected();
        let err = engine.set_line_temporary("X", 3, Duration::from_secs(1)).await.unwrap_err();
        assert!(err.is_driver_error());
        assert_eq!(engine.get_line(3).await, "X");

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(engine.get_line(3).await, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_all_empties_everything() {
        let (engine, state) = engine_with_mock();
        engine.set_line("a", 0).await.unwrap();
        engine.set_line_temporary("b", 1, Duration::from_secs(3)).await.unwrap();
        engine.append_line("c").await.unwrap();

        engine.clear_all().await.unwrap();
        assert_eq!(engine.lines().await, <[String; LINES]>::default());
        assert_eq!(state.lock().unwrap().clear_count, 1);

        // the pending expiry must not fire into a later write
        engine.set_line("after", 1).await.unwrap();
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(engine.get_line(1).await, "after");
    }

    #[tokio::test]
    async fn test_image_replaces_model() {
        let (engine, state) = engine_with_mock();
        engine.set_line("text", 0).await.unwrap();

        let png = png_with_dark_pixels(128, 64, &[(10, 10)]);
        engine.display_image(&png).await.unwrap();

        for line in engine.lines().await {
            assert_eq!(line, IMAGE_MARKER);
        }
        let image = state.lock().unwrap().last_image.clone().unwrap();
        assert_eq!(image.lit_pixels(), 1);
    }

    #[tokio::test]
    async fn test_wrong_size_image_leaves_model() {
        let (engine, state) = engine_with_mock();
        engine.set_line("keep me", 2).await.unwrap();

        let png = png_with_dark_pixels(100, 64, &[]);
        let err = engine.display_image(&png).await.unwrap_err();
        assert!(matches!(err, EngineError::Format(_)));
        let err = engine.display_image_temporary(&png, Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, EngineError::Format(_)));

        assert_eq!(engine.get_line(2).await, "keep me");
        assert_eq!(engine.get_line(0).await, "");
        assert!(state.lock().unwrap().last_image.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_temporary_image_spares_rewritten_lines() {
        let (engine, _) = engine_with_mock();
        let png = png_with_dark_pixels(128, 64, &[]);
        engine.display_image_temporary(&png, Duration::from_secs(5)).await.unwrap();
        engine.set_line("survivor", 2).await.unwrap();
        assert_eq!(engine.get_line(0).await, IMAGE_MARKER);

        tokio::time::sleep(Duration::from_secs(6)).await;
        let lines = engine.lines().await;
        for (i, line) in lines.iter().enumerate() {
            if i == 2 {
                assert_eq!(line, "survivor");
            } else {
                assert_eq!(line, "", "line {}", i);
            }
        }
    }

    #[tokio::test]
    async fn test_image_without_screen_updates_model() {
        let engine = disconnected();
        let png = png_with_dark_pixels(128, 64, &[]);
        assert!(matches!(engine.display_image(&png).await, Err(EngineError::NotConnected)));
        assert_eq!(engine.get_line(7).await, IMAGE_MARKER);
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let (engine, state) = engine_with_mock();
        engine.set_line("bye", 0).await.unwrap();

        engine.shutdown().await;
        engine.shutdown().await;

        assert!(!engine.is_connected().await);
        assert_eq!(engine.get_line(0).await, "bye");
        {
            let state = state.lock().unwrap();
            assert!(!state.open);
            assert_eq!(state.close_count, 1);
            assert_eq!(state.clear_count, 1);
        }
        assert!(matches!(engine.set_line("late", 0).await, Err(EngineError::NotConnected)));
        assert_eq!(engine.get_line(0).await, "late");
    }

    #[tokio::test]
    async fn test_shutdown_falls_back_to_message() {
        let (engine, state) = engine_with_mock();
        state.lock().unwrap().simulate_clear_failure = true;

        engine.shutdown().await;

        let state = state.lock().unwrap();
        assert_eq!(state.lines[0].trim_end(), "SHUTTING DOWN...");
        assert_eq!(state.close_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_expiry() {
        let (engine, state) = engine_with_mock();
        engine.set_line_temporary("brief", 3, Duration::from_secs(1)).await.unwrap();
        let png = png_with_dark_pixels(128, 64, &[]);
        engine.shutdown().await;
        let prints_at_shutdown = state.lock().unwrap().prints.len();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(engine.get_line(3).await, "brief");
        assert!(engine.last_expiry().await.is_none());
        assert_eq!(state.lock().unwrap().prints.len(), prints_at_shutdown);

        // writes after shutdown still land in the model only
        let result = engine.display_image_temporary(&png, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(EngineError::NotConnected)));
        engine.shutdown().await;
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(engine.get_line(0).await, IMAGE_MARKER);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_message_duration_saturates() {
        let (engine, _) = engine_with_mock();
        engine.set_line_temporary("forever", 0, Duration::MAX).await.unwrap();
        assert_eq!(engine.get_line(0).await, "forever");

        let expiry = engine.last_expiry().await.unwrap();
        assert!(expiry >= Instant::now() + Duration::from_secs(9 * 365 * 24 * 60 * 60));

        tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
        assert_eq!(engine.get_line(0).await, "forever");

        // still superseded normally
        engine.set_line_temporary("short", 0, Duration::from_secs(1)).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(engine.get_line(0).await, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_image_duration_saturates() {
        let (engine, _) = engine_with_mock();
        let png = png_with_dark_pixels(128, 64, &[]);
        let duration = EngineConfig::default().clamp_image(i64::MAX);
        engine.display_image_temporary(&png, duration).await.unwrap();

        tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
        assert_eq!(engine.get_line(5).await, IMAGE_MARKER);
        assert!(engine.last_expiry().await.is_some());
    }
}
