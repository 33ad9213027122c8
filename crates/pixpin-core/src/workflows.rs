//! Multi-step conveniences composed from the command API.

use std::time::Duration;

use tracing::debug;

use crate::api::PixPin;
use crate::error::Result;
use crate::sink::ScriptSink;
use crate::types::{Area, PixRect, ShotAction, SpecialRectType};

/// Pause between shots in [`PixPin::capture_multiple`].
pub const CAPTURE_INTERVAL: Duration = Duration::from_millis(500);

/// Pause between recordings in [`PixPin::start_multiple_gif_recordings`].
pub const RECORDING_INTERVAL: Duration = Duration::from_millis(1000);

/// Pause between steps of the canned workflows.
pub const STEP_INTERVAL: Duration = Duration::from_millis(500);

impl<S: ScriptSink> PixPin<S> {
    /// Capture every screen and copy it to the clipboard.
    pub async fn capture_full_screen(&self) -> Result<()> {
        self.direct_screen_shot(SpecialRectType::AllScreen, ShotAction::Copy)
            .await
    }

    pub async fn capture_and_pin_window_under_mouse(&self) -> Result<()> {
        self.direct_screen_shot(SpecialRectType::WindowUnderMouse, ShotAction::Pin)
            .await
    }

    /// Capture a `width` x `height` area centred on the cursor.
    pub async fn capture_around_mouse(
        &self,
        width: i32,
        height: i32,
        action: ShotAction,
    ) -> Result<()> {
        self.direct_screen_shot(Area::UnderCursor { width, height }, action)
            .await
    }

    /// Start a GIF recording of the previous capture area.
    pub async fn record_last_area(&self) -> Result<()> {
        self.gif_screen_shot(SpecialRectType::LastShotRect).await
    }

    pub async fn capture_and_ocr(&self) -> Result<()> {
        self.screen_shot(ShotAction::CopyOcrText).await
    }

    pub async fn capture_long_screenshot(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<()> {
        self.open_long_screen_shot(x, y, width, height).await
    }

    /// Save every pin, to `save_path` or via the save dialog, then close them.
    pub async fn save_and_close_all_pins(&self, save_path: Option<&str>) -> Result<()> {
        match save_path {
            Some(path) if !path.is_empty() => self.save_all_pin_image_to(path).await?,
            _ => self.save_all_pin_image_with_dialog().await?,
        }
        self.close_all_pin().await
    }

    /// Flip pin visibility and report whether pins are now hidden.
    pub async fn toggle_pin_visibility(&self) -> Result<bool> {
        self.hide_or_show_all_pin().await?;
        self.is_all_pin_hide().await
    }

    /// Capture several areas in sequence.
    pub async fn capture_multiple(&self, shots: &[(PixRect, ShotAction)]) -> Result<()> {
        for (area, action) in shots {
            self.direct_screen_shot(*area, *action).await?;
            tokio::time::sleep(CAPTURE_INTERVAL).await;
        }
        Ok(())
    }

    pub async fn start_multiple_gif_recordings(&self, areas: &[PixRect]) -> Result<()> {
        for area in areas {
            self.gif_screen_shot(*area).await?;
            tokio::time::sleep(RECORDING_INTERVAL).await;
        }
        Ok(())
    }

    /// Pin a capture, save the pins to `save_path`, then close them.
    pub async fn documentation_workflow(&self, save_path: &str) -> Result<()> {
        debug!("Running documentation workflow");
        self.screen_shot(ShotAction::Pin).await?;
        tokio::time::sleep(STEP_INTERVAL).await;
        self.save_all_pin_image_to(save_path).await?;
        tokio::time::sleep(STEP_INTERVAL).await;
        self.close_all_pin().await
    }

    /// Pin the window under the mouse, record it as a GIF, then offer to save.
    pub async fn bug_report_workflow(&self) -> Result<()> {
        debug!("Running bug report workflow");
        self.capture_and_pin_window_under_mouse().await?;
        tokio::time::sleep(STEP_INTERVAL).await;
        self.gif_screen_shot(SpecialRectType::WindowUnderMouse)
            .await?;
        tokio::time::sleep(STEP_INTERVAL).await;
        self.save_all_pin_image_with_dialog().await
    }

    /// Pin three side-by-side design variants, save them, then close the pins.
    pub async fn design_review_workflow(&self, save_path: &str) -> Result<()> {
        debug!("Running design review workflow");
        self.capture_multiple(&[
            (PixRect::new(100, 100, 400, 600), ShotAction::Pin),
            (PixRect::new(600, 100, 400, 600), ShotAction::Pin),
            (PixRect::new(1100, 100, 400, 600), ShotAction::Pin),
        ])
        .await?;
        self.save_all_pin_image_to(save_path).await?;
        tokio::time::sleep(STEP_INTERVAL).await;
        self.close_all_pin().await
    }
}
