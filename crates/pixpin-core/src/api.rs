//! Typed PixPin command API over any [`ScriptSink`].

use crate::decode::ScriptValue;
use crate::error::{ExecutionError, Result};
use crate::script;
use crate::sink::ScriptSink;
use crate::types::{Area, PixRect, ShotAction, SpecialRectType, SystemCommandResult};

/// PixPin automation commands.
///
/// Commands PixPin only acts on are fired; commands that answer something
/// wait for the process and decode its output.
///
/// ```ignore
/// let pixpin = PixPin::new(client);
/// pixpin.screen_shot(ShotAction::Pin).await?;
/// if pixpin.is_all_pin_hide().await? {
///     pixpin.hide_or_show_all_pin().await?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PixPin<S> {
    sink: S,
}

impl<S: ScriptSink> PixPin<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Fire an arbitrary script.
    pub async fn execute(&self, script: &str) -> Result<()> {
        self.sink.fire(script).await
    }

    /// Run an arbitrary script and decode its output.
    pub async fn query<T: ScriptValue>(&self, script: &str) -> Result<T> {
        self.sink.invoke(script).await
    }

    // Screenshot

    /// Open the screenshot interface.
    pub async fn screen_shot_and_edit(&self) -> Result<()> {
        self.execute(&script::screen_shot_and_edit()).await
    }

    /// Open the screenshot interface and apply `after_shot` to the selection.
    pub async fn screen_shot(&self, after_shot: ShotAction) -> Result<()> {
        self.execute(&script::screen_shot(after_shot)).await
    }

    /// Capture `area` without user interaction.
    pub async fn direct_screen_shot(&self, area: impl Into<Area>, action: ShotAction) -> Result<()> {
        self.execute(&script::direct_screen_shot(&area.into(), action))
            .await
    }

    /// Pause or resume GIF recording. `false` when not recording.
    pub async fn gif_shot_pause(&self) -> Result<bool> {
        self.query(&script::gif_shot_pause()).await
    }

    /// `false` when the screenshot interface is not open.
    pub async fn set_screen_shot_rect(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<bool> {
        self.query(&script::set_screen_shot_rect(x, y, width, height))
            .await
    }

    pub async fn set_screen_shot_rect_radius(&self, ratio: f64) -> Result<bool> {
        self.query(&script::set_screen_shot_rect_radius(ratio)).await
    }

    pub async fn open_custom_screen_shot(&self) -> Result<()> {
        self.execute(&script::open_custom_screen_shot()).await
    }

    pub async fn long_screen_shot(&self, area: impl Into<Area>) -> Result<()> {
        self.execute(&script::long_screen_shot(&area.into())).await
    }

    pub async fn open_long_screen_shot(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<()> {
        self.execute(&script::open_long_screen_shot(x, y, width, height))
            .await
    }

    pub async fn gif_screen_shot(&self, area: impl Into<Area>) -> Result<()> {
        self.execute(&script::gif_screen_shot(&area.into())).await
    }

    pub async fn open_gif_screen_shot(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<()> {
        self.execute(&script::open_gif_screen_shot(x, y, width, height))
            .await
    }

    /// Ask PixPin for a rect of the given size centred on the cursor.
    pub async fn gen_rect_under_cursor(&self, width: i32, height: i32) -> Result<PixRect> {
        self.query(&script::gen_rect_under_cursor(width, height))
            .await
    }

    /// Build a rect locally; no dispatch.
    pub fn gen_rect(&self, x: i32, y: i32, width: i32, height: i32) -> PixRect {
        PixRect::new(x, y, width, height)
    }

    /// Ask PixPin for the coordinates of a special area.
    pub async fn get_sp_rect(&self, kind: SpecialRectType) -> Result<PixRect> {
        self.query(&script::get_sp_rect(kind)).await
    }

    // Pins

    pub async fn pin_from_clipboard(&self) -> Result<()> {
        self.execute(&script::pin_from_clipboard()).await
    }

    pub async fn destroy_all_pin(&self) -> Result<()> {
        self.execute(&script::destroy_all_pin()).await
    }

    /// Save every pin image into the directory `path`.
    ///
    /// Use [`Self::save_all_pin_image_with_dialog`] to let the user pick.
    pub async fn save_all_pin_image_to(&self, path: &str) -> Result<()> {
        let path = non_blank(path, "save path")?;
        self.execute(&script::save_all_pin_image_to(path)).await
    }

    pub async fn save_all_pin_image_with_dialog(&self) -> Result<()> {
        self.execute(&script::save_all_pin_image_with_dialog())
            .await
    }

    pub async fn restore_last_closed_pin(&self) -> Result<bool> {
        self.query(&script::restore_last_closed_pin()).await
    }

    /// Toggle click-through for the pin under the mouse.
    pub async fn trigger_mouse_penetration(&self) -> Result<()> {
        self.execute(&script::trigger_mouse_penetration()).await
    }

    pub async fn close_all_pin(&self) -> Result<()> {
        self.execute(&script::close_all_pin()).await
    }

    /// Shrink every pin to a thumbnail.
    pub async fn set_all_pin_to_roi_mode(&self) -> Result<()> {
        self.execute(&script::set_all_pin_to_roi_mode()).await
    }

    pub async fn unset_all_pin_to_roi_mode(&self) -> Result<()> {
        self.execute(&script::unset_all_pin_to_roi_mode()).await
    }

    pub async fn hide_or_show_all_pin(&self) -> Result<()> {
        self.execute(&script::hide_or_show_all_pin()).await
    }

    /// `true` when every pin is hidden.
    pub async fn is_all_pin_hide(&self) -> Result<bool> {
        self.query(&script::is_all_pin_hide()).await
    }

    pub async fn open_configuration_window(&self) -> Result<()> {
        self.execute(&script::open_configuration_window()).await
    }

    // Other

    pub async fn switch_pin_group(&self) -> Result<()> {
        self.execute(&script::switch_pin_group()).await
    }

    pub async fn disable_shortcuts(&self, disable: bool) -> Result<()> {
        self.execute(&script::disable_shortcuts(disable)).await
    }

    pub async fn is_disable_shortcuts(&self) -> Result<bool> {
        self.query(&script::is_disable_shortcuts()).await
    }

    /// Let PixPin start a system command without waiting for it.
    pub async fn run_system(&self, command: &str) -> Result<()> {
        let command = non_blank(command, "system command")?;
        self.execute(&script::run_system(command)).await
    }

    /// Let PixPin run a system command and report its result.
    pub async fn run_system_sync(&self, command: &str) -> Result<SystemCommandResult> {
        let command = non_blank(command, "system command")?;
        self.query(&script::run_system_sync(command)).await
    }
}

fn non_blank<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(ExecutionError::invalid_input(format!("{} is empty", what)));
    }
    Ok(value)
}
