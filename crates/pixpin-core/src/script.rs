//! Script catalog for PixPin commands.
//!
//! Every function returns the literal script text PixPin evaluates. Nothing
//! here dispatches anything; see [`crate::api::PixPin`] for that.
//!
//! Host spellings such as `pinFromCilpBoard` and `destoryAllPin` are the
//! names PixPin exposes and must not be corrected.

use crate::types::{Area, ShotAction, SpecialRectType};

/// Encode text as a script string literal.
///
/// Uses JSON string escaping, which is valid script syntax, so quotes,
/// backslashes and control characters in user input stay inside the literal.
pub fn string_literal(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| String::from("\"\""))
}

// Screenshot

pub fn screen_shot_and_edit() -> String {
    "pixpin.screenShotAndEdit()".to_string()
}

pub fn screen_shot(after_shot: ShotAction) -> String {
    format!("pixpin.screenShot({})", after_shot)
}

pub fn direct_screen_shot(area: &Area, action: ShotAction) -> String {
    format!("pixpin.directScreenShot({}, {})", area.to_script(), action)
}

pub fn gif_shot_pause() -> String {
    "pixpin.gifShotPause()".to_string()
}

pub fn set_screen_shot_rect(x: i32, y: i32, width: i32, height: i32) -> String {
    format!("pixpin.setScreenShotRect({}, {}, {}, {})", x, y, width, height)
}

pub fn set_screen_shot_rect_radius(ratio: f64) -> String {
    format!("pixpin.setScreenShotRectRadius({})", ratio)
}

pub fn open_custom_screen_shot() -> String {
    "pixpin.openCustomScreenShot()".to_string()
}

pub fn long_screen_shot(area: &Area) -> String {
    format!("pixpin.longScreenShot({})", area.to_script())
}

pub fn open_long_screen_shot(x: i32, y: i32, width: i32, height: i32) -> String {
    format!("pixpin.openLongScreenShot({}, {}, {}, {})", x, y, width, height)
}

pub fn gif_screen_shot(area: &Area) -> String {
    format!("pixpin.gifScreenShot({})", area.to_script())
}

pub fn open_gif_screen_shot(x: i32, y: i32, width: i32, height: i32) -> String {
    format!("pixpin.openGifScreenShot({}, {}, {}, {})", x, y, width, height)
}

pub fn gen_rect_under_cursor(width: i32, height: i32) -> String {
    Area::UnderCursor { width, height }.to_script()
}

pub fn get_sp_rect(kind: SpecialRectType) -> String {
    Area::Special(kind).to_script()
}

// Pins

pub fn pin_from_clipboard() -> String {
    "pixpin.pinFromCilpBoard()".to_string()
}

pub fn destroy_all_pin() -> String {
    "pixpin.destoryAllPin()".to_string()
}

/// Backslashes become forward slashes, which PixPin accepts on every platform.
pub fn save_all_pin_image_to(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    format!("pixpin.saveAllPinImageTo({})", string_literal(&normalized))
}

pub fn save_all_pin_image_with_dialog() -> String {
    "pixpin.saveAllPinImageWithDialog()".to_string()
}

pub fn restore_last_closed_pin() -> String {
    "pixpin.restoreLastClosedPin()".to_string()
}

pub fn trigger_mouse_penetration() -> String {
    "pixpin.trigMousePenetration()".to_string()
}

pub fn close_all_pin() -> String {
    "pixpin.closeAllPin()".to_string()
}

pub fn set_all_pin_to_roi_mode() -> String {
    "pixpin.setAllPinToRoiMode()".to_string()
}

pub fn unset_all_pin_to_roi_mode() -> String {
    "pixpin.unsetAllPinToRoiMode()".to_string()
}

pub fn hide_or_show_all_pin() -> String {
    "pixpin.hideOrShowAllPin()".to_string()
}

pub fn is_all_pin_hide() -> String {
    "pixpin.isAllPinHide()".to_string()
}

pub fn open_configuration_window() -> String {
    "pixpin.openConfigurationWindow()".to_string()
}

// Other

pub fn switch_pin_group() -> String {
    "pixpin.switchPinGroup()".to_string()
}

pub fn disable_shortcuts(disable: bool) -> String {
    format!("pixpin.disableShortcuts({})", disable)
}

pub fn is_disable_shortcuts() -> String {
    "pixpin.isDisableShortcuts()".to_string()
}

pub fn run_system(command: &str) -> String {
    format!("pixpin.runSystem({})", string_literal(command))
}

pub fn run_system_sync(command: &str) -> String {
    format!("pixpin.runSystemSync({})", string_literal(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PixRect;

    #[test]
    fn test_screen_shot_scripts() {
        assert_eq!(screen_shot_and_edit(), "pixpin.screenShotAndEdit()");
        assert_eq!(
            screen_shot(ShotAction::Copy),
            "pixpin.screenShot(ShotAction.Copy)"
        );
        assert_eq!(
            direct_screen_shot(&PixRect::new(100, 100, 400, 300).into(), ShotAction::Pin),
            "pixpin.directScreenShot(pixpin.genRect(100, 100, 400, 300), ShotAction.Pin)"
        );
    }

    #[test]
    fn test_direct_screen_shot_with_special_area() {
        assert_eq!(
            direct_screen_shot(&SpecialRectType::AllScreen.into(), ShotAction::Copy),
            "pixpin.directScreenShot(pixpin.getSpRect(PixConst.SpRectAllScreen), ShotAction.Copy)"
        );
    }

    #[test]
    fn test_rect_scripts() {
        assert_eq!(
            set_screen_shot_rect(1, 2, 3, 4),
            "pixpin.setScreenShotRect(1, 2, 3, 4)"
        );
        assert_eq!(
            set_screen_shot_rect_radius(0.5),
            "pixpin.setScreenShotRectRadius(0.5)"
        );
        assert_eq!(
            open_long_screen_shot(200, 200, 600, 800),
            "pixpin.openLongScreenShot(200, 200, 600, 800)"
        );
        assert_eq!(
            open_gif_screen_shot(300, 300, 500, 400),
            "pixpin.openGifScreenShot(300, 300, 500, 400)"
        );
        assert_eq!(
            gen_rect_under_cursor(300, 200),
            "pixpin.genRectUnderCursor(300, 200)"
        );
        assert_eq!(
            get_sp_rect(SpecialRectType::LastShotRect),
            "pixpin.getSpRect(PixConst.SpRectLastShotRect)"
        );
    }

    #[test]
    fn test_host_spellings_preserved() {
        assert_eq!(pin_from_clipboard(), "pixpin.pinFromCilpBoard()");
        assert_eq!(destroy_all_pin(), "pixpin.destoryAllPin()");
        assert_eq!(trigger_mouse_penetration(), "pixpin.trigMousePenetration()");
    }

    #[test]
    fn test_save_all_pin_image_to_normalizes_backslashes() {
        assert_eq!(
            save_all_pin_image_to(r"C:\Users\me\Desktop"),
            r#"pixpin.saveAllPinImageTo("C:/Users/me/Desktop")"#
        );
    }

    #[test]
    fn test_disable_shortcuts_renders_lowercase_bool() {
        assert_eq!(disable_shortcuts(true), "pixpin.disableShortcuts(true)");
        assert_eq!(disable_shortcuts(false), "pixpin.disableShortcuts(false)");
    }

    #[test]
    fn test_run_system_escapes_quotes() {
        assert_eq!(run_system("calc"), r#"pixpin.runSystem("calc")"#);
        assert_eq!(
            run_system(r#"echo "hi""#),
            r#"pixpin.runSystem("echo \"hi\"")"#
        );
        assert_eq!(
            run_system_sync(r"dir C:\"),
            r#"pixpin.runSystemSync("dir C:\\")"#
        );
    }

    #[test]
    fn test_string_literal_control_characters() {
        assert_eq!(string_literal("a\nb"), r#""a\nb""#);
        assert_eq!(string_literal(""), r#""""#);
    }
}
