//! Value types shared by the script catalog and the command API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What PixPin does once a capture area has been chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShotAction {
    /// Copy the capture to the clipboard.
    #[default]
    Copy,
    Pin,
    LongShot,
    GifShot,
    /// Copy OCR text from the capture to the clipboard.
    CopyOcrText,
    Save,
    QuickSave,
    /// Translate text in the capture (needs an API key or membership).
    Translate,
    Close,
    /// Convert captured text to a table (membership only).
    OcrTable,
}

impl ShotAction {
    pub const ALL: [ShotAction; 10] = [
        ShotAction::Copy,
        ShotAction::Pin,
        ShotAction::LongShot,
        ShotAction::GifShot,
        ShotAction::CopyOcrText,
        ShotAction::Save,
        ShotAction::QuickSave,
        ShotAction::Translate,
        ShotAction::Close,
        ShotAction::OcrTable,
    ];

    /// Member name on the host's `ShotAction` object.
    pub fn script_name(&self) -> &'static str {
        match self {
            ShotAction::Copy => "Copy",
            ShotAction::Pin => "Pin",
            ShotAction::LongShot => "LongShot",
            ShotAction::GifShot => "GifShot",
            ShotAction::CopyOcrText => "CopyOcrText",
            ShotAction::Save => "Save",
            ShotAction::QuickSave => "QuickSave",
            ShotAction::Translate => "Translate",
            ShotAction::Close => "Close",
            ShotAction::OcrTable => "OcrTable",
        }
    }

    /// Kebab-case name used on the command line.
    pub fn cli_name(&self) -> &'static str {
        match self {
            ShotAction::Copy => "copy",
            ShotAction::Pin => "pin",
            ShotAction::LongShot => "long-shot",
            ShotAction::GifShot => "gif-shot",
            ShotAction::CopyOcrText => "copy-ocr-text",
            ShotAction::Save => "save",
            ShotAction::QuickSave => "quick-save",
            ShotAction::Translate => "translate",
            ShotAction::Close => "close",
            ShotAction::OcrTable => "ocr-table",
        }
    }
}

impl fmt::Display for ShotAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShotAction.{}", self.script_name())
    }
}

impl FromStr for ShotAction {
    type Err = String;

    /// Accepts the kebab-case CLI name or the host's member name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ShotAction::ALL
            .into_iter()
            .find(|action| {
                action.cli_name().eq_ignore_ascii_case(wanted)
                    || action.script_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| format!("Unknown shot action '{}'", s))
    }
}

/// Screen areas PixPin can compute by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecialRectType {
    /// Screen the mouse is on.
    ScreenUnderMouse,
    /// All screens combined.
    AllScreen,
    /// Window the mouse is over.
    WindowUnderMouse,
    /// Area of the previous capture.
    LastShotRect,
}

impl SpecialRectType {
    pub const ALL: [SpecialRectType; 4] = [
        SpecialRectType::ScreenUnderMouse,
        SpecialRectType::AllScreen,
        SpecialRectType::WindowUnderMouse,
        SpecialRectType::LastShotRect,
    ];

    pub fn cli_name(&self) -> &'static str {
        match self {
            SpecialRectType::ScreenUnderMouse => "screen-under-mouse",
            SpecialRectType::AllScreen => "all-screen",
            SpecialRectType::WindowUnderMouse => "window-under-mouse",
            SpecialRectType::LastShotRect => "last-shot-rect",
        }
    }

    /// Constant name on the host's `PixConst` object.
    pub fn const_name(&self) -> &'static str {
        match self {
            SpecialRectType::ScreenUnderMouse => "PixConst.SpRectScreenUnderMouse",
            SpecialRectType::AllScreen => "PixConst.SpRectAllScreen",
            SpecialRectType::WindowUnderMouse => "PixConst.SpRectWindowUnderMouse",
            SpecialRectType::LastShotRect => "PixConst.SpRectLastShotRect",
        }
    }
}

impl FromStr for SpecialRectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SpecialRectType::ALL
            .into_iter()
            .find(|kind| kind.cli_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown special area '{}'", s))
    }
}

/// A rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixRect {
    #[serde(alias = "X")]
    pub x: i32,
    #[serde(alias = "Y")]
    pub y: i32,
    #[serde(alias = "Width", alias = "w")]
    pub width: i32,
    #[serde(alias = "Height", alias = "h")]
    pub height: i32,
}

impl PixRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl fmt::Display for PixRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}x{}", self.x, self.y, self.width, self.height)
    }
}

/// Result of `pixpin.runSystemSync`.
///
/// Every field defaults so partial JSON still decodes; both `code` and
/// `Code` spellings are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemCommandResult {
    #[serde(alias = "Code")]
    pub code: i32,
    #[serde(alias = "Output")]
    pub output: String,
    #[serde(alias = "Error")]
    pub error: String,
}

/// The area a capture command applies to.
///
/// Special and cursor-relative areas are resolved by PixPin inside the same
/// script, so composite captures need a single dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Rect(PixRect),
    Special(SpecialRectType),
    UnderCursor { width: i32, height: i32 },
}

impl Area {
    /// Script expression evaluating to this area.
    pub fn to_script(&self) -> String {
        match self {
            Area::Rect(rect) => format!(
                "pixpin.genRect({}, {}, {}, {})",
                rect.x, rect.y, rect.width, rect.height
            ),
            Area::Special(kind) => format!("pixpin.getSpRect({})", kind.const_name()),
            Area::UnderCursor { width, height } => {
                format!("pixpin.genRectUnderCursor({}, {})", width, height)
            }
        }
    }
}

impl From<PixRect> for Area {
    fn from(rect: PixRect) -> Self {
        Area::Rect(rect)
    }
}

impl From<SpecialRectType> for Area {
    fn from(kind: SpecialRectType) -> Self {
        Area::Special(kind)
    }
}
