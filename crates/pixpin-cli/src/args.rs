//! CLI argument parsing with clap derive macros.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use pixpin_core::types::{Area, PixRect, ShotAction, SpecialRectType};
use pixpin_host::Profile;

/// Script automation for PixPin.
///
/// Sends screenshot, pin and system commands to a local PixPin installation
/// through its `-r`/`-f` command line, starting PixPin when it is not running.
#[derive(Debug, Parser)]
#[command(name = "pixpin", version)]
pub struct Cli {
    /// PixPin executable to launch when no running instance is detected
    #[arg(long, global = true, value_name = "PATH")]
    pub executable: Option<PathBuf>,

    /// Timeout for commands that wait for a result (milliseconds)
    #[arg(long, global = true, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Configuration preset: default, development (dev) or production (prod)
    #[arg(long, global = true, value_name = "NAME", default_value_t = Profile::Default)]
    pub profile: Profile,

    /// Print the command lines instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Reject flag combinations clap cannot express declaratively.
    pub fn validate(&self) -> Result<(), clap::Error> {
        if self.dry_run && self.command.is_host_command() {
            return Err(Cli::command().error(
                ErrorKind::ArgumentConflict,
                "--dry-run only applies to commands that send scripts to PixPin",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show whether PixPin is running and which executable is used
    Status,

    /// Start PixPin if it is not already running
    Start,

    /// Detect the running PixPin executable again
    Refresh,

    /// Run a script without waiting for it
    #[command(after_help = "\
Examples:
  pixpin run 'pixpin.closeAllPin()'
  pixpin run 'pixpin.screenShot(ShotAction.Pin)'")]
    Run(RunArgs),

    /// Run a script, wait for it, and print its decoded result
    #[command(after_help = "\
Examples:
  pixpin eval 'pixpin.isAllPinHide()' --as bool
  pixpin eval 'pixpin.getSpRect(PixConst.SpRectAllScreen)' --as json
  pixpin eval 'pixpin.runSystemSync(\"hostname\")' --as system")]
    Eval(EvalArgs),

    /// Run a script file without waiting for it
    File(FileArgs),

    /// Take a screenshot
    #[command(after_help = "\
Without an area the screenshot interface opens for manual selection.

Examples:
  pixpin shot                               # Select, then copy
  pixpin shot --action pin                  # Select, then pin
  pixpin shot --rect 100 100 400 300        # Capture a fixed area
  pixpin shot --special all-screen -a save  # Capture every screen and save")]
    Shot(ShotArgs),

    /// Open the screenshot interface for editing
    Edit,

    /// Take a long (scrolling) screenshot
    Long(CaptureArgs),

    /// Record a GIF, or pause/resume the current recording
    Gif(GifArgs),

    /// Adjust or query the screenshot selection area
    #[command(subcommand)]
    Area(AreaCommand),

    /// Manage pins
    #[command(subcommand)]
    Pin(PinCommand),

    /// Capture shortcuts for common tasks
    #[command(subcommand)]
    Capture(CaptureCommand),

    /// Enable, disable, or query PixPin's global shortcuts
    Shortcuts(ShortcutsArgs),

    /// Let PixPin run a system command
    System(SystemArgs),

    /// Open PixPin's settings window
    ConfigWindow,

    /// Switch to the next pin group
    SwitchGroup,

    /// Run a multi-step workflow
    Workflow(WorkflowArgs),

    /// Interactive menu exercising every command group
    Interactive,

    /// Show usage examples
    Examples,
}

impl Commands {
    /// Commands handled by the client itself rather than sent as scripts.
    pub fn is_host_command(&self) -> bool {
        matches!(
            self,
            Commands::Status | Commands::Start | Commands::Refresh | Commands::Interactive
        )
    }
}

#[derive(Debug, clap::Args)]
pub struct RunArgs {
    /// Script text passed to `-r`
    pub script: String,
}

#[derive(Debug, clap::Args)]
pub struct EvalArgs {
    /// Script text passed to `-r`
    pub script: String,

    /// How to decode the output
    #[arg(long = "as", value_enum, default_value_t = EvalKind::Text)]
    pub kind: EvalKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EvalKind {
    /// true/false, anything else reads as false
    Bool,
    /// Trimmed text
    Text,
    /// JSON, falling back to text
    Json,
    /// System command result, falling back to raw output
    System,
}

#[derive(Debug, clap::Args)]
pub struct FileArgs {
    /// Script file passed to `-f`
    pub path: PathBuf,
}

/// A fixed rectangle or a special area.
#[derive(Debug, Clone, clap::Args)]
pub struct AreaArgs {
    /// Fixed area in screen coordinates
    #[arg(
        long,
        num_args = 4,
        value_names = ["X", "Y", "WIDTH", "HEIGHT"],
        allow_negative_numbers = true,
        conflicts_with = "special"
    )]
    pub rect: Option<Vec<i32>>,

    /// Area PixPin computes: screen-under-mouse, all-screen, window-under-mouse, last-shot-rect
    #[arg(long, value_name = "KIND")]
    pub special: Option<SpecialRectType>,
}

impl AreaArgs {
    pub fn area(&self) -> Option<Area> {
        if let Some(kind) = self.special {
            return Some(Area::Special(kind));
        }
        match self.rect.as_deref() {
            Some(&[x, y, width, height]) => Some(Area::Rect(PixRect::new(x, y, width, height))),
            _ => None,
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct ShotArgs {
    /// What to do with the capture: copy, pin, save, quick-save, copy-ocr-text, ...
    #[arg(short, long, value_name = "ACTION")]
    pub action: Option<ShotAction>,

    #[command(flatten)]
    pub area: AreaArgs,
}

#[derive(Debug, clap::Args)]
pub struct CaptureArgs {
    #[command(flatten)]
    pub area: AreaArgs,

    /// Open the interface with --rect preselected instead of capturing directly
    #[arg(long, requires = "rect")]
    pub open: bool,
}

#[derive(Debug, clap::Args)]
pub struct GifArgs {
    #[command(flatten)]
    pub capture: CaptureArgs,

    /// Pause or resume the current recording
    #[arg(long, conflicts_with_all = ["rect", "special", "open"])]
    pub pause: bool,
}

#[derive(Debug, Subcommand)]
pub enum AreaCommand {
    /// Move the open screenshot selection
    Set {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    /// Set the selection corner radius as a ratio
    Radius { ratio: f64 },
    /// Open the custom screenshot interface
    Custom,
    /// Print a rect of the given size centred on the cursor
    UnderCursor { width: i32, height: i32 },
    /// Print the coordinates of a special area
    Special { kind: SpecialRectType },
}

#[derive(Debug, Subcommand)]
pub enum PinCommand {
    /// Pin the clipboard contents
    FromClipboard,
    /// Destroy every pin
    DestroyAll,
    /// Save every pin image, to PATH or via a dialog
    Save { path: Option<String> },
    /// Restore the most recently closed pin
    Restore,
    /// Toggle click-through for the pin under the mouse
    Penetrate,
    /// Close every pin
    CloseAll,
    /// Shrink every pin to a thumbnail, or undo it with --off
    Roi {
        #[arg(long)]
        off: bool,
    },
    /// Hide or show every pin
    Toggle,
    /// Print whether every pin is hidden
    IsHidden,
    /// Save every pin, then close them
    SaveAndClose { path: Option<String> },
}

#[derive(Debug, Subcommand)]
pub enum CaptureCommand {
    /// Capture every screen and copy it
    FullScreen,
    /// Capture the window under the mouse and pin it
    Window,
    /// Capture an area centred on the cursor
    AroundMouse {
        width: i32,
        height: i32,
        #[arg(short, long, default_value = "copy")]
        action: ShotAction,
    },
    /// Record a GIF of the previous capture area
    RecordLast,
    /// Capture and copy the recognised text
    Ocr,
}

#[derive(Debug, clap::Args)]
pub struct ShortcutsArgs {
    #[arg(value_enum)]
    pub action: ShortcutsAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShortcutsAction {
    Enable,
    Disable,
    Status,
}

#[derive(Debug, clap::Args)]
pub struct SystemArgs {
    /// Command line handed to PixPin
    pub command: String,

    /// Wait for the command and print its result
    #[arg(long)]
    pub sync: bool,
}

#[derive(Debug, clap::Args)]
pub struct WorkflowArgs {
    #[arg(value_enum)]
    pub kind: WorkflowKind,

    /// Where to save pins (documentation and design-review)
    #[arg(long, value_name = "DIR")]
    pub save_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WorkflowKind {
    /// Pin a capture, save it, close the pins
    Documentation,
    /// Pin the window under the mouse, record it, offer to save
    BugReport,
    /// Pin three design variants side by side, save, close
    DesignReview,
}

/// End-to-end example text for the `examples` command.
pub const EXAMPLES_TEXT: &str = r#"End-to-end example: capture, annotate, and archive

# 1. Make sure PixPin is up (starts it if needed)
pixpin start

# 2. Check which executable was detected
pixpin status

# 3. Capture the window under the mouse and pin it
pixpin capture window

# 4. Capture a fixed area and pin it as well
pixpin shot --rect 100 100 400 300 --action pin

# 5. Are the pins currently hidden?
pixpin pin is-hidden

# 6. Save every pin to a folder and close them
pixpin pin save-and-close ~/Pictures/pixpin

# See what would be sent without running anything
pixpin --dry-run workflow design-review --save-path /tmp/review
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_run_parses_script() {
        let cli = Cli::parse_from(["pixpin", "run", "pixpin.closeAllPin()"]);
        match cli.command {
            Commands::Run(args) => assert_eq!(args.script, "pixpin.closeAllPin()"),
            _ => panic!("Expected run command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "pixpin",
            "status",
            "--dry-run",
            "--json",
            "--timeout",
            "5000",
            "--executable",
            "/opt/pixpin/pixpin",
        ]);
        assert!(cli.dry_run);
        assert!(cli.json);
        assert_eq!(cli.timeout, Some(5000));
        assert_eq!(cli.executable, Some(PathBuf::from("/opt/pixpin/pixpin")));
    }

    #[test]
    fn test_eval_as_kind() {
        let cli = Cli::parse_from(["pixpin", "eval", "pixpin.isAllPinHide()", "--as", "bool"]);
        match cli.command {
            Commands::Eval(args) => assert_eq!(args.kind, EvalKind::Bool),
            _ => panic!("Expected eval command"),
        }
    }

    #[test]
    fn test_shot_with_rect_and_action() {
        let cli = Cli::parse_from([
            "pixpin", "shot", "--rect", "-10", "20", "400", "300", "-a", "pin",
        ]);
        match cli.command {
            Commands::Shot(args) => {
                assert_eq!(args.action, Some(ShotAction::Pin));
                assert_eq!(
                    args.area.area(),
                    Some(Area::Rect(PixRect::new(-10, 20, 400, 300)))
                );
            }
            _ => panic!("Expected shot command"),
        }
    }

    #[test]
    fn test_shot_special_area() {
        let cli = Cli::parse_from(["pixpin", "shot", "--special", "window-under-mouse"]);
        match cli.command {
            Commands::Shot(args) => {
                assert_eq!(args.action, None);
                assert_eq!(
                    args.area.area(),
                    Some(Area::Special(SpecialRectType::WindowUnderMouse))
                );
            }
            _ => panic!("Expected shot command"),
        }
    }

    #[test]
    fn test_shot_rejects_rect_and_special_together() {
        let result = Cli::try_parse_from([
            "pixpin", "shot", "--rect", "0", "0", "1", "1", "--special", "all-screen",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_shot_rejects_unknown_action() {
        assert!(Cli::try_parse_from(["pixpin", "shot", "--action", "teleport"]).is_err());
    }

    #[test]
    fn test_gif_pause_conflicts_with_area() {
        assert!(Cli::try_parse_from(["pixpin", "gif", "--pause", "--special", "all-screen"]).is_err());
        let cli = Cli::parse_from(["pixpin", "gif", "--pause"]);
        match cli.command {
            Commands::Gif(args) => assert!(args.pause),
            _ => panic!("Expected gif command"),
        }
    }

    #[test]
    fn test_long_open_requires_rect() {
        assert!(Cli::try_parse_from(["pixpin", "long", "--open"]).is_err());
        assert!(Cli::try_parse_from(["pixpin", "long", "--open", "--rect", "1", "2", "3", "4"]).is_ok());
    }

    #[test]
    fn test_pin_save_optional_path() {
        let cli = Cli::parse_from(["pixpin", "pin", "save"]);
        assert!(matches!(
            cli.command,
            Commands::Pin(PinCommand::Save { path: None })
        ));
    }

    #[test]
    fn test_system_sync_flag() {
        let cli = Cli::parse_from(["pixpin", "system", "echo hi", "--sync"]);
        match cli.command {
            Commands::System(args) => {
                assert_eq!(args.command, "echo hi");
                assert!(args.sync);
            }
            _ => panic!("Expected system command"),
        }
    }

    #[test]
    fn test_workflow_kind() {
        let cli = Cli::parse_from(["pixpin", "workflow", "bug-report"]);
        match cli.command {
            Commands::Workflow(args) => assert_eq!(args.kind, WorkflowKind::BugReport),
            _ => panic!("Expected workflow command"),
        }
    }

    #[test]
    fn test_profile_flag() {
        let cli = Cli::parse_from(["pixpin", "--profile", "production", "status"]);
        assert_eq!(cli.profile, Profile::Production);

        let cli = Cli::parse_from(["pixpin", "--profile", "dev", "status"]);
        assert_eq!(cli.profile, Profile::Development);

        let cli = Cli::parse_from(["pixpin", "status"]);
        assert_eq!(cli.profile, Profile::Default);
    }

    #[test]
    fn test_unknown_profile_is_rejected() {
        let err = Cli::try_parse_from(["pixpin", "--profile", "staging", "status"]).unwrap_err();
        assert!(err.to_string().contains("staging"));
    }

    #[test]
    fn test_dry_run_rejects_host_commands() {
        for command in ["status", "start", "refresh", "interactive"] {
            let cli = Cli::parse_from(["pixpin", "--dry-run", command]);
            let err = cli.validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        }
    }

    #[test]
    fn test_dry_run_accepts_script_commands() {
        let cli = Cli::parse_from(["pixpin", "--dry-run", "pin", "close-all"]);
        assert!(cli.validate().is_ok());
        let cli = Cli::parse_from(["pixpin", "status"]);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
