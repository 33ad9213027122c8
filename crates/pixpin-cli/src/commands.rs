//! Maps parsed subcommands onto the command API.

use std::path::Path;

use anyhow::{bail, Result};
use pixpin_core::api::PixPin;
use pixpin_core::sink::ScriptSink;
use pixpin_core::types::{PixRect, SystemCommandResult};
use pixpin_host::ClientConfig;
use serde_json::{json, Value};

use crate::args::{
    AreaCommand, CaptureArgs, CaptureCommand, Commands, EvalKind, GifArgs, PinCommand,
    ShortcutsAction, WorkflowKind,
};

/// Run a script-level subcommand. Returns the value to print, `Null` for none.
///
/// Host-level subcommands (status, start, refresh, interactive, examples)
/// are handled by the caller.
pub async fn execute<S: ScriptSink>(
    pixpin: &PixPin<S>,
    command: &Commands,
    config: &ClientConfig,
) -> Result<Value> {
    let value = match command {
        Commands::Run(args) => {
            pixpin.execute(&args.script).await?;
            Value::Null
        }
        Commands::Eval(args) => match args.kind {
            EvalKind::Bool => json!(pixpin.query::<bool>(&args.script).await?),
            EvalKind::Text => json!(pixpin.query::<String>(&args.script).await?),
            EvalKind::Json => pixpin.query::<Value>(&args.script).await?,
            EvalKind::System => {
                json!(pixpin.query::<SystemCommandResult>(&args.script).await?)
            }
        },
        Commands::File(args) => {
            pixpin.sink().run_file(&args.path).await?;
            Value::Null
        }
        Commands::Shot(args) => {
            let action = args.action.unwrap_or(config.default_shot_action);
            match args.area.area() {
                Some(area) => pixpin.direct_screen_shot(area, action).await?,
                None => pixpin.screen_shot(action).await?,
            }
            Value::Null
        }
        Commands::Edit => {
            pixpin.screen_shot_and_edit().await?;
            Value::Null
        }
        Commands::Long(args) => {
            long_shot(pixpin, args).await?;
            Value::Null
        }
        Commands::Gif(args) => return gif(pixpin, args).await,
        Commands::Area(command) => return area(pixpin, command).await,
        Commands::Pin(command) => return pin(pixpin, command, config).await,
        Commands::Capture(command) => {
            capture(pixpin, command).await?;
            Value::Null
        }
        Commands::Shortcuts(args) => match args.action {
            ShortcutsAction::Enable => {
                pixpin.disable_shortcuts(false).await?;
                Value::Null
            }
            ShortcutsAction::Disable => {
                pixpin.disable_shortcuts(true).await?;
                Value::Null
            }
            ShortcutsAction::Status => {
                json!({ "disabled": pixpin.is_disable_shortcuts().await? })
            }
        },
        Commands::System(args) => {
            if args.sync {
                json!(pixpin.run_system_sync(&args.command).await?)
            } else {
                pixpin.run_system(&args.command).await?;
                Value::Null
            }
        }
        Commands::ConfigWindow => {
            pixpin.open_configuration_window().await?;
            Value::Null
        }
        Commands::SwitchGroup => {
            pixpin.switch_pin_group().await?;
            Value::Null
        }
        Commands::Workflow(args) => {
            let save_path = args
                .save_path
                .clone()
                .or_else(|| default_save_path(config));
            match args.kind {
                WorkflowKind::Documentation => {
                    pixpin
                        .documentation_workflow(&require_path(save_path)?)
                        .await?
                }
                WorkflowKind::BugReport => pixpin.bug_report_workflow().await?,
                WorkflowKind::DesignReview => {
                    pixpin
                        .design_review_workflow(&require_path(save_path)?)
                        .await?
                }
            }
            Value::Null
        }
        Commands::Status
        | Commands::Start
        | Commands::Refresh
        | Commands::Interactive
        | Commands::Examples => bail!("'{}' is not a script command", command_name(command)),
    };
    Ok(value)
}

async fn long_shot<S: ScriptSink>(pixpin: &PixPin<S>, args: &CaptureArgs) -> Result<()> {
    match (args.open, args.area.area(), args.area.rect.as_deref()) {
        (true, _, Some(&[x, y, width, height])) => {
            pixpin.open_long_screen_shot(x, y, width, height).await?
        }
        (false, Some(area), _) => pixpin.long_screen_shot(area).await?,
        _ => bail!("long needs --rect or --special"),
    }
    Ok(())
}

async fn gif<S: ScriptSink>(pixpin: &PixPin<S>, args: &GifArgs) -> Result<Value> {
    if args.pause {
        return Ok(json!({ "recording": pixpin.gif_shot_pause().await? }));
    }
    let capture = &args.capture;
    match (capture.open, capture.area.area(), capture.area.rect.as_deref()) {
        (true, _, Some(&[x, y, width, height])) => {
            pixpin.open_gif_screen_shot(x, y, width, height).await?
        }
        (false, Some(area), _) => pixpin.gif_screen_shot(area).await?,
        _ => bail!("gif needs --rect, --special or --pause"),
    }
    Ok(Value::Null)
}

async fn area<S: ScriptSink>(pixpin: &PixPin<S>, command: &AreaCommand) -> Result<Value> {
    let value = match *command {
        AreaCommand::Set {
            x,
            y,
            width,
            height,
        } => json!({ "applied": pixpin.set_screen_shot_rect(x, y, width, height).await? }),
        AreaCommand::Radius { ratio } => {
            json!({ "applied": pixpin.set_screen_shot_rect_radius(ratio).await? })
        }
        AreaCommand::Custom => {
            pixpin.open_custom_screen_shot().await?;
            Value::Null
        }
        AreaCommand::UnderCursor { width, height } => {
            rect_value(pixpin.gen_rect_under_cursor(width, height).await?)
        }
        AreaCommand::Special { kind } => rect_value(pixpin.get_sp_rect(kind).await?),
    };
    Ok(value)
}

async fn pin<S: ScriptSink>(
    pixpin: &PixPin<S>,
    command: &PinCommand,
    config: &ClientConfig,
) -> Result<Value> {
    match command {
        PinCommand::FromClipboard => pixpin.pin_from_clipboard().await?,
        PinCommand::DestroyAll => pixpin.destroy_all_pin().await?,
        PinCommand::Save { path } => match path.clone().or_else(|| default_save_path(config)) {
            Some(path) => pixpin.save_all_pin_image_to(&path).await?,
            None => pixpin.save_all_pin_image_with_dialog().await?,
        },
        PinCommand::Restore => {
            return Ok(json!({ "restored": pixpin.restore_last_closed_pin().await? }));
        }
        PinCommand::Penetrate => pixpin.trigger_mouse_penetration().await?,
        PinCommand::CloseAll => pixpin.close_all_pin().await?,
        PinCommand::Roi { off: false } => pixpin.set_all_pin_to_roi_mode().await?,
        PinCommand::Roi { off: true } => pixpin.unset_all_pin_to_roi_mode().await?,
        PinCommand::Toggle => pixpin.hide_or_show_all_pin().await?,
        PinCommand::IsHidden => {
            return Ok(json!({ "hidden": pixpin.is_all_pin_hide().await? }));
        }
        PinCommand::SaveAndClose { path } => {
            let path = path.clone().or_else(|| default_save_path(config));
            pixpin.save_and_close_all_pins(path.as_deref()).await?
        }
    }
    Ok(Value::Null)
}

async fn capture<S: ScriptSink>(pixpin: &PixPin<S>, command: &CaptureCommand) -> Result<()> {
    match *command {
        CaptureCommand::FullScreen => pixpin.capture_full_screen().await?,
        CaptureCommand::Window => pixpin.capture_and_pin_window_under_mouse().await?,
        CaptureCommand::AroundMouse {
            width,
            height,
            action,
        } => pixpin.capture_around_mouse(width, height, action).await?,
        CaptureCommand::RecordLast => pixpin.record_last_area().await?,
        CaptureCommand::Ocr => pixpin.capture_and_ocr().await?,
    }
    Ok(())
}

fn rect_value(rect: PixRect) -> Value {
    json!(rect)
}

fn default_save_path(config: &ClientConfig) -> Option<String> {
    config
        .default_save_path
        .as_deref()
        .map(Path::to_string_lossy)
        .map(|path| path.into_owned())
}

fn require_path(path: Option<String>) -> Result<String> {
    match path {
        Some(path) => Ok(path),
        None => bail!("--save-path is required (or set default_save_path in the config file)"),
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Status => "status",
        Commands::Start => "start",
        Commands::Refresh => "refresh",
        Commands::Interactive => "interactive",
        Commands::Examples => "examples",
        _ => "command",
    }
}
