//! Interactive console menu.
//!
//! Each group runs a short scripted tour of one area of the command API.
//! Failures end the current group and are reported; the menu keeps going.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use pixpin_core::api::PixPin;
use pixpin_core::sink::ScriptSink;
use pixpin_core::types::{PixRect, ShotAction};
use pixpin_host::PixPinClient;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Pause after each step so PixPin can keep up.
const STEP_PAUSE: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Screenshots,
    Pins,
    Conveniences,
    Workflows,
    System,
    Batch,
}

impl Group {
    pub const ALL: [Group; 6] = [
        Group::Screenshots,
        Group::Pins,
        Group::Conveniences,
        Group::Workflows,
        Group::System,
        Group::Batch,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Group::Screenshots => "Basic screenshots",
            Group::Pins => "Pins",
            Group::Conveniences => "Convenience methods",
            Group::Workflows => "Workflows",
            Group::System => "System",
            Group::Batch => "Batch operations",
        }
    }

    /// Menu numbers start at 1.
    pub fn from_choice(choice: &str) -> Option<Group> {
        let index: usize = choice.trim().parse().ok()?;
        Group::ALL.get(index.checked_sub(1)?).copied()
    }
}

/// What the user typed at the main prompt.
#[derive(Debug, PartialEq, Eq)]
enum MenuInput {
    Run(Group),
    Quit,
    Invalid(String),
}

fn parse_input(line: &str) -> Option<MenuInput> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if matches!(trimmed, "0" | "q" | "quit" | "exit") {
        return Some(MenuInput::Quit);
    }
    Some(match Group::from_choice(trimmed) {
        Some(group) => MenuInput::Run(group),
        None => MenuInput::Invalid(trimmed.to_string()),
    })
}

/// Runs menu groups against a sink, writing progress to `out`.
pub struct GroupRunner<'a, S, W> {
    pixpin: &'a PixPin<S>,
    out: W,
    pause: Duration,
    save_dir: PathBuf,
}

impl<'a, S: ScriptSink, W: Write> GroupRunner<'a, S, W> {
    pub fn new(pixpin: &'a PixPin<S>, out: W, pause: Duration, save_dir: PathBuf) -> Self {
        Self {
            pixpin,
            out,
            pause,
            save_dir,
        }
    }

    pub async fn run(&mut self, group: Group) -> Result<()> {
        writeln!(self.out, "== {} ==", group.title())?;
        match group {
            Group::Screenshots => self.screenshots().await?,
            Group::Pins => self.pins().await?,
            Group::Conveniences => self.conveniences().await?,
            Group::Workflows => self.workflows().await?,
            Group::System => self.system().await?,
            Group::Batch => self.batch().await?,
        }
        writeln!(self.out, "Done.")?;
        Ok(())
    }

    fn step(&mut self, label: &str) -> Result<()> {
        writeln!(self.out, "- {}", label)?;
        Ok(())
    }

    async fn settle(&self) {
        tokio::time::sleep(self.pause).await;
    }

    fn save_path(&self, leaf: &str) -> String {
        self.save_dir.join(leaf).to_string_lossy().into_owned()
    }

    async fn screenshots(&mut self) -> Result<()> {
        let pixpin = self.pixpin;

        self.step("Open screenshot interface")?;
        pixpin.screen_shot_and_edit().await?;
        self.settle().await;

        self.step("Screenshot, then copy")?;
        pixpin.screen_shot(ShotAction::Copy).await?;
        self.settle().await;

        let rect = pixpin.gen_rect(100, 100, 400, 300);
        self.step(&format!("Direct screenshot of {}, then pin", rect))?;
        pixpin.direct_screen_shot(rect, ShotAction::Pin).await?;
        self.settle().await;

        self.step("Long screenshot")?;
        pixpin.open_long_screen_shot(200, 200, 600, 800).await?;
        self.settle().await;

        self.step("GIF recording")?;
        pixpin.open_gif_screen_shot(300, 300, 500, 400).await?;
        self.settle().await;
        Ok(())
    }

    async fn pins(&mut self) -> Result<()> {
        let pixpin = self.pixpin;

        self.step("Pin from clipboard")?;
        pixpin.pin_from_clipboard().await?;
        self.settle().await;

        let hidden = pixpin.is_all_pin_hide().await?;
        self.step(&format!(
            "Pins are currently {}",
            if hidden { "hidden" } else { "shown" }
        ))?;

        self.step("Toggle pin visibility")?;
        pixpin.hide_or_show_all_pin().await?;
        self.settle().await;

        self.step("Thumbnail mode on")?;
        pixpin.set_all_pin_to_roi_mode().await?;
        self.settle().await;

        self.step("Thumbnail mode off")?;
        pixpin.unset_all_pin_to_roi_mode().await?;
        self.settle().await;

        let path = self.save_path("PixPinTest");
        self.step(&format!("Save all pins to {}", path))?;
        pixpin.save_all_pin_image_to(&path).await?;
        self.settle().await;
        Ok(())
    }

    async fn conveniences(&mut self) -> Result<()> {
        let pixpin = self.pixpin;

        self.step("Capture full screen")?;
        pixpin.capture_full_screen().await?;
        self.settle().await;

        self.step("Capture and pin window under mouse")?;
        pixpin.capture_and_pin_window_under_mouse().await?;
        self.settle().await;

        self.step("Capture 300x200 around mouse")?;
        pixpin
            .capture_around_mouse(300, 200, ShotAction::Copy)
            .await?;
        self.settle().await;

        self.step("Capture and OCR")?;
        pixpin.capture_and_ocr().await?;
        self.settle().await;

        let hidden = pixpin.toggle_pin_visibility().await?;
        self.step(&format!(
            "Toggled pins, now {}",
            if hidden { "hidden" } else { "shown" }
        ))?;
        Ok(())
    }

    async fn workflows(&mut self) -> Result<()> {
        let pixpin = self.pixpin;

        self.step("Documentation workflow")?;
        pixpin
            .documentation_workflow(&self.save_path("Documentation"))
            .await?;
        self.settle().await;

        self.step("Bug report workflow")?;
        pixpin.bug_report_workflow().await?;
        self.settle().await;

        self.step("Design review workflow")?;
        pixpin
            .design_review_workflow(&self.save_path("DesignReview"))
            .await?;
        self.settle().await;
        Ok(())
    }

    async fn system(&mut self) -> Result<()> {
        let pixpin = self.pixpin;

        self.step("Run calculator")?;
        pixpin.run_system("calc").await?;
        self.settle().await;

        self.step("Disable shortcuts")?;
        pixpin.disable_shortcuts(true).await?;
        self.settle().await;

        let disabled = pixpin.is_disable_shortcuts().await?;
        self.step(&format!(
            "Shortcuts are {}",
            if disabled { "disabled" } else { "enabled" }
        ))?;

        self.step("Enable shortcuts")?;
        pixpin.disable_shortcuts(false).await?;
        self.settle().await;

        self.step("Open settings window")?;
        pixpin.open_configuration_window().await?;
        self.settle().await;

        self.step("Switch pin group")?;
        pixpin.switch_pin_group().await?;
        self.settle().await;
        Ok(())
    }

    async fn batch(&mut self) -> Result<()> {
        let pixpin = self.pixpin;

        self.step("Capture three areas")?;
        pixpin
            .capture_multiple(&[
                (PixRect::new(100, 100, 200, 150), ShotAction::Pin),
                (PixRect::new(400, 200, 300, 200), ShotAction::Copy),
                (PixRect::new(800, 300, 250, 180), ShotAction::Save),
            ])
            .await?;

        self.step("Record two GIFs")?;
        pixpin
            .start_multiple_gif_recordings(&[
                PixRect::new(100, 100, 400, 300),
                PixRect::new(600, 200, 500, 400),
            ])
            .await?;

        let path = self.save_path("PixPinBatchTest");
        self.step(&format!("Save and close all pins in {}", path))?;
        pixpin.save_and_close_all_pins(Some(&path)).await?;
        self.settle().await;
        Ok(())
    }
}

/// Report status, start PixPin if needed, then loop over the menu.
pub async fn run(client: &PixPinClient) -> Result<()> {
    print_status(client);
    if !client.is_running() {
        println!("PixPin is not running, starting it...");
        match client.ensure_running().await {
            Ok(_) => print_status(client),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    let pixpin = client.commands();
    let save_dir = client
        .config()
        .default_save_path
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    let mut rl = DefaultEditor::new()?;

    loop {
        print_menu();
        match rl.readline("> ") {
            Ok(line) => {
                let Some(input) = parse_input(&line) else {
                    continue;
                };
                let _ = rl.add_history_entry(&line);

                match input {
                    MenuInput::Quit => break,
                    MenuInput::Invalid(choice) => println!("Unknown choice '{}'", choice),
                    MenuInput::Run(group) => {
                        let mut runner = GroupRunner::new(
                            &pixpin,
                            std::io::stdout(),
                            STEP_PAUSE,
                            save_dir.clone(),
                        );
                        if let Err(e) = runner.run(group).await {
                            eprintln!("Error: {:#}", e);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn print_status(client: &PixPinClient) {
    println!(
        "PixPin: {}",
        if client.is_running() {
            "running"
        } else {
            "not running"
        }
    );
    println!("Executable: {}", client.executable_path().display());
    println!(
        "Client: {}",
        if client.is_available() {
            "available"
        } else {
            "unavailable"
        }
    );
}

fn print_menu() {
    println!();
    for (index, group) in Group::ALL.iter().enumerate() {
        println!("{}. {}", index + 1, group.title());
    }
    println!("0. Exit");
}
