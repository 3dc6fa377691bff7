//! Subcommand implementations.
//!
//! [`execute`] wires the headless collaborators to an engine and runs one
//! command. [`run_command`] does the work against any engine so it can be
//! driven by fakes.

use super::prompt::{Answer, read_answer, render_choices};
use super::{Cli, Commands};
use crate::engine::{SaveWindowOutcome, SpotEngine};
use crate::error::SpotError;
use crate::overlay::wrap_text;
use crate::platform::headless::{PrintingCursor, StaticScreen, StaticWindow};
use crate::selection::Choice;
use crate::spots::ReloadReport;
use crate::watcher::SpotsWatcher;
use anyhow::{Context, Result};
use screen_spots_config::Config;
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

/// The command ran
pub const EXIT_OK: i32 = 0;
/// The spot was missing or not active for the focused window
pub const EXIT_NO_SPOT: i32 = 1;

/// Build the engine from CLI context and run the selected command
pub fn execute(cli: Cli, config: Config) -> Result<i32> {
    let screen = StaticScreen {
        hostname: cli.hostname.clone(),
        screen: cli.screen,
        resolution: cli.resolution,
    };
    let window = StaticWindow {
        title: cli.window_title.clone(),
        app: cli.app.clone(),
    };
    let cursor = PrintingCursor::new(cli.cursor.unwrap_or((0, 0)), io::stdout());

    let mut engine = SpotEngine::new(config, Box::new(screen), Box::new(window), Box::new(cursor));
    let report = engine.startup().context("Failed to load spot files")?;
    crate::debug_info!("CLI", "Startup reload: {:?}", report);

    let stdin = io::stdin();
    run_command(&mut engine, &cli.command, &mut io::stdout(), &mut stdin.lock())
}

fn found(name: &str, done: bool) -> i32 {
    if done {
        EXIT_OK
    } else {
        eprintln!("Spot {name:?} not found or not active for this window");
        EXIT_NO_SPOT
    }
}

/// Run one command, writing results to `out` and reading prompt answers from `input`
pub fn run_command(
    engine: &mut SpotEngine,
    command: &Commands,
    out: &mut impl Write,
    input: &mut impl BufRead,
) -> Result<i32> {
    match command {
        Commands::Save { name } => {
            let spot = engine.save_spot(name)?;
            writeln!(out, "Saved {} at ({}, {})", spot.name, spot.x, spot.y)?;
            Ok(EXIT_OK)
        }
        Commands::SaveWindow { name, choice } => {
            save_window(engine, name, choice.as_deref(), out, input, &mut io::stderr())
        }
        Commands::Move { name, window_only } => {
            let done = if *window_only {
                engine.move_to_spot_window(name)?
            } else {
                engine.move_to_spot(name)?
            };
            Ok(found(name, done))
        }
        Commands::Click { name, window_only } => {
            let done = if *window_only {
                engine.click_spot_window(name)?
            } else {
                engine.click_spot(name)?
            };
            Ok(found(name, done))
        }
        Commands::Drag { name, window_only } => {
            let done = if *window_only {
                engine.drag_spot_window(name)?
            } else {
                engine.drag_spot(name)?
            };
            Ok(found(name, done))
        }
        Commands::Swipe { name, window_only } => {
            let done = if *window_only {
                engine.swipe_spot_window(name)?
            } else {
                engine.swipe_spot(name)?
            };
            Ok(found(name, done))
        }
        Commands::Clear { name } => {
            if engine.clear_spot(name)? {
                writeln!(out, "Cleared {name}")?;
                Ok(EXIT_OK)
            } else {
                Ok(found(name, false))
            }
        }
        Commands::ClearAll => {
            let removed = engine.clear_all()?;
            writeln!(out, "Cleared {removed} spots")?;
            Ok(EXIT_OK)
        }
        Commands::ClearWindow => {
            let removed = engine.clear_window_spots()?;
            writeln!(out, "Cleared {removed} window spots")?;
            Ok(EXIT_OK)
        }
        Commands::List { width } => {
            let rows = engine.list_rows()?;
            if rows.is_empty() {
                writeln!(out, "No spots saved for this screen")?;
            }
            for row in rows {
                for line in wrap_text(&row.to_string(), *width, "    ") {
                    writeln!(out, "{line}")?;
                }
            }
            Ok(EXIT_OK)
        }
        Commands::Heatmap => {
            let heatmap = engine.heatmap_points()?;
            writeln!(out, "color {} size {}", heatmap.color, heatmap.size)?;
            for point in heatmap.points {
                writeln!(out, "{} {}", point.x, point.y)?;
            }
            Ok(EXIT_OK)
        }
        Commands::Reload => {
            let report = engine.reload()?;
            print_report(&report, out)?;
            Ok(EXIT_OK)
        }
        Commands::Profiles => {
            let profiles = engine.profiles()?;
            if profiles.is_empty() {
                writeln!(out, "No profiles in {}", engine.registry().dir().display())?;
            }
            for profile in profiles {
                writeln!(
                    out,
                    "{} {} ({} spots) {}",
                    if profile.active { "*" } else { " " },
                    profile.key,
                    profile.spot_count,
                    profile.path.display()
                )?;
            }
            Ok(EXIT_OK)
        }
        Commands::Path => {
            let path = engine.spots_file()?;
            writeln!(out, "{}", path.display())?;
            Ok(EXIT_OK)
        }
        Commands::Edit => {
            let path = engine.spots_file()?;
            log::info!("Opening {:?} in the default editor", path);
            open::that(&path).with_context(|| format!("Failed to open {}", path.display()))?;
            Ok(EXIT_OK)
        }
        Commands::Watch { exit_after } => watch(engine, *exit_after, out),
    }
}

/// Run the pattern prompt. The numbered list and any complaints go to
/// `prompt`; the outcome goes to `out`.
fn save_window(
    engine: &mut SpotEngine,
    name: &str,
    preset: Option<&str>,
    out: &mut impl Write,
    input: &mut impl BufRead,
    prompt: &mut impl Write,
) -> Result<i32> {
    let pending = match engine.begin_save_window(name)? {
        SaveWindowOutcome::Saved(spot) => {
            writeln!(out, "No window information; saved {} as a global spot", spot.name)?;
            return Ok(EXIT_OK);
        }
        SaveWindowOutcome::AwaitingChoice(pending) => pending,
    };

    let mut preset = preset.map(|text| {
        super::prompt::parse_answer(text)
            .unwrap_or_else(|| Answer::Choose(Choice::Custom(text.to_string())))
    });
    let mut show_choices = preset.is_none();

    loop {
        if show_choices {
            render_choices(&pending, prompt)?;
            show_choices = false;
        }
        let (answer, from_preset) = match preset.take() {
            Some(answer) => (answer, true),
            None => (read_answer(input, prompt)?, false),
        };
        let choice = match answer {
            Answer::Cancel => {
                engine.cancel_pattern();
                writeln!(out, "Cancelled")?;
                return Ok(EXIT_OK);
            }
            Answer::Choose(choice) => choice,
        };

        match engine.confirm_pattern(choice) {
            Ok(spot) => {
                match &spot.window_pattern {
                    Some(pattern) => writeln!(
                        out,
                        "Saved {} at ({}, {}) for windows matching {:?}",
                        spot.name, spot.x, spot.y, pattern
                    )?,
                    None => writeln!(out, "Saved {} at ({}, {})", spot.name, spot.x, spot.y)?,
                }
                return Ok(EXIT_OK);
            }
            Err(e @ SpotError::InvalidChoice { .. }) => {
                writeln!(prompt, "{e}")?;
                // The list was never shown for a preset answer
                show_choices = from_preset;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn print_report(report: &ReloadReport, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "Reloaded: {} loaded, {} unchanged, {} dropped, {} failed",
        report.loaded.len(),
        report.unchanged.len(),
        report.dropped.len(),
        report.failed.len()
    )?;
    for key in &report.failed {
        writeln!(out, "  could not read profile {key}; kept previous spots")?;
    }
    Ok(())
}

fn watch(engine: &mut SpotEngine, exit_after: Option<f64>, out: &mut impl Write) -> Result<i32> {
    let dir = engine.registry().dir().to_path_buf();
    let watcher = SpotsWatcher::new(&dir, engine.config().watch_debounce_ms)?;
    writeln!(out, "Watching {} (Ctrl+C to stop)", watcher.dir().display())?;
    out.flush()?;

    let deadline = exit_after
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(|secs| Instant::now() + Duration::from_secs_f64(secs));
    loop {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Ok(EXIT_OK);
        }
        let Some(event) = watcher.recv_timeout(Duration::from_millis(250)) else {
            continue;
        };
        let extra = watcher.drain();
        crate::debug_log!(
            "WATCH",
            "Change in {:?} (+{} more); reloading",
            event.path,
            extra.len()
        );
        match engine.reload() {
            Ok(report) if report.changed() || !report.failed.is_empty() => {
                print_report(&report, out)?;
                out.flush()?;
            }
            Ok(_) => {}
            Err(e) => log::warn!("Reload after file change failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fake::{FakeScreen, FakeWindow, RecordingCursor};
    use tempfile::TempDir;

    fn engine(temp: &TempDir) -> SpotEngine {
        let config = Config {
            spots_dir: Some(temp.path().to_path_buf()),
            ..Config::default()
        };
        SpotEngine::new(
            config,
            Box::new(FakeScreen::new("Host", 0, (1920, 1080))),
            Box::new(FakeWindow::new("Inbox - Gmail", "Chrome")),
            Box::new(RecordingCursor::at(3, 4)),
        )
    }

    fn run(engine: &mut SpotEngine, command: Commands, input: &str) -> (i32, String) {
        let mut out = Vec::new();
        let code = run_command(engine, &command, &mut out, &mut input.as_bytes()).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_save_and_list() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine(&temp);

        let (code, text) = run(&mut engine, Commands::Save { name: "one".into() }, "");
        assert_eq!(code, EXIT_OK);
        assert_eq!(text, "Saved one at (3, 4)\n");

        let (_, text) = run(&mut engine, Commands::List { width: 80 }, "");
        assert_eq!(text, "one (3, 4) [global]\n");
    }

    #[test]
    fn test_save_window_with_prompt() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine(&temp);
        let command = Commands::SaveWindow {
            name: "compose".into(),
            choice: None,
        };

        let (code, text) = run(&mut engine, command, "99\n3\n");
        assert_eq!(code, EXIT_OK);
        assert_eq!(text, "Saved compose at (3, 4) for windows matching \"Gmail\"\n");
    }

    #[test]
    fn test_save_window_preset_choice() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine(&temp);
        let command = Commands::SaveWindow {
            name: "compose".into(),
            choice: Some("custom Inbox".into()),
        };
        run(&mut engine, command, "");
        let spot = engine.active_store().unwrap().get("compose").cloned().unwrap();
        assert_eq!(spot.window_pattern.as_deref(), Some("Inbox"));
    }

    #[test]
    fn test_rejected_preset_shows_choices() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine(&temp);
        let mut out = Vec::new();
        let mut prompt = Vec::new();
        let code = save_window(
            &mut engine,
            "compose",
            Some("99"),
            &mut out,
            &mut "2\n".as_bytes(),
            &mut prompt,
        )
        .unwrap();
        assert_eq!(code, EXIT_OK);

        let prompt = String::from_utf8(prompt).unwrap();
        let error_at = prompt.find("99").unwrap();
        let list_at = prompt.find("  0. global").unwrap();
        assert!(error_at < list_at);
        assert!(prompt[list_at..].contains("> "));
        assert!(engine.active_store().unwrap().get("compose").is_some());
    }

    #[test]
    fn test_save_window_cancel_on_eof() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine(&temp);
        let command = Commands::SaveWindow {
            name: "compose".into(),
            choice: None,
        };
        let (_, text) = run(&mut engine, command, "");
        assert_eq!(text, "Cancelled\n");
        assert!(engine.active_store().unwrap().is_empty());
    }

    #[test]
    fn test_missing_spot_exit_code() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine(&temp);
        let command = Commands::Click {
            name: "absent".into(),
            window_only: false,
        };
        assert_eq!(run(&mut engine, command, "").0, EXIT_NO_SPOT);
    }

    #[test]
    fn test_profiles_marks_active() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine(&temp);
        let (_, text) = run(&mut engine, Commands::Profiles, "");
        assert!(text.starts_with("* Host-0-1920x1080 (0 spots)"));
    }
}
