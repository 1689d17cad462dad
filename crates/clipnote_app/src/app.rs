use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clipnote_core::{update, AppState, Msg};
use clipnote_engine::ApiSettings;
use note_logging::note_info;

use crate::commands::{self, CliCommand};
use crate::effects::EffectRunner;
use crate::logging::{self, LogDestination};
use crate::persistence;
use crate::render;

/// Shell-level input: stdin lines and core messages multiplexed onto the
/// one channel the main loop drains.
pub(crate) enum Input {
    Core(Msg),
    Line(String),
}

pub(crate) struct AppConfig {
    pub state_dir: PathBuf,
    pub api: ApiSettings,
    pub poll_interval: Duration,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut api = ApiSettings::default();
        if let Ok(base_url) = std::env::var("CLIPNOTE_API_URL") {
            api.base_url = base_url;
        }
        Self {
            state_dir: PathBuf::from("."),
            api,
            poll_interval: Duration::from_secs(3),
            log_destination: LogDestination::File,
        }
    }
}

pub(crate) fn run_app(config: AppConfig) -> anyhow::Result<()> {
    logging::initialize(config.log_destination);

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    let runner = EffectRunner::new(config.api.clone(), input_tx.clone())
        .context("failed to start the engine")?;

    // Restore the registry before any command can race it.
    let mut state = AppState::new();
    let (tasks, current_task_id) = persistence::load_snapshot(&config.state_dir);
    let (restored, _) = update(
        std::mem::take(&mut state),
        Msg::SnapshotRestored {
            tasks,
            current_task_id,
        },
    );
    state = restored;

    spawn_stdin_thread(input_tx.clone());
    spawn_tick_thread(input_tx, config.poll_interval);

    note_info!("clipnote shell ready, state dir {:?}", config.state_dir);
    println!("{}", commands::HELP_TEXT);

    while let Ok(input) = input_rx.recv() {
        match input {
            Input::Line(line) => match commands::parse_line(&line) {
                Err(message) => println!("{message}"),
                Ok(None) => {}
                Ok(Some(CliCommand::Quit)) => break,
                Ok(Some(CliCommand::Help)) => println!("{}", commands::HELP_TEXT),
                Ok(Some(CliCommand::List)) => {
                    for line in render::history_lines(&state.view()) {
                        println!("{line}");
                    }
                }
                Ok(Some(CliCommand::Show)) => {
                    println!("{}", render::selected_note(state.store().selected()));
                }
                Ok(Some(command)) => {
                    for msg in commands::to_msgs(command) {
                        dispatch(&mut state, msg, &runner, &config.state_dir);
                    }
                }
            },
            Input::Core(msg) => dispatch(&mut state, msg, &runner, &config.state_dir),
        }
    }

    Ok(())
}

/// Runs one message through the reducer, hands effects to the engine,
/// renders notices, and persists the registry when it changed.
fn dispatch(state: &mut AppState, msg: Msg, runner: &EffectRunner, state_dir: &Path) {
    let (next, effects) = update(std::mem::take(state), msg);
    *state = next;

    for notice in runner.enqueue(effects) {
        println!("{}", render::notice_line(&notice));
    }

    if state.consume_dirty() {
        persistence::save_snapshot(state_dir, state.store().tasks(), state.store().selected_id());
    }
}

fn spawn_stdin_thread(input_tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if input_tx.send(Input::Line(line)).is_err() {
                break;
            }
        }
    });
}

/// Drives status reconciliation: the reducer decides which tasks still
/// need polling on every tick.
fn spawn_tick_thread(input_tx: mpsc::Sender<Input>, interval: Duration) {
    thread::spawn(move || {
        while input_tx.send(Input::Core(Msg::PollTick)).is_ok() {
            thread::sleep(interval);
        }
    });
}
