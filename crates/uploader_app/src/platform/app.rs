use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;

use uploader_core::{update, AppState, Effect, Msg, SelectedFile};
use uploader_logging::{uploader_debug, uploader_info, uploader_warn};

use super::commands::{parse_command, parse_picker_answer, Command, HELP};
use super::effects::{AppEventSink, EffectRunner};
use super::logging;
use super::settings::{load_settings, AppSettings};
use super::surface::{render, InteractionSurface, TerminalSurface};

/// Everything the controller loop reacts to, in arrival order.
pub(crate) enum Input {
    Line(String),
    Engine(Msg),
    Closed,
}

pub fn run_app() -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let loaded = load_settings(&cwd);
    let settings = match &loaded {
        Ok(Some(settings)) => settings.clone(),
        _ => AppSettings::default(),
    };
    logging::initialize(settings.log_destination, settings.log_level);
    match loaded {
        Ok(Some(_)) => uploader_info!("Loaded settings from {:?}", cwd),
        Ok(None) => uploader_info!("No settings file; using defaults"),
        Err(err) => uploader_warn!("Ignoring settings: {}", err),
    }
    uploader_info!("Conversion endpoint: {}", settings.upload.endpoint);

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    let sink = Arc::new(AppEventSink::new(input_tx.clone()));
    let runner = EffectRunner::new(settings.upload.clone(), sink)?;

    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.send(Input::Line(line)).is_err() {
                return;
            }
        }
        let _ = input_tx.send(Input::Closed);
    });

    let mut controller = Controller::new(
        TerminalSurface::stdout(),
        runner,
        cwd.join(&settings.upload.download_name),
    );
    controller.run(input_rx);
    Ok(())
}

struct Controller<S: InteractionSurface> {
    state: AppState,
    surface: S,
    runner: EffectRunner,
    default_save_path: PathBuf,
    picker_open: bool,
}

impl<S: InteractionSurface> Controller<S> {
    fn new(surface: S, runner: EffectRunner, default_save_path: PathBuf) -> Self {
        Self {
            state: AppState::new(),
            surface,
            runner,
            default_save_path,
            picker_open: false,
        }
    }

    fn run(&mut self, inputs: mpsc::Receiver<Input>) {
        self.surface.show(&render(&self.state.view()));
        while let Ok(input) = inputs.recv() {
            let keep_going = match input {
                Input::Line(line) => self.handle_line(&line),
                Input::Engine(msg) => {
                    self.dispatch(msg);
                    true
                }
                Input::Closed => false,
            };
            if !keep_going {
                break;
            }
        }
        self.dispatch(Msg::Teardown);
        uploader_info!("Controller stopped");
    }

    fn handle_line(&mut self, line: &str) -> bool {
        let parsed = parse_command(line);
        if self.picker_open {
            self.picker_open = false;
            if parsed.is_err() {
                let files = self.collect_files(&parse_picker_answer(line));
                self.dispatch(Msg::FilesChosen(files));
                return true;
            }
            // A command typed at the picker prompt dismisses the dialog.
            self.surface.notify("File selection cancelled.");
            self.dispatch(Msg::FilesChosen(Vec::new()));
        }
        if line.trim().is_empty() {
            return true;
        }

        let command = match parsed {
            Ok(command) => command,
            Err(message) => {
                self.surface.notify(&message);
                return true;
            }
        };
        uploader_debug!("Command {:?}", command);

        match command {
            Command::Open => self.dispatch(Msg::DropSurfaceActivated),
            Command::DragEnter => self.dispatch(Msg::DragEntered),
            Command::DragLeave => self.dispatch(Msg::DragLeft),
            Command::Drop(paths) => {
                let files = self.collect_files(&paths);
                self.dispatch(Msg::FilesDropped(files));
            }
            Command::Pick(paths) => {
                let files = self.collect_files(&paths);
                self.dispatch(Msg::FilesChosen(files));
            }
            Command::Convert => self.dispatch(Msg::ConvertClicked),
            Command::Save(destination) => {
                let destination = destination.unwrap_or_else(|| self.default_save_path.clone());
                self.dispatch(Msg::SaveDownloadClicked { destination });
            }
            Command::Help => self.surface.notify(HELP),
            Command::Quit => return false,
        }
        true
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;

        for effect in effects {
            match effect {
                Effect::OpenFilePicker => {
                    self.picker_open = true;
                    self.surface.open_file_picker();
                }
                Effect::SuppressDefaultAction => self.surface.suppress_default_action(),
                other => self.runner.enqueue(other),
            }
        }

        if was_dirty {
            self.surface.show(&render(&view));
        }
    }

    /// Turns platform paths into a file collection, skipping entries that
    /// are not readable regular files.
    fn collect_files(&mut self, paths: &[PathBuf]) -> Vec<SelectedFile> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            match describe_file(path) {
                Ok(file) => files.push(file),
                Err(message) => self.surface.notify(&message),
            }
        }
        files
    }
}

fn describe_file(path: &Path) -> Result<SelectedFile, String> {
    let metadata = fs::metadata(path).map_err(|err| format!("{}: {err}", path.display()))?;
    if !metadata.is_file() {
        return Err(format!("{}: not a file", path.display()));
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SelectedFile::new(name, metadata.len(), path))
}
