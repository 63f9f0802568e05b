use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use converter_core::{update, AppState, Msg, Notification, NotificationKind, Phase};
use converter_engine::{ApiSettings, EngineHandle, ReqwestApi};
use converter_logging::{conv_debug, conv_info};

use super::effects::{self, EffectRunner, UiEffect};
use super::input::{self, Command};
use super::persistence;
use super::timers::TimerService;
use super::ui::palette;
use super::ui::render::HELP;
use super::ui::screen::Screen;
use crate::cli::AppConfig;

/// Everything the event loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AppEvent {
    Msg(Msg),
    Command(Command),
    InputClosed,
    DownloadProgress {
        filename: String,
        bytes: u64,
        total: Option<u64>,
    },
}

pub fn run_app(config: AppConfig) -> anyhow::Result<ExitCode> {
    converter_logging::initialize(config.log_destination.clone(), config.log_level);
    conv_info!("yt2mp3 starting, server={}", config.server);

    let settings = ApiSettings {
        base_url: config.server.clone(),
        ..ApiSettings::default()
    };
    let api = ReqwestApi::new(&settings)
        .with_context(|| format!("cannot use {} as the server address", config.server))?;
    let (engine, engine_events) = EngineHandle::new(Arc::new(api), config.download_dir.clone())
        .context("failed to start the network runtime")?;

    let (tx, rx) = mpsc::channel::<AppEvent>();
    effects::spawn_event_forwarder(engine_events, tx.clone());
    let runner = EffectRunner::new(engine, TimerService::new(tx.clone()), config.data_dir.clone());

    let terminal = io::stdout().is_terminal();
    let color = terminal && std::env::var_os("NO_COLOR").is_none();
    let mut session = Session {
        state: AppState::new(),
        runner,
        screen: Screen::stdout(color, config.server.clone()),
        terminal,
    };

    session.dispatch(Msg::RestoreHistory(persistence::load_history(
        &config.data_dir,
    )));
    session.dispatch(Msg::RestoreTheme {
        saved: persistence::load_theme(&config.data_dir),
        system: palette::system_theme(),
    });
    session.dispatch(Msg::VisibilityChanged { visible: terminal });

    let code = match config.url {
        Some(url) => session.run_once(&rx, url, config.auto_download),
        None => {
            spawn_stdin_reader(tx);
            session.run_interactive(&rx)
        }
    };
    conv_info!("yt2mp3 exiting");
    Ok(code)
}

struct Session<W: Write> {
    state: AppState,
    runner: EffectRunner,
    screen: Screen<W>,
    terminal: bool,
}

impl<W: Write> Session<W> {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        let ui_effects = self.runner.run(effects);
        if self.state.consume_dirty() {
            self.screen.render(&self.state.view());
        }
        for effect in ui_effects {
            match effect {
                UiEffect::Notify(notification) => self.screen.notify(&notification),
                // Interactive mode prompts after every command.
                UiEffect::FocusInput => {}
            }
        }
    }

    fn run_interactive(&mut self, rx: &mpsc::Receiver<AppEvent>) -> ExitCode {
        self.screen
            .text(&["Paste a YouTube link and press Enter. Type `help` for commands."]);
        self.screen.prompt();

        for event in rx.iter() {
            match event {
                AppEvent::Msg(msg) => {
                    self.dispatch(msg);
                    self.screen.restore_prompt();
                }
                AppEvent::DownloadProgress {
                    filename,
                    bytes,
                    total,
                } => self.show_download_progress(&filename, bytes, total),
                AppEvent::Command(Command::Quit) | AppEvent::InputClosed => break,
                AppEvent::Command(command) => {
                    self.handle_command(command);
                    self.screen.prompt();
                }
            }
        }
        ExitCode::SUCCESS
    }

    fn handle_command(&mut self, command: Command) {
        conv_debug!("Command {:?}", command);
        match command {
            Command::Submit(url) => {
                self.dispatch(Msg::InputChanged(url));
                self.dispatch(Msg::ConvertClicked);
            }
            Command::Clear => self.dispatch(Msg::ClearClicked),
            Command::History => self.screen.show_history(),
            Command::ClearHistory => self.dispatch(Msg::ClearHistoryClicked),
            Command::Download(history_index) => {
                self.dispatch(Msg::DownloadClicked { history_index })
            }
            Command::Theme => self.dispatch(Msg::ToggleThemeClicked),
            Command::Hide => self.dispatch(Msg::VisibilityChanged { visible: false }),
            Command::Show => self.dispatch(Msg::VisibilityChanged { visible: true }),
            Command::Help => self.screen.text(HELP),
            Command::Invalid(message) => self
                .screen
                .notify(&Notification::new(NotificationKind::Warning, message)),
            Command::Quit => {}
        }
    }

    /// Converts one link and waits for the outcome. Exit codes: 0 done,
    /// 1 conversion or download failed, 2 the link was refused locally.
    fn run_once(
        &mut self,
        rx: &mpsc::Receiver<AppEvent>,
        url: String,
        auto_download: bool,
    ) -> ExitCode {
        self.dispatch(Msg::InputChanged(url));
        self.dispatch(Msg::ConvertClicked);
        if *self.state.phase() == Phase::Idle {
            return ExitCode::from(2);
        }

        let mut download_requested = false;
        for event in rx.iter() {
            let msg = match event {
                AppEvent::Msg(msg) => msg,
                AppEvent::DownloadProgress {
                    filename,
                    bytes,
                    total,
                } => {
                    self.show_download_progress(&filename, bytes, total);
                    continue;
                }
                AppEvent::Command(_) | AppEvent::InputClosed => continue,
            };

            let download_result = match &msg {
                Msg::DownloadFinished { result, .. } => Some(result.is_ok()),
                _ => None,
            };
            self.dispatch(msg);

            if let Some(saved) = download_result {
                return if saved {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                };
            }
            match self.state.phase() {
                Phase::Failed { .. } => return ExitCode::FAILURE,
                Phase::Completed if !auto_download => return ExitCode::SUCCESS,
                Phase::Completed if !download_requested => {
                    download_requested = true;
                    self.dispatch(Msg::DownloadClicked {
                        history_index: None,
                    });
                    if self.state.pending_download().is_none() {
                        return ExitCode::FAILURE;
                    }
                }
                _ => {}
            }
        }
        ExitCode::FAILURE
    }

    fn show_download_progress(&mut self, filename: &str, bytes: u64, total: Option<u64>) {
        if self.terminal {
            self.screen.download_progress(filename, bytes, total);
        }
    }
}

fn spawn_stdin_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(AppEvent::Command(input::parse(&line))).is_err() {
                return;
            }
        }
        let _ = tx.send(AppEvent::InputClosed);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use converter_core::JobId;
    use converter_engine::EngineEvents;
    use tempfile::TempDir;

    const URL: &str = "https://youtu.be/dQw4w9WgXcQ";

    /// Session writing into a buffer. Engine and timer results are kept away
    /// from the scripted channel so only the test decides what happens.
    struct Fixture {
        session: Session<Vec<u8>>,
        _engine_events: EngineEvents,
        _timer_rx: mpsc::Receiver<AppEvent>,
        _data_dir: TempDir,
    }

    fn fixture() -> Fixture {
        let data_dir = TempDir::new().unwrap();
        let settings = ApiSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            ..ApiSettings::default()
        };
        let api = ReqwestApi::new(&settings).unwrap();
        let (engine, engine_events) =
            EngineHandle::new(Arc::new(api), data_dir.path().join("downloads")).unwrap();
        let (timer_tx, timer_rx) = mpsc::channel();
        let runner = EffectRunner::new(
            engine,
            TimerService::new(timer_tx),
            data_dir.path().to_path_buf(),
        );
        Fixture {
            session: Session {
                state: AppState::new(),
                runner,
                screen: Screen::new(Vec::new(), false, "http://localhost:5000"),
                terminal: false,
            },
            _engine_events: engine_events,
            _timer_rx: timer_rx,
            _data_dir: data_dir,
        }
    }

    fn scripted(msgs: Vec<Msg>) -> mpsc::Receiver<AppEvent> {
        let (tx, rx) = mpsc::channel();
        for msg in msgs {
            tx.send(AppEvent::Msg(msg)).unwrap();
        }
        rx
    }

    // The first submit of a fresh session uses request id 1.
    fn started(result: Result<&str, &str>) -> Msg {
        Msg::ConversionStarted {
            request_id: 1,
            result: result.map(JobId::new).map_err(str::to_string),
        }
    }

    fn completed() -> Msg {
        Msg::StatusReceived {
            job_id: JobId::new("job-1"),
            result: Ok(effects::map_status(converter_engine::StatusResponse {
                status: "completed".to_string(),
                progress: Some(100.0),
                filename: Some("Song.mp3".to_string()),
                filesize_formatted: Some("3.2 MB".to_string()),
                ..Default::default()
            })),
            received_at_millis: 1_700_000_000_000,
        }
    }

    fn download_finished(result: Result<&str, &str>) -> Msg {
        Msg::DownloadFinished {
            filename: "Song.mp3".to_string(),
            result: result.map(str::to_string).map_err(str::to_string),
        }
    }

    fn output(fixture: Fixture) -> String {
        String::from_utf8(fixture.session.screen.into_inner()).unwrap()
    }

    #[test]
    fn refused_link_exits_with_two() {
        let mut f = fixture();
        let rx = scripted(Vec::new());
        let code = f.session.run_once(&rx, "https://vimeo.com/1".to_string(), false);

        assert_eq!(code, ExitCode::from(2));
        assert!(output(f).contains("[error] Invalid YouTube link"));
    }

    #[test]
    fn rejected_job_exits_with_one() {
        let mut f = fixture();
        let rx = scripted(vec![started(Err("Server busy"))]);

        assert_eq!(f.session.run_once(&rx, URL.to_string(), false), ExitCode::FAILURE);
        assert!(output(f).contains("Error: Server busy"));
    }

    #[test]
    fn completed_job_without_download_exits_with_zero() {
        let mut f = fixture();
        let rx = scripted(vec![started(Ok("job-1")), completed()]);

        assert_eq!(f.session.run_once(&rx, URL.to_string(), false), ExitCode::SUCCESS);
        assert_eq!(f.session.state.pending_download(), None);
        assert!(output(f).contains("Ready: Song.mp3 (3.2 MB)"));
    }

    #[test]
    fn auto_download_waits_for_the_file() {
        let mut f = fixture();
        let rx = scripted(vec![
            started(Ok("job-1")),
            completed(),
            download_finished(Ok("/music/Song.mp3")),
        ]);

        assert_eq!(f.session.run_once(&rx, URL.to_string(), true), ExitCode::SUCCESS);
        assert!(output(f).contains("[ok] Saved /music/Song.mp3"));
    }

    #[test]
    fn failed_auto_download_exits_with_one() {
        let mut f = fixture();
        let rx = scripted(vec![
            started(Ok("job-1")),
            completed(),
            download_finished(Err("disk full")),
        ]);

        assert_eq!(f.session.run_once(&rx, URL.to_string(), true), ExitCode::FAILURE);
        assert!(output(f).contains("Download of Song.mp3 failed: disk full"));
    }

    #[test]
    fn interactive_session_prompts_again_after_background_output() {
        let mut f = fixture();
        f.session.dispatch(Msg::InputChanged(URL.to_string()));
        f.session.dispatch(Msg::ConvertClicked);
        let rx = scripted(vec![started(Ok("job-1")), completed()]);

        assert_eq!(f.session.run_interactive(&rx), ExitCode::SUCCESS);
        let text = output(f);
        assert!(text.contains("[ok] Conversion completed!"));
        assert!(text.ends_with("> "));
    }
}
