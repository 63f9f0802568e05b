use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use converter_logging::conv_debug;

use crate::client::{ConversionApi, ProgressSink};
use crate::{EngineEvent, RequestId};

enum EngineCommand {
    StartConversion { request_id: RequestId, url: String },
    CheckStatus { job_id: String },
    Release { job_id: String },
    Download { filename: String },
}

/// Sends work to the background runtime. Cheap to clone.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Receiving end for results produced by the engine.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    /// Starts the engine thread. Every command runs as its own task, so a slow
    /// status check never delays a later command.
    pub fn new(
        api: Arc<dyn ConversionApi>,
        download_dir: PathBuf,
    ) -> std::io::Result<(Self, EngineEvents)> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("converter-engine")
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                let download_dir = download_dir.clone();
                runtime.spawn(async move {
                    handle_command(api.as_ref(), command, &download_dir, event_tx).await;
                });
            }
            conv_debug!("Engine command channel closed");
        });

        Ok((Self { cmd_tx }, EngineEvents { event_rx }))
    }

    pub fn start_conversion(&self, request_id: RequestId, url: impl Into<String>) {
        self.send(EngineCommand::StartConversion {
            request_id,
            url: url.into(),
        });
    }

    pub fn check_status(&self, job_id: impl Into<String>) {
        self.send(EngineCommand::CheckStatus {
            job_id: job_id.into(),
        });
    }

    pub fn release(&self, job_id: impl Into<String>) {
        self.send(EngineCommand::Release {
            job_id: job_id.into(),
        });
    }

    pub fn download(&self, filename: impl Into<String>) {
        self.send(EngineCommand::Download {
            filename: filename.into(),
        });
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

impl EngineEvents {
    /// Blocks until the next event; `None` once the engine is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ProgressSink for ChannelProgressSink {
    fn on_progress(&self, filename: &str, bytes: u64, total: Option<u64>) {
        let _ = self.tx.send(EngineEvent::DownloadProgress {
            filename: filename.to_string(),
            bytes,
            total,
        });
    }
}

async fn handle_command(
    api: &dyn ConversionApi,
    command: EngineCommand,
    download_dir: &std::path::Path,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::StartConversion { request_id, url } => EngineEvent::ConversionStarted {
            request_id,
            result: api.start_conversion(&url).await,
        },
        EngineCommand::CheckStatus { job_id } => {
            let result = api.check_status(&job_id).await;
            EngineEvent::StatusChecked { job_id, result }
        }
        EngineCommand::Release { job_id } => {
            let result = api.release(&job_id).await;
            EngineEvent::Released { job_id, result }
        }
        EngineCommand::Download { filename } => {
            let sink = ChannelProgressSink {
                tx: event_tx.clone(),
            };
            let result = api.download(&filename, download_dir, &sink).await;
            EngineEvent::DownloadFinished { filename, result }
        }
    };
    let _ = event_tx.send(event);
}
