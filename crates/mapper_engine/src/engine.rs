use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use chrono::Local;
use client_logging::{client_info, client_warn};
use mapper_core::{Options, Payload};

use crate::client::{ChannelProgressSink, ClientSettings, ConversionApi, ProgressSink, ReqwestClient};
use crate::filename::derive_filename;
use crate::persist::ArtifactWriter;
use crate::{ClientEvent, FailureKind, JobId, JobProgress, SavedArtifact, Stage, SubmitError};

/// Callback producing the timestamp used for fallback filenames. Injectable
/// so tests stay deterministic.
pub type StampFn = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Clone)]
pub struct EngineConfig {
    pub settings: ClientSettings,
    pub output_dir: PathBuf,
    pub stamp: StampFn,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            settings: ClientSettings::default(),
            output_dir,
            stamp: Arc::new(|| Local::now().format("%Y%m%d-%H%M%S").to_string()),
        }
    }
}

enum EngineCommand {
    Submit {
        job_id: JobId,
        payload: Payload,
        options: Options,
    },
}

/// Bridge between a synchronous front end and the async transport client.
/// Commands go in over a channel; `ClientEvent`s come out. The worker thread
/// owns the tokio runtime; in-flight submissions run to completion, there is
/// no cancellation.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<ClientEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let client = Arc::new(ReqwestClient::new(config.settings.clone()));
        let config = Arc::new(config);

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let config = config.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(client.as_ref(), &config, command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn submit(&self, job_id: JobId, payload: Payload, options: Options) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            job_id,
            payload,
            options,
        });
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    client: &dyn ConversionApi,
    config: &EngineConfig,
    command: EngineCommand,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    match command {
        EngineCommand::Submit {
            job_id,
            payload,
            options,
        } => {
            client_info!("Submit job_id={}", job_id);
            let sink = ChannelProgressSink::new(event_tx.clone());
            sink.emit(ClientEvent::Progress(JobProgress {
                job_id,
                stage: Stage::Queued,
                bytes: None,
            }));
            let result = match client.submit(job_id, &payload, &options, &sink).await {
                Ok(response) => {
                    sink.emit(ClientEvent::Progress(JobProgress {
                        job_id,
                        stage: Stage::Saving,
                        bytes: Some(response.bytes.len() as u64),
                    }));
                    let saved =
                        save_artifact(config, &options, &response.disposition, &response.bytes);
                    if saved.is_ok() {
                        sink.emit(ClientEvent::Progress(JobProgress {
                            job_id,
                            stage: Stage::Done,
                            bytes: Some(response.bytes.len() as u64),
                        }));
                    }
                    saved
                }
                Err(err) => {
                    client_warn!("Job {} failed: {}", job_id, err);
                    Err(err)
                }
            };
            let _ = event_tx.send(ClientEvent::Completed { job_id, result });
        }
    }
}

fn save_artifact(
    config: &EngineConfig,
    options: &Options,
    disposition: &Option<String>,
    bytes: &[u8],
) -> Result<SavedArtifact, SubmitError> {
    let stamp = (config.stamp)();
    let filename = derive_filename(disposition.as_deref(), options, &stamp);
    let writer = ArtifactWriter::new(config.output_dir.clone());
    let path = writer
        .write(&filename, bytes)
        .map_err(|err| SubmitError::new(FailureKind::Save, err.to_string()))?;
    client_info!("Saved artifact {} ({} bytes)", path.display(), bytes.len());
    Ok(SavedArtifact {
        path,
        filename,
        byte_len: bytes.len() as u64,
    })
}
