use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context as _};
use clap::{Args, Parser, Subcommand};
use client_logging::client_debug;
use mapper_core::{update, Context, Effect, Msg, Options, Payload, ScreenState, UploadStatus};
use mapper_engine::{ClientEvent, EngineConfig, EngineHandle};

/// Submit text, a file, or a url to the concept-map conversion service and
/// save the rendered artifact.
#[derive(Parser)]
#[command(name = "mapper", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    options: OptionArgs,

    /// Base url of the conversion service.
    #[arg(long, default_value = "http://127.0.0.1:8000/api")]
    base_url: String,

    /// Directory the artifact is saved into.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Log at debug level.
    #[arg(long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Convert raw text.
    Text { text: String },
    /// Convert a local file (.pdf, .txt, .md, or .tex).
    File { path: PathBuf },
    /// Scrape and convert a web page.
    Url { url: String },
}

/// Rendering options forwarded to the service; unset flags keep the defaults.
#[derive(Args)]
struct OptionArgs {
    /// Explicit output filename (overrides the server-suggested name).
    #[arg(long)]
    filename: Option<String>,
    /// Output extension, with or without the leading dot.
    #[arg(long)]
    extension: Option<String>,
    /// Prompt context: default, wiki-text, scientific, or mathematical.
    #[arg(long)]
    context: Option<Context>,
    /// Backend model identifier.
    #[arg(long)]
    model: Option<String>,
    /// Sampling temperature.
    #[arg(long)]
    temperature: Option<f64>,
    /// Upper bound on rendered graph nodes.
    #[arg(long)]
    num_nodes: Option<u32>,
    #[arg(long)]
    show_node_props: bool,
    #[arg(long)]
    show_edge_props: bool,
    /// Labels are rendered by default; this turns them off.
    #[arg(long)]
    hide_labels: bool,
}

impl OptionArgs {
    fn build(&self) -> Options {
        let mut options = Options::default();
        if let Some(filename) = &self.filename {
            options.filename = filename.clone();
        }
        if let Some(extension) = &self.extension {
            options.extension = extension.clone();
        }
        if let Some(context) = self.context {
            options.context = context;
        }
        if let Some(model) = &self.model {
            options.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            options.temperature = temperature;
        }
        if let Some(num_nodes) = self.num_nodes {
            options.num_nodes = num_nodes;
        }
        options.show_node_props = self.show_node_props;
        options.show_edge_props = self.show_edge_props;
        options.show_labels = !self.hide_labels;
        options
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    client_logging::initialize(level);

    let payload = build_payload(&cli.command)?;
    let options = cli.options.build();

    let mut config = EngineConfig::default_with_output(cli.output_dir.clone());
    config.settings.base_url = cli.base_url.clone();
    let engine = EngineHandle::new(config);

    // Drive the screen state machine exactly as the UI would: provide input,
    // snapshot the options, submit, then wait for settlement.
    let state = ScreenState::new();
    let (state, _) = update(state, Msg::InputChanged(Some(payload)));
    let (state, _) = update(state, Msg::OptionsChanged(options));
    let (mut state, effects) = update(state, Msg::SubmitClicked);

    for effect in effects {
        let Effect::Submit { payload, options } = effect;
        engine.submit(1, payload, options);
    }

    while state.status() == UploadStatus::Processing {
        match engine.try_recv() {
            Some(ClientEvent::Progress(progress)) => {
                client_debug!(
                    "job {} stage {:?} bytes {:?}",
                    progress.job_id,
                    progress.stage,
                    progress.bytes
                );
            }
            Some(ClientEvent::Completed { result, .. }) => {
                let msg = match result {
                    Ok(artifact) => Msg::UploadSucceeded {
                        saved_path: artifact.path.display().to_string(),
                    },
                    Err(err) => Msg::UploadFailed {
                        message: err.user_message(),
                    },
                };
                (state, _) = update(state, msg);
            }
            None => thread::sleep(Duration::from_millis(20)),
        }
    }

    let view = state.view();
    match view.status {
        UploadStatus::Success => {
            let saved = view.saved_path.unwrap_or_default();
            println!("Saved {saved}");
            Ok(())
        }
        _ => {
            bail!(view
                .last_error
                .unwrap_or_else(|| "An error occurred:\nStatus: 0\nMessage: unknown".to_string()))
        }
    }
}

fn build_payload(command: &Command) -> anyhow::Result<Payload> {
    match command {
        Command::Text { text } => {
            if text.is_empty() {
                bail!("text input must not be empty");
            }
            Ok(Payload::Text(text.clone()))
        }
        Command::Url { url } => {
            if url.is_empty() {
                bail!("url input must not be empty");
            }
            Ok(Payload::Url(url.clone()))
        }
        Command::File { path } => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let name = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
                .filter(|name| !name.is_empty())
                .context("file path has no usable name")?;
            Ok(Payload::File { name, bytes })
        }
    }
}
