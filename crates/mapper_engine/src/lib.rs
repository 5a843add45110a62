//! Mapper engine: HTTP submission, artifact download, and persistence.
mod client;
mod engine;
mod filename;
mod persist;
mod types;

pub use client::{
    ChannelProgressSink, ClientSettings, ConversionApi, ProgressSink, ReqwestClient,
};
pub use engine::{EngineConfig, EngineHandle, StampFn};
pub use filename::derive_filename;
pub use persist::{ensure_output_dir, ArtifactWriter, PersistError};
pub use types::{
    ArtifactResponse, ClientEvent, FailureKind, JobId, JobProgress, SavedArtifact, Stage,
    SubmitError,
};
