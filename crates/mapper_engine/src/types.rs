use std::fmt;
use std::path::PathBuf;

pub type JobId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Queued,
    Sending,
    Downloading,
    Saving,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProgress {
    pub job_id: JobId,
    pub stage: Stage,
    pub bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Progress(JobProgress),
    Completed {
        job_id: JobId,
        result: Result<SavedArtifact, SubmitError>,
    },
}

/// Raw binary response from the conversion service plus the metadata headers
/// the filename derivation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactResponse {
    pub bytes: Vec<u8>,
    pub disposition: Option<String>,
    pub content_type: Option<String>,
}

/// Outcome of a successful submission: the artifact is on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    pub path: PathBuf,
    pub filename: String,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitError {
    pub kind: FailureKind,
    /// Transport-level message (status line, io error text, ...).
    pub message: String,
    /// `detail` field of a structured error body, when the server sent one.
    pub detail: Option<String>,
}

impl SubmitError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }

    /// Numeric status code as the original client reported it: the HTTP code
    /// for server failures, 0 for anything that never got a response.
    pub fn status_code(&self) -> u16 {
        match self.kind {
            FailureKind::HttpStatus(code) => code,
            _ => 0,
        }
    }

    /// The normalized user-facing text. The front end decides how to render
    /// it; nothing in the transport layer blocks on the user.
    pub fn user_message(&self) -> String {
        match &self.detail {
            Some(detail) => format!("An error occurred:\n{detail}"),
            None => format!(
                "An error occurred:\nStatus: {}\nMessage: {}",
                self.status_code(),
                self.message
            ),
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
    Serialize,
    Save,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Serialize => write!(f, "serialization error"),
            FailureKind::Save => write!(f, "save error"),
        }
    }
}
