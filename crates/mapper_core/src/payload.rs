/// One of the three input modalities accepted by the conversion service.
///
/// Callers guarantee non-emptiness before handing a payload to the state
/// machine: text and url must be non-empty strings, a file must carry a
/// non-empty name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Url(String),
    File { name: String, bytes: Vec<u8> },
}

impl Payload {
    /// True when the payload carries no usable input (treated as a cleared
    /// input box by the state machine).
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Text(text) => text.is_empty(),
            Payload::Url(url) => url.is_empty(),
            Payload::File { name, .. } => name.is_empty(),
        }
    }
}

/// Lifecycle tag for one upload attempt on one screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Initial,
    Waiting,
    Processing,
    Success,
    Fail,
}
