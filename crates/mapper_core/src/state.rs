use crate::view_model::ScreenView;
use crate::{Options, Payload, UploadStatus};

/// State of one upload screen: the current input, an owned options snapshot,
/// and the lifecycle status. One instance per modality screen; instances share
/// nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreenState {
    status: UploadStatus,
    input: Option<Payload>,
    options: Options,
    last_error: Option<String>,
    saved_path: Option<String>,
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn view(&self) -> ScreenView {
        ScreenView {
            status: self.status,
            can_submit: self.status == UploadStatus::Waiting && self.input.is_some(),
            can_clear: self.status != UploadStatus::Processing,
            last_error: self.last_error.clone(),
            saved_path: self.saved_path.clone(),
        }
    }

    pub(crate) fn set_input(&mut self, input: Option<Payload>) {
        let cleared = input.as_ref().map_or(true, Payload::is_empty);
        if cleared {
            self.input = None;
            self.status = UploadStatus::Initial;
        } else {
            self.input = input;
            self.status = UploadStatus::Waiting;
        }
    }

    pub(crate) fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    /// Moves to `Processing` and clones out what the transport layer needs.
    /// Returns `None` when no input is present.
    pub(crate) fn begin_processing(&mut self) -> Option<(Payload, Options)> {
        let payload = self.input.clone()?;
        self.status = UploadStatus::Processing;
        self.last_error = None;
        self.saved_path = None;
        Some((payload, self.options.clone()))
    }

    pub(crate) fn apply_success(&mut self, saved_path: String) {
        self.status = UploadStatus::Success;
        self.saved_path = Some(saved_path);
    }

    pub(crate) fn apply_failure(&mut self, message: String) {
        self.status = UploadStatus::Fail;
        self.last_error = Some(message);
    }

    pub(crate) fn clear(&mut self) {
        self.status = UploadStatus::Initial;
        self.input = None;
        self.options = Options::default();
        self.last_error = None;
        self.saved_path = None;
    }
}
