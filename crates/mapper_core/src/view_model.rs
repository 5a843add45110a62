use crate::UploadStatus;

/// Render-ready snapshot of one upload screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScreenView {
    pub status: UploadStatus,
    pub can_submit: bool,
    pub can_clear: bool,
    pub last_error: Option<String>,
    pub saved_path: Option<String>,
}
