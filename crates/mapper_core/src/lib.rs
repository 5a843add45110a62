//! Mapper core: pure upload state machine and the options model.
mod effect;
mod msg;
mod options;
mod payload;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use options::{Context, Options, CONTEXT_NAMES, KNOWN_MODELS, SUPPORTED_EXTENSIONS};
pub use payload::{Payload, UploadStatus};
pub use state::ScreenState;
pub use update::update;
pub use view_model::ScreenView;
