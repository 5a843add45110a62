use crate::{Options, Payload};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the input (text box, url box, or file picker). `None` or an
    /// empty payload means the input was cleared.
    InputChanged(Option<Payload>),
    /// The options form reported an edit; the screen owns the snapshot.
    OptionsChanged(Options),
    /// User submitted the current input for conversion.
    SubmitClicked,
    /// The transport layer finished the upload and saved the artifact.
    UploadSucceeded { saved_path: String },
    /// The transport layer failed; `message` is the normalized user-facing text.
    UploadFailed { message: String },
    /// User clicked Clear.
    ClearClicked,
}
