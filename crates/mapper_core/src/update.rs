use crate::{Effect, Msg, ScreenState, UploadStatus};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ScreenState, msg: Msg) -> (ScreenState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(input) => {
            // The input widgets are disabled while a request is in flight;
            // ignore stray edits so state cannot be reset under the upload.
            if state.status() != UploadStatus::Processing {
                state.set_input(input);
            }
            Vec::new()
        }
        Msg::OptionsChanged(options) => {
            state.set_options(options);
            Vec::new()
        }
        Msg::SubmitClicked => {
            if state.status() != UploadStatus::Waiting {
                return (state, Vec::new());
            }
            match state.begin_processing() {
                Some((payload, options)) => vec![Effect::Submit { payload, options }],
                None => Vec::new(),
            }
        }
        Msg::UploadSucceeded { saved_path } => {
            if state.status() == UploadStatus::Processing {
                state.apply_success(saved_path);
            }
            Vec::new()
        }
        Msg::UploadFailed { message } => {
            if state.status() == UploadStatus::Processing {
                state.apply_failure(message);
            }
            Vec::new()
        }
        Msg::ClearClicked => {
            // Clear must not interrupt an in-flight request.
            if state.status() != UploadStatus::Processing {
                state.clear();
            }
            Vec::new()
        }
    };

    (state, effects)
}
