use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Output extensions the conversion service can render.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".gif", ".jpeg", ".pdf", ".png", ".svg"];

/// Backend model identifiers the service accepts.
pub const KNOWN_MODELS: &[&str] = &[
    "gpt-4o",
    "gpt-4o-mini",
    "gpt-4-turbo",
    "gpt-4",
    "gpt-3.5-turbo",
    "mistral-large-latest",
    "mistral-small-latest",
    "open-mistral-7b",
];

/// Wire names of the prompt contexts, in declaration order of [`Context`].
pub const CONTEXT_NAMES: &[&str] = &["default", "wiki-text", "scientific", "mathematical"];

/// Prompt context hint forwarded to the conversion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Context {
    #[default]
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "wiki-text")]
    WikiText,
    #[serde(rename = "scientific")]
    Scientific,
    #[serde(rename = "mathematical")]
    Mathematical,
}

impl Context {
    /// The wire name the service expects for this context.
    pub fn as_str(self) -> &'static str {
        match self {
            Context::Default => "default",
            Context::WikiText => "wiki-text",
            Context::Scientific => "scientific",
            Context::Mathematical => "mathematical",
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Context {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "default" => Ok(Context::Default),
            "wiki-text" => Ok(Context::WikiText),
            "scientific" => Ok(Context::Scientific),
            "mathematical" => Ok(Context::Mathematical),
            other => Err(format!(
                "unknown context {other:?}, expected one of: {}",
                CONTEXT_NAMES.join(", ")
            )),
        }
    }
}

/// Per-request rendering configuration, attached verbatim to every submission.
///
/// A value object: the transport layer only ever reads it. No field is
/// validated here; the service clamps out-of-range values and falls back for
/// unknown names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Options {
    /// Explicit output filename override; empty means "derive from server".
    pub filename: String,
    /// Desired output extension; may or may not carry a leading dot.
    pub extension: String,
    pub context: Context,
    pub model: String,
    pub temperature: f64,
    /// Upper bound on graph nodes rendered.
    pub num_nodes: u32,
    pub show_node_props: bool,
    pub show_edge_props: bool,
    pub show_labels: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            filename: String::new(),
            extension: ".pdf".to_string(),
            context: Context::Default,
            model: "gpt-4o".to_string(),
            temperature: 0.1,
            num_nodes: 12,
            show_node_props: false,
            show_edge_props: false,
            show_labels: true,
        }
    }
}
