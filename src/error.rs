use thiserror::Error;

/// Errors that can occur while assembling a flow graph.
#[derive(Error, Debug, Clone)]
pub enum BuildError {
    #[error("an entry node already exists; a flow may declare exactly one entry point")]
    DuplicateEntry,

    #[error("variable '{name}' is not registered")]
    MissingVariable { name: String },
}

/// Errors raised while interpreting a step sequence.
///
/// A malformed condition step is deliberately absent here: the interpreter
/// degrades it to a synthesized catch-all branch instead of failing, so the
/// sequence always keeps going.
#[derive(Error, Debug, Clone)]
pub enum StepError {
    #[error("step {index} has unknown node type '{type_name}'; step skipped")]
    UnknownNodeType { index: usize, type_name: String },
}

/// Errors that can occur when talking to the object-storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("environment variable '{name}' is not set")]
    MissingEnv { name: &'static str },

    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upload rejected with status {status}: {body}")]
    UploadRejected { status: u16, body: String },

    #[error("remote file '{filename}' not found")]
    NotFound { filename: String },

    #[error("failed to encode document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when rendering or writing an exported document.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to serialize document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write document: {0}")]
    Io(#[from] std::io::Error),
}
