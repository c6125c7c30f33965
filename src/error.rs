use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Contradictory or unrecognized style/type parameters.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Dump or log text is missing the expected section markers.
    #[error("malformed input: {0}")]
    Format(String),

    /// An atom row does not line up with the roster built from the first block.
    #[error("atom id {id} is inconsistent with the roster: {detail}")]
    IdConsistency { id: u64, detail: String },

    /// A chain rule asked for a neighbor that does not exist.
    #[error("topology error: {0}")]
    Topology(String),

    #[error("failed to parse input: {details} (at line {line})")]
    Parse { line: usize, details: String },

    #[error("I/O operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not load configuration file: {0}")]
    ConfigFile(#[from] confy::ConfyError),

    #[error("plotting failed: {0}")]
    Plot(String),

    #[error("statistics tool failed: {0}")]
    Stats(String),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    pub fn format(message: impl Into<String>) -> Self {
        Error::Format(message.into())
    }

    pub fn parse(line: usize, details: impl Into<String>) -> Self {
        Error::Parse {
            line,
            details: details.into(),
        }
    }

    pub fn id(id: u64, detail: impl Into<String>) -> Self {
        Error::IdConsistency {
            id,
            detail: detail.into(),
        }
    }
}
