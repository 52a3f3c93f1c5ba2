use hifitime::Epoch;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SextantError {
    #[error("Ephemeris oracle failed for {body} at {epoch}: {reason}")]
    OracleFailure {
        body: String,
        epoch: Epoch,
        reason: String,
    },

    #[error("Unknown or unsupported body: {0}")]
    UnknownBody(String),

    #[error("Invalid body selection: {0}")]
    InvalidBodySelection(String),

    #[error("Degenerate search interval: start {start} is not before end {end}")]
    DegenerateInterval { start: Epoch, end: Epoch },

    #[error("Invalid scan step: {0}")]
    InvalidStep(String),

    #[error("Invalid refinement window: {0}")]
    InvalidRefineWindow(String),

    #[error("Invalid search parameter: {0}")]
    InvalidSearchParameter(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("ROOTS finding error: {0}")]
    RootFindingError(#[from] roots::SearchError),

    #[error("Unable to parse the configuration: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl PartialEq for SextantError {
    fn eq(&self, other: &Self) -> bool {
        use SextantError::*;
        match (self, other) {
            (
                OracleFailure {
                    body: b1,
                    epoch: e1,
                    reason: r1,
                },
                OracleFailure {
                    body: b2,
                    epoch: e2,
                    reason: r2,
                },
            ) => b1 == b2 && e1 == e2 && r1 == r2,
            (UnknownBody(a), UnknownBody(b)) => a == b,
            (InvalidBodySelection(a), InvalidBodySelection(b)) => a == b,
            (
                DegenerateInterval { start: s1, end: e1 },
                DegenerateInterval { start: s2, end: e2 },
            ) => s1 == s2 && e1 == e2,
            (InvalidStep(a), InvalidStep(b)) => a == b,
            (InvalidRefineWindow(a), InvalidRefineWindow(b)) => a == b,
            (InvalidSearchParameter(a), InvalidSearchParameter(b)) => a == b,
            (InvalidTimestamp(a), InvalidTimestamp(b)) => a == b,
            (RootFindingError(a), RootFindingError(b)) => a == b,

            // Foreign errors are not comparable: same variant means equal
            (ConfigParseError(_), ConfigParseError(_)) => true,
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
