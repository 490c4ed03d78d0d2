/// Errors that can occur while configuring the failure gate.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GateError {
    /// The failure policy could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}
