#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameError {
    #[error("Invalid JSON frame")]
    InvalidJson,

    #[error("Serial frame must be a JSON object")]
    NotAnObject,

    #[error("Missing required key: {0}")]
    MissingKey(&'static str),

    #[error("Sensor key {0} must be numeric")]
    NonNumeric(&'static str),

    #[error("Unexpected sensor key: {0}")]
    UnexpectedKey(String),

    #[error("pir must be 0 or 1")]
    InvalidPir,

    #[error("{field} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
}
