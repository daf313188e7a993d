use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpkeepError {
    /// A sensor value was NaN or infinite.
    #[error("Invalid reading: {field} = {value}")]
    InvalidReading { field: &'static str, value: f64 },

    /// The classifier was queried before training completed.
    #[error("Model not fitted")]
    ModelNotFitted,

    /// The training partition contains only one class.
    #[error("Degenerate training data: every record is labelled {class}")]
    DegenerateTrainingData { class: bool },

    #[error("Dataset is empty")]
    EmptyDataset,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, UpkeepError>;
