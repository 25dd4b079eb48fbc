use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReshapeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("spreadsheet read failed: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("input file not found: {0}")]
    MissingInput(String),

    #[error("no readable sheet in {0}")]
    EmptySheet(String),

    #[error("unexpected table structure: {0}")]
    Structure(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ReshapeError>;
