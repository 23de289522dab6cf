use thiserror::Error;

#[derive(Error, Debug)]
pub enum GstError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a readable ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("Please select at least one month before converting.")]
    NoMonthsSelected,

    #[error("No valid data found in uploaded ZIP.")]
    NoData,

    #[error("No rows found for the selected month(s): {0}")]
    NoRowsForSelection(String),
}

pub type Result<T> = std::result::Result<T, GstError>;
