use thiserror::Error;

/// Errors raised while turning an uploaded spreadsheet into an image
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The uploaded bytes are not a readable workbook
    #[error("could not read spreadsheet: {0}")]
    Parse(#[from] calamine::XlsxError),

    /// The workbook has no sheet or no header row
    #[error("spreadsheet has no data")]
    EmptyWorkbook,

    /// The aggregated render requires named columns that were not found.
    /// Every missing name is listed, not just the first.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A grid with zero columns cannot be drawn
    #[error("grid has no columns to draw")]
    EmptyGrid,

    /// The drawing backend failed
    #[error("could not draw grid: {0}")]
    Draw(String),

    /// The image could not be encoded
    #[error("could not encode image: {0}")]
    Encode(#[from] image::ImageError),
}

impl ConvertError {
    /// Message shown to the person submitting the form.
    ///
    /// Missing-column validation keeps its specific message; every other
    /// failure is reported as an unexpected error while the full detail is
    /// logged for the operator.
    pub fn user_message(&self) -> String {
        match self {
            ConvertError::MissingColumns(_) => self.to_string(),
            other => format!("An unexpected error occurred: {}", other),
        }
    }
}

/// Errors raised while configuring the mailer or delivering a message
#[derive(Debug, Error)]
pub enum MailError {
    #[error("mailer is not configured: {0}")]
    Config(String),

    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("invalid attachment type: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),

    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("could not send message: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}
