use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid DOCX: {0}")]
    InvalidDocx(String),

    /// A translated style is not defined in the destination document.
    #[error("style '{0}' not found in destination document")]
    MissingStyle(String),

    /// A fixed row/column coordinate is absent from a table or from the
    /// row data supplied for it.
    #[error("{table}: no {what} at row {row}, column {col}")]
    StructuralIndex {
        table: String,
        what: &'static str,
        row: usize,
        col: usize,
    },
}
