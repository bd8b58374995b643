//! Error types for the invox-core library.

use thiserror::Error;

/// Main error type for the invox library.
#[derive(Error, Debug)]
pub enum InvoxError {
    /// A required input (PDF file, API key) was not supplied.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// PDF text extraction error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Completion endpoint error.
    #[error("API request failed: {0}")]
    Completion(#[from] CompletionError),

    /// The model response could not be interpreted.
    #[error("{0}")]
    Interpret(#[from] InterpretError),

    /// XML conversion error.
    #[error("could not convert to XML: {0}")]
    Xml(#[from] XmlError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The PDF carries no extractable text (typically a scan).
    #[error("no extractable text found, the PDF may be a scanned image")]
    NoText,
}

/// Errors raised by the completion endpoint call.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// The endpoint answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request did not finish within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Connection or protocol failure before a response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// A success response whose body is not JSON.
    #[error("invalid response body: {0}")]
    InvalidResponse(String),
}

/// Errors from interpreting a model response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpretError {
    /// The response contains no `{ ... }` span.
    #[error("failed to extract JSON from model response")]
    NoJsonFound,
}

/// Errors related to XML conversion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XmlError {
    /// The parsed JSON value is not an object.
    #[error("expected a JSON object, found {0}")]
    NotAnObject(String),

    /// A field holds an array or object.
    #[error("field '{0}' is not a scalar value")]
    NonScalarField(String),

    /// A field value holds a character XML 1.0 cannot represent.
    #[error("field '{field}' contains a character not allowed in XML: {ch:?}")]
    InvalidCharacter { field: String, ch: char },

    /// The XML writer failed.
    #[error("failed to write XML: {0}")]
    Write(String),

    /// The XML document could not be read.
    #[error("failed to read XML: {0}")]
    Read(String),

    /// The document root is not `InvoiceData`.
    #[error("unexpected root element: {0}")]
    UnexpectedRoot(String),
}

/// Result type for the invox library.
pub type Result<T> = std::result::Result<T, InvoxError>;
