//! Core library for LLM-assisted invoice extraction.
//!
//! This crate provides:
//! - PDF text extraction
//! - Prompt building and a chat-completion client
//! - Brace-scanning interpretation of model replies into invoice JSON
//! - XML rendering of the six-field invoice record

pub mod error;
pub mod invoice;
pub mod llm;
pub mod models;
pub mod pdf;
pub mod pipeline;

#[cfg(test)]
mod fixtures;

pub use error::{CompletionError, InterpretError, InvoxError, PdfError, Result, XmlError};
pub use invoice::{interpret, BraceScanInterpreter, Interpretation, ResponseInterpreter};
pub use llm::{CompletionClient, CompletionSettings, HttpCompletionClient};
pub use models::config::InvoxConfig;
pub use models::invoice::{InvoiceField, InvoiceRecord};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use pipeline::{ExtractionReport, InvoicePipeline};
