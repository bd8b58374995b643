//! End-to-end extraction: PDF text, completion call, interpretation, XML.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{InterpretError, InvoxError, PdfError, Result, XmlError};
use crate::invoice::{to_xml, BraceScanInterpreter, Interpretation, ResponseInterpreter};
use crate::llm::{build_prompt, CompletionClient};
use crate::models::invoice::InvoiceRecord;
use crate::pdf::extract_invoice_text;

/// Everything produced by one run once the model has replied.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    /// Text extracted from the PDF.
    pub invoice_text: String,
    /// Reply as returned by the completion endpoint.
    pub raw_response: String,
    /// Interpreted JSON, or why none was found.
    pub interpretation: std::result::Result<Interpretation, InterpretError>,
    /// Typed record, when the JSON converted cleanly.
    pub record: Option<InvoiceRecord>,
    /// XML document; `None` when conversion was skipped.
    pub xml: Option<std::result::Result<String, XmlError>>,
    /// Non-fatal issues encountered along the way.
    pub warnings: Vec<String>,
    /// Time spent from prompt to XML, in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionReport {
    /// JSON text to display, normalized or raw.
    pub fn json_text(&self) -> Option<&str> {
        self.interpretation.as_ref().ok().map(Interpretation::json_text)
    }

    /// The XML document, if conversion succeeded.
    pub fn xml_document(&self) -> Option<&str> {
        match &self.xml {
            Some(Ok(xml)) => Some(xml),
            _ => None,
        }
    }
}

/// Runs the extraction stages against a completion client.
pub struct InvoicePipeline<C, I = BraceScanInterpreter> {
    client: C,
    interpreter: I,
}

impl<C: CompletionClient> InvoicePipeline<C> {
    /// Create a pipeline using brace-scanning interpretation.
    pub fn new(client: C) -> Self {
        Self {
            client,
            interpreter: BraceScanInterpreter::new(),
        }
    }
}

impl<C, I> InvoicePipeline<C, I>
where
    C: CompletionClient,
    I: ResponseInterpreter,
{
    /// Swap the response interpreter.
    pub fn with_interpreter<J: ResponseInterpreter>(self, interpreter: J) -> InvoicePipeline<C, J> {
        InvoicePipeline {
            client: self.client,
            interpreter,
        }
    }

    /// The completion client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Extract invoice text from PDF bytes.
    pub fn extract_text(&self, pdf: &[u8]) -> Result<String> {
        if pdf.is_empty() {
            return Err(InvoxError::MissingInput("PDF file is empty".to_string()));
        }

        let text = extract_invoice_text(pdf)?;
        info!("Extracted {} chars of invoice text", text.len());
        Ok(text)
    }

    /// Send the invoice text to the model and interpret the reply.
    ///
    /// Fails before any network call when the text is empty, and returns the
    /// completion error unchanged when the call fails. Interpretation and XML
    /// problems are recorded in the report.
    pub async fn process_text(&self, text: &str) -> Result<ExtractionReport> {
        if text.trim().is_empty() {
            return Err(PdfError::NoText.into());
        }

        let start = Instant::now();
        let prompt = build_prompt(text);
        debug!("Prompt length: {} chars", prompt.len());

        let raw_response = self.client.complete(&prompt).await?;

        let mut warnings = Vec::new();
        let interpretation = self.interpreter.interpret(&raw_response);

        let (record, xml) = match &interpretation {
            Ok(Interpretation::Normalized { value, .. }) => match InvoiceRecord::from_json(value) {
                Ok(record) => {
                    for field in record.missing_fields() {
                        warnings.push(format!("Model response omitted field '{}'", field));
                    }
                    let xml = to_xml(&record);
                    if let Err(e) = &xml {
                        warn!("XML conversion failed: {}", e);
                    }
                    (Some(record), Some(xml))
                }
                Err(e) => {
                    warn!("Could not build invoice record: {}", e);
                    (None, Some(Err(e)))
                }
            },
            Ok(Interpretation::Unparsed(_)) => {
                warnings.push(
                    "Model response is not valid JSON; XML conversion skipped".to_string(),
                );
                (None, None)
            }
            Err(e) => {
                warn!("{}", e);
                (None, None)
            }
        };

        let processing_time_ms = start.elapsed().as_millis() as u64;
        debug!("Processed model response in {}ms", processing_time_ms);

        Ok(ExtractionReport {
            invoice_text: text.to_string(),
            raw_response,
            interpretation,
            record,
            xml,
            warnings,
            processing_time_ms,
        })
    }

    /// Run every stage on a PDF.
    pub async fn run(&self, pdf: &[u8]) -> Result<ExtractionReport> {
        let text = self.extract_text(pdf)?;
        self.process_text(&text).await
    }
}
