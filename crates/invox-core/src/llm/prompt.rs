//! Instruction prompts sent to the completion endpoint.

/// System message fixing the JSON-only reply contract.
pub const SYSTEM_PROMPT: &str = "You are a JSON extractor that returns ONLY a single JSON object.";

/// Build the user prompt for the given invoice text.
pub fn build_prompt(text: &str) -> String {
    format!(
        "You are an AI assistant that extracts structured data from invoices. \
         Convert the following invoice text into valid JSON. Include these fields exactly: \
         'Invoice Number', 'Invoice Date', 'Customer Name', 'Subtotal', 'Tax', and 'Total Amount'.\n\
         If any field is missing in the text, include it with an empty string value.\n\
         ONLY output the JSON object -- no extra explanation or commentary.\n\n\
         Invoice Text:\n{}\n\nJSON:",
        text
    )
}
