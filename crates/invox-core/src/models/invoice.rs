//! Invoice record with the six fields requested from the model.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::XmlError;

/// One of the recognized invoice fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InvoiceField {
    /// Invoice number/identifier.
    InvoiceNumber,
    /// Date the invoice was issued.
    InvoiceDate,
    /// Name of the billed customer.
    CustomerName,
    /// Amount before tax.
    Subtotal,
    /// Tax amount.
    Tax,
    /// Amount due.
    TotalAmount,
}

impl InvoiceField {
    /// All fields in canonical order.
    pub const ALL: [InvoiceField; 6] = [
        InvoiceField::InvoiceNumber,
        InvoiceField::InvoiceDate,
        InvoiceField::CustomerName,
        InvoiceField::Subtotal,
        InvoiceField::Tax,
        InvoiceField::TotalAmount,
    ];

    /// Key used in the model's JSON output.
    pub fn key(self) -> &'static str {
        match self {
            Self::InvoiceNumber => "Invoice Number",
            Self::InvoiceDate => "Invoice Date",
            Self::CustomerName => "Customer Name",
            Self::Subtotal => "Subtotal",
            Self::Tax => "Tax",
            Self::TotalAmount => "Total Amount",
        }
    }

    /// XML element name. Spaces are not allowed in element names.
    pub fn element_name(self) -> &'static str {
        match self {
            Self::InvoiceNumber => "Invoice_Number",
            Self::InvoiceDate => "Invoice_Date",
            Self::CustomerName => "Customer_Name",
            Self::Subtotal => "Subtotal",
            Self::Tax => "Tax",
            Self::TotalAmount => "Total_Amount",
        }
    }

    /// Look up a field by its JSON key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Look up a field by its XML element name.
    pub fn from_element_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.element_name() == name)
    }
}

impl std::fmt::Display for InvoiceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Structured invoice as returned by the model.
///
/// A field is `None` when the model left it out of its JSON entirely, and
/// `Some("")` when it reported the field as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    #[serde(rename = "Invoice Number", default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    #[serde(rename = "Invoice Date", default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,

    #[serde(rename = "Customer Name", default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    #[serde(rename = "Subtotal", default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<String>,

    #[serde(rename = "Tax", default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<String>,

    #[serde(rename = "Total Amount", default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<String>,
}

impl InvoiceRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a parsed JSON value.
    ///
    /// Strings pass through, numbers and booleans keep their JSON text and
    /// `null` becomes an empty string. Unknown keys are ignored.
    pub fn from_json(value: &Value) -> Result<Self, XmlError> {
        let object = value
            .as_object()
            .ok_or_else(|| XmlError::NotAnObject(json_kind(value).to_string()))?;

        let mut record = Self::new();
        for (key, value) in object {
            let Some(field) = InvoiceField::from_key(key) else {
                debug!("Ignoring unrecognized field '{}'", key);
                continue;
            };
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => String::new(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(XmlError::NonScalarField(key.clone()));
                }
            };
            record.set(field, text);
        }
        Ok(record)
    }

    /// Get the value of a field.
    pub fn get(&self, field: InvoiceField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Set the value of a field.
    pub fn set(&mut self, field: InvoiceField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Fields present in the record, in canonical order.
    pub fn fields(&self) -> impl Iterator<Item = (InvoiceField, &str)> {
        InvoiceField::ALL
            .into_iter()
            .filter_map(|f| self.get(f).map(|v| (f, v)))
    }

    /// Fields the model did not return.
    pub fn missing_fields(&self) -> Vec<InvoiceField> {
        InvoiceField::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }

    fn slot(&self, field: InvoiceField) -> &Option<String> {
        match field {
            InvoiceField::InvoiceNumber => &self.invoice_number,
            InvoiceField::InvoiceDate => &self.invoice_date,
            InvoiceField::CustomerName => &self.customer_name,
            InvoiceField::Subtotal => &self.subtotal,
            InvoiceField::Tax => &self.tax,
            InvoiceField::TotalAmount => &self.total_amount,
        }
    }

    fn slot_mut(&mut self, field: InvoiceField) -> &mut Option<String> {
        match field {
            InvoiceField::InvoiceNumber => &mut self.invoice_number,
            InvoiceField::InvoiceDate => &mut self.invoice_date,
            InvoiceField::CustomerName => &mut self.customer_name,
            InvoiceField::Subtotal => &mut self.subtotal,
            InvoiceField::Tax => &mut self.tax,
            InvoiceField::TotalAmount => &mut self.total_amount,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
