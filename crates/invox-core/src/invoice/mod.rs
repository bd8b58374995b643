//! Invoice interpretation and XML output.

mod interpreter;
pub mod xml;

pub use interpreter::{
    find_json_candidate, interpret, BraceScanInterpreter, Interpretation, ResponseInterpreter,
};
pub use xml::{from_xml, json_to_xml, to_xml};

use crate::error::InterpretError;

/// Result type for interpretation operations.
pub type Result<T> = std::result::Result<T, InterpretError>;
