//! Show command - read back a saved invoice XML file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use invox_core::invoice::from_xml;
use invox_core::InvoiceField;

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Invoice XML file
    #[arg(default_value = "invoice.xml")]
    input: PathBuf,

    /// Print the record as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ShowArgs) -> anyhow::Result<()> {
    let xml = fs::read_to_string(&args.input)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", args.input.display(), e))?;
    let record = from_xml(&xml)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    for field in InvoiceField::ALL {
        match record.get(field) {
            Some(value) => println!("{:<15} {}", format!("{}:", field), value),
            None => println!("{:<15} {}", format!("{}:", field), style("(absent)").dim()),
        }
    }

    Ok(())
}
