//! Extract command - run one invoice PDF through the model and save the XML.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use invox_core::invoice::xml::XML_MIME_TYPE;
use invox_core::{CompletionSettings, HttpCompletionClient, InvoicePipeline, InvoxError};

use super::config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Invoice PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// API key (default: OPENROUTER_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Chat completion endpoint URL (default: API_BASE)
    #[arg(long)]
    api_base: Option<String>,

    /// Model name (default: MODEL, or the configured model)
    #[arg(short, long)]
    model: Option<String>,

    /// Where to save the XML document (default: invoice.xml)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not save the XML document
    #[arg(long, conflicts_with = "output")]
    no_save: bool,

    /// Print only the XML document
    #[arg(short, long)]
    quiet: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = config::load(config_path)?;
    if let Some(key) = args.api_key.clone() {
        config.api.api_key = Some(key);
    }
    if let Some(base) = args.api_base.clone() {
        config.api.base_url = base;
    }
    if let Some(model) = args.model.clone() {
        config.api.model = model;
    }

    if !args.input.is_file() {
        return Err(InvoxError::MissingInput(format!(
            "PDF file not found: {}",
            args.input.display()
        ))
        .into());
    }

    let settings = CompletionSettings::from_config(&config.api)?;
    info!("Using model {} at {}", settings.model, settings.base_url);
    let pipeline = InvoicePipeline::new(HttpCompletionClient::new(settings)?);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Extracting text...");
    let data = fs::read(&args.input)?;
    let text = match pipeline.extract_text(&data) {
        Ok(text) => text,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };

    if !args.quiet {
        pb.suspend(|| print_section("Extracted Text", &text));
    }

    pb.set_message("Calling API, response may take a few seconds...");
    let report = pipeline.process_text(&text).await;
    pb.finish_and_clear();
    let report = report?;

    if !args.quiet {
        print_section("Model response (raw)", &report.raw_response);
    }

    let json = match &report.interpretation {
        Ok(interpretation) => interpretation.json_text(),
        Err(e) => anyhow::bail!("{}", e),
    };
    if !args.quiet {
        print_section("Extracted JSON", json);
    }

    for warning in &report.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    match &report.xml {
        Some(Ok(xml)) => {
            if args.quiet {
                print!("{}", xml);
            } else {
                print_section("Converted XML", xml.trim_end());
            }

            if !args.no_save {
                let path = args
                    .output
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(&config.output.xml_file_name));
                fs::write(&path, xml)?;
                eprintln!(
                    "{} XML written to {} ({})",
                    style("✓").green(),
                    path.display(),
                    XML_MIME_TYPE
                );
            }
        }
        Some(Err(e)) => {
            eprintln!("{} Could not convert to XML: {}", style("⚠").yellow(), e);
        }
        None => {}
    }

    debug!(
        "Total processing time: {:?} (model stage {}ms)",
        start.elapsed(),
        report.processing_time_ms
    );

    Ok(())
}

fn print_section(title: &str, body: &str) {
    println!("{}", style(title).bold().underlined());
    println!("{}", body);
    println!();
}
