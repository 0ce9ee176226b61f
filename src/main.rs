//! PII Redaction CLI Application.
//!
//! Detects personal information in plain text or PDF documents and writes
//! redacted copies. By default, performs redaction; use the `detect` or
//! `extract` subcommands to inspect a document instead.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use pii_redactor::{
    detector_from_config, extract_text, logging, CategoryFilter, CommandTagger, Config,
    Detector, DocumentKind, EntityTagger, ModelAdapter, ProcessedDocument, RedactionService,
    SharedTagger, SpatialRedactor,
};
use std::sync::Arc;

/// PII Redaction Tool
///
/// Detect and redact names, IDs, PINs, phone numbers, emails and addresses
/// in text and PDF documents.
#[derive(Parser)]
#[command(name = "pii-redactor")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input document (.txt or .pdf)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (redacted text for text input, redacted PDF for PDF input)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Also write the redacted plain text here (useful for PDF input)
    #[arg(long, value_name = "FILE")]
    text_output: Option<PathBuf>,

    #[command(flatten)]
    categories: CategoryArgs,

    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Switches for the category groups to redact.
#[derive(Args, Debug, Default)]
struct CategoryArgs {
    /// Do not redact person names
    #[arg(long)]
    no_names: bool,

    /// Do not redact IDs and PINs
    #[arg(long)]
    no_ids: bool,

    /// Do not redact addresses
    #[arg(long)]
    no_addresses: bool,

    /// Do not redact phone numbers and emails
    #[arg(long)]
    no_contacts: bool,

    /// Redact organization names
    #[arg(long)]
    orgs: bool,
}

impl CategoryArgs {
    /// Applies the flags on top of the configured defaults.
    fn filter(&self, base: CategoryFilter) -> CategoryFilter {
        CategoryFilter {
            names: base.names && !self.no_names,
            ids: base.ids && !self.no_ids,
            addresses: base.addresses && !self.no_addresses,
            contacts: base.contacts && !self.no_contacts,
            organizations: base.organizations || self.orgs,
        }
    }
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// External tagger command (reads text on stdin, prints JSON entities)
    #[arg(long, value_name = "CMD", global = true)]
    tagger_cmd: Option<String>,

    /// Argument passed to the tagger command (can be specified multiple times)
    #[arg(long = "tagger-arg", value_name = "ARG", global = true)]
    tagger_args: Vec<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the entities detected in a document
    Detect {
        /// Input document (.txt or .pdf)
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Print entities as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract text from a document (for debugging and verification)
    Extract {
        /// Input document (.txt or .pdf)
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output text file (optional, defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Command handler holding the configured service.
struct RedactionHandler {
    service: RedactionService,
    config: Config,
}

impl RedactionHandler {
    fn new(config: Config, common: &CommonArgs) -> Self {
        let detector = match &common.tagger_cmd {
            Some(program) => {
                let tagger = CommandTagger::new(program.clone()).with_args(common.tagger_args.clone());
                let shared = SharedTagger::eager(Arc::new(tagger) as Arc<dyn EntityTagger>);
                Detector::with_model(
                    ModelAdapter::new(Arc::new(shared)).with_rules(config.detection.rule_set()),
                )
            }
            None => detector_from_config(&config),
        };
        let strategy = SpatialRedactor::new().with_max_hits(config.redaction.max_hits);

        Self {
            service: RedactionService::new(detector, Box::new(strategy)),
            config,
        }
    }

    fn read_input(input: &Path) -> Result<(Vec<u8>, DocumentKind)> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }
        let bytes =
            std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
        let kind = DocumentKind::detect(Some(input), &bytes);
        Ok((bytes, kind))
    }

    /// Executes a redaction operation.
    fn redact(
        &self,
        input: &Path,
        output: &Path,
        text_output: Option<&Path>,
        categories: &CategoryArgs,
    ) -> Result<()> {
        let (bytes, kind) = Self::read_input(input)?;
        let filter = categories.filter(self.config.redaction.categories);

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            ?kind,
            ?filter,
            "Redacting document"
        );

        let processed = self
            .service
            .process_document(&bytes, kind, &filter, &input.display().to_string())
            .with_context(|| "Redaction failed")?;

        match &processed.document {
            Some(document) => {
                std::fs::write(output, &document.bytes)
                    .with_context(|| format!("Failed to write to {}", output.display()))?;
                tracing::info!(
                    pages_processed = document.result.pages_processed,
                    pages_modified = document.result.pages_modified,
                    regions = document.result.instances_redacted,
                    "PDF written"
                );
            }
            None => {
                std::fs::write(output, &processed.redacted_text)
                    .with_context(|| format!("Failed to write to {}", output.display()))?;
            }
        }

        if let Some(path) = text_output {
            std::fs::write(path, &processed.redacted_text)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        println!("{}", redaction_summary(&processed, output));

        Ok(())
    }

    /// Prints the detected entities.
    fn detect(&self, input: &Path, json: bool) -> Result<()> {
        let (bytes, kind) = Self::read_input(input)?;
        let text = extract_text(&bytes, kind, &input.display().to_string())
            .with_context(|| "Text extraction failed")?;
        let detection = self.service.detect(&text);

        if json {
            let rendered = serde_json::to_string_pretty(&detection.entities)
                .with_context(|| "Failed to serialize entities")?;
            println!("{}", rendered);
            return Ok(());
        }

        println!("{:<12} {:>8} {:>8} {:>4}  TEXT", "TYPE", "START", "END", "PRIO");
        for entity in &detection.entities {
            println!(
                "{:<12} {:>8} {:>8} {:>4}  {}",
                entity.category.label(),
                entity.start,
                entity.end,
                entity.priority,
                entity.surface.replace('\n', " ")
            );
        }
        println!(
            "{} entit{} ({} candidate(s) discarded)",
            detection.entities.len(),
            plural(detection.entities.len()),
            detection.discarded()
        );
        let counts: Vec<String> = detection
            .counts_by_category()
            .into_iter()
            .map(|(category, count)| format!("{}: {}", category.label(), count))
            .collect();
        if !counts.is_empty() {
            println!("{}", counts.join(", "));
        }

        Ok(())
    }

    /// Extracts text from a document.
    fn extract(&self, input: &Path, output: Option<&Path>) -> Result<()> {
        let (bytes, kind) = Self::read_input(input)?;
        let text = extract_text(&bytes, kind, &input.display().to_string())
            .with_context(|| "Text extraction failed")?;

        if let Some(output_path) = output {
            std::fs::write(output_path, &text)
                .with_context(|| format!("Failed to write to {}", output_path.display()))?;
            println!(
                "✓ Extracted {} characters → {}",
                text.chars().count(),
                output_path.display()
            );
        } else {
            println!("{}", text);
        }

        Ok(())
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        "y"
    } else {
        "ies"
    }
}

/// Builds the one-line outcome report for a redaction run.
///
/// A PDF whose selected entities were not found on any page is left
/// unchanged, which is reported as a warning rather than a success.
fn redaction_summary(processed: &ProcessedDocument, output: &Path) -> String {
    let selected = processed.redacted_entities.len();
    if selected == 0 {
        return "⚠ No entities found to redact".to_string();
    }

    match &processed.document {
        Some(document) if !document.result.has_redactions() => format!(
            "⚠ {} entit{} detected but not located on any page; {} is unchanged",
            selected,
            plural(selected),
            output.display()
        ),
        Some(document) => format!(
            "✓ Redacted {} entit{} ({} region{}) → {}",
            selected,
            plural(selected),
            document.result.instances_redacted,
            if document.result.instances_redacted == 1 { "" } else { "s" },
            output.display()
        ),
        None => format!(
            "✓ Redacted {} entit{} → {}",
            selected,
            plural(selected),
            output.display()
        ),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.common.config.as_deref())?;
    logging::init_logging(&config.logging.level, cli.common.verbose)?;

    let handler = RedactionHandler::new(config, &cli.common);

    match &cli.command {
        Some(Commands::Detect { input, json }) => {
            handler.detect(input, *json)?;
        }
        Some(Commands::Extract { input, output }) => {
            handler.extract(input, output.as_deref())?;
        }
        None => {
            let input = cli
                .input
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--input is required"))?;
            let output = cli
                .output
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--output is required"))?;

            handler.redact(input, output, cli.text_output.as_deref(), &cli.categories)?;
        }
    }

    Ok(())
}
