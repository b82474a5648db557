// src/main.rs

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2obsidian::{
    convert_export, deliver, measure_index, AppError, CommandLineInput, Conversion,
    ConversionConfig, ConversionReport, DeliveryTarget, ExportSource, FileSystemAttachments,
    OutputPlan, OutputReport, RecordIndex, TreeSnapshot, VaultComposer, VaultDelivery,
};
use std::fs;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion2obsidian.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Executes the three-stage conversion: load → compose → deliver.
async fn execute_pipeline(config: &ConversionConfig) -> Result<(), AppError> {
    let pipeline = NotionToObsidian::new(config);

    if config.report {
        let index = RecordIndex::load(&config.index_path).await?;
        println!("{}", measure_index(&index));
        return Ok(());
    }

    let (index, tree) = pipeline.load().await?;
    let conversion = pipeline.compose(&index, &tree)?;

    if config.dry_run {
        pipeline.report_plan(&conversion);
        return Ok(());
    }

    let Conversion { plan, report } = conversion;
    let delivered = pipeline.deliver(plan).await?;
    pipeline.report_completion(&report, &delivered);

    Ok(())
}

/// Orchestrates loading, converting and writing one export.
struct NotionToObsidian<'a> {
    config: &'a ConversionConfig,
}

impl<'a> NotionToObsidian<'a> {
    fn new(config: &'a ConversionConfig) -> Self {
        Self { config }
    }

    /// Lists what a run would write, without touching the vault.
    fn report_plan(&self, conversion: &Conversion) {
        for operation in &conversion.plan.operations {
            match operation {
                DeliveryTarget::WriteFile { path, content } => {
                    println!("write  {} ({} bytes)", path.display(), content.len());
                }
                DeliveryTarget::CopyAttachment { attachment, destination } => {
                    println!(
                        "copy   {}/{} -> {}",
                        attachment.attachment_id,
                        attachment.filename,
                        destination.display()
                    );
                }
            }
        }
        let (documents, attachments) = conversion.plan.counts();
        println!(
            "📄 Dry run: {} documents and {} attachments would be written to {}",
            documents,
            attachments,
            self.config.vault_dir.display()
        );
        self.report_conversion(&conversion.report);
    }

    fn report_conversion(&self, report: &ConversionReport) {
        if report.unrecognized_blocks > 0 {
            eprintln!(
                "⚠️  {} blocks of unrecognized kinds were left out.",
                report.unrecognized_blocks
            );
        }
        for skipped in &report.skipped {
            eprintln!("⚠️  Skipped {}: {}", skipped.id, skipped.reason);
        }
        if report.warnings > 0 {
            eprintln!(
                "⚠️  {} warnings during conversion (run with -v for details).",
                report.warnings
            );
        }
    }

    /// Reports completion to the user with stats and delivery confirmations.
    fn report_completion(&self, conversion: &ConversionReport, report: &OutputReport) {
        self.report_conversion(conversion);

        for failed in &report.failed {
            eprintln!(
                "⚠️  {} failed: {}",
                failed.operation.target_path().display(),
                failed.error
            );
        }

        let documents = report
            .completed
            .iter()
            .filter(|c| matches!(c.operation, DeliveryTarget::WriteFile { .. }))
            .count();
        let attachments = report
            .completed
            .iter()
            .filter(|c| matches!(c.operation, DeliveryTarget::CopyAttachment { .. }))
            .count();

        println!(
            "✓ {} documents and {} attachments written to {} ({} bytes, {} ms)",
            documents,
            attachments,
            self.config.vault_dir.display(),
            report.stats.bytes_written,
            report.stats.total_duration_ms
        );
    }
}

#[async_trait::async_trait]
impl ExportSource for NotionToObsidian<'_> {
    async fn load(&self) -> Result<(RecordIndex, TreeSnapshot), AppError> {
        log::info!("Loading export {}", self.config.index_path.display());
        let index = RecordIndex::load(&self.config.index_path).await?;
        let tree = TreeSnapshot::load(&self.config.tree_path).await?;

        log::info!(
            "Loaded {} blocks, {} collections and {} top-level pages",
            index.blocks.len(),
            index.collections.len(),
            tree.pages().len()
        );
        if index.skipped_records > 0 {
            log::warn!("{} malformed records were skipped", index.skipped_records);
        }
        Ok((index, tree))
    }
}

impl VaultComposer for NotionToObsidian<'_> {
    fn compose(&self, index: &RecordIndex, tree: &TreeSnapshot) -> Result<Conversion, AppError> {
        convert_export(index, tree)
    }
}

#[async_trait::async_trait]
impl VaultDelivery for NotionToObsidian<'_> {
    async fn deliver(&self, plan: OutputPlan) -> Result<OutputReport, AppError> {
        let attachments = FileSystemAttachments::new(&self.config.files_dir);
        let report = deliver(plan, &self.config.vault_dir, &attachments).await?;

        // Missing attachments are reported but do not fail the run
        let document_failures: Vec<String> = report
            .failed
            .iter()
            .filter(|f| matches!(f.operation, DeliveryTarget::WriteFile { .. }))
            .map(|f| f.error.clone())
            .collect();
        if !document_failures.is_empty() {
            return Err(AppError::DeliveryFailed {
                failures: document_failures,
            });
        }

        Ok(report)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).map_err(|e| anyhow::anyhow!("failed to set up logging: {}", e))?;

    let config = ConversionConfig::resolve(cli)?;

    execute_pipeline(&config).await?;

    Ok(())
}
