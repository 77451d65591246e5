// src/main.rs
use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2markdown::{CommandLineInput, ExportConfig, ExportDriver, ExportReport};
use std::fs;
use std::process::ExitCode;

const LOG_FILE_NAME: &str = "notion2markdown.log";

/// Sets up logging: progress on stderr, everything down to debug in a file.
fn setup_logging(verbose: bool, quiet: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join(LOG_FILE_NAME);
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let console_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {M} - {m}{n}",
        )))
        .build(&log_file_path)
        .with_context(|| format!("cannot open log file {}", log_file_path.display()))?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(log_level)))
                .build("console", Box::new(console_appender)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

fn report_completion(report: &ExportReport) {
    println!("✓ Exported to {}", report.output_root.display());
    println!("📄 {} pages processed.", report.processed);
    println!(
        "   {} written, {} skipped, {} failed; {} images rehosted",
        report.written, report.skipped, report.failed, report.images_rehosted
    );
    if report.failed > 0 || report.images_failed > 0 {
        eprintln!(
            "⚠️  {} pages failed and {} images were left remote. See the log for details.",
            report.failed, report.images_failed
        );
    }
}

async fn run(cli: CommandLineInput) -> anyhow::Result<ExportReport> {
    let config = ExportConfig::resolve(cli)?;
    let driver = ExportDriver::from_config(&config)?;
    let report = driver
        .run()
        .await
        .with_context(|| format!("export into {} failed", config.output_dir.display()))?;
    Ok(report)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CommandLineInput::parse();

    if let Err(e) = setup_logging(cli.verbose, cli.quiet) {
        eprintln!("❌ Could not set up logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(report) => {
            report_completion(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}
