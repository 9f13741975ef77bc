/*!
 * Command-line interface for pagedump
 */

use std::io;
use std::process;
use std::time::Instant;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use pagedump::clipboard::{ClipboardSink, SystemClipboard};
use pagedump::config::{Args, Config};
use pagedump::exporter::PageExporter;
use pagedump::provider::FileSnapshotProvider;
use pagedump::report::{render_report, ExportReport, PageOutcome, PageReportInfo};
use pagedump::writer::PageWriter;

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "pagedump", &mut io::stdout());
        return Ok(());
    }

    // Create configuration
    let config = Config::from_args(args);

    env_logger::Builder::new()
        .filter_level(config.log_level)
        .parse_default_env()
        .init();

    // Validate configuration
    config.validate()?;

    // Configure thread pool
    if let Err(e) = ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build_global()
    {
        warn!("Failed to set thread pool size: {}", e);
    }

    let progress = if config.log_level <= log::LevelFilter::Error {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(config.sources.len() as u64)
    };
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.set_prefix("📄 Exporting");
    progress.enable_steady_tick(std::time::Duration::from_millis(100));

    let mut exporter = PageExporter::new(config.timeout);
    if let Some(title) = &config.title {
        exporter = exporter.with_title(title.clone());
    }
    if let Some(url) = &config.url {
        exporter = exporter.with_url(url.clone());
    }

    let start_time = Instant::now();

    // Each snapshot is exported independently
    let results: Vec<_> = config
        .sources
        .par_iter()
        .map(|source| {
            let provider = FileSnapshotProvider::new(source.clone());
            progress.set_message(format!("⏳ Waiting for {}", provider.source()));
            let result = exporter.export(&provider);
            progress.inc(1);
            (source, result)
        })
        .collect();

    progress.finish_and_clear();

    let mut documents = Vec::new();
    let mut pages = Vec::with_capacity(results.len());
    let mut failed = false;

    for (source, result) in results {
        match result {
            Ok(doc) => {
                info!("Exported {} ({} chars)", source, doc.content.len());
                pages.push(PageReportInfo::exported(source.to_string(), &doc));
                documents.push(doc.document);
            }
            Err(e) if e.is_noop() => {
                info!("Nothing extracted from {}", source);
                pages.push(PageReportInfo::skipped(source.to_string(), PageOutcome::Empty));
            }
            Err(e) => {
                error!("Failed to export {}: {}", source, e);
                failed = true;
                pages.push(PageReportInfo::skipped(
                    source.to_string(),
                    PageOutcome::Failed(e.to_string()),
                ));
            }
        }
    }

    if !documents.is_empty() {
        let writer = PageWriter::new(config.output_file.clone());
        writer.write_all(documents.iter().map(String::as_str))?;

        if config.clip {
            let copied = SystemClipboard::detect().and_then(|clipboard| {
                clipboard.write_text(&documents.concat())?;
                Ok(clipboard.command())
            });
            match copied {
                Ok(command) => {
                    if config.log_level > log::LevelFilter::Error {
                        eprintln!(
                            "📋 Copied {} page(s) to clipboard via {}",
                            documents.len(),
                            command.program()
                        );
                    }
                }
                Err(e) => {
                    error!("Failed to copy to clipboard: {}", e);
                    failed = true;
                }
            }
        }
    }

    if config.report {
        let report = ExportReport {
            destination: config.destination(),
            duration: start_time.elapsed(),
            timeout: exporter.timeout(),
            finished_at: chrono::Local::now(),
            pages,
        };
        eprintln!("\n{}", render_report(&report));
    }

    if failed {
        process::exit(1);
    }

    Ok(())
}
