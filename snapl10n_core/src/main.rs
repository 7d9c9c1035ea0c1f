/*============================================================
  Synavera Project: Snap-L10n
  Module: snapl10n_core::main
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Entry point for Snap-L10n Core. Enumerates installed snaps
    via snapd, inspects their mount trees for translations, and
    emits a status listing, a JSON report and optional exports.

  Security / Safety Notes:
    Operates within user privileges. Talks to snapd over its
    Unix socket with a single read-only GET; all other access
    is read-only filesystem traversal under the snap root.

  Dependencies:
    clap for CLI parsing, tokio for the socket request, chrono
    for session stamps.

  Operational Scope:
    Invoked by operators or desktop wrappers to refresh the
    translation status of installed snaps.

  Revision History:
    2026-10-18 COD  Authored Snap-L10n Core runtime.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling with deterministic exits
    - Structured logging following Synavera cadence
    - Configurable execution via CLI and config file
============================================================*/

mod config;
mod desktop;
mod error;
mod export;
mod inspector;
mod locale;
mod logger;
mod package_info;
mod report;
mod snapd;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{ArgAction, Parser};

use config::SnapL10nConfig;
use error::{Result, SnapL10nError};
use export::{export, ExportFormat};
use inspector::TranslationInspector;
use logger::Logger;
use package_info::LocalizationInfo;
use report::{build_report, system_language, write_report, ReportDocument, StatusFilter};
use snapd::SnapdClient;

/// Command-line arguments for Snap-L10n.
#[derive(Debug, Parser)]
#[command(
    name = "snap-l10n",
    version,
    author = "Synavera Systems",
    about = "Translation status of installed snaps"
)]
struct Cli {
    /// Override configuration file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override report output path.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Explicit log file path.
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
    /// Override the snapd socket path.
    #[arg(long, value_name = "PATH")]
    socket: Option<PathBuf>,
    /// Override the snap mount root.
    #[arg(long, value_name = "PATH")]
    snap_root: Option<PathBuf>,
    /// Only list snaps with this status (all, none, partial, full).
    #[arg(long, value_name = "STATUS", default_value = "all")]
    status: StatusFilter,
    /// Only list snaps translated into this language.
    #[arg(long, value_name = "LANG", conflicts_with = "system_language")]
    language: Option<String>,
    /// Filter by the language of the current locale when any snap has it.
    #[arg(long, action = ArgAction::SetTrue)]
    system_language: bool,
    /// Export the listed snaps as csv or json.
    #[arg(long, value_name = "FORMAT")]
    export: Option<ExportFormat>,
    /// Export destination file or directory; stdout when omitted.
    #[arg(long, value_name = "PATH", requires = "export")]
    output: Option<PathBuf>,
    /// Do not write the report; print the listing only.
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,
    /// Enable verbose logging to stderr.
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("[snap-l10n] {}", err);
            err.exit_code()
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = SnapL10nConfig::load_from_optional_path(cli.config.as_deref())?;
    if let Some(socket) = &cli.socket {
        config.snapd.socket_path = socket.clone();
    }
    if let Some(snap_root) = &cli.snap_root {
        config.inspect.snap_root = snap_root.clone();
    }
    config.validate()?;

    let report_path = cli.report.clone().unwrap_or_else(|| config.report_path());

    let session_stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let log_path = cli
        .log
        .clone()
        .unwrap_or_else(|| config.log_dir().join(format!("refresh_{session_stamp}.log")));
    let logger = Logger::new(Some(log_path), cli.verbose)?;
    logger.info("INIT", "Snap-L10n refresh starting.");

    let client = SnapdClient::new(&config.snapd)?;
    let packages = match client.list_installed_packages().await {
        Ok(packages) => packages,
        Err(err) => {
            logger.error("SNAPD", err.to_string());
            logger.finalize()?;
            return Err(err);
        }
    };
    logger.info("PACKAGES", format!("snapd reported {} installed snaps", packages.len()));

    let inspector = TranslationInspector::new(&config.inspect);
    let document = build_report(&packages, &inspector, &logger);

    let untranslated = document.untranslated().count();
    if untranslated > 0 {
        logger.warn(
            "UNTRANSLATED",
            format!("{untranslated} snaps have no translations"),
        );
    }

    let language = resolve_language(&cli, &document, &logger);
    let selected: Vec<&LocalizationInfo> =
        document.filtered(cli.status, language.as_deref()).collect();
    logger.info(
        "FILTER",
        format!(
            "status={:?} language={} matched={}",
            cli.status,
            language.as_deref().unwrap_or("*"),
            selected.len()
        ),
    );

    if let Some(format) = cli.export {
        write_export(format, cli.output.as_ref(), &selected, &logger)?;
    }
    if !(cli.export.is_some() && cli.output.is_none()) {
        print_listing(&document, &selected, cli.status, language.as_deref());
    }

    if cli.dry_run {
        logger.info("REPORT", "Dry run; report not written");
    } else {
        write_report(&document, &report_path)?;
        logger.info(
            "REPORT",
            format!("Report written to {}", report_path.display()),
        );
    }

    logger.info(
        "SUMMARY",
        format!(
            "snaps={} full={} partial={} none={}",
            document.metadata.total_snaps,
            document.metadata.full,
            document.metadata.partial,
            document.metadata.none
        ),
    );
    logger.info("COMPLETE", "Refresh finished.");
    logger.finalize()?;

    Ok(ExitCode::SUCCESS)
}

fn resolve_language(cli: &Cli, document: &ReportDocument, logger: &Logger) -> Option<String> {
    if cli.language.is_some() {
        return cli.language.clone();
    }
    if !cli.system_language {
        return None;
    }
    match system_language() {
        Some(lang) if document.metadata.languages.contains(&lang) => Some(lang),
        Some(lang) => {
            logger.debug("FILTER", format!("No snap ships `{lang}`; showing all languages"));
            None
        }
        None => None,
    }
}

fn write_export(
    format: ExportFormat,
    output: Option<&PathBuf>,
    selected: &[&LocalizationInfo],
    logger: &Logger,
) -> Result<()> {
    let snaps = selected.iter().copied();
    let Some(output) = output else {
        return export(format, snaps, io::stdout().lock());
    };

    let path = if output.is_dir() {
        output.join(format!("snap-l10n.{}", format.extension()))
    } else {
        output.clone()
    };
    let file = File::create(&path).map_err(|err| {
        SnapL10nError::Filesystem(format!(
            "Failed to create export file {}: {err}",
            path.display()
        ))
    })?;
    export(format, snaps, BufWriter::new(file))?;
    logger.info(
        "EXPORT",
        format!("{} snaps exported to {}", selected.len(), path.display()),
    );
    Ok(())
}

fn print_listing(
    document: &ReportDocument,
    selected: &[&LocalizationInfo],
    status: StatusFilter,
    language: Option<&str>,
) {
    if selected.is_empty() {
        println!("→ No snaps match the current filter.");
    }
    for snap in selected {
        let languages = if snap.languages().is_empty() {
            "no translations found".to_string()
        } else {
            snap.languages().iter().cloned().collect::<Vec<_>>().join(", ")
        };
        println!(
            "{:<28} {:<16} {:<20} {:<8} {:>5}  {} | {}",
            snap.name(),
            snap.version(),
            if snap.publisher().is_empty() { "unknown" } else { snap.publisher() },
            snap.status(),
            snap.status().coverage_label(),
            languages,
            snap.desktop_l10n().describe()
        );
    }
    println!("{}", document.status_line(status, language));
}
