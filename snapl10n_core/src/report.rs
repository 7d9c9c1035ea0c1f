/*============================================================
  Synavera Project: Snap-L10n
  Module: snapl10n_core::report
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Construct the Snap-L10n report by running every installed
    snap through the inspector, and provide the filtering used
    by the status list.

  Security / Safety Notes:
    Report data is written to operator-controlled paths; no
    privileged operations are performed.

  Dependencies:
    serde for JSON serialization, chrono for timestamps.

  Operational Scope:
    Consumed by the command-line front end and the exporters.

  Revision History:
    2026-10-18 COD  Authored report builder.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic ordering for reproducible reports
    - Rich metadata for audit and observability
============================================================*/

use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::error::{Result, SnapL10nError};
use crate::inspector::TranslationInspector;
use crate::logger::Logger;
use crate::package_info::{LocalizationInfo, PackageRecord, TranslationStatus};

/// Full report document.
#[derive(Debug, Serialize)]
pub struct ReportDocument {
    pub metadata: ReportMetadata,
    pub snaps: Vec<LocalizationInfo>,
}

/// Metadata block describing report context.
#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub generated_by: String,
    pub total_snaps: usize,
    pub full: usize,
    pub partial: usize,
    pub none: usize,
    pub translated: usize,
    /// Union of locale and desktop languages across all snaps.
    pub languages: BTreeSet<String>,
}

/// Status selection offered by the status list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    None,
    Partial,
    Full,
}

impl StatusFilter {
    pub fn accepts(self, status: TranslationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::None => status == TranslationStatus::None,
            StatusFilter::Partial => status == TranslationStatus::Partial,
            StatusFilter::Full => status == TranslationStatus::Full,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All snaps",
            StatusFilter::None => "No translations",
            StatusFilter::Partial => "Partially translated",
            StatusFilter::Full => "Fully translated",
        }
    }
}

impl FromStr for StatusFilter {
    type Err = SnapL10nError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "none" => Ok(StatusFilter::None),
            "partial" => Ok(StatusFilter::Partial),
            "full" => Ok(StatusFilter::Full),
            other => Err(SnapL10nError::Config(format!(
                "Unknown status filter `{other}` (expected all, none, partial or full)"
            ))),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inspect every snap and assemble a name-ordered report.
pub fn build_report(
    packages: &[PackageRecord],
    inspector: &TranslationInspector,
    logger: &Logger,
) -> ReportDocument {
    let mut snaps: Vec<LocalizationInfo> = packages
        .iter()
        .map(|package| inspector.inspect(package, logger))
        .collect();
    snaps.sort_by(|a, b| a.name().cmp(b.name()));

    let count = |status: TranslationStatus| snaps.iter().filter(|s| s.status() == status).count();
    let full = count(TranslationStatus::Full);
    let partial = count(TranslationStatus::Partial);
    let none = count(TranslationStatus::None);

    let mut languages = BTreeSet::new();
    for snap in &snaps {
        languages.extend(snap.languages().iter().cloned());
        if let Some(desktop) = snap.desktop_l10n().languages() {
            languages.extend(desktop.iter().cloned());
        }
    }

    let metadata = ReportMetadata {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        generated_by: "snapl10n_core".to_string(),
        total_snaps: snaps.len(),
        full,
        partial,
        none,
        translated: full + partial,
        languages,
    };

    ReportDocument { metadata, snaps }
}

impl ReportDocument {
    /// Snaps passing the status filter and, if given, mentioning `language`.
    pub fn filtered<'a>(
        &'a self,
        status: StatusFilter,
        language: Option<&'a str>,
    ) -> impl Iterator<Item = &'a LocalizationInfo> + 'a {
        self.snaps.iter().filter(move |snap| {
            status.accepts(snap.status())
                && language.map_or(true, |language| snap.mentions_language(language))
        })
    }

    pub fn untranslated(&self) -> impl Iterator<Item = &LocalizationInfo> {
        self.snaps
            .iter()
            .filter(|snap| snap.status() == TranslationStatus::None)
    }

    /// `<total> snaps · <translated> translated · <filter> · <language>`.
    pub fn status_line(&self, status: StatusFilter, language: Option<&str>) -> String {
        format!(
            "{} snaps · {} translated · {} · {}",
            self.metadata.total_snaps,
            self.metadata.translated,
            status,
            language.unwrap_or("All languages")
        )
    }
}

/// Language part of the user's message locale, e.g. `sv_SE.UTF-8` -> `sv`.
pub fn system_language() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .and_then(|value| language_of_locale(&value))
}

fn language_of_locale(locale: &str) -> Option<String> {
    let language = locale.split(['_', '.', '@']).next().unwrap_or_default();
    match language {
        "" | "C" | "POSIX" => None,
        other => Some(other.to_string()),
    }
}

/// Persist the report to the given path.
pub fn write_report(document: &ReportDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| {
            SnapL10nError::Filesystem(format!(
                "Failed to create report directory {}: {err}",
                parent.display()
            ))
        })?;
    }
    let file = File::create(path).map_err(|err| {
        SnapL10nError::Filesystem(format!(
            "Failed to create report file {}: {err}",
            path.display()
        ))
    })?;
    serde_json::to_writer_pretty(file, document).map_err(|err| {
        SnapL10nError::Serialization(format!("Failed to write report {}: {err}", path.display()))
    })
}
