/*============================================================
  Synavera Project: Snap-L10n
  Module: snapl10n_core::export
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Export a condensed status table (name, status, language
    count, desktop translated flag) as CSV or JSON.

  Security / Safety Notes:
    Writes only to the operator-supplied destination.

  Dependencies:
    serde_json for the JSON rendition.

  Operational Scope:
    Invoked by the front end when `--export` is requested.

  Revision History:
    2026-10-18 COD  Authored CSV/JSON exporters.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Stable column order for downstream tooling
    - Explicit error paths for serialization failures
============================================================*/

use std::io::Write;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Result, SnapL10nError};
use crate::package_info::{LocalizationInfo, TranslationStatus};

const CSV_HEADER: &str = "name,status,languages,desktop_l10n";

/// Supported export encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = SnapL10nError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(SnapL10nError::Config(format!(
                "Unknown export format `{other}` (expected csv or json)"
            ))),
        }
    }
}

/// One exported row: counts and flags, not the language lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow<'a> {
    pub name: &'a str,
    pub status: TranslationStatus,
    pub languages: usize,
    pub desktop_l10n: bool,
}

impl<'a> From<&'a LocalizationInfo> for ExportRow<'a> {
    fn from(info: &'a LocalizationInfo) -> Self {
        Self {
            name: info.name(),
            status: info.status(),
            languages: info.languages().len(),
            desktop_l10n: info.desktop_l10n().is_translated(),
        }
    }
}

/// Write `snaps` to `out` in the requested format.
pub fn export<'a, W, I>(format: ExportFormat, snaps: I, mut out: W) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a LocalizationInfo>,
{
    let rows: Vec<ExportRow<'a>> = snaps.into_iter().map(ExportRow::from).collect();
    match format {
        ExportFormat::Csv => write_csv(&rows, &mut out)?,
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &rows).map_err(|err| {
                SnapL10nError::Serialization(format!("Failed to encode JSON export: {err}"))
            })?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn write_csv<W: Write>(rows: &[ExportRow<'_>], out: &mut W) -> Result<()> {
    write!(out, "{CSV_HEADER}\r\n")?;
    for row in rows {
        write!(
            out,
            "{},{},{},{}\r\n",
            csv_field(row.name),
            row.status,
            row.languages,
            row.desktop_l10n
        )?;
    }
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::package_info::{DesktopL10n, PackageRecord};

    fn sample() -> Vec<LocalizationInfo> {
        let langs = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>();
        vec![
            LocalizationInfo::new(
                &PackageRecord::new("alpha", "1", ""),
                langs(&["fr", "sv"]),
                DesktopL10n::Absent,
            ),
            LocalizationInfo::new(
                &PackageRecord::new("beta", "1", ""),
                BTreeSet::new(),
                DesktopL10n::Untranslated,
            ),
            LocalizationInfo::new(
                &PackageRecord::new("odd,name", "1", ""),
                langs(&["de"]),
                DesktopL10n::from_languages(langs(&["de"])),
            ),
        ]
    }

    #[test]
    fn csv_carries_counts_and_flags() {
        let snaps = sample();
        let mut out = Vec::new();
        export(ExportFormat::Csv, &snaps, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,status,languages,desktop_l10n\r\n\
             alpha,partial,2,false\r\n\
             beta,none,0,false\r\n\
             \"odd,name\",full,1,true\r\n"
        );
    }

    #[test]
    fn json_uses_same_shapes() {
        let snaps = sample();
        let mut out = Vec::new();
        export(ExportFormat::Json, &snaps, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"name": "alpha", "status": "partial", "languages": 2, "desktop_l10n": false},
                {"name": "beta", "status": "none", "languages": 0, "desktop_l10n": false},
                {"name": "odd,name", "status": "full", "languages": 1, "desktop_l10n": true}
            ])
        );
    }

    #[test]
    fn format_names_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap().extension(), "json");
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
