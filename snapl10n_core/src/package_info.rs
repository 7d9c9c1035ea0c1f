/*============================================================
  Synavera Project: Snap-L10n
  Module: snapl10n_core::package_info
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Shared structures describing installed snaps and the
    localization evidence derived from their mount trees.

  Security / Safety Notes:
    Package names arrive from snapd and are validated here
    before they may become filesystem path components.

  Dependencies:
    serde for report serialization.

  Operational Scope:
    Used by the registry client, the inspector, and report
    construction to pass package and status data.

  Revision History:
    2026-10-18 COD  Introduced PackageRecord and LocalizationInfo.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Clear data contracts between modules
    - Derived status is never independently settable
    - Serializable structures for report output
============================================================*/

use std::collections::BTreeSet;
use std::fmt;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::error::{Result, SnapL10nError};

/// Represents a snap currently installed on the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    pub publisher: String,
}

impl PackageRecord {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        publisher: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            publisher: publisher.into(),
        }
    }
}

/// A package name proven safe to use as a single path component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapName(String);

impl SnapName {
    /// Validate a raw name reported by snapd.
    pub fn parse(raw: &str) -> Result<Self> {
        let reason = if raw.is_empty() {
            Some("name is empty")
        } else if raw == "." || raw.contains("..") {
            Some("name contains a relative path segment")
        } else if raw.contains('/') || raw.contains('\\') {
            Some("name contains a path separator")
        } else if raw.contains('\0') {
            Some("name contains a NUL byte")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(SnapL10nError::InvalidPackageName {
                name: raw.to_string(),
                reason,
            }),
            None => Ok(Self(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Desktop-entry evidence for one snap.
///
/// `Absent` means the snap ships no desktop files at all, so desktop
/// translation does not apply. `Untranslated` means desktop files exist
/// but none carries a localized key. `Translated` never holds an empty set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DesktopL10n {
    #[default]
    Absent,
    Untranslated,
    Translated(BTreeSet<String>),
}

impl DesktopL10n {
    /// Build the evidence for a snap known to ship desktop files.
    pub fn from_languages(languages: BTreeSet<String>) -> Self {
        if languages.is_empty() {
            DesktopL10n::Untranslated
        } else {
            DesktopL10n::Translated(languages)
        }
    }

    pub fn is_translated(&self) -> bool {
        matches!(self, DesktopL10n::Translated(_))
    }

    /// Languages found in localized keys; `None` when no desktop file exists.
    pub fn languages(&self) -> Option<&BTreeSet<String>> {
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        match self {
            DesktopL10n::Absent => None,
            DesktopL10n::Untranslated => Some(&EMPTY),
            DesktopL10n::Translated(languages) => Some(languages),
        }
    }

    /// Human summary matching the row captions of the status list.
    pub fn describe(&self) -> String {
        match self {
            DesktopL10n::Absent => "no desktop file".to_string(),
            DesktopL10n::Untranslated => "desktop file: not translated".to_string(),
            DesktopL10n::Translated(languages) => format!(
                "desktop file translated: {}",
                languages.iter().cloned().collect::<Vec<_>>().join(", ")
            ),
        }
    }
}

// Absent -> null, otherwise a (possibly empty) array of languages.
impl Serialize for DesktopL10n {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.languages() {
            None => serializer.serialize_none(),
            Some(languages) => {
                let mut seq = serializer.serialize_seq(Some(languages.len()))?;
                for language in languages {
                    seq.serialize_element(language)?;
                }
                seq.end()
            }
        }
    }
}

/// Translation completeness classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStatus {
    Full,
    Partial,
    None,
}

impl TranslationStatus {
    /// Either signal alone is partial, both together are full.
    pub fn classify(has_locale: bool, has_desktop: bool) -> Self {
        match (has_locale, has_desktop) {
            (true, true) => TranslationStatus::Full,
            (true, false) | (false, true) => TranslationStatus::Partial,
            (false, false) => TranslationStatus::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TranslationStatus::Full => "full",
            TranslationStatus::Partial => "partial",
            TranslationStatus::None => "none",
        }
    }

    /// Heatmap coverage label.
    pub fn coverage_label(self) -> &'static str {
        match self {
            TranslationStatus::Full => "100%",
            TranslationStatus::Partial => "~50%",
            TranslationStatus::None => "0%",
        }
    }
}

impl fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Localization evidence and derived status for one snap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizationInfo {
    name: String,
    version: String,
    publisher: String,
    languages: BTreeSet<String>,
    desktop_l10n: DesktopL10n,
    status: TranslationStatus,
}

impl LocalizationInfo {
    pub fn new(
        record: &PackageRecord,
        languages: BTreeSet<String>,
        desktop_l10n: DesktopL10n,
    ) -> Self {
        let status = TranslationStatus::classify(!languages.is_empty(), desktop_l10n.is_translated());
        Self {
            name: record.name.clone(),
            version: record.version.clone(),
            publisher: record.publisher.clone(),
            languages,
            desktop_l10n,
            status,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    pub fn languages(&self) -> &BTreeSet<String> {
        &self.languages
    }

    pub fn desktop_l10n(&self) -> &DesktopL10n {
        &self.desktop_l10n
    }

    pub fn status(&self) -> TranslationStatus {
        self.status
    }

    /// True when either probe reported the language.
    pub fn mentions_language(&self, language: &str) -> bool {
        self.languages.contains(language)
            || self
                .desktop_l10n
                .languages()
                .is_some_and(|desktop| desktop.contains(language))
    }
}
