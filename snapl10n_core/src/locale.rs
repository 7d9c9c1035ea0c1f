/*============================================================
  Synavera Project: Snap-L10n
  Module: snapl10n_core::locale
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Detect gettext locale trees (`<lang>/LC_MESSAGES/<catalog>`) inside
    a snap mount and report the language codes they cover.

  Security / Safety Notes:
    Read-only directory listings; catalog contents are never
    opened.

  Dependencies:
    std::fs only.

  Operational Scope:
    Called by the inspector once per snap per refresh.

  Revision History:
    2026-10-18 COD  Authored locale tree probe.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Pure read functions returning semantic containers
    - Probe errors degrade to "no evidence"
============================================================*/

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Languages with at least one catalog under any candidate locale dir.
///
/// `candidates` are resolved against `mount_root`. Missing or unreadable
/// directories contribute nothing.
pub fn scan_locale_tree(mount_root: &Path, candidates: &[PathBuf]) -> BTreeSet<String> {
    let mut languages = BTreeSet::new();
    for candidate in candidates {
        let locale_dir = mount_root.join(candidate);
        let Ok(entries) = fs::read_dir(&locale_dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let Ok(language) = entry.file_name().into_string() else {
                continue;
            };
            if languages.contains(&language) {
                continue;
            }
            if has_catalog(&entry.path().join("LC_MESSAGES")) {
                languages.insert(language);
            }
        }
    }
    languages
}

// Any non-directory entry counts as a compiled catalog.
fn has_catalog(lc_messages: &Path) -> bool {
    let Ok(entries) = fs::read_dir(lc_messages) else {
        return false;
    };
    entries
        .flatten()
        .any(|entry| fs::metadata(entry.path()).map(|meta| !meta.is_dir()).unwrap_or(false))
}
