/*============================================================
  Synavera Project: Snap-L10n
  Module: snapl10n_core::desktop
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Locate `.desktop` files inside a snap mount and collect the
    locales used by localized `Key[locale]` entries of their
    `[Desktop Entry]` group.

  Security / Safety Notes:
    Read-only traversal. Symlinked directories are not followed
    so a snap cannot steer the walk outside its mount tree or
    into a cycle.

  Dependencies:
    std::fs only.

  Operational Scope:
    Called by the inspector once per snap per refresh.

  Revision History:
    2026-10-18 COD  Authored desktop entry probe.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Tri-state result: absent, untranslated, translated
    - Malformed files skipped without aborting the probe
============================================================*/

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::package_info::DesktopL10n;

const DESKTOP_SUFFIX: &str = ".desktop";
const DESKTOP_GROUP: &str = "Desktop Entry";

/// Localized desktop-entry languages across every desktop file in the tree.
pub fn scan_desktop_l10n(mount_root: &Path) -> DesktopL10n {
    let files = find_desktop_files(mount_root);
    if files.is_empty() {
        return DesktopL10n::Absent;
    }

    let mut languages = BTreeSet::new();
    for file in &files {
        let Ok(raw) = fs::read_to_string(file) else {
            continue;
        };
        if let Ok(found) = localized_languages(&raw) {
            languages.extend(found);
        }
    }
    DesktopL10n::from_languages(languages)
}

/// Recursively collect `*.desktop` files, skipping hidden entries.
pub fn find_desktop_files(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.') {
                continue;
            }
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let path = entry.path();
            if file_type.is_dir() {
                pending.push(path);
            } else if name.ends_with(DESKTOP_SUFFIX) && !is_dir_behind_symlink(&path) {
                found.push(path);
            }
        }
    }
    found.sort();
    found
}

fn is_dir_behind_symlink(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.is_dir()).unwrap_or(false)
}

/// Reason a desktop file could not be read as an INI document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesktopParseError {
    EntryOutsideGroup(usize),
    InvalidLine(usize),
    UnterminatedGroup(usize),
    DuplicateGroup(usize),
}

/// Locales named by `Key[locale]` entries of the `[Desktop Entry]` group.
pub fn localized_languages(raw: &str) -> Result<BTreeSet<String>, DesktopParseError> {
    let mut languages = BTreeSet::new();
    let mut group: Option<&str> = None;
    let mut seen_desktop_group = false;

    for (index, line) in raw.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let name = rest
                .strip_suffix(']')
                .ok_or(DesktopParseError::UnterminatedGroup(line_no))?;
            if name == DESKTOP_GROUP {
                if seen_desktop_group {
                    return Err(DesktopParseError::DuplicateGroup(line_no));
                }
                seen_desktop_group = true;
            }
            group = Some(name);
            continue;
        }

        let Some((key, _value)) = line.split_once('=') else {
            return Err(DesktopParseError::InvalidLine(line_no));
        };
        match group {
            None => return Err(DesktopParseError::EntryOutsideGroup(line_no)),
            Some(DESKTOP_GROUP) => {
                if let Some(language) = key_locale(key.trim()) {
                    languages.insert(language);
                }
            }
            Some(_) => {}
        }
    }

    Ok(languages)
}

/// Language of a `Key[lang_COUNTRY.ENCODING@MODIFIER]` key, without codeset
/// or modifier.
pub fn key_locale(key: &str) -> Option<String> {
    let inner = key.strip_suffix(']')?;
    let (name, locale) = inner.split_once('[')?;
    if name.is_empty() {
        return None;
    }
    let language = locale.split(['.', '@']).next().unwrap_or_default();
    if language.is_empty() {
        None
    } else {
        Some(language.to_string())
    }
}
