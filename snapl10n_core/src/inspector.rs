/*============================================================
  Synavera Project: Snap-L10n
  Module: snapl10n_core::inspector
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Combine the locale tree and desktop entry probes into a
    LocalizationInfo for each installed snap.

  Security / Safety Notes:
    Package names are validated before any path is built; an
    invalid name yields an empty result without touching the
    filesystem.

  Dependencies:
    locale and desktop probe modules.

  Operational Scope:
    Invoked sequentially for every snap during a refresh.

  Revision History:
    2026-10-18 COD  Authored translation inspector.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Never fails per package
    - Fresh scan on every call, no caching
============================================================*/

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::InspectConfig;
use crate::desktop::scan_desktop_l10n;
use crate::locale::scan_locale_tree;
use crate::logger::Logger;
use crate::package_info::{DesktopL10n, LocalizationInfo, PackageRecord, SnapName};

/// Revision alias snapd maintains inside every snap directory.
const CURRENT_REVISION: &str = "current";

/// Derives localization status from snap mount trees.
#[derive(Debug, Clone)]
pub struct TranslationInspector {
    snap_root: PathBuf,
    locale_dirs: Vec<PathBuf>,
}

impl TranslationInspector {
    pub fn new(config: &InspectConfig) -> Self {
        Self {
            snap_root: config.snap_root.clone(),
            locale_dirs: config.locale_dirs.clone(),
        }
    }

    /// `<snap_root>/<name>/current`.
    pub fn mount_root(&self, name: &SnapName) -> PathBuf {
        self.snap_root.join(name.as_str()).join(CURRENT_REVISION)
    }

    /// Inspect one snap. Filesystem problems degrade to "no evidence".
    pub fn inspect(&self, record: &PackageRecord, logger: &Logger) -> LocalizationInfo {
        let name = match SnapName::parse(&record.name) {
            Ok(name) => name,
            Err(err) => {
                logger.warn("NAME", format!("Skipping filesystem probes: {err}"));
                return LocalizationInfo::new(record, BTreeSet::new(), DesktopL10n::Absent);
            }
        };

        let mount_root = self.mount_root(&name);
        if !mount_root.is_dir() {
            logger.debug(
                "PROBE",
                format!("{name}: mount root {} not found", mount_root.display()),
            );
        }

        let info = self.inspect_mount(record, &mount_root);
        logger.debug(
            "PROBE",
            format!(
                "{name}: languages={} desktop={} status={}",
                info.languages().len(),
                info.desktop_l10n().describe(),
                info.status()
            ),
        );
        info
    }

    fn inspect_mount(&self, record: &PackageRecord, mount_root: &Path) -> LocalizationInfo {
        let languages = scan_locale_tree(mount_root, &self.locale_dirs);
        let desktop_l10n = scan_desktop_l10n(mount_root);
        LocalizationInfo::new(record, languages, desktop_l10n)
    }
}
