/*============================================================
  Synavera Project: Snap-L10n
  Module: snapl10n_core::error
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Centralise Snap-L10n error types to provide consistent
    diagnostics and exit semantics.

  Security / Safety Notes:
    Registry messages are surfaced verbatim from snapd; no
    credentials pass through this layer.

  Dependencies:
    thiserror for ergonomic error definitions.

  Operational Scope:
    Registry and configuration failures propagate to the binary
    entry point. Probe failures never reach this layer.

  Revision History:
    2026-10-18 COD  Established shared error definitions.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit error taxonomy with actionable context
    - Fatal registry failures, silent per-probe degradation
    - Stable exit codes for operational tooling
============================================================*/

use std::io;
use std::process::ExitCode;

use thiserror::Error;

/// Result alias for Snap-L10n operations.
pub type Result<T> = std::result::Result<T, SnapL10nError>;

/// Enumerates high-level error domains surfaced by Snap-L10n.
#[derive(Debug, Error)]
pub enum SnapL10nError {
    #[error("snapd unavailable: {0}")]
    RegistryUnavailable(String),
    #[error("Invalid package name `{name}`: {reason}")]
    InvalidPackageName { name: String, reason: &'static str },
    #[error("Configuration: {0}")]
    Config(String),
    #[error("Serialization: {0}")]
    Serialization(String),
    #[error("Filesystem: {0}")]
    Filesystem(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SnapL10nError {
    /// Map error category to a deterministic exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            SnapL10nError::InvalidPackageName { .. } => ExitCode::from(12),
            SnapL10nError::Config(_) => ExitCode::from(20),
            SnapL10nError::RegistryUnavailable(_) => ExitCode::from(30),
            SnapL10nError::Serialization(_) => ExitCode::from(31),
            SnapL10nError::Filesystem(_) => ExitCode::from(40),
            SnapL10nError::Io(_) => ExitCode::from(41),
        }
    }
}
