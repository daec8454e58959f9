use crate::{LogicalTarget, TypeTag};
use thiserror::Error;

/// Failures of a show/hide cycle or of tooltip configuration.
///
/// Only `NoProviderForTarget` and `Config` indicate a programming or setup
/// mistake; the rest abort the current cycle and leave the host untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TipError {
    #[error("tip text is empty")]
    EmptyTipText,
    #[error("no tip provider registered for target type `{tag}`")]
    NoProviderForTarget { tag: TypeTag },
    #[error("target {target} no longer refers to a live widget")]
    StaleTargetReference { target: LogicalTarget },
    #[error("popup surface error: {0}")]
    Surface(String),
    #[error("invalid tooltip configuration: {0}")]
    Config(String),
}

impl TipError {
    /// Errors that signal misconfiguration rather than a transient state.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NoProviderForTarget { .. } | Self::Config(_))
    }
}
