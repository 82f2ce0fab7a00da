//! Diagnostic settings.
//!
//! Whether the registry and its lifecycle adapters write `tracing` diagnostics is
//! decided by configuration supplied from outside. An absent setting means "off".

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Environment variable enabling diagnostic messages.
pub const DEBUG_MESSAGES_ENV: &str = "SINGLETON_DEBUG_MESSAGES";

/// Environment variable enabling diagnostics for routine lookup misses.
pub const REPORT_LOOKUP_MISSES_ENV: &str = "SINGLETON_REPORT_LOOKUP_MISSES";

/// Diagnostic settings for a [`SingletonRegistry`](crate::SingletonRegistry).
///
/// Can be embedded in a host's own configuration file:
///
/// ```rust
/// use singleton_lifecycle::DiagnosticsConfig;
///
/// let config: DiagnosticsConfig = serde_json::from_str(r#"{ "debug_messages": true }"#).unwrap();
/// assert!(config.debug_messages);
/// assert!(!config.report_lookup_misses);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Master switch for every diagnostic the crate writes.
    pub debug_messages: bool,
    /// Also report `has_instance` / `try_get_instance` misses. These are expected before
    /// registration happens, so they stay quiet unless asked for.
    pub report_lookup_misses: bool,
}

impl DiagnosticsConfig {
    pub fn enabled() -> Self {
        Self {
            debug_messages: true,
            report_lookup_misses: false,
        }
    }

    /// Reads [`DEBUG_MESSAGES_ENV`] and [`REPORT_LOOKUP_MISSES_ENV`].
    pub fn from_env() -> Self {
        Self {
            debug_messages: parse_flag(std::env::var(DEBUG_MESSAGES_ENV).ok().as_deref()),
            report_lookup_misses: parse_flag(
                std::env::var(REPORT_LOOKUP_MISSES_ENV).ok().as_deref(),
            ),
        }
    }
}

pub(crate) fn parse_flag(value: Option<&str>) -> bool {
    match value {
        Some(v) => matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => false,
    }
}

/// Runtime copy of [`DiagnosticsConfig`] that can be flipped while the registry is shared.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    debug_messages: AtomicBool,
    report_lookup_misses: AtomicBool,
}

impl Diagnostics {
    pub(crate) fn new(config: DiagnosticsConfig) -> Self {
        Self {
            debug_messages: AtomicBool::new(config.debug_messages),
            report_lookup_misses: AtomicBool::new(config.report_lookup_misses),
        }
    }

    pub(crate) fn debug_messages(&self) -> bool {
        self.debug_messages.load(Ordering::Relaxed)
    }

    pub(crate) fn set_debug_messages(&self, enabled: bool) {
        self.debug_messages.store(enabled, Ordering::Relaxed);
    }

    /// Both switches must be on.
    pub(crate) fn lookup_misses(&self) -> bool {
        self.debug_messages() && self.report_lookup_misses.load(Ordering::Relaxed)
    }

    pub(crate) fn set_report_lookup_misses(&self, enabled: bool) {
        self.report_lookup_misses.store(enabled, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> DiagnosticsConfig {
        DiagnosticsConfig {
            debug_messages: self.debug_messages(),
            report_lookup_misses: self.report_lookup_misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_off() {
        let config = DiagnosticsConfig::default();
        assert!(!config.debug_messages);
        assert!(!config.report_lookup_misses);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(Some("1")));
        assert!(parse_flag(Some("TRUE")));
        assert!(parse_flag(Some(" yes ")));
        assert!(parse_flag(Some("On")));
        assert!(!parse_flag(Some("0")));
        assert!(!parse_flag(Some("off")));
        assert!(!parse_flag(Some("")));
        assert!(!parse_flag(None));
    }

    #[test]
    fn test_deserialize_partial_and_empty() {
        let config: DiagnosticsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DiagnosticsConfig::default());

        let config: DiagnosticsConfig =
            serde_json::from_str(r#"{ "debug_messages": true, "report_lookup_misses": true }"#)
                .unwrap();
        assert!(config.debug_messages);
        assert!(config.report_lookup_misses);
    }

    #[test]
    fn test_lookup_misses_require_debug_messages() {
        let diagnostics = Diagnostics::new(DiagnosticsConfig {
            debug_messages: false,
            report_lookup_misses: true,
        });
        assert!(!diagnostics.lookup_misses());

        diagnostics.set_debug_messages(true);
        assert!(diagnostics.lookup_misses());

        diagnostics.set_report_lookup_misses(false);
        assert!(!diagnostics.lookup_misses());
        assert_eq!(diagnostics.snapshot(), DiagnosticsConfig::enabled());
    }
}
