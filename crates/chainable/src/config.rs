//! Chain configuration
//!
//! Strict mode is configured per handle through [`ChainOptions`]. The
//! process-wide default only seeds `ChainOptions::default()`, so changing it
//! affects handles created afterwards and never the ones already built.

use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::Lazy;

/// Environment variable seeding the process-wide strict default
pub const STRICT_ENV_VAR: &str = "CHAINABLE_STRICT";

/// Strict mode when neither the environment nor the caller says otherwise
pub const DEFAULT_STRICT: bool = true;

static STRICT_DEFAULT: Lazy<AtomicBool> = Lazy::new(|| {
    let strict = std::env::var(STRICT_ENV_VAR)
        .ok()
        .and_then(|raw| parse_strict_flag(&raw))
        .unwrap_or(DEFAULT_STRICT);
    AtomicBool::new(strict)
});

/// Options captured by a chain handle when it is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainOptions {
    /// Reject members that are missing from the target's capability chain
    pub strict: bool,
}

impl Default for ChainOptions {
    fn default() -> Self {
        Self {
            strict: default_strict(),
        }
    }
}

impl ChainOptions {
    /// Options with strict mode enabled
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Options with strict mode disabled
    pub fn lenient() -> Self {
        Self { strict: false }
    }

    /// Override strict mode
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Current process-wide strict default
pub fn default_strict() -> bool {
    STRICT_DEFAULT.load(Ordering::Relaxed)
}

/// Change the process-wide strict default for handles created from now on
pub fn set_default_strict(strict: bool) {
    STRICT_DEFAULT.store(strict, Ordering::Relaxed);
}

/// Parse a strict-mode flag (`1/true/on/yes`, `0/false/off/no`)
pub fn parse_strict_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strict_flag() {
        assert_eq!(parse_strict_flag("1"), Some(true));
        assert_eq!(parse_strict_flag(" TRUE "), Some(true));
        assert_eq!(parse_strict_flag("off"), Some(false));
        assert_eq!(parse_strict_flag("No"), Some(false));
        assert_eq!(parse_strict_flag("maybe"), None);
        assert_eq!(parse_strict_flag(""), None);
    }

    #[test]
    fn test_explicit_options() {
        assert!(ChainOptions::strict().strict);
        assert!(!ChainOptions::lenient().strict);
        assert!(ChainOptions::lenient().with_strict(true).strict);
    }
}
