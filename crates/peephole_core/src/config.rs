//! Process-wide configuration for the engine.

use std::fmt;
use std::str::FromStr;

use crate::diagnostics::Severity;

/// Whether the marker annotation may be used at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagUsage {
    #[default]
    Allow,
    /// Every occurrence gets a warning, then is processed.
    Warning,
    /// Every occurrence gets an error, then is processed.
    Error,
}

impl FlagUsage {
    /// Severity of the diagnostic emitted per occurrence, if any.
    pub fn severity(self) -> Option<Severity> {
        match self {
            FlagUsage::Allow => None,
            FlagUsage::Warning => Some(Severity::Warning),
            FlagUsage::Error => Some(Severity::Error),
        }
    }
}

impl fmt::Display for FlagUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagUsage::Allow => write!(f, "allow"),
            FlagUsage::Warning => write!(f, "warning"),
            FlagUsage::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown flag usage `{0}` (expected one of: allow, warning, error)")]
pub struct UnknownFlagUsage(pub String);

impl FromStr for FlagUsage {
    type Err = UnknownFlagUsage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(FlagUsage::Allow),
            "warning" => Ok(FlagUsage::Warning),
            "error" => Ok(FlagUsage::Error),
            _ => Err(UnknownFlagUsage(s.to_string())),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeepConfig {
    /// Policy for the marker annotation itself
    pub flag_usage: FlagUsage,
    /// Attribute name front ends look for
    pub attribute: String,
}

impl Default for PeepConfig {
    fn default() -> Self {
        Self {
            flag_usage: FlagUsage::Allow,
            attribute: crate::MARKER.to_string(),
        }
    }
}

impl PeepConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the marker usage policy
    pub fn with_flag_usage(mut self, flag_usage: FlagUsage) -> Self {
        self.flag_usage = flag_usage;
        self
    }

    /// Set the attribute name front ends look for
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = attribute.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // Default config tests
    // ========================================

    #[test]
    fn test_default_config_flag_usage() {
        let config = PeepConfig::default();
        assert_eq!(config.flag_usage, FlagUsage::Allow);
    }

    #[test]
    fn test_default_config_attribute() {
        let config = PeepConfig::default();
        assert_eq!(config.attribute, "peep_in");
    }

    #[test]
    fn test_new_equals_default() {
        assert_eq!(PeepConfig::new(), PeepConfig::default());
    }

    // ========================================
    // Builder method tests
    // ========================================

    #[test]
    fn test_with_flag_usage() {
        let config = PeepConfig::new().with_flag_usage(FlagUsage::Error);
        assert_eq!(config.flag_usage, FlagUsage::Error);
        // Other fields unchanged
        assert_eq!(config.attribute, "peep_in");
    }

    #[test]
    fn test_with_attribute() {
        let config = PeepConfig::new().with_attribute("name_constants");
        assert_eq!(config.attribute, "name_constants");
        assert_eq!(config.flag_usage, FlagUsage::Allow);
    }

    #[test]
    fn test_builder_override() {
        let config = PeepConfig::new()
            .with_flag_usage(FlagUsage::Warning)
            .with_flag_usage(FlagUsage::Allow);
        assert_eq!(config.flag_usage, FlagUsage::Allow); // Last value wins
    }

    // ========================================
    // FlagUsage tests
    // ========================================

    #[test]
    fn test_flag_usage_severity() {
        assert_eq!(FlagUsage::Allow.severity(), None);
        assert_eq!(FlagUsage::Warning.severity(), Some(Severity::Warning));
        assert_eq!(FlagUsage::Error.severity(), Some(Severity::Error));
    }

    #[test]
    fn test_flag_usage_round_trips_through_display() {
        for usage in [FlagUsage::Allow, FlagUsage::Warning, FlagUsage::Error] {
            assert_eq!(usage.to_string().parse::<FlagUsage>(), Ok(usage));
        }
        assert!("deny".parse::<FlagUsage>().is_err());
    }
}
