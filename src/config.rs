// ⚙️ Configuration - percentile parameter and run settings

use crate::donors::RepeatPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// PERCENTILE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PercentileError {
    #[error("percentile must be between 1 and 100, got {0}")]
    OutOfRange(u32),

    #[error("percentile is not an integer: {0:?}")]
    NotANumber(String),
}

/// Percentile in `1..=100`, fixed for a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Percentile(u8);

impl Percentile {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u32> for Percentile {
    type Error = PercentileError;

    fn try_from(p: u32) -> Result<Self, Self::Error> {
        if (1..=100).contains(&p) {
            Ok(Percentile(p as u8))
        } else {
            Err(PercentileError::OutOfRange(p))
        }
    }
}

impl From<Percentile> for u32 {
    fn from(p: Percentile) -> u32 {
        u32::from(p.0)
    }
}

impl FromStr for Percentile {
    type Err = PercentileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let p: u32 = trimmed
            .parse()
            .map_err(|_| PercentileError::NotANumber(trimmed.to_string()))?;
        Percentile::try_from(p)
    }
}

/// Read the percentile from the first line of `path`
pub fn read_percentile(path: &Path) -> Result<Percentile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read percentile file: {}", path.display()))?;

    let first_line = content.lines().next().unwrap_or("");
    first_line
        .parse()
        .with_context(|| format!("Invalid percentile in {}", path.display()))
}

// ============================================================================
// ANALYZER CONFIG
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub percentile: Percentile,

    #[serde(default)]
    pub repeat_policy: RepeatPolicy,
}

impl AnalyzerConfig {
    pub fn new(percentile: Percentile) -> Self {
        AnalyzerConfig {
            percentile,
            repeat_policy: RepeatPolicy::default(),
        }
    }

    pub fn with_repeat_policy(mut self, repeat_policy: RepeatPolicy) -> Self {
        self.repeat_policy = repeat_policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_percentile_bounds() {
        assert!(Percentile::try_from(1).is_ok());
        assert!(Percentile::try_from(100).is_ok());
        assert_eq!(Percentile::try_from(0), Err(PercentileError::OutOfRange(0)));
        assert_eq!(Percentile::try_from(101), Err(PercentileError::OutOfRange(101)));
    }

    #[test]
    fn test_percentile_from_str() {
        assert_eq!("30".parse::<Percentile>().map(Percentile::value), Ok(30));
        assert_eq!(" 75\n".parse::<Percentile>().map(Percentile::value), Ok(75));
        assert_eq!(
            "thirty".parse::<Percentile>(),
            Err(PercentileError::NotANumber("thirty".to_string()))
        );
        assert_eq!("-5".parse::<Percentile>(), Err(PercentileError::NotANumber("-5".to_string())));
    }

    #[test]
    fn test_read_percentile_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "30").unwrap();
        writeln!(file, "ignored").unwrap();

        let p = read_percentile(file.path()).unwrap();
        assert_eq!(p.value(), 30);
    }

    #[test]
    fn test_read_percentile_rejects_out_of_range() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0").unwrap();

        assert!(read_percentile(file.path()).is_err());
    }

    #[test]
    fn test_config_serde() {
        let config: AnalyzerConfig = serde_json::from_str(r#"{"percentile": 40}"#).unwrap();
        assert_eq!(config.percentile.value(), 40);
        assert_eq!(config.repeat_policy, RepeatPolicy::YearForward);

        let bad = serde_json::from_str::<AnalyzerConfig>(r#"{"percentile": 140}"#);
        assert!(bad.is_err());

        let config = AnalyzerConfig::new(Percentile::try_from(40).unwrap())
            .with_repeat_policy(RepeatPolicy::EarlierDate);
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json["repeat_policy"], "earlier-date");
        assert_eq!(json["percentile"], 40);
    }
}
