//! Supported platform integrations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TokenCacheError};

/// Social/marketing platform an access token authenticates against.
///
/// Serialized in upper case (`"FACEBOOK"`), which is also the form used in
/// cache keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum PlatformType {
    /// Facebook pages and ads
    Facebook,
    /// LinkedIn organization pages
    Linkedin,
    /// Instagram business accounts
    Instagram,
}

impl PlatformType {
    /// Every supported platform, in display order.
    pub const ALL: &'static [PlatformType] = &[
        PlatformType::Facebook,
        PlatformType::Linkedin,
        PlatformType::Instagram,
    ];

    /// Upper-case name used in cache keys and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformType::Facebook => "FACEBOOK",
            PlatformType::Linkedin => "LINKEDIN",
            PlatformType::Instagram => "INSTAGRAM",
        }
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformType {
    type Err = TokenCacheError;

    /// Parses a platform name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        PlatformType::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| TokenCacheError::UnknownPlatform(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(PlatformType::Facebook, "FACEBOOK")]
    #[test_case(PlatformType::Linkedin, "LINKEDIN")]
    #[test_case(PlatformType::Instagram, "INSTAGRAM")]
    fn test_platform_display(platform: PlatformType, expected: &str) {
        assert_eq!(platform.to_string(), expected);
        assert_eq!(expected.parse::<PlatformType>().unwrap(), platform);
    }

    #[test_case("facebook")]
    #[test_case("  LinkedIn ")]
    #[test_case("instagram")]
    fn test_platform_parse_case_insensitive(input: &str) {
        assert!(input.parse::<PlatformType>().is_ok());
    }

    #[test]
    fn test_platform_parse_unknown() {
        let err = "MYSPACE".parse::<PlatformType>().unwrap_err();
        assert!(matches!(err, TokenCacheError::UnknownPlatform(ref p) if p == "MYSPACE"));
    }

    #[test]
    fn test_platform_serde_matches_display() {
        for platform in PlatformType::ALL {
            let json = serde_json::to_string(platform).unwrap();
            assert_eq!(json, format!("\"{}\"", platform));
            let back: PlatformType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *platform);
        }
    }
}
