//! Language and internationalization types

use serde::{Deserialize, Serialize};

/// Language of user-facing messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Pick the preferred supported language from an Accept-Language header.
    ///
    /// Entries are weighed by their `q` value; unsupported languages are
    /// ignored and French is the fallback.
    pub fn from_accept_language(header: &str) -> Self {
        let mut preferred = Language::default();
        let mut best_quality = 0.0_f32;

        for entry in header.split(',') {
            let mut parts = entry.trim().split(';');
            let tag = parts.next().unwrap_or("").trim().to_lowercase();
            let quality = parts
                .find_map(|p| p.trim().strip_prefix("q="))
                .and_then(|q| q.parse::<f32>().ok())
                .unwrap_or(1.0);

            let language = if tag.starts_with("fr") {
                Language::French
            } else if tag.starts_with("en") {
                Language::English
            } else {
                continue;
            };

            if quality > best_quality {
                preferred = language;
                best_quality = quality;
            }
        }

        preferred
    }

    /// Get language code (ISO 639-1)
    pub fn code(&self) -> &'static str {
        match self {
            Language::French => "fr",
            Language::English => "en",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_accept_language() {
        assert_eq!(Language::from_accept_language("fr-FR,fr;q=0.9"), Language::French);
        assert_eq!(Language::from_accept_language("en-US,en;q=0.9"), Language::English);
        assert_eq!(Language::from_accept_language("fr;q=0.4,en;q=0.8"), Language::English);
        assert_eq!(Language::from_accept_language("de-DE"), Language::French);
        assert_eq!(Language::from_accept_language(""), Language::French);
    }

    #[test]
    fn test_code() {
        assert_eq!(Language::French.code(), "fr");
        assert_eq!(Language::English.to_string(), "en");
    }
}
