//! Category guessing from free-text part names.
//!
//! Keywords are checked in table order and the first one contained in the
//! name (case-insensitive) decides. Order is the tie-break: "Bass Trombone"
//! and "Bassoon" both hit `bass` before their own keyword and guess Strings.

/// Ordered `(keyword, category)` table used by [`CategoryGuesser::default`].
pub const DEFAULT_KEYWORDS: &[(&str, &str)] = &[
    ("violin", "Strings"),
    ("viola", "Strings"),
    ("cello", "Strings"),
    ("bass", "Strings"),
    ("flute", "Woodwinds"),
    ("oboe", "Woodwinds"),
    ("clarinet", "Woodwinds"),
    ("bassoon", "Woodwinds"),
    ("trumpet", "Brass"),
    ("horn", "Brass"),
    ("trombone", "Brass"),
    ("tuba", "Brass"),
    ("timpani", "Percussion"),
    ("percussion", "Percussion"),
];

/// Maps part names to a best-guess category.
#[derive(Debug, Clone)]
pub struct CategoryGuesser {
    /// Lowercased keywords with their categories, in match order.
    keywords: Vec<(String, String)>,
}

impl Default for CategoryGuesser {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().copied())
    }
}

impl CategoryGuesser {
    /// Create a guesser from an ordered keyword table.
    pub fn new<'a>(keywords: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            keywords: keywords
                .into_iter()
                .map(|(keyword, category)| (keyword.to_lowercase(), category.to_string()))
                .collect(),
        }
    }

    /// Category of the first keyword contained in `display_name`.
    pub fn guess(&self, display_name: &str) -> Option<&str> {
        let name = display_name.to_lowercase();
        self.keywords
            .iter()
            .find(|(keyword, _)| name.contains(keyword.as_str()))
            .map(|(_, category)| category.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_common_names() {
        let guesser = CategoryGuesser::default();
        assert_eq!(guesser.guess("Violin I"), Some("Strings"));
        assert_eq!(guesser.guess("FLUTE 2"), Some("Woodwinds"));
        assert_eq!(guesser.guess("Horn in F"), Some("Brass"));
        assert_eq!(guesser.guess("Timpani"), Some("Percussion"));
    }

    #[test]
    fn test_first_keyword_wins() {
        let guesser = CategoryGuesser::default();
        assert_eq!(guesser.guess("Bass Trombone"), Some("Strings"));
        assert_eq!(guesser.guess("Bassoon"), Some("Strings"));
        // "viola" comes after "violin" but "Viola" does not contain "violin".
        assert_eq!(guesser.guess("Viola"), Some("Strings"));
    }

    #[test]
    fn test_no_match() {
        let guesser = CategoryGuesser::default();
        assert_eq!(guesser.guess("Piano"), None);
        assert_eq!(guesser.guess(""), None);
    }

    #[test]
    fn test_custom_table_order() {
        let guesser = CategoryGuesser::new([("trombone", "Brass"), ("bass", "Strings")]);
        assert_eq!(guesser.guess("Bass Trombone"), Some("Brass"));
    }
}
