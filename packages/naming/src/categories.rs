//! Thematic street-name categories.
//!
//! Each [`Category`] is a plain word list; a name belongs to a category
//! when it contains one of the words as a whole word (case-insensitive).

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A thematic grouping of street names.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    /// Tree and native plant names (Oak, Wattle, Jacaranda, ...).
    Trees,
    /// Royal names and titles (George, Victoria, Queen, ...).
    Royalty,
    /// Explorers, governors and other notable figures.
    Famous,
    /// Names of well-known suburbs.
    Suburbs,
}

impl Category {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Trees, Self::Royalty, Self::Famous, Self::Suburbs]
    }

    /// The words that place a name in this category.
    #[must_use]
    pub const fn words(self) -> &'static [&'static str] {
        match self {
            Self::Trees => &[
                "Oak",
                "Pine",
                "Elm",
                "Maple",
                "Ash",
                "Birch",
                "Cedar",
                "Willow",
                "Plane",
                "Poplar",
                "Fig",
                "Wattle",
                "Eucalyptus",
                "Gum",
                "Acacia",
                "Banksia",
                "Fir",
                "Spruce",
                "Cypress",
                "Jacaranda",
                "Bottlebrush",
                "Grevillea",
                "Melaleuca",
                "Callistemon",
                "Lilly Pilly",
            ],
            Self::Royalty => &[
                "George",
                "Victoria",
                "Elizabeth",
                "William",
                "Albert",
                "Edward",
                "Mary",
                "Anne",
                "Charlotte",
                "Margaret",
                "Adelaide",
                "Alice",
                "Henry",
                "Charles",
                "Philip",
                "Andrew",
                "Queen",
                "King",
                "Prince",
                "Princess",
                "Duke",
                "Duchess",
                "Royal",
                "Regal",
                "Imperial",
                "Crown",
            ],
            Self::Famous => &[
                "Cook",
                "Macquarie",
                "Phillip",
                "Bligh",
                "Hunter",
                "Darling",
                "Bourke",
                "Fitzroy",
                "Wentworth",
                "Lawson",
                "Blaxland",
                "Hume",
                "Parkes",
                "Bradfield",
                "Banks",
                "Flinders",
                "Sturt",
                "Mitchell",
                "Oxley",
                "Cunningham",
                "Endeavour",
            ],
            Self::Suburbs => &[
                "Sydney",
                "Parramatta",
                "Bondi",
                "Manly",
                "Penrith",
                "Liverpool",
                "Blacktown",
                "Melbourne",
                "Richmond",
                "Brunswick",
                "Fitzroy",
                "Carlton",
                "Collingwood",
                "Kensington",
            ],
        }
    }

    /// Returns `true` if `name` contains one of this category's words.
    #[must_use]
    pub fn matches(self, name: &str) -> bool {
        CATEGORY_PATTERNS
            .iter()
            .find(|(category, _)| *category == self)
            .is_some_and(|(_, pattern)| pattern.is_match(name))
    }
}

/// One whole-word alternation per category. Multi-word entries accept any
/// amount of whitespace between words ("LillyPilly", "Lilly  Pilly").
static CATEGORY_PATTERNS: LazyLock<Vec<(Category, Regex)>> = LazyLock::new(|| {
    Category::all()
        .iter()
        .map(|&category| {
            let alternation = category
                .words()
                .iter()
                .map(|word| {
                    word.split_whitespace()
                        .map(regex::escape)
                        .collect::<Vec<_>>()
                        .join(r"\s*")
                })
                .collect::<Vec<_>>()
                .join("|");
            let pattern =
                Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("valid regex");
            (category, pattern)
        })
        .collect()
});

/// Returns every category `name` belongs to.
#[must_use]
pub fn categorize(name: &str) -> Vec<Category> {
    Category::all()
        .iter()
        .copied()
        .filter(|category| category.matches(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr as _;

    #[test]
    fn matches_whole_words_only() {
        assert!(Category::Trees.matches("Oak Street"));
        assert!(!Category::Trees.matches("Oakland Street"));
        assert!(Category::Royalty.matches("king street"));
        assert!(!Category::Royalty.matches("Kingsway"));
    }

    #[test]
    fn multi_word_entries_allow_flexible_spacing() {
        assert!(Category::Trees.matches("Lilly Pilly Court"));
        assert!(Category::Trees.matches("LillyPilly Court"));
    }

    #[test]
    fn name_can_belong_to_several_categories() {
        assert_eq!(
            categorize("Fitzroy Street"),
            vec![Category::Famous, Category::Suburbs]
        );
        assert!(categorize("Smith Street").is_empty());
    }

    #[test]
    fn categories_parse_from_snake_case() {
        for category in Category::all() {
            assert_eq!(Category::from_str(category.as_ref()).unwrap(), *category);
        }
    }

    #[test]
    fn word_lists_are_non_empty_and_unique() {
        for category in Category::all() {
            let words = category.words();
            assert!(!words.is_empty(), "{category} has no words");
            let mut seen = std::collections::BTreeSet::new();
            for word in words {
                assert!(seen.insert(word), "{category} repeats {word}");
            }
        }
    }
}
