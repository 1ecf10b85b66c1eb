//! Capitalization fixes for street names.
//!
//! Source data mixes "KIng Street", "BottleBrush Avenue" and
//! "campsie street". Normalizing case before grouping keeps those from
//! being counted as different names.

/// Words that are always written in upper case.
const UPPERCASE_WORDS: &[&str] = &["ANZAC", "CBD", "RTA", "NSW", "LGA", "BHD"];

/// Articles, conjunctions and prepositions kept lower case unless they
/// start the name.
const LOWERCASE_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "of", "in", "on", "at", "to", "for", "with", "by", "from",
];

/// Normalizes the capitalization of a street name.
///
/// Title-cases each word, keeps known acronyms upper case, keeps minor
/// words lower case after the first word, and preserves `Mc`/`Mac`
/// prefixes. Hyphenated and parenthesized words are handled per part.
/// Names that start with `(`, `'` or `"` are returned unchanged.
#[must_use]
pub fn normalize_capitalization(name: &str) -> String {
    if name.starts_with(['(', '\'', '"']) {
        return name.to_string();
    }

    name.split_whitespace()
        .enumerate()
        .map(|(i, word)| normalize_word(word, i == 0))
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_word(word: &str, is_first: bool) -> String {
    if word.contains('-') {
        return word
            .split('-')
            .enumerate()
            .map(|(j, part)| capitalize(part, is_first && j == 0))
            .collect::<Vec<_>>()
            .join("-");
    }

    if word.contains('(') {
        let mut parts = word.split('(');
        let mut out = capitalize(parts.next().unwrap_or_default(), is_first);
        for part in parts {
            out.push('(');
            out.push_str(&capitalize(part, false));
        }
        return out;
    }

    capitalize(word, is_first)
}

fn capitalize(word: &str, is_first: bool) -> String {
    if word.is_empty() {
        return String::new();
    }

    let upper = word.to_uppercase();
    if UPPERCASE_WORDS.contains(&upper.as_str()) {
        return upper;
    }

    let lower = word.to_lowercase();
    if !is_first && LOWERCASE_WORDS.contains(&lower.as_str()) {
        return lower;
    }

    let chars: Vec<char> = word.chars().collect();

    if lower.starts_with("mc") && chars.len() > 2 {
        return format!("Mc{}", title_tail(&chars[2..]));
    }

    // "MacArthur" keeps its inner capital; "Machine" does not.
    if lower.starts_with("mac") && chars.len() > 3 && chars[3].is_uppercase() {
        return format!("Mac{}", title_tail(&chars[3..]));
    }

    title_tail(&chars)
}

/// Upper-cases the first character and lower-cases the rest.
fn title_tail(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    if let Some((first, rest)) = chars.split_first() {
        out.extend(first.to_uppercase());
        out.extend(rest.iter().flat_map(|c| c.to_lowercase()));
    }
    out
}
