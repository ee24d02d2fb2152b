// English number inflection for table names.

/// Singular/plural inflection, used to derive default column names from
/// table names.
pub trait Pluralizer {
    fn is_plural(&self, word: &str) -> bool;

    fn is_singular(&self, word: &str) -> bool {
        !self.is_plural(word)
    }

    fn singularize(&self, word: &str) -> String;

    fn pluralize(&self, word: &str) -> String;
}

// ---------------------------------------------------------------------------
// Trailing-s heuristic
// ---------------------------------------------------------------------------

/// Treats any trailing `s` as a plural. Wrong for words like "Status";
/// callers that care use [`EnglishPluralizer`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SimplePluralizer;

impl Pluralizer for SimplePluralizer {
    fn is_plural(&self, word: &str) -> bool {
        word.ends_with('s') || word.ends_with('S')
    }

    fn singularize(&self, word: &str) -> String {
        if self.is_plural(word) {
            word[..word.len() - 1].to_string()
        } else {
            word.to_string()
        }
    }

    fn pluralize(&self, word: &str) -> String {
        if self.is_plural(word) {
            word.to_string()
        } else {
            format!("{word}s")
        }
    }
}

// ---------------------------------------------------------------------------
// Suffix rules
// ---------------------------------------------------------------------------

/// Suffix rules plus a small irregular-noun table. Covers the table names
/// that actually show up in reference data; not a full inflector.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishPluralizer;

// (singular, plural), lowercase.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("mouse", "mice"),
];

impl Pluralizer for EnglishPluralizer {
    fn is_plural(&self, word: &str) -> bool {
        let lower = word.to_ascii_lowercase();
        if IRREGULAR.iter().any(|(_, plural)| *plural == lower) {
            return true;
        }
        if IRREGULAR.iter().any(|(singular, _)| *singular == lower) {
            return false;
        }
        // "Status", "Address", "Analysis" are singular despite the s.
        if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
            return false;
        }
        lower.ends_with('s')
    }

    fn singularize(&self, word: &str) -> String {
        let lower = word.to_ascii_lowercase();
        if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == lower) {
            return match_case(singular, word);
        }
        if !self.is_plural(word) {
            return word.to_string();
        }
        if lower.ends_with("ies") && word.len() > 3 {
            return format!("{}y", &word[..word.len() - 3]);
        }
        for suffix in ["sses", "xes", "zes", "ches", "shes", "uses"] {
            if lower.ends_with(suffix) {
                return word[..word.len() - 2].to_string();
            }
        }
        word[..word.len() - 1].to_string()
    }

    fn pluralize(&self, word: &str) -> String {
        let lower = word.to_ascii_lowercase();
        if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
            return match_case(plural, word);
        }
        if self.is_plural(word) {
            return word.to_string();
        }
        if lower.ends_with('y') && !vowel_before_y(&lower) {
            return format!("{}ies", &word[..word.len() - 1]);
        }
        for suffix in ["s", "x", "z", "ch", "sh"] {
            if lower.ends_with(suffix) {
                return format!("{word}es");
            }
        }
        format!("{word}s")
    }
}

fn vowel_before_y(lower: &str) -> bool {
    let bytes = lower.as_bytes();
    bytes.len() >= 2 && matches!(bytes[bytes.len() - 2], b'a' | b'e' | b'i' | b'o' | b'u')
}

/// Copy the leading capitalization of `like` onto `result`.
fn match_case(result: &str, like: &str) -> String {
    let mut out = result.to_string();
    if like.chars().next().map_or(false, |c| c.is_ascii_uppercase()) {
        if let Some(first) = out.get(0..1) {
            let upper = first.to_ascii_uppercase();
            out.replace_range(0..1, &upper);
        }
    }
    out
}
