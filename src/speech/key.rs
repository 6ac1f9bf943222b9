//! Filesystem-safe cache keys for word audio artifacts.
//!
//! The mapping is deterministic: every character outside the allowed set
//! is replaced with a single underscore, so a word always resolves to the
//! same file name regardless of platform or locale settings.

/// Characters that pass through unchanged: Russian letters (the
/// contiguous `а–я`/`А–Я` ranges), ASCII letters, digits, hyphen and
/// underscore.
fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('а'..='я').contains(&c) || ('А'..='Я').contains(&c) || c == '-' || c == '_'
}

/// Derive the cache key (file stem) for `word`.
///
/// Disallowed characters are replaced 1:1 with `_`, so distinct words can
/// collide only when they differ solely in disallowed characters.
pub fn cache_key(word: &str) -> String {
    word.chars()
        .map(|c| if is_allowed(c) { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn russian_and_ascii_pass_through() {
        assert_eq!(cache_key("вокзал"), "вокзал");
        assert_eq!(cache_key("Парашют"), "Парашют");
        assert_eq!(cache_key("word-42_x"), "word-42_x");
    }

    #[test]
    fn disallowed_characters_become_underscores() {
        assert_eq!(cache_key("как дела?"), "как_дела_");
        assert_eq!(cache_key("a/b\\c:d"), "a_b_c_d");
        assert_eq!(cache_key("слово."), "слово_");
    }

    /// `ё` sits outside the contiguous `а–я` range and is deliberately
    /// mapped to `_`, so existing artifact files keep resolving.
    #[test]
    fn yo_is_replaced() {
        assert_eq!(cache_key("ёлка"), "_лка");
        assert_eq!(cache_key("Ёж"), "_ж");
    }

    #[test]
    fn mapping_is_one_to_one_per_character() {
        assert_eq!(cache_key("??").chars().count(), 2);
        assert_eq!(cache_key(""), "");
    }
}
