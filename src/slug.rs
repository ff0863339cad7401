use std::sync::OnceLock;

use regex::Regex;

/// Everything that is neither a word character, whitespace nor a hyphen
const DISALLOWED: &str = r"[^\w\s-]";
/// A whitespace run, to be collapsed into a single hyphen
const WHITESPACE_RUN: &str = r"\s+";

static RE_LIST: OnceLock<[Regex; 2]> = OnceLock::new();

fn re_list() -> &'static [Regex; 2] {
    RE_LIST.get_or_init(|| {
        [
            Regex::new(DISALLOWED).unwrap(),
            Regex::new(WHITESPACE_RUN).unwrap(),
        ]
    })
}

/// Reduce a stream title to a token usable in file names and URLs.
///
/// Lowercases the title, strips every character that is neither a word
/// character, whitespace nor a hyphen, replaces each whitespace run with a
/// single hyphen, then truncates to `max_len` characters.
pub fn slugify(title: &str, max_len: usize) -> String {
    let [disallowed, whitespace] = re_list();

    let lowered = title.to_lowercase();
    let stripped = disallowed.replace_all(&lowered, "");
    let dashed = whitespace.replace_all(&stripped, "-");

    // Truncate on character boundaries, a byte slice could split a code point
    dashed.chars().take(max_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_punctuation_and_joins_words() {
        assert_eq!(
            slugify("My Song: Official Video (HD)!!", 50),
            "my-song-official-video-hd"
        );
    }

    #[test]
    fn test_keeps_underscores_and_existing_hyphens() {
        assert_eq!(slugify("snake_case - kebab", 50), "snake_case---kebab");
    }

    #[test]
    fn test_truncates_to_max_len() {
        let long = "a".repeat(80);
        assert_eq!(slugify(&long, 50).len(), 50);
    }

    #[test]
    fn test_truncates_by_characters_not_bytes() {
        assert_eq!(slugify("héllo wörld", 7), "héllo-w");
    }

    #[test]
    fn test_unicode_word_characters_survive() {
        assert_eq!(slugify("Café del Mar", 50), "café-del-mar");
    }

    #[test]
    fn test_empty_title() {
        assert_eq!(slugify("", 50), "");
    }

    #[test]
    fn test_symbols_only_title_collapses_to_empty() {
        assert_eq!(slugify("!!! ???", 50), "-");
    }
}
