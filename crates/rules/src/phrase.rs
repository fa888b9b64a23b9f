//! Word-sequence phrase matching used by the title and description triggers.
//!
//! Both the searched text and the phrase are lower-cased, every ASCII
//! punctuation character is replaced by a space, and the result is split on
//! whitespace. A phrase matches when its words appear as a contiguous,
//! in-order run of the text's words.

/// Normalize `text` into its lower-cased, punctuation-free word sequence.
pub fn normalize_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Returns `true` if `phrase` occurs as a contiguous word run inside `text`.
///
/// An empty phrase never matches.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    contains_words(text, &normalize_words(phrase))
}

/// Same as [`contains_phrase`] with the phrase already normalized.
pub(crate) fn contains_words(text: &str, phrase: &[String]) -> bool {
    if phrase.is_empty() {
        return false;
    }
    let words = normalize_words(text);
    if phrase.len() > words.len() {
        return false;
    }
    words.windows(phrase.len()).any(|window| window == phrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_case_and_punctuation() {
        assert!(contains_phrase("Stock, market rallies!", "stock market"));
        assert!(contains_phrase("PURPLE@#$%cow", "purple cow"));
        assert!(contains_phrase("The purple cow is soft and cuddly.", "PURPLE COW"));
    }

    #[test]
    fn word_order_matters() {
        let text = "market in New York city";
        assert!(contains_phrase(text, "New York"));
        assert!(!contains_phrase(text, "York New"));
    }

    #[test]
    fn requires_whole_words() {
        assert!(!contains_phrase("purplecow", "purple cow"));
        assert!(!contains_phrase("purple cows are cool", "purple cow"));
    }

    #[test]
    fn requires_contiguous_words() {
        assert!(!contains_phrase("purple is a cow colour", "purple cow"));
    }

    #[test]
    fn punctuation_in_phrase_is_normalized_too() {
        assert!(contains_phrase("New York-based firm", "york based"));
        assert!(contains_phrase("New York based firm", "york-based"));
    }

    #[test]
    fn empty_phrase_never_matches() {
        assert!(!contains_phrase("anything", ""));
        assert!(!contains_phrase("anything", " ,;! "));
        assert!(!contains_phrase("", ""));
    }

    #[test]
    fn phrase_longer_than_text() {
        assert!(!contains_phrase("cow", "purple cow"));
    }

    #[test]
    fn normalizes_words() {
        assert_eq!(
            normalize_words("  Hello,World!  it's   ME "),
            vec!["hello", "world", "it", "s", "me"]
        );
    }
}
