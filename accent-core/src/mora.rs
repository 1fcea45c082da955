//! # Mora Tokenizer
//!
//! Splits a Japanese transcript into morae, the rhythmic units pitch accent is
//! measured over. This is lexical segmentation only: kana digraphs (きゃ),
//! the moraic nasal (ん) and the geminate marker (っ) are handled, everything
//! else is one mora per character. Malformed input never errors.

/// Small kana that attach to the preceding character.
const COMBINING_SMALL_KANA: [char; 8] = ['ゃ', 'ゅ', 'ょ', 'ャ', 'ュ', 'ョ', 'っ', 'ッ'];

/// Returns true for small kana that merge with the previous character.
pub fn is_combining_small_kana(c: char) -> bool {
    COMBINING_SMALL_KANA.contains(&c)
}

/// Returns true for the moraic nasal ん / ン.
pub fn is_moraic_nasal(c: char) -> bool {
    matches!(c, 'ん' | 'ン')
}

/// Splits `text` into morae, left to right.
///
/// A character followed by a combining small kana forms a two-character mora,
/// except the moraic nasal, which always stands alone. A geminate marker that
/// did not combine is its own timing unit.
///
/// # Examples
/// ```
/// use accent_core::mora::tokenize_morae;
///
/// assert_eq!(tokenize_morae("きょうと"), vec!["きょ", "う", "と"]);
/// assert_eq!(tokenize_morae("こんにちは").len(), 5);
/// ```
pub fn tokenize_morae(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut morae = Vec::with_capacity(chars.len());

    let mut i = 0;
    while i < chars.len() {
        let current = chars[i];
        match chars.get(i + 1) {
            Some(&next) if is_combining_small_kana(next) && !is_moraic_nasal(current) => {
                morae.push([current, next].iter().collect());
                i += 2;
            }
            _ => {
                morae.push(current.to_string());
                i += 1;
            }
        }
    }

    morae
}

/// Number of morae in `text`.
pub fn mora_count(text: &str) -> usize {
    tokenize_morae(text).len()
}
