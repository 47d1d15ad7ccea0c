/*!
 * Script-range checks for the Hangul target alphabet.
 *
 * Translated prose should come back in Hangul. Han ideographs or Japanese
 * kana in the output mean the model either left passages untranslated or
 * drifted into the wrong language, and a low Hangul ratio means the text
 * is mostly passthrough even when no foreign script is present.
 */

/// Script ranges that must not appear in translated output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignScript {
    Han,
    Hiragana,
    Katakana,
}

impl std::fmt::Display for ForeignScript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Han => write!(f, "Han"),
            Self::Hiragana => write!(f, "Hiragana"),
            Self::Katakana => write!(f, "Katakana"),
        }
    }
}

/// Whether a character belongs to the Hangul syllable block
pub fn is_hangul(c: char) -> bool {
    // Hangul syllables plus the Jamo blocks used in decomposed text.
    matches!(c,
        '\u{AC00}'..='\u{D7AF}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}')
}

fn classify_foreign(c: char) -> Option<ForeignScript> {
    match c {
        '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' => Some(ForeignScript::Han),
        '\u{3040}'..='\u{309F}' => Some(ForeignScript::Hiragana),
        '\u{30A0}'..='\u{30FF}' => Some(ForeignScript::Katakana),
        _ => None,
    }
}

/// Distinct foreign scripts present in the text, in first-seen order
pub fn foreign_scripts_in(text: &str) -> Vec<ForeignScript> {
    let mut found = Vec::new();
    for c in text.chars() {
        if let Some(script) = classify_foreign(c) {
            if !found.contains(&script) {
                found.push(script);
            }
        }
    }
    found
}

/// Ratio of Hangul characters among non-whitespace characters.
///
/// Returns 0.0 for text with no non-whitespace characters.
pub fn hangul_ratio(text: &str) -> f64 {
    let mut hangul = 0usize;
    let mut total = 0usize;

    for c in text.chars() {
        if c.is_whitespace() {
            continue;
        }
        total += 1;
        if is_hangul(c) {
            hangul += 1;
        }
    }

    if total == 0 {
        0.0
    } else {
        hangul as f64 / total as f64
    }
}
