use icu_normalizer::DecomposingNormalizerBorrowed;

/// Lowercase, trim, and collapse internal whitespace runs to one space.
pub fn normalize(input: &str) -> String {
    input
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Loose phonetic form: normalized, NFD-decomposed, and stripped to
/// `[a-z0-9: ]`. Combining tone marks decompose away, so "nǐ hǎo" and
/// "ni hao" fold to the same string. The colon survives for the
/// "u:"-style umlaut convention.
pub fn fold_phonetic(input: &str) -> String {
    let normalized = normalize(input);
    let decomposed = DecomposingNormalizerBorrowed::new_nfd().normalize(&normalized);
    decomposed
        .chars()
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | ':' | ' '))
        .collect()
}

/// Typed pronunciation check. Exact normalized match first; unless
/// `strict`, fall back to comparing folded forms so tone diacritics can
/// be omitted. Blank input never matches.
pub fn matches_pronunciation(input: &str, expected: &str, strict: bool) -> bool {
    let input_norm = normalize(input);
    if input_norm.is_empty() {
        return false;
    }
    if input_norm == normalize(expected) {
        return true;
    }
    if strict {
        return false;
    }
    let folded = fold_phonetic(input);
    !folded.is_empty() && folded == fold_phonetic(expected)
}

/// Typed sentence check: normalized equality against any enumerated
/// accepted answer. No folded fallback. Blank input never matches.
pub fn matches_sentence(input: &str, accepted: &[String]) -> bool {
    let input_norm = normalize(input);
    if input_norm.is_empty() {
        return false;
    }
    accepted.iter().any(|a| normalize(a) == input_norm)
}
