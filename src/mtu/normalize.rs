//! Turkish-aware normalization and collation.
//!
//! Turkish has two distinct I letters: dotted İ/i and dotless I/ı. Naive
//! ASCII folding maps 'I' to 'i' and corrupts lookups, so the fold here is
//! explicit: 'İ' lowers to 'i' and 'I' lowers to 'ı'. Diacritics are
//! preserved, never stripped.

/// Locale-correct lowercase fold of a headword or query word.
pub fn normalize(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    match c {
        'İ' => 'i',
        'I' => 'ı',
        'Ç' => 'ç',
        'Ğ' => 'ğ',
        'Ö' => 'ö',
        'Ş' => 'ş',
        'Ü' => 'ü',
        'Â' => 'â',
        'Î' => 'î',
        'Û' => 'û',
        'A'..='Z' => c.to_ascii_lowercase(),
        _ => c,
    }
}

/// Rank of one (already folded) character in Turkish alphabet order.
///
/// The circumflexed â/î/û sort directly after their base letters, matching
/// how the original application ordered its word lists. Characters outside
/// the alphabet sort after every letter, by scalar value.
pub fn collation_rank(c: char) -> u32 {
    const ORDER: &[char] = &[
        'a', 'â', 'b', 'c', 'ç', 'd', 'e', 'f', 'g', 'ğ', 'h', 'ı', 'i', 'î', 'j', 'k', 'l',
        'm', 'n', 'o', 'ö', 'p', 'q', 'r', 's', 'ş', 't', 'u', 'û', 'ü', 'v', 'w', 'x', 'y',
        'z',
    ];
    match ORDER.iter().position(|&o| o == c) {
        Some(rank) => rank as u32,
        None => ORDER.len() as u32 + c as u32,
    }
}

/// Collation key for a normalized word; keys compare in Turkish order.
pub fn collation_key(normalized: &str) -> Vec<u32> {
    normalized.chars().map(collation_rank).collect()
}

/// Compare two normalized words in Turkish collation order.
pub fn collate(a: &str, b: &str) -> std::cmp::Ordering {
    a.chars()
        .map(collation_rank)
        .cmp(b.chars().map(collation_rank))
}
