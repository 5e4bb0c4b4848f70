//! Text codec for the legacy encodings and packing schemes.
//!
//! Two character encodings appear in the shipped binaries: IBM code page 857
//! (the DOS Turkish OEM page) in MTU.TRK, and a private indexed alphabet
//! (byte N = letter N) in the MG2 container. On top of CP 857 the TRK file
//! packs headwords with a morpheme scheme: a per-record instruction byte
//! chains onto the previous headword and substitutes from a fixed suffix
//! table that the original application kept inside its executable.
//!
//! All mapping tables here are ground truth recovered from the binaries,
//! not runtime configuration.

use log::trace;

use super::error::{MtuError, Result};

/// Upper half of IBM code page 857. `None` marks the three code points the
/// page leaves undefined (0xD5, 0xE7, 0xF2).
#[rustfmt::skip]
const CP857_HIGH: [Option<char>; 128] = [
    // 0x80
    Some('Ç'), Some('ü'), Some('é'), Some('â'), Some('ä'), Some('à'), Some('å'), Some('ç'),
    Some('ê'), Some('ë'), Some('è'), Some('ï'), Some('î'), Some('ı'), Some('Ä'), Some('Å'),
    // 0x90
    Some('É'), Some('æ'), Some('Æ'), Some('ô'), Some('ö'), Some('ò'), Some('û'), Some('ù'),
    Some('İ'), Some('Ö'), Some('Ü'), Some('ø'), Some('£'), Some('Ø'), Some('Ş'), Some('ş'),
    // 0xA0
    Some('á'), Some('í'), Some('ó'), Some('ú'), Some('ñ'), Some('Ñ'), Some('Ğ'), Some('ğ'),
    Some('¿'), Some('®'), Some('¬'), Some('½'), Some('¼'), Some('¡'), Some('«'), Some('»'),
    // 0xB0
    Some('░'), Some('▒'), Some('▓'), Some('│'), Some('┤'), Some('Á'), Some('Â'), Some('À'),
    Some('©'), Some('╣'), Some('║'), Some('╗'), Some('╝'), Some('¢'), Some('¥'), Some('┐'),
    // 0xC0
    Some('└'), Some('┴'), Some('┬'), Some('├'), Some('─'), Some('┼'), Some('ã'), Some('Ã'),
    Some('╚'), Some('╔'), Some('╩'), Some('╦'), Some('╠'), Some('═'), Some('╬'), Some('¤'),
    // 0xD0
    Some('º'), Some('ª'), Some('Ê'), Some('Ë'), Some('È'), None,      Some('Í'), Some('Î'),
    Some('Ï'), Some('┘'), Some('┌'), Some('█'), Some('▄'), Some('¦'), Some('Ì'), Some('▀'),
    // 0xE0
    Some('Ó'), Some('ß'), Some('Ô'), Some('Ò'), Some('õ'), Some('Õ'), Some('µ'), None,
    Some('×'), Some('Ú'), Some('Û'), Some('Ù'), Some('ì'), Some('ÿ'), Some('¯'), Some('´'),
    // 0xF0
    Some('\u{AD}'), Some('±'), None,      Some('¾'), Some('¶'), Some('§'), Some('÷'), Some('¸'),
    Some('°'), Some('¨'), Some('·'), Some('¹'), Some('³'), Some('²'), Some('■'), Some('\u{A0}'),
];

/// The MG2 indexed alphabet. Positions holding `None` are unassigned in the
/// shipped data and decoding one is a corruption signal.
#[rustfmt::skip]
const MG2_ALPHABET: [Option<char>; 59] = [
    Some('a'), Some('b'), Some('c'), Some('ç'), Some('d'), Some('e'), Some('f'), Some('g'),
    Some('ğ'), Some('h'), Some('ı'), Some('i'), Some('j'), Some('k'), Some('l'), Some('m'),
    Some('n'), Some('o'), Some('ö'), Some('p'), Some('q'), Some('r'), Some('s'), Some('ş'),
    Some('t'), Some('u'), Some('ü'), Some('v'), Some('w'), Some('x'), Some('y'), Some('z'),
    Some('â'), None, None, None, None, None, None, None,
    None, None, None, Some('î'), None, None, None, None,
    None, None, None, None, None, None, None, None,
    None, None, Some('û'),
];

/// Suffixes substituted out of TRK headwords, longest first. The original
/// application stored these inside MTU.EXE (1B8B8h-1BC45h) and re-attached
/// them at runtime through the morpheme instructions.
#[rustfmt::skip]
pub const SUFFIXES: &[&str] = &[
    // 7-letter
    "ability", "ibility", "iveness", "ization", "fulness",
    "ousness",
    // 6-letter
    "ectomy", "edness", "liness", "ically", "lessly",
    // 5-letter
    "ality", "alism", "antly", "arian", "ating",
    "ation", "ative", "atory", "berry", "board",
    "bound", "ering", "esque", "fully", "house",
    "ially", "iness", "ingly", "ional", "istic",
    "ition", "ively", "ivity", "light", "ology",
    "orium", "ously", "stone", "ually",
    // 4-letter
    "able", "ance", "ancy", "ally", "ated",
    "back", "ball", "band", "bing", "bird",
    "boat", "bone", "book", "cide", "cule",
    "ding", "down", "ence", "ency", "ener",
    "ette", "fold", "ging", "head", "hood",
    "ible", "ical", "icle", "ings", "ious",
    "itis", "izer", "land", "less", "like",
    "line", "ling", "logy", "make", "ment",
    "ming", "ness", "ning", "ntly", "osis",
    "over", "ping", "ring", "room", "ship",
    "side", "sing", "sman", "some", "ster",
    "tail", "time", "ting", "wise", "wood",
    "work", "wort",
    // 3-letter
    "acy", "ade", "age", "and", "ant",
    "ary", "ate", "ble", "boy", "dom",
    "end", "ent", "ery", "ese", "ess",
    "est", "eur", "ful", "ger", "ial",
    "ian", "ide", "ied", "ier", "ile",
    "ily", "ine", "ing", "ion", "ise",
    "ish", "ism", "ist", "ite", "ity",
    "ium", "ive", "ize", "kin", "ler",
    "let", "man", "med", "nce", "ned",
    "oid", "ome", "oon", "ory", "ous",
    "out", "per", "red", "rer", "sed",
    "ted", "ter", "tic", "ual", "ule",
    "ure", "way", "yer",
    // 2-letter
    "ae", "al", "an", "ar", "by",
    "ch", "cy", "ed", "el", "en",
    "er", "et", "ey", "fy", "ia",
    "ic", "ie", "in", "is", "ly",
    "nt", "on", "or", "ow", "ry",
    "st", "th", "to", "ty", "us",
];

/// Guard against unbounded expansion from corrupt chain/suffix tokens: an
/// expanded headword may not exceed this many times the raw morpheme length
/// (plus one, so zero-length morphemes still admit a suffix).
const MAX_EXPANSION_RATIO: usize = 16;

/// Decode CP 857 bytes into text.
///
/// `base_offset` is the absolute blob offset of `bytes[0]`, used for error
/// reporting only.
pub fn decode_cp857(bytes: &[u8], base_offset: usize) -> Result<String> {
    let mut text = String::with_capacity(bytes.len());
    for (i, &byte) in bytes.iter().enumerate() {
        if byte < 0x80 {
            text.push(byte as char);
        } else {
            match CP857_HIGH[(byte - 0x80) as usize] {
                Some(c) => text.push(c),
                None => {
                    return Err(MtuError::InvalidCodeUnit {
                        byte,
                        offset: base_offset + i,
                    })
                }
            }
        }
    }
    Ok(text)
}

/// Decode MG2 indexed-alphabet bytes into text.
pub fn decode_indexed(bytes: &[u8], base_offset: usize) -> Result<String> {
    let mut text = String::with_capacity(bytes.len());
    for (i, &byte) in bytes.iter().enumerate() {
        let mapped = MG2_ALPHABET.get(byte as usize).copied().flatten();
        match mapped {
            Some(c) => text.push(c),
            None => {
                return Err(MtuError::InvalidCodeUnit {
                    byte,
                    offset: base_offset + i,
                })
            }
        }
    }
    Ok(text)
}

/// One decoded TRK morpheme instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MorphemeOp {
    /// Characters to copy from the previous headword (after its two-letter
    /// prefix), 0 for none.
    pub chain: usize,
    /// Index into [`SUFFIXES`] to append, if any.
    pub suffix: Option<usize>,
    /// Whether the expanded headword's first letter is capitalized.
    pub capitalize: bool,
}

impl MorphemeOp {
    /// Interpret a TRK instruction byte.
    ///
    /// Instructions `>= 0x80` consume a separate suffix parameter byte; the
    /// decoder passes it in as `suffix_param`.
    pub fn parse(instruction: u8, suffix_param: u8) -> Option<Self> {
        let (chain, suffix, capitalize) = match instruction {
            0x00 | 0x12 => (0, None, false),
            0x20 => (0, None, true),
            0x41..=0x4F => ((instruction - 0x40) as usize, None, false),
            0x61..=0x6F => ((instruction - 0x60) as usize, None, true),
            0x80 => (0, Some(suffix_param as usize), false),
            0xA0 => (0, Some(suffix_param as usize), true),
            0xC1..=0xCF => ((instruction - 0xC0) as usize, Some(suffix_param as usize), false),
            0xE1..=0xEF => ((instruction - 0xE0) as usize, Some(suffix_param as usize), true),
            _ => return None,
        };
        Some(Self {
            chain,
            suffix,
            capitalize,
        })
    }
}

/// Expand a TRK morpheme into a full headword.
///
/// `prefix_index` selects the two-letter bucket prefix (`aa`..`zz`),
/// `previous` is the previous expanded headword minus its prefix, and `op`
/// is the record's parsed instruction.
pub fn expand_morpheme(
    prefix_index: usize,
    prefix_letters: usize,
    morpheme: &str,
    previous: &str,
    op: MorphemeOp,
) -> Result<String> {
    if op.chain > previous.chars().count() {
        return Err(MtuError::CorruptCompression(format!(
            "chain of {} chars exceeds previous morpheme ({:?})",
            op.chain, previous
        )));
    }

    let mut word = String::new();
    word.push((b'a' + (prefix_index / prefix_letters) as u8) as char);
    word.push((b'a' + (prefix_index % prefix_letters) as u8) as char);
    word.extend(previous.chars().take(op.chain));
    word.push_str(morpheme);

    if let Some(index) = op.suffix {
        let suffix = SUFFIXES.get(index).ok_or_else(|| {
            MtuError::CorruptCompression(format!(
                "suffix index {} out of table range ({})",
                index,
                SUFFIXES.len()
            ))
        })?;
        word.push_str(suffix);
    }

    if word.chars().count() > MAX_EXPANSION_RATIO * (morpheme.chars().count() + 1) {
        return Err(MtuError::CorruptCompression(format!(
            "morpheme {:?} expanded to {} chars",
            morpheme,
            word.chars().count()
        )));
    }

    if op.capitalize {
        word = capitalize_first(&word);
    }

    trace!("expanded morpheme {:?} -> {:?}", morpheme, word);
    Ok(word)
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Clean up decoded TRK sense text and split it into individual senses.
///
/// The shipped data stores apostrophes as backticks, and separates multiple
/// senses with CP 857 byte 0xFF, which decodes to U+00A0.
pub fn split_senses(decoded: &str) -> Vec<String> {
    decoded
        .replace('`', "'")
        .split('\u{A0}')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
