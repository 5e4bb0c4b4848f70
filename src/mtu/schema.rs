//! Declarative descriptions of the legacy on-disk layouts.
//!
//! One [`FormatSchema`] per dictionary kind. The schemas are data, not code:
//! everything the empirical reverse-engineering established about a file
//! lives here, and the [`decoder`](super::decoder) is driven entirely by it,
//! so new evidence about the formats changes constants rather than logic.

use std::fmt;

use super::error::{MtuError, Result};

/// Magic signature of the MG2 container (MTU.TUR and siblings).
pub const MG2_MAGIC: &[u8] = &[0x4D, 0x47, 0x32, 0x1A];

/// The four dictionaries the legacy application ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DictionaryKind {
    /// MTU.TRK: English headwords, Turkish senses.
    EnglishTurkish,
    /// Turkish headwords, English senses.
    TurkishEnglish,
    /// Türkçe Eş Anlamlılar: Turkish synonym groups (cross-referenced).
    Synonyms,
    /// Leb Demeden: the Hangman word list (headwords only).
    Hangman,
}

impl DictionaryKind {
    /// Stable on-disk tag used by the exported artifact.
    pub fn tag(self) -> u8 {
        match self {
            DictionaryKind::EnglishTurkish => 0,
            DictionaryKind::TurkishEnglish => 1,
            DictionaryKind::Synonyms => 2,
            DictionaryKind::Hangman => 3,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(DictionaryKind::EnglishTurkish),
            1 => Ok(DictionaryKind::TurkishEnglish),
            2 => Ok(DictionaryKind::Synonyms),
            3 => Ok(DictionaryKind::Hangman),
            _ => Err(MtuError::UnrecognizedFormat(format!(
                "unknown dictionary kind tag: {}",
                tag
            ))),
        }
    }
}

impl fmt::Display for DictionaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DictionaryKind::EnglishTurkish => "English-Turkish",
            DictionaryKind::TurkishEnglish => "Turkish-English",
            DictionaryKind::Synonyms => "Synonyms",
            DictionaryKind::Hangman => "Hangman",
        };
        f.write_str(name)
    }
}

/// How records are arranged in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    /// TRK layout: a `prefix_letters x prefix_letters` offset map of
    /// `offset_width`-byte little-endian bucket end offsets, then
    /// variable-length morpheme-coded entries chained per two-letter-prefix
    /// bucket. Sense text is resolved through 3-byte middle-endian offsets
    /// into a trailing section of u16-length-prefixed runs.
    PrefixChained {
        prefix_letters: usize,
        offset_width: usize,
    },
    /// MG2 layout: a u16 little-endian record count after the magic, then
    /// fixed-size records. Within a stride: `[hw_len u8][hw bytes]
    /// [n_senses u8]([sense_len u16 LE][sense bytes])*` plus a trailing
    /// `group_id u16 LE` when the schema declares cross-references,
    /// zero-padded to the stride.
    FixedStride { stride: usize },
}

/// How entry text is packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPacking {
    /// Plain IBM code page 857 single-byte text.
    Cp857,
    /// CP 857 with the TRK morpheme scheme: a per-record instruction byte
    /// controls prefix chaining to the previous headword, substitution from
    /// the fixed suffix table, and capitalization.
    Cp857Suffixed,
    /// MG2 indexed alphabet: each byte is an index into the fixed Turkish
    /// alphabet constant (0x00 = 'a', 0x01 = 'b', ...).
    IndexedAlphabet,
}

/// Everything the decoder needs to know about one file layout.
///
/// Authored from empirical reverse-engineering of the shipped binaries and
/// versioned alongside the decoder that interprets it.
#[derive(Debug, Clone, Copy)]
pub struct FormatSchema {
    pub kind: DictionaryKind,
    /// Expected magic signature; empty for layouts without one (TRK starts
    /// with an empty 3-byte header instead).
    pub magic: &'static [u8],
    /// Bytes to skip between the magic and the first section.
    pub header_skip: usize,
    pub layout: RecordLayout,
    pub packing: TextPacking,
    /// Whether records carry synonym group ids.
    pub has_cross_refs: bool,
}

impl FormatSchema {
    /// The built-in schema for a dictionary kind.
    pub fn for_kind(kind: DictionaryKind) -> Self {
        match kind {
            // MTU.TRK: 3 empty header bytes, 26x26 prefix map of 3-byte
            // offsets, suffix-compressed CP 857 entries.
            DictionaryKind::EnglishTurkish => Self {
                kind,
                magic: &[],
                header_skip: 3,
                layout: RecordLayout::PrefixChained {
                    prefix_letters: 26,
                    offset_width: 3,
                },
                packing: TextPacking::Cp857Suffixed,
                has_cross_refs: false,
            },
            DictionaryKind::TurkishEnglish => Self {
                kind,
                magic: MG2_MAGIC,
                header_skip: 0,
                layout: RecordLayout::FixedStride { stride: 64 },
                packing: TextPacking::IndexedAlphabet,
                has_cross_refs: false,
            },
            DictionaryKind::Synonyms => Self {
                kind,
                magic: MG2_MAGIC,
                header_skip: 0,
                layout: RecordLayout::FixedStride { stride: 96 },
                packing: TextPacking::IndexedAlphabet,
                has_cross_refs: true,
            },
            DictionaryKind::Hangman => Self {
                kind,
                magic: MG2_MAGIC,
                header_skip: 0,
                layout: RecordLayout::FixedStride { stride: 24 },
                packing: TextPacking::IndexedAlphabet,
                has_cross_refs: false,
            },
        }
    }
}
