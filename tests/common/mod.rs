//! Fixture builders that synthesize format-conformant legacy blobs.
//!
//! No real MTU binaries ship with the repository, so the tests build blobs
//! byte by byte following the same layouts the decoder expects: the TRK
//! prefix-chained layout and the MG2 fixed-stride layout.

#![allow(dead_code)]

use mtu_dict::mtu::schema::MG2_MAGIC;

pub const TRK_BUCKETS: usize = 26 * 26;

/// One entry for the TRK builder. `morpheme` and `senses` are raw CP 857
/// bytes; an empty `senses` list produces the sense-offset-0 form the
/// shipped data uses for its corrupt entries.
pub struct TrkEntry {
    pub bucket: usize,
    pub instruction: u8,
    pub suffix_param: u8,
    pub morpheme: &'static [u8],
    pub senses: &'static [&'static [u8]],
}

/// Bucket index for a two-letter ASCII prefix, e.g. `trk_bucket(b"ab")`.
pub fn trk_bucket(prefix: &[u8; 2]) -> usize {
    (prefix[0] - b'a') as usize * 26 + (prefix[1] - b'a') as usize
}

/// Assemble a TRK-layout blob: 3 empty header bytes, 676 3-byte LE bucket
/// end offsets, the morpheme-coded headword section, then the sense-text
/// section referenced through middle-endian offsets.
///
/// Entries must be given in ascending bucket order.
pub fn build_trk(entries: &[TrkEntry]) -> Vec<u8> {
    let headword_len: usize = entries
        .iter()
        .map(|e| {
            1 + usize::from(e.instruction >= 0x80) + e.morpheme.len() + 1 + 3 // inst + param + text + 0xFF + offset
        })
        .sum();

    let mut headwords: Vec<u8> = Vec::new();
    let mut sense_section: Vec<u8> = Vec::new();
    let mut bucket_ends = vec![0u32; TRK_BUCKETS];

    let mut cursor = 0usize;
    for bucket in 0..TRK_BUCKETS {
        while cursor < entries.len() && entries[cursor].bucket == bucket {
            let e = &entries[cursor];
            headwords.push(e.instruction);
            if e.instruction >= 0x80 {
                headwords.push(e.suffix_param);
            }
            headwords.extend_from_slice(e.morpheme);
            headwords.push(0xFF);

            let sense_offset = if e.senses.is_empty() {
                0u32
            } else {
                let offset = (headword_len + sense_section.len()) as u32;
                let mut joined: Vec<u8> = Vec::new();
                for (i, sense) in e.senses.iter().enumerate() {
                    if i > 0 {
                        joined.push(0xFF); // CP 857 sense separator
                    }
                    joined.extend_from_slice(sense);
                }
                sense_section.extend_from_slice(&(joined.len() as u16).to_le_bytes());
                sense_section.extend_from_slice(&joined);
                offset
            };
            // Middle-endian: high byte first, then low, then mid.
            headwords.push(((sense_offset >> 16) & 0xFF) as u8);
            headwords.push((sense_offset & 0xFF) as u8);
            headwords.push(((sense_offset >> 8) & 0xFF) as u8);
            cursor += 1;
        }
        bucket_ends[bucket] = headwords.len() as u32;
    }
    assert_eq!(cursor, entries.len(), "TRK entries must be in bucket order");

    let mut blob = vec![0u8, 0, 0];
    for end in bucket_ends {
        blob.push((end & 0xFF) as u8);
        blob.push(((end >> 8) & 0xFF) as u8);
        blob.push(((end >> 16) & 0xFF) as u8);
    }
    blob.extend_from_slice(&headwords);
    blob.extend_from_slice(&sense_section);
    blob
}

/// Encode text into the MG2 indexed alphabet.
pub fn mg2_encode(text: &str) -> Vec<u8> {
    const BASE: &str = "abcçdefgğhıijklmnoöpqrsştuüvwxyz";
    text.chars()
        .map(|c| match BASE.chars().position(|a| a == c) {
            Some(i) => i as u8,
            None => match c {
                'â' => 32,
                'î' => 43,
                'û' => 58,
                other => panic!("char {:?} not in the MG2 alphabet", other),
            },
        })
        .collect()
}

/// One record for the MG2 builder. Text is given as `&str` and encoded into
/// the indexed alphabet.
pub struct Mg2Record {
    pub headword: &'static str,
    pub senses: &'static [&'static str],
    pub group_id: Option<u16>,
}

/// Assemble an MG2-layout blob: magic, u16 LE record count, fixed-stride
/// records zero-padded to `stride`.
pub fn build_mg2(stride: usize, records: &[Mg2Record]) -> Vec<u8> {
    let mut blob = MG2_MAGIC.to_vec();
    blob.extend_from_slice(&(records.len() as u16).to_le_bytes());
    for record in records {
        let start = blob.len();
        let hw = mg2_encode(record.headword);
        blob.push(hw.len() as u8);
        blob.extend_from_slice(&hw);
        blob.push(record.senses.len() as u8);
        for sense in record.senses {
            let bytes = mg2_encode(sense);
            blob.extend_from_slice(&(bytes.len() as u16).to_le_bytes());
            blob.extend_from_slice(&bytes);
        }
        if let Some(group) = record.group_id {
            blob.extend_from_slice(&group.to_le_bytes());
        }
        let used = blob.len() - start;
        assert!(used <= stride, "fixture record exceeds stride");
        blob.resize(start + stride, 0);
    }
    blob
}
