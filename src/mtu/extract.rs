//! Extraction orchestration and the portable "MTUX" artifact.
//!
//! `extract` drives the full pipeline for one blob: decode records per the
//! schema, normalize and sort headwords, resolve synonym groups into
//! [`EntryId`] cross-references, and build the index. `export`/`load`
//! serialize the result as a versioned container so downstream consumers
//! (the GUI shell, repeated runs) never re-touch the legacy binary.
//!
//! Artifact layout:
//!
//! ```text
//! "MTUX"  magic
//! u16 BE  format version (currently 1)
//! u8      dictionary kind tag
//! u32 BE  entry count
//! u32 BE  compressed payload length
//! ...     Zlib-compressed entry stream
//! u32 BE  Adler-32 of the decompressed entry stream
//! ```
//!
//! The entry stream stores entries in collation order, so the u32
//! cross-reference ids it contains are positions in the stream itself.

use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use adler32::adler32;
use byteorder::{BigEndian, WriteBytesExt};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::{debug, info};

use super::cursor::Cursor;
use super::decoder;
use super::error::{MtuError, Result};
use super::index::{DictionaryIndex, Entry, EntryId};
use super::normalize::{collate, normalize};
use super::schema::{DictionaryKind, FormatSchema};

const ARTIFACT_MAGIC: &[u8; 4] = b"MTUX";
const ARTIFACT_VERSION: u16 = 1;

/// Decode a legacy blob and build its dictionary index.
///
/// # Errors
/// Any decoding failure from the pipeline; see [`MtuError`]. A failure here
/// affects only this blob; other dictionary kinds extract independently.
pub fn extract(blob: &[u8], schema: &FormatSchema) -> Result<DictionaryIndex> {
    let records = decoder::decode_records(blob, schema)?;

    // Sort records into collation order first so group resolution hands the
    // index builder ids that are already final positions.
    let normalized: Vec<String> = records.iter().map(|r| normalize(&r.headword)).collect();
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| collate(&normalized[a], &normalized[b]));

    let mut groups: HashMap<u16, Vec<u32>> = HashMap::new();
    for (pos, &old) in order.iter().enumerate() {
        if let Some(group) = records[old].group_id {
            groups.entry(group).or_default().push(pos as u32);
        }
    }
    if !groups.is_empty() {
        debug!("Resolved {} synonym groups", groups.len());
    }

    let mut entries = Vec::with_capacity(records.len());
    for (pos, &old) in order.iter().enumerate() {
        let record = &records[old];
        let cross_refs = match record.group_id {
            Some(group) => groups[&group]
                .iter()
                .copied()
                .filter(|&id| id != pos as u32)
                .map(EntryId)
                .collect(),
            None => Vec::new(),
        };
        entries.push(Entry::new(
            record.headword.clone(),
            record.senses.clone(),
            cross_refs,
        ));
    }

    DictionaryIndex::build(schema.kind, entries)
}

/// One-shot read of a legacy file followed by [`extract`].
///
/// The shipped blobs are tens of kilobytes to low megabytes, so the whole
/// file is loaded before decoding begins; there is no streaming path.
pub fn extract_file(path: impl AsRef<Path>, schema: &FormatSchema) -> Result<DictionaryIndex> {
    let path = path.as_ref();
    info!("Extracting {} from {}", schema.kind, path.display());
    let blob = fs::read(path)?;
    extract(&blob, schema)
}

/// Serialize an index to the artifact format.
pub fn export(index: &DictionaryIndex, writer: &mut impl Write) -> Result<()> {
    let payload = encode_entries(index)?;
    let checksum = adler32(&payload[..])?;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&payload)?;
    let compressed = encoder.finish()?;
    debug!(
        "Artifact payload: {} bytes, {} compressed",
        payload.len(),
        compressed.len()
    );

    writer.write_all(ARTIFACT_MAGIC)?;
    writer.write_u16::<BigEndian>(ARTIFACT_VERSION)?;
    writer.write_u8(index.kind().tag())?;
    writer.write_u32::<BigEndian>(index.len() as u32)?;
    writer.write_u32::<BigEndian>(compressed.len() as u32)?;
    writer.write_all(&compressed)?;
    writer.write_u32::<BigEndian>(checksum)?;

    info!(
        "Exported {} artifact: {} entries",
        index.kind(),
        index.len()
    );
    Ok(())
}

/// Serialize an index to a file.
pub fn export_file(index: &DictionaryIndex, path: impl AsRef<Path>) -> Result<()> {
    let mut file = fs::File::create(path)?;
    export(index, &mut file)
}

/// Load an exported artifact and rebuild its index.
///
/// # Errors
/// - [`MtuError::UnrecognizedFormat`] on a wrong magic signature
/// - [`MtuError::UnsupportedArtifactVersion`] on a newer or older version
/// - [`MtuError::ChecksumMismatch`] on payload corruption
/// - [`MtuError::CountMismatch`] if the stream disagrees with the header
/// - [`MtuError::DanglingCrossReference`] if the stream references ids
///   outside itself
pub fn load(reader: &mut impl Read) -> Result<DictionaryIndex> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    let mut cursor = Cursor::new(&data);

    let magic = cursor.read_bytes(ARTIFACT_MAGIC.len())?;
    if magic != ARTIFACT_MAGIC {
        return Err(MtuError::UnrecognizedFormat(format!(
            "not an MTUX artifact (magic {:02x?})",
            magic
        )));
    }
    let version = cursor.read_u16_be()?;
    if version != ARTIFACT_VERSION {
        return Err(MtuError::UnsupportedArtifactVersion {
            found: version,
            supported: ARTIFACT_VERSION,
        });
    }
    let kind = DictionaryKind::from_tag(cursor.read_u8()?)?;
    let entry_count = cursor.read_u32_be()? as usize;
    let compressed_len = cursor.read_u32_be()? as usize;
    let compressed = cursor.read_bytes(compressed_len)?;
    let checksum_expected = cursor.read_u32_be()?;

    let mut payload = Vec::new();
    ZlibDecoder::new(compressed)
        .read_to_end(&mut payload)
        .map_err(|e| MtuError::CorruptCompression(format!("artifact payload: {}", e)))?;

    let checksum_actual = adler32(&payload[..])?;
    if checksum_actual != checksum_expected {
        return Err(MtuError::ChecksumMismatch {
            expected: checksum_expected,
            actual: checksum_actual,
        });
    }

    let entries = decode_entries(&payload, entry_count)?;
    info!("Loaded {} artifact: {} entries", kind, entries.len());
    DictionaryIndex::build(kind, entries)
}

/// Load an artifact from a file.
pub fn load_file(path: impl AsRef<Path>) -> Result<DictionaryIndex> {
    let mut file = fs::File::open(path)?;
    load(&mut file)
}

fn encode_entries(index: &DictionaryIndex) -> Result<Vec<u8>> {
    let mut payload = Vec::new();
    for entry in index.entries() {
        write_text(&mut payload, &entry.headword)?;
        let n_senses = checked_count(entry.senses.len(), "senses", payload.len())?;
        payload.write_u16::<BigEndian>(n_senses)?;
        for sense in &entry.senses {
            write_text(&mut payload, sense)?;
        }
        let n_refs = checked_count(entry.cross_refs.len(), "cross-references", payload.len())?;
        payload.write_u16::<BigEndian>(n_refs)?;
        for &EntryId(id) in &entry.cross_refs {
            payload.write_u32::<BigEndian>(id)?;
        }
    }
    Ok(payload)
}

// The stream frames text lengths and per-entry counts as u16; anything
// wider must fail the export rather than truncate into a misframed stream.
fn checked_count(len: usize, what: &str, offset: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| MtuError::MalformedRecord {
        offset,
        reason: format!("{} {} exceed the artifact field limit of 65535", len, what),
    })
}

fn write_text(payload: &mut Vec<u8>, text: &str) -> Result<()> {
    let len = checked_count(text.len(), "text bytes", payload.len())?;
    payload.write_u16::<BigEndian>(len)?;
    payload.write_all(text.as_bytes())?;
    Ok(())
}

fn decode_entries(payload: &[u8], entry_count: usize) -> Result<Vec<Entry>> {
    let mut cursor = Cursor::new(payload);
    let mut entries = Vec::with_capacity(entry_count);
    while !cursor.is_empty() {
        let headword = read_text(&mut cursor)?;
        let n_senses = cursor.read_u16_be()? as usize;
        let mut senses = Vec::with_capacity(n_senses);
        for _ in 0..n_senses {
            senses.push(read_text(&mut cursor)?);
        }
        let n_refs = cursor.read_u16_be()? as usize;
        let mut cross_refs = Vec::with_capacity(n_refs);
        for _ in 0..n_refs {
            cross_refs.push(EntryId(cursor.read_u32_be()?));
        }
        entries.push(Entry::new(headword, senses, cross_refs));
    }

    if entries.len() != entry_count {
        return Err(MtuError::CountMismatch {
            item_type: "artifact entries",
            expected: entry_count as u64,
            found: entries.len() as u64,
        });
    }
    Ok(entries)
}

fn read_text(cursor: &mut Cursor<'_>) -> Result<String> {
    let len = cursor.read_u16_be()? as usize;
    let offset = cursor.position();
    let bytes = cursor.read_bytes(len)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| MtuError::MalformedRecord {
        offset,
        reason: "artifact text is not valid UTF-8".to_string(),
    })
}
