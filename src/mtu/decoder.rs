//! Schema-driven decoding of raw dictionary blobs into records.
//!
//! The walkers here know nothing about any particular dictionary kind; the
//! [`FormatSchema`] declares the layout and packing and the walker follows
//! it. A record whose computed span leaves the blob (or its stride) is
//! flagged with [`MtuError::MalformedRecord`] rather than skipped, since
//! those failures are the primary signal used when refining the
//! reverse-engineered schemas.

use log::{debug, info};

use super::codec::{self, MorphemeOp};
use super::cursor::Cursor;
use super::error::{MtuError, Result};
use super::schema::{FormatSchema, RecordLayout, TextPacking};

/// One decoded dictionary record, text already resolved through the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub headword: String,
    pub senses: Vec<String>,
    /// Synonym group id, for schemas that declare cross-references.
    pub group_id: Option<u16>,
    /// Byte offset of the record in the source blob, for diagnostics.
    pub offset: usize,
}

/// Decode every record in `blob` according to `schema`.
///
/// # Errors
/// - [`MtuError::UnrecognizedFormat`] if the magic signature does not match
/// - [`MtuError::TruncatedInput`] if a read runs off the end of the blob
/// - [`MtuError::MalformedRecord`] if a record violates its declared span
/// - codec errors ([`MtuError::InvalidCodeUnit`], [`MtuError::CorruptCompression`])
pub fn decode_records(blob: &[u8], schema: &FormatSchema) -> Result<Vec<RawRecord>> {
    info!(
        "Decoding {} blob: {} bytes, layout {:?}",
        schema.kind,
        blob.len(),
        schema.layout
    );

    let mut cursor = Cursor::new(blob);

    if !schema.magic.is_empty() {
        let found = cursor.read_bytes(schema.magic.len()).map_err(|_| {
            MtuError::UnrecognizedFormat(format!(
                "blob shorter than the {}-byte magic signature",
                schema.magic.len()
            ))
        })?;
        if found != schema.magic {
            return Err(MtuError::UnrecognizedFormat(format!(
                "magic mismatch: expected {:02x?}, found {:02x?}",
                schema.magic, found
            )));
        }
    }

    let records = match schema.layout {
        RecordLayout::PrefixChained {
            prefix_letters,
            offset_width,
        } => decode_prefix_chained(blob, &mut cursor, schema, prefix_letters, offset_width)?,
        RecordLayout::FixedStride { stride } => decode_fixed_stride(&mut cursor, schema, stride)?,
    };

    info!("Decoded {} records from {} blob", records.len(), schema.kind);
    Ok(records)
}

/// Walk the TRK layout: prefix offset map, then morpheme-coded entries
/// chained per two-letter bucket, senses through middle-endian offsets.
fn decode_prefix_chained(
    blob: &[u8],
    cursor: &mut Cursor<'_>,
    schema: &FormatSchema,
    prefix_letters: usize,
    offset_width: usize,
) -> Result<Vec<RawRecord>> {
    cursor.skip(schema.header_skip)?;

    let bucket_count = prefix_letters * prefix_letters;
    let mut bucket_ends = Vec::with_capacity(bucket_count);
    for _ in 0..bucket_count {
        let end = match offset_width {
            2 => u64::from(cursor.read_u16_le()?),
            3 => u64::from(cursor.read_u24_le()?),
            4 => u64::from(cursor.read_u32_le()?),
            other => {
                return Err(MtuError::UnrecognizedFormat(format!(
                    "unsupported prefix offset width: {}",
                    other
                )))
            }
        };
        bucket_ends.push(end);
    }
    let base_offset = cursor.position();
    debug!(
        "Prefix map read: {} buckets, headword section starts at {:#x}",
        bucket_count, base_offset
    );

    let mut records = Vec::new();
    // Chained state: the previous expanded headword minus its bucket prefix.
    let mut previous = String::new();

    for (bucket, &end) in bucket_ends.iter().enumerate() {
        let bucket_end = base_offset + end as usize;
        if bucket_end > blob.len() {
            return Err(MtuError::MalformedRecord {
                offset: base_offset,
                reason: format!(
                    "bucket {} ends at {:#x}, past blob length {:#x}",
                    bucket,
                    bucket_end,
                    blob.len()
                ),
            });
        }

        while cursor.position() < bucket_end {
            let record_offset = cursor.position();
            let instruction = cursor.read_u8()?;
            // Instructions at and above 0x80 carry a suffix parameter byte.
            let suffix_param = if instruction >= 0x80 {
                cursor.read_u8()?
            } else {
                0
            };
            let op = MorphemeOp::parse(instruction, suffix_param).ok_or_else(|| {
                MtuError::MalformedRecord {
                    offset: record_offset,
                    reason: format!("unknown morpheme instruction {:#04x}", instruction),
                }
            })?;

            let morpheme_offset = cursor.position();
            let morpheme_bytes = cursor.read_until(0xFF)?;
            let morpheme = codec::decode_cp857(morpheme_bytes, morpheme_offset)?;
            let headword =
                codec::expand_morpheme(bucket, prefix_letters, &morpheme, &previous, op)?;
            previous = headword.chars().skip(2).collect();

            let sense_offset = cursor.read_u24_me()?;
            // Offset 0 marks the handful of entries the shipped data ships
            // corrupted; they keep their headword and carry no senses.
            let senses = if sense_offset > 0 {
                read_sense_section(blob, base_offset, sense_offset as usize, record_offset)?
            } else {
                Vec::new()
            };

            if cursor.position() > bucket_end {
                return Err(MtuError::MalformedRecord {
                    offset: record_offset,
                    reason: format!(
                        "record runs to {:#x}, past its bucket end {:#x}",
                        cursor.position(),
                        bucket_end
                    ),
                });
            }

            records.push(RawRecord {
                headword,
                senses,
                group_id: None,
                offset: record_offset,
            });
        }
    }

    Ok(records)
}

/// Resolve one sense span in the trailing text section of a TRK blob.
fn read_sense_section(
    blob: &[u8],
    base_offset: usize,
    sense_offset: usize,
    record_offset: usize,
) -> Result<Vec<String>> {
    let mut cursor = Cursor::new(blob);
    cursor
        .seek(base_offset + sense_offset)
        .map_err(|_| MtuError::MalformedRecord {
            offset: record_offset,
            reason: format!(
                "sense offset {:#x} resolves past blob length {:#x}",
                base_offset + sense_offset,
                blob.len()
            ),
        })?;

    let len = cursor.read_u16_le()? as usize;
    if len == 0 {
        return Ok(Vec::new());
    }
    let text_offset = cursor.position();
    let bytes = cursor.read_bytes(len)?;
    let decoded = codec::decode_cp857(bytes, text_offset)?;
    Ok(codec::split_senses(&decoded))
}

/// Walk the MG2 layout: u16 record count, then fixed-size records.
fn decode_fixed_stride(
    cursor: &mut Cursor<'_>,
    schema: &FormatSchema,
    stride: usize,
) -> Result<Vec<RawRecord>> {
    cursor.skip(schema.header_skip)?;
    let count = cursor.read_u16_le()? as usize;
    debug!("Fixed-stride section: {} records of {} bytes", count, stride);

    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        let record_offset = cursor.position();
        let record_end = record_offset + stride;

        let hw_len = cursor.read_u8()? as usize;
        if hw_len == 0 {
            return Err(MtuError::MalformedRecord {
                offset: record_offset,
                reason: "zero-length headword".to_string(),
            });
        }
        let hw_offset = cursor.position();
        let hw_bytes = cursor.read_bytes(hw_len)?;
        let headword = decode_text(schema.packing, hw_bytes, hw_offset)?;

        let n_senses = cursor.read_u8()? as usize;
        let mut senses = Vec::with_capacity(n_senses);
        for _ in 0..n_senses {
            let len = cursor.read_u16_le()? as usize;
            let offset = cursor.position();
            let bytes = cursor.read_bytes(len)?;
            senses.push(decode_text(schema.packing, bytes, offset)?);
        }

        let group_id = if schema.has_cross_refs {
            Some(cursor.read_u16_le()?)
        } else {
            None
        };

        if cursor.position() > record_end {
            return Err(MtuError::MalformedRecord {
                offset: record_offset,
                reason: format!(
                    "record fields run to {:#x}, past the {}-byte stride",
                    cursor.position(),
                    stride
                ),
            });
        }
        let available = cursor.position() - record_offset + cursor.remaining();
        cursor.seek(record_end).map_err(|_| MtuError::TruncatedInput {
            offset: record_offset,
            needed: stride,
            available,
        })?;

        records.push(RawRecord {
            headword,
            senses,
            group_id,
            offset: record_offset,
        });
    }

    Ok(records)
}

fn decode_text(packing: TextPacking, bytes: &[u8], offset: usize) -> Result<String> {
    match packing {
        TextPacking::Cp857 | TextPacking::Cp857Suffixed => codec::decode_cp857(bytes, offset),
        TextPacking::IndexedAlphabet => codec::decode_indexed(bytes, offset),
    }
}
