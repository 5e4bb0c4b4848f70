//! End-to-end extraction tests over synthesized legacy blobs.

mod common;

use common::{build_mg2, build_trk, trk_bucket, Mg2Record, TrkEntry};
use mtu_dict::mtu::extract::{export, extract, load};
use mtu_dict::{export_file, load_file, DictionaryKind, Entry, EntryId, FormatSchema, MtuError};

fn en_tr() -> FormatSchema {
    FormatSchema::for_kind(DictionaryKind::EnglishTurkish)
}

fn tr_en() -> FormatSchema {
    FormatSchema::for_kind(DictionaryKind::TurkishEnglish)
}

/// The canonical TRK fixture: exercises plain entries, capitalization,
/// chaining onto the previous headword, suffix substitution, multi-sense
/// splitting, backtick apostrophes, CP 857 high-half letters and the
/// sense-offset-0 corrupt form.
fn trk_fixture() -> Vec<u8> {
    build_trk(&[
        // "ab" bucket: abandon -> ["terk etmek", "bırakmak"] (ı = 0x8D)
        TrkEntry {
            bucket: trk_bucket(b"ab"),
            instruction: 0x00,
            suffix_param: 0,
            morpheme: b"andon",
            senses: &[b"terk etmek", b"b\x8Drakmak"],
        },
        // absorbability = "ab" + "sorb" + suffix[0] ("ability")
        TrkEntry {
            bucket: trk_bucket(b"ab"),
            instruction: 0x80,
            suffix_param: 0,
            morpheme: b"sorb",
            senses: &[b"emicilik"],
        },
        // absorbent = "ab" + first 4 chars of previous ("sorb") + "ent"
        TrkEntry {
            bucket: trk_bucket(b"ab"),
            instruction: 0x44,
            suffix_param: 0,
            morpheme: b"ent",
            senses: &[b"emici"],
        },
        // "ae" bucket: the shipped data's corrupt "aeze" has sense offset 0
        TrkEntry {
            bucket: trk_bucket(b"ae"),
            instruction: 0x00,
            suffix_param: 0,
            morpheme: b"ze",
            senses: &[],
        },
        // "an" bucket: capitalized entry, apostrophe stored as backtick,
        // "Ankara'nın şehri"-style text with ş = 0x9F
        TrkEntry {
            bucket: trk_bucket(b"an"),
            instruction: 0x20,
            suffix_param: 0,
            morpheme: b"kara",
            senses: &[b"T\x81rkiye`nin ba\x9F\x9Fehri"],
        },
    ])
}

#[test]
fn trk_morpheme_expansion_and_senses() {
    let blob = trk_fixture();
    let index = extract(&blob, &en_tr()).expect("extract trk");

    assert_eq!(index.len(), 5);
    let headwords: Vec<&str> = index.entries().iter().map(|e| e.headword.as_str()).collect();
    assert_eq!(
        headwords,
        ["abandon", "absorbability", "absorbent", "aeze", "Ankara"]
    );

    let (_, abandon) = index.exact("abandon").expect("abandon present");
    assert_eq!(abandon.senses, ["terk etmek", "bırakmak"]);

    let (_, absorbent) = index.exact("absorbent").expect("absorbent present");
    assert_eq!(absorbent.senses, ["emici"]);

    let (_, ankara) = index.exact("ankara").expect("Ankara present via fold");
    assert_eq!(ankara.headword, "Ankara");
    assert_eq!(ankara.senses, ["Türkiye'nin başşehri"]);

    let (_, corrupt) = index.exact("aeze").expect("corrupt entry kept");
    assert!(corrupt.senses.is_empty(), "sense offset 0 decodes to no senses");
}

#[test]
fn trk_unknown_instruction_is_malformed() {
    let blob = build_trk(&[TrkEntry {
        bucket: 0,
        instruction: 0x13,
        suffix_param: 0,
        morpheme: b"x",
        senses: &[b"y"],
    }]);
    match extract(&blob, &en_tr()) {
        Err(MtuError::MalformedRecord { offset, .. }) => {
            // First record starts right after the 3-byte header + prefix map.
            assert_eq!(offset, 3 + common::TRK_BUCKETS * 3);
        }
        other => panic!("expected MalformedRecord, got {:?}", other.map(|i| i.len())),
    }
}

#[test]
fn trk_suffix_index_out_of_range_is_corrupt_compression() {
    let blob = build_trk(&[TrkEntry {
        bucket: 0,
        instruction: 0x80,
        suffix_param: 0xFF,
        morpheme: b"x",
        senses: &[b"y"],
    }]);
    assert!(matches!(
        extract(&blob, &en_tr()),
        Err(MtuError::CorruptCompression(_))
    ));
}

#[test]
fn trk_chain_beyond_previous_is_corrupt_compression() {
    // First record of the blob chains 15 chars, but there is no previous
    // headword yet.
    let blob = build_trk(&[TrkEntry {
        bucket: 0,
        instruction: 0x4F,
        suffix_param: 0,
        morpheme: b"x",
        senses: &[b"y"],
    }]);
    assert!(matches!(
        extract(&blob, &en_tr()),
        Err(MtuError::CorruptCompression(_))
    ));
}

#[test]
fn trk_truncation_never_reads_past_the_blob() {
    let blob = trk_fixture();
    for cut in 0..blob.len() {
        let err = extract(&blob[..cut], &en_tr()).expect_err("truncated blob must fail");
        assert!(
            matches!(
                err,
                MtuError::TruncatedInput { .. } | MtuError::MalformedRecord { .. }
            ),
            "cut at {} produced unexpected error: {}",
            cut,
            err
        );
    }
}

#[test]
fn mg2_fixed_stride_decodes() {
    let blob = build_mg2(
        64,
        &[
            Mg2Record {
                headword: "kedi",
                senses: &["cat"],
                group_id: None,
            },
            Mg2Record {
                headword: "köpek",
                senses: &["dog", "hound"],
                group_id: None,
            },
        ],
    );
    let index = extract(&blob, &tr_en()).expect("extract mg2");

    assert_eq!(index.len(), 2);
    let (_, kedi) = index.exact("kedi").unwrap();
    assert_eq!(kedi.senses, ["cat"]);
    let (_, kopek) = index.exact("köpek").unwrap();
    assert_eq!(kopek.senses, ["dog", "hound"]);
}

#[test]
fn mg2_magic_mismatch_is_unrecognized() {
    let mut blob = build_mg2(64, &[]);
    blob[0] ^= 0xFF;
    assert!(matches!(
        extract(&blob, &tr_en()),
        Err(MtuError::UnrecognizedFormat(_))
    ));
}

#[test]
fn mg2_zero_headword_is_malformed() {
    let mut blob = build_mg2(
        64,
        &[Mg2Record {
            headword: "kedi",
            senses: &[],
            group_id: None,
        }],
    );
    // Zero out the headword length byte (right after magic + count).
    blob[6] = 0;
    assert!(matches!(
        extract(&blob, &tr_en()),
        Err(MtuError::MalformedRecord { .. })
    ));
}

#[test]
fn mg2_record_overflowing_stride_is_malformed() {
    let mut blob = build_mg2(
        64,
        &[
            Mg2Record {
                headword: "kedi",
                senses: &[],
                group_id: None,
            },
            Mg2Record {
                headword: "köpek",
                senses: &[],
                group_id: None,
            },
        ],
    );
    // Inflate the first record's headword length so its fields span past
    // the 64-byte stride (into the second record, still inside the blob).
    blob[6] = 70;
    assert!(matches!(
        extract(&blob, &tr_en()),
        Err(MtuError::MalformedRecord { .. })
    ));
}

#[test]
fn mg2_unmapped_alphabet_byte_is_invalid_code_unit() {
    let mut blob = build_mg2(
        64,
        &[Mg2Record {
            headword: "kedi",
            senses: &[],
            group_id: None,
        }],
    );
    // Byte 33 is one of the unassigned gaps in the indexed alphabet.
    blob[7] = 33;
    match extract(&blob, &tr_en()) {
        Err(MtuError::InvalidCodeUnit { byte, offset }) => {
            assert_eq!(byte, 33);
            assert_eq!(offset, 7);
        }
        other => panic!("expected InvalidCodeUnit, got {:?}", other.map(|i| i.len())),
    }
}

#[test]
fn synonym_groups_become_cross_references() {
    let schema = FormatSchema::for_kind(DictionaryKind::Synonyms);
    let blob = build_mg2(
        96,
        &[
            Mg2Record {
                headword: "otomobil",
                senses: &[],
                group_id: Some(7),
            },
            Mg2Record {
                headword: "taşıt",
                senses: &[],
                group_id: Some(9),
            },
            Mg2Record {
                headword: "araba",
                senses: &[],
                group_id: Some(7),
            },
        ],
    );
    let index = extract(&blob, &schema).expect("extract synonyms");

    let (araba_id, araba) = index.exact("araba").unwrap();
    let (oto_id, oto) = index.exact("otomobil").unwrap();
    let (_, tasit) = index.exact("taşıt").unwrap();

    assert_eq!(araba.cross_refs, [oto_id]);
    assert_eq!(oto.cross_refs, [araba_id]);
    assert!(tasit.cross_refs.is_empty(), "singleton group has no refs");

    // Following a cross-reference lands on the other group member.
    let linked = index.by_id(araba.cross_refs[0]).unwrap();
    assert_eq!(linked.headword, "otomobil");
}

#[test]
fn hangman_word_list_has_no_senses() {
    let schema = FormatSchema::for_kind(DictionaryKind::Hangman);
    let blob = build_mg2(
        24,
        &[
            Mg2Record {
                headword: "zürafa",
                senses: &[],
                group_id: None,
            },
            Mg2Record {
                headword: "fil",
                senses: &[],
                group_id: None,
            },
        ],
    );
    let index = extract(&blob, &schema).expect("extract hangman");
    assert_eq!(index.len(), 2);
    assert!(index.entries().iter().all(|e| e.senses.is_empty()));
}

#[test]
fn dangling_cross_reference_is_rejected_at_build() {
    use mtu_dict::DictionaryIndex;

    let entries = vec![
        Entry::new("kedi", vec!["cat".to_string()], vec![EntryId(5)]),
        Entry::new("köpek", vec!["dog".to_string()], Vec::new()),
    ];
    match DictionaryIndex::build(DictionaryKind::Synonyms, entries) {
        Err(MtuError::DanglingCrossReference { id }) => assert_eq!(id, 5),
        other => panic!("expected DanglingCrossReference, got {:?}", other.map(|i| i.len())),
    }
}

#[test]
fn artifact_round_trip_preserves_everything() {
    let index = extract(&trk_fixture(), &en_tr()).expect("extract");

    let mut artifact = Vec::new();
    export(&index, &mut artifact).expect("export");
    let reloaded = load(&mut artifact.as_slice()).expect("load");

    assert_eq!(reloaded.kind(), index.kind());
    assert_eq!(reloaded.len(), index.len());
    for (a, b) in index.entries().iter().zip(reloaded.entries()) {
        assert_eq!(a.headword, b.headword);
        assert_eq!(a.normalized, b.normalized);
        assert_eq!(a.senses, b.senses);
        assert_eq!(a.cross_refs, b.cross_refs);
    }
}

#[test]
fn artifact_round_trip_through_a_file() {
    let schema = FormatSchema::for_kind(DictionaryKind::Synonyms);
    let blob = build_mg2(
        96,
        &[
            Mg2Record {
                headword: "ev",
                senses: &[],
                group_id: Some(1),
            },
            Mg2Record {
                headword: "konut",
                senses: &[],
                group_id: Some(1),
            },
        ],
    );
    let index = extract(&blob, &schema).expect("extract");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("syn.mtux");
    export_file(&index, &path).expect("export file");

    let reloaded = load_file(&path).expect("load file");
    assert_eq!(reloaded.len(), 2);
    let (_, ev) = reloaded.exact("ev").unwrap();
    assert_eq!(reloaded.by_id(ev.cross_refs[0]).unwrap().headword, "konut");
}

#[test]
fn artifact_version_and_magic_are_enforced() {
    let index = extract(&trk_fixture(), &en_tr()).expect("extract");
    let mut artifact = Vec::new();
    export(&index, &mut artifact).expect("export");

    let mut wrong_version = artifact.clone();
    wrong_version[5] = 0x63; // version u16 BE sits at bytes 4..6
    match load(&mut wrong_version.as_slice()) {
        Err(MtuError::UnsupportedArtifactVersion { found, supported }) => {
            assert_eq!(found, 0x63);
            assert_eq!(supported, 1);
        }
        other => panic!("expected version error, got {:?}", other.map(|i| i.len())),
    }

    let mut wrong_magic = artifact;
    wrong_magic[0] = b'X';
    assert!(matches!(
        load(&mut wrong_magic.as_slice()),
        Err(MtuError::UnrecognizedFormat(_))
    ));
}

#[test]
fn artifact_checksum_corruption_is_detected() {
    let index = extract(&trk_fixture(), &en_tr()).expect("extract");
    let mut artifact = Vec::new();
    export(&index, &mut artifact).expect("export");

    // The trailing 4 bytes are the Adler-32 of the decompressed payload.
    let last = artifact.len() - 1;
    artifact[last] ^= 0xFF;
    assert!(matches!(
        load(&mut artifact.as_slice()),
        Err(MtuError::ChecksumMismatch { .. })
    ));
}

#[test]
fn artifact_export_rejects_text_over_the_u16_frame() {
    use mtu_dict::DictionaryIndex;

    // 30000 chars of a 3-byte code point: 90000 UTF-8 bytes, past the u16
    // length field. Export must fail rather than truncate the frame.
    let long_sense = "░".repeat(30_000);
    let entries = vec![Entry::new("kedi", vec![long_sense], Vec::new())];
    let index = DictionaryIndex::build(DictionaryKind::TurkishEnglish, entries).expect("build");

    let mut artifact = Vec::new();
    match export(&index, &mut artifact) {
        Err(MtuError::MalformedRecord { .. }) => {}
        other => panic!("expected MalformedRecord, got {:?}", other),
    }
}

#[test]
fn independent_kinds_extract_in_parallel() {
    let trk = trk_fixture();
    let mg2 = build_mg2(
        64,
        &[Mg2Record {
            headword: "kedi",
            senses: &["cat"],
            group_id: None,
        }],
    );

    std::thread::scope(|scope| {
        let a = scope.spawn(|| extract(&trk, &en_tr()).expect("trk").len());
        let b = scope.spawn(|| extract(&mg2, &tr_en()).expect("mg2").len());
        assert_eq!(a.join().unwrap(), 5);
        assert_eq!(b.join().unwrap(), 1);
    });
}
