use std::io::Cursor;

use miette::Result;
use pretty_assertions::{assert_eq, assert_str_eq};
use rdx_io::{align_up, CollectedDiagnostics, MemorySideFiles, SideFiles};
use rdx_resource::{
    error::Error, Language, Placement, Platform, RdxArchive, RdxExtractOptions,
};
use tracing_test::traced_test;

mod fixture;

use fixture::{block, resource, table, ENGLISH_TEXT, TEXTURE_BLOCK, UNKNOWN_BLOCK};

fn u32_at(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
}

fn u32_be_at(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes(data[offset..offset + 4].try_into().unwrap())
}

fn extract(platform: Platform, data: &[u8]) -> Result<MemorySideFiles> {
    let mut rdx = RdxArchive::new(Cursor::new(data.to_vec()), platform)?;
    let mut files = MemorySideFiles::new();
    let mut sink = CollectedDiagnostics::new();
    rdx.extract_to_side_files(
        &mut files,
        Some(&table()),
        &RdxExtractOptions::default(),
        &mut sink,
    )?;
    Ok(files)
}

#[test]
fn unedited_resource_round_trips() -> Result<()> {
    for platform in [Platform::Dreamcast, Platform::GameCube, Platform::PlayStation2] {
        let original = resource(platform, true);
        let files = extract(platform, &original)?;

        let mut rdx = RdxArchive::new(Cursor::new(original.clone()), platform)?;
        let mut sink = CollectedDiagnostics::new();
        let placements = rdx.insert_from_side_files(&files, Some(&table()), &mut sink)?;

        assert_eq!(
            placements,
            vec![
                (Language::Japanese, Placement::Unchanged),
                (Language::English, Placement::Unchanged),
            ]
        );
        assert_str_eq!(
            format!("{:02X?}", rdx.into_inner().into_inner()),
            format!("{:02X?}", original)
        );
    }

    Ok(())
}

#[test]
fn shorter_text_is_written_in_place() -> Result<()> {
    let original = resource(Platform::PlayStation2, true);
    let mut rdx = RdxArchive::new(Cursor::new(original.clone()), Platform::PlayStation2)?;
    let mut sink = CollectedDiagnostics::new();

    let placement = rdx.insert_text(Language::Japanese, &block(&["C"]), &table(), &mut sink)?;
    assert_eq!(placement, Placement::InPlace);

    let data = rdx.into_inner().into_inner();
    #[rustfmt::skip]
    let expected_text: [u8; 14] = [
        0x01, 0x00, 0x00, 0x00,
        0x08, 0x00, 0x00, 0x00,
        0x43, 0x00, 0xFF, 0xFF,
        0xFE, 0xFF,
    ];
    assert_eq!(&data[0x100..0x10E], &expected_text[..]);
    assert!(data[0x10E..0x120].iter().all(|byte| *byte == 0));
    assert_eq!(&data[..0x100], &original[..0x100]);
    assert_eq!(&data[0x120..], &original[0x120..]);

    Ok(())
}

#[test]
#[traced_test]
fn longer_text_moves_the_texture_block() -> Result<()> {
    let original = resource(Platform::PlayStation2, true);
    let mut rdx = RdxArchive::new(Cursor::new(original.clone()), Platform::PlayStation2)?;
    let mut sink = CollectedDiagnostics::new();

    let text = block(&["ABCABCABCABCABC"]);
    let encoded = text.to_bytes(binrw::Endian::Little, &table(), &mut sink)?;
    let text_len = encoded.len() as u64;
    assert_eq!(text_len, 0x2A);

    let placement = rdx.insert_text(Language::English, &text, &table(), &mut sink)?;
    let moved_to = align_up(u64::from(TEXTURE_BLOCK) + text_len, 0x20);
    let delta = (moved_to - u64::from(TEXTURE_BLOCK)) as u32;
    assert_eq!(
        placement,
        Placement::Relocated {
            text: 0x160,
            textures: 0x1A0
        }
    );
    assert_eq!(moved_to, 0x1A0);

    let data = rdx.into_inner().into_inner();
    assert_eq!(data.len(), 0x1A0 + original.len() - 0x160);

    // header and sub-block table
    assert_eq!(u32_at(&data, 0x08), UNKNOWN_BLOCK);
    assert_eq!(u32_at(&data, 0x14), 0x1A0);
    assert_eq!(u32_at(&data, 0x38 + 2 * 4), TEXTURE_BLOCK);
    assert_eq!(u32_at(&data, 0x38), 0x100);

    // old sub-block cleared, text written where the textures were
    assert!(data[ENGLISH_TEXT as usize..UNKNOWN_BLOCK as usize]
        .iter()
        .all(|byte| *byte == 0));
    assert_eq!(&data[0x160..0x18A], &encoded[..]);
    assert!(data[0x18A..0x1A0].iter().all(|byte| *byte == 0));

    // every texture pointer moved by the same delta
    for (slot, old) in [(0usize, 0x180u32), (1, 0), (2, 0x1A4)] {
        let expected = if old == 0 { 0 } else { old + delta };
        assert_eq!(u32_at(&data, 0x1A4 + 4 * slot), expected);
    }
    assert_eq!(&data[0x1B0..], &original[0x170..]);

    let mut rdx = RdxArchive::new(Cursor::new(data), Platform::PlayStation2)?;
    assert_eq!(rdx.text(Language::English, &table(), &mut sink)?, Some(text));
    assert_eq!(rdx.text(Language::Japanese, &table(), &mut sink)?, Some(block(&["AB"])));
    assert_eq!(
        rdx.texture_spans()?,
        vec![Some((0x1C0, 0x24)), None, Some((0x1E4, 0x24))]
    );
    assert!(sink.is_empty());
    assert!(logs_contain("english text did not fit its sub-block"));

    Ok(())
}

#[test]
fn big_endian_pointers_are_patched() -> Result<()> {
    let original = resource(Platform::GameCube, true);
    let mut rdx = RdxArchive::new(Cursor::new(original), Platform::GameCube)?;
    let mut sink = CollectedDiagnostics::new();

    let text = block(&["ABCABCABCABCABC"]);
    let placement = rdx.insert_text(Language::English, &text, &table(), &mut sink)?;
    assert_eq!(
        placement,
        Placement::Relocated {
            text: 0x160,
            textures: 0x1A0
        }
    );

    let data = rdx.into_inner().into_inner();
    assert_eq!(u32_be_at(&data, 0x14), 0x1A0);
    assert_eq!(u32_be_at(&data, 0x38 + 4), 0x160);
    assert_eq!(u32_be_at(&data, 0x1A0), 3);
    assert_eq!(u32_be_at(&data, 0x1A4), 0x1C0);
    assert_eq!(u32_be_at(&data, 0x1AC), 0x1E4);

    let mut rdx = RdxArchive::new(Cursor::new(data), Platform::GameCube)?;
    assert_eq!(rdx.text(Language::English, &table(), &mut sink)?, Some(text));

    Ok(())
}

#[test]
fn longer_text_without_textures_is_appended() -> Result<()> {
    let original = resource(Platform::PlayStation2, false);
    assert_eq!(original.len(), 0x160);
    let mut rdx = RdxArchive::new(Cursor::new(original), Platform::PlayStation2)?;
    let mut sink = CollectedDiagnostics::new();

    let text = block(&["ABCABCABCABCABC"]);
    let placement = rdx.insert_text(Language::English, &text, &table(), &mut sink)?;
    assert_eq!(placement, Placement::Appended { text: 0x160 });
    assert_eq!(rdx.len(), 0x18A);

    let data = rdx.into_inner().into_inner();
    assert_eq!(u32_at(&data, 0x38 + 2 * 4), 0x160);
    assert_eq!(u32_at(&data, 0x14), 0);

    let mut rdx = RdxArchive::new(Cursor::new(data), Platform::PlayStation2)?;
    assert_eq!(rdx.text(Language::English, &table(), &mut sink)?, Some(text));

    Ok(())
}

#[test]
fn missing_language_gets_a_sub_block() -> Result<()> {
    let mut rdx = RdxArchive::new(
        Cursor::new(resource(Platform::PlayStation2, true)),
        Platform::PlayStation2,
    )?;
    let mut sink = CollectedDiagnostics::new();

    let text = block(&["A"]);
    let placement = rdx.insert_text(Language::Italian, &text, &table(), &mut sink)?;
    assert_eq!(
        placement,
        Placement::Relocated {
            text: 0x160,
            textures: 0x180
        }
    );
    assert_eq!(rdx.sub_block_pointers()[10], 0x160);
    assert_eq!(rdx.text(Language::Italian, &table(), &mut sink)?, Some(text));

    Ok(())
}

#[test]
fn edited_side_files_are_inserted() -> Result<()> {
    let original = resource(Platform::PlayStation2, true);
    let mut files = extract(Platform::PlayStation2, &original)?;
    files.write(
        "text/english.txt",
        b"ABCABCABCABCABC\r\n[TEXT END]------------------------------\r\n[BLOCK END]------------------------------\r\n",
    )?;

    let mut rdx = RdxArchive::new(Cursor::new(original), Platform::PlayStation2)?;
    let mut sink = CollectedDiagnostics::new();
    let placements = rdx.insert_from_side_files(&files, Some(&table()), &mut sink)?;
    assert_eq!(
        placements,
        vec![
            (Language::Japanese, Placement::Unchanged),
            (
                Language::English,
                Placement::Relocated {
                    text: 0x160,
                    textures: 0x1A0
                }
            ),
        ]
    );

    let relocated = extract(Platform::PlayStation2, &rdx.into_inner().into_inner())?;
    for name in files.names() {
        if name != "text/english.txt" {
            assert_eq!(relocated.get(name), files.get(name), "{name}");
        }
    }

    Ok(())
}

#[test]
fn edited_texture_must_keep_its_size() -> Result<()> {
    let original = resource(Platform::PlayStation2, true);
    let mut files = extract(Platform::PlayStation2, &original)?;

    let mut metadata: serde_json::Value =
        serde_json::from_slice(&files.read("textures/0002/metadata.json")?).unwrap();
    metadata["Items"][0]["Data"] = "AA==".into();
    files.write(
        "textures/0002/metadata.json",
        &serde_json::to_vec(&metadata).unwrap(),
    )?;

    let mut rdx = RdxArchive::new(Cursor::new(original), Platform::PlayStation2)?;
    let result = rdx.insert_textures(&files);
    assert!(matches!(
        result,
        Err(Error::SizeMismatch {
            index: 2,
            expected: 0x24,
            actual: 5
        })
    ));

    Ok(())
}

#[test]
fn stale_texture_index() -> Result<()> {
    let original = resource(Platform::PlayStation2, true);
    let mut files = extract(Platform::PlayStation2, &original)?;
    files.write(
        "textures/textures.json",
        br#"{"Textures":[{"Directory":"0000","Size":36}]}"#,
    )?;

    let mut rdx = RdxArchive::new(Cursor::new(original), Platform::PlayStation2)?;
    let result = rdx.insert_textures(&files);
    assert!(matches!(
        result,
        Err(Error::TextureCountMismatch {
            expected: 1,
            actual: 3
        })
    ));

    Ok(())
}

#[test]
fn text_requires_a_table() -> Result<()> {
    let original = resource(Platform::PlayStation2, true);
    let files = extract(Platform::PlayStation2, &original)?;

    let mut rdx = RdxArchive::new(Cursor::new(original), Platform::PlayStation2)?;
    let mut sink = CollectedDiagnostics::new();
    let result = rdx.insert_from_side_files(&files, None, &mut sink);
    assert!(matches!(result, Err(Error::TableRequired)));

    Ok(())
}

#[test]
fn text_side_file_must_be_utf8() -> Result<()> {
    let original = resource(Platform::Dreamcast, true);
    let mut files = extract(Platform::Dreamcast, &original)?;
    files.write("text/english.txt", &[0x43, 0xC3, 0x28])?;

    let mut rdx = RdxArchive::new(Cursor::new(original), Platform::Dreamcast)?;
    let mut sink = CollectedDiagnostics::new();
    let result = rdx.insert_from_side_files(&files, Some(&table()), &mut sink);
    assert!(matches!(
        result,
        Err(Error::InvalidUtf8 { name, .. }) if name == "text/english.txt"
    ));

    Ok(())
}
