use std::io::Cursor;

use miette::Result;
use pretty_assertions::assert_eq;
use rdx_io::{CollectedDiagnostics, MemorySideFiles, SideFiles};
use rdx_resource::{
    error::Error,
    types::{TextureEntry, TextureIndex},
    Language, Platform, RdxArchive, RdxExtractOptions,
};
use tracing_test::traced_test;

mod fixture;

use fixture::{block, resource, table};

#[test]
fn read_header() -> Result<()> {
    let rdx = RdxArchive::new(Cursor::new(resource(Platform::GameCube, true)), Platform::GameCube)?;

    assert_eq!(rdx.header().magic, 6);
    assert_eq!(rdx.header().block_pointers(), [0x38, 0x140, 0, 0, 0x160]);
    assert_eq!(rdx.author_name(), "tester");
    assert_eq!(
        rdx.languages().collect::<Vec<_>>(),
        vec![Language::Japanese, Language::English]
    );
    assert_eq!(rdx.sub_block_pointers().len(), 21);

    Ok(())
}

#[test]
fn read_text_of_every_platform() -> Result<()> {
    let table = table();
    for platform in [Platform::Dreamcast, Platform::GameCube, Platform::PlayStation2] {
        let mut rdx = RdxArchive::new(Cursor::new(resource(platform, true)), platform)?;
        let mut sink = CollectedDiagnostics::new();

        assert_eq!(
            rdx.text(Language::Japanese, &table, &mut sink)?,
            Some(block(&["AB"]))
        );
        assert_eq!(
            rdx.text(Language::English, &table, &mut sink)?,
            Some(block(&["CAB"]))
        );
        assert_eq!(rdx.text(Language::Spanish, &table, &mut sink)?, None);
        assert!(sink.is_empty(), "{platform}: {:?}", *sink);
    }

    Ok(())
}

#[test]
fn language_missing_from_the_platform() -> Result<()> {
    let mut rdx = RdxArchive::new(
        Cursor::new(resource(Platform::Dreamcast, false)),
        Platform::Dreamcast,
    )?;
    let mut sink = CollectedDiagnostics::new();

    let result = rdx.text(Language::Italian, &table(), &mut sink);
    assert!(matches!(
        result,
        Err(Error::UnsupportedLanguage {
            platform: Platform::Dreamcast,
            language: Language::Italian
        })
    ));

    Ok(())
}

#[test]
fn other_platforms_are_skipped() {
    let error = RdxArchive::new(
        Cursor::new(resource(Platform::PlayStation2, true)),
        Platform::GameCube,
    )
    .unwrap_err();

    assert!(matches!(
        error,
        Error::NotAValidContainer {
            platform: Platform::GameCube,
            magic: 0x0500_0000
        }
    ));
    assert!(!error.is_fatal());
}

#[test]
fn texture_spans_run_to_the_next_pointer() -> Result<()> {
    let mut rdx = RdxArchive::new(
        Cursor::new(resource(Platform::PlayStation2, true)),
        Platform::PlayStation2,
    )?;

    assert_eq!(rdx.texture_pointers()?, vec![0x180, 0, 0x1A4]);
    assert_eq!(
        rdx.texture_spans()?,
        vec![Some((0x180, 0x24)), None, Some((0x1A4, 0x24))]
    );

    Ok(())
}

#[test]
#[traced_test]
fn extract_to_side_files() -> Result<()> {
    let mut rdx = RdxArchive::new(
        Cursor::new(resource(Platform::PlayStation2, true)),
        Platform::PlayStation2,
    )?;
    let mut files = MemorySideFiles::new();
    let mut sink = CollectedDiagnostics::new();

    rdx.extract_to_side_files(
        &mut files,
        Some(&table()),
        &RdxExtractOptions::default(),
        &mut sink,
    )?;

    let mut names: Vec<&str> = files.names().collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec![
            "text/english.txt",
            "text/japanese.txt",
            "textures/0000/metadata.json",
            "textures/0002/metadata.json",
            "textures/textures.json",
        ]
    );
    assert_eq!(
        String::from_utf8_lossy(&files.read("text/english.txt")?),
        "CAB\n[TEXT END]------------------------------\n[BLOCK END]------------------------------\n"
    );

    let index: TextureIndex =
        serde_json::from_slice(&files.read("textures/textures.json")?).unwrap();
    let entry = |directory: &str| {
        Some(TextureEntry {
            directory: directory.to_owned(),
            size: 0x24,
        })
    };
    assert_eq!(index.textures, vec![entry("0000"), None, entry("0002")]);
    assert!(sink.is_empty());
    assert!(logs_contain("texture 2 at 0x1a4"));

    Ok(())
}

#[test]
fn extract_selected_parts() -> Result<()> {
    let mut rdx = RdxArchive::new(
        Cursor::new(resource(Platform::GameCube, true)),
        Platform::GameCube,
    )?;
    let mut files = MemorySideFiles::new();
    let mut sink = CollectedDiagnostics::new();

    let options = RdxExtractOptions::builder()
        .textures(false)
        .languages(vec![Language::Japanese, Language::Italian])
        .build();
    rdx.extract_to_side_files(&mut files, Some(&table()), &options, &mut sink)?;

    assert_eq!(files.names().collect::<Vec<_>>(), vec!["text/japanese.txt"]);

    let result = rdx.extract_to_side_files(&mut files, None, &options, &mut sink);
    assert!(matches!(result, Err(Error::TableRequired)));

    Ok(())
}

#[test]
fn texture_pointer_past_the_end() -> Result<()> {
    let mut data = resource(Platform::PlayStation2, true);
    data[0x164..0x168].copy_from_slice(&0x400u32.to_le_bytes());
    let mut rdx = RdxArchive::new(Cursor::new(data), Platform::PlayStation2)?;

    assert!(matches!(rdx.texture_spans(), Err(Error::OutOfBounds(_))));

    Ok(())
}
