use std::io::Cursor;

use binrw::Endian;
use pretty_assertions::{assert_eq, assert_str_eq};
use rdx_ald::{
    error::Result,
    extract_to_side_files,
    types::{AldBlockMetadata, AldMetadata},
};
use rdx_io::{CollectedDiagnostics, MemorySideFiles, SideFiles, Warning};
use rdx_text::CodeTable;
use tracing_test::traced_test;

#[rustfmt::skip]
const CONTAINER: [u8; 0x1D] = [
    // narrow block, 3 bytes
    0x03, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03,
    // wide block, 8 bytes
    0x08, 0x00, 0x00, 0x80, 0xAA, 0xBB, 0xCC, 0xDD,
    0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80,
    // empty block
    0x00, 0x00, 0x00, 0x00,
    0xFF, 0xFF,
];

#[traced_test]
#[test]
fn extract_blocks_and_metadata() -> Result<()> {
    let mut files = MemorySideFiles::new();
    let mut sink = CollectedDiagnostics::new();

    let metadata = extract_to_side_files(
        &mut Cursor::new(CONTAINER),
        Endian::Little,
        &mut files,
        None,
        &mut sink,
    )?;

    assert_eq!(
        metadata,
        AldMetadata {
            blocks: vec![
                AldBlockMetadata {
                    file_name: "0000.bin".to_owned(),
                    is_wide: false,
                    reserved: None,
                    source_file: None,
                },
                AldBlockMetadata {
                    file_name: "0001.bin".to_owned(),
                    is_wide: true,
                    reserved: Some([0xAA, 0xBB, 0xCC, 0xDD]),
                    source_file: None,
                },
                AldBlockMetadata {
                    file_name: "0002.bin".to_owned(),
                    is_wide: false,
                    reserved: None,
                    source_file: None,
                },
            ]
        }
    );
    assert_eq!(files.read("0000.bin")?, vec![0x01, 0x02, 0x03]);
    assert_eq!(
        files.read("0001.bin")?,
        vec![0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80]
    );
    assert_eq!(files.read("0002.bin")?, Vec::<u8>::new());
    assert!(files.contains("ald.json"));
    assert!(sink.is_empty());

    Ok(())
}

#[test]
fn extract_text_blocks() -> Result<()> {
    let table = CodeTable::parse("4100=A\n4200=B\n0A00=\\n");

    #[rustfmt::skip]
    let data = vec![
        0x12, 0x00, 0x00, 0x00,
        0x01, 0x00, 0x00, 0x00,
        0x08, 0x00, 0x00, 0x00,
        0x41, 0x00, 0x0A, 0x00, 0x42, 0x00, 0xFF, 0xFF,
        0xFE, 0xFF,
    ];
    // no sentinel: the container ends with the stream

    let mut files = MemorySideFiles::new();
    let mut sink = CollectedDiagnostics::new();
    let metadata = extract_to_side_files(
        &mut Cursor::new(&data),
        Endian::Little,
        &mut files,
        Some(&table),
        &mut sink,
    )?;

    assert_eq!(
        metadata.blocks[0].source_file.as_deref(),
        Some("0000.bin")
    );
    assert_eq!(files.read("0000.bin")?, data[4..].to_vec());

    let text = String::from_utf8(files.read("0000.txt")?).unwrap();
    assert_str_eq!(
        text,
        "A\nB\n[TEXT END]------------------------------\n\
         [BLOCK END]------------------------------\n"
    );
    assert_eq!(
        sink.into_inner(),
        vec![Warning::MissingSentinel { offset: 0x16 }]
    );

    Ok(())
}
