use std::io::Cursor;

use binrw::Endian;
use miette::Result;
use pretty_assertions::assert_str_eq;
use rdx_ald::{error::Error, extract_to_side_files, insert_from_side_files};
use rdx_io::{CollectedDiagnostics, MemorySideFiles, SideFiles};
use rdx_text::CodeTable;

#[rustfmt::skip]
const CONTAINER: [u8; 0x1D] = [
    0x00, 0x00, 0x00, 0x03, 0x01, 0x02, 0x03,
    0x80, 0x00, 0x00, 0x08, 0xAA, 0xBB, 0xCC, 0xDD,
    0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80,
    0x00, 0x00, 0x00, 0x00,
    0xFF, 0xFF,
];

#[test]
fn unedited_container_round_trips() -> Result<()> {
    let mut files = MemorySideFiles::new();
    let mut sink = CollectedDiagnostics::new();
    extract_to_side_files(
        &mut Cursor::new(CONTAINER),
        Endian::Big,
        &mut files,
        None,
        &mut sink,
    )?;

    let mut out = Cursor::new(Vec::new());
    insert_from_side_files(&mut out, Endian::Big, &files, None, &mut sink)?;

    assert_str_eq!(
        format!("{:02X?}", out.into_inner()),
        format!("{:02X?}", CONTAINER)
    );

    Ok(())
}

#[test]
fn edited_block_changes_its_size() -> Result<()> {
    let mut files = MemorySideFiles::new();
    let mut sink = CollectedDiagnostics::new();
    extract_to_side_files(
        &mut Cursor::new(CONTAINER),
        Endian::Big,
        &mut files,
        None,
        &mut sink,
    )?;
    files.write("0000.bin", &[0x09])?;

    let mut out = Cursor::new(Vec::new());
    insert_from_side_files(&mut out, Endian::Big, &files, None, &mut sink)?;

    let mut expected = vec![0x00, 0x00, 0x00, 0x01, 0x09];
    expected.extend_from_slice(&CONTAINER[7..]);
    assert_str_eq!(
        format!("{:02X?}", out.into_inner()),
        format!("{:02X?}", expected)
    );

    Ok(())
}

#[test]
fn text_blocks_round_trip_with_the_table() -> Result<()> {
    let table = CodeTable::parse("4100=A\n4200=B\n0A00=\\n");

    #[rustfmt::skip]
    let container = vec![
        0x00, 0x00, 0x00, 0x12,
        0x00, 0x00, 0x00, 0x01,
        0x00, 0x00, 0x00, 0x08,
        0x41, 0x00, 0x0A, 0x00, 0x42, 0x00, 0xFF, 0xFF,
        0xFE, 0xFF,
        0xFF, 0xFF,
    ];

    let mut files = MemorySideFiles::new();
    let mut sink = CollectedDiagnostics::new();
    extract_to_side_files(
        &mut Cursor::new(&container),
        Endian::Big,
        &mut files,
        Some(&table),
        &mut sink,
    )?;

    let mut out = Cursor::new(Vec::new());
    insert_from_side_files(&mut out, Endian::Big, &files, Some(&table), &mut sink)?;
    assert_str_eq!(
        format!("{:02X?}", out.into_inner()),
        format!("{:02X?}", container)
    );

    let result = insert_from_side_files(
        &mut Cursor::new(Vec::new()),
        Endian::Big,
        &files,
        None,
        &mut sink,
    );
    assert!(matches!(result, Err(Error::TableRequired { name }) if name == "0000.txt"));

    Ok(())
}

#[test]
fn unedited_text_keeps_its_codes() -> Result<()> {
    let table = CodeTable::parse("4100=A\n4200=B\n4300=AB");

    #[rustfmt::skip]
    let container = vec![
        0x00, 0x00, 0x00, 0x10,
        0x00, 0x00, 0x00, 0x01,
        0x00, 0x00, 0x00, 0x08,
        0x41, 0x00, 0x42, 0x00, 0xFF, 0xFF,
        0xFE, 0xFF,
        0xFF, 0xFF,
    ];

    let mut files = MemorySideFiles::new();
    let mut sink = CollectedDiagnostics::new();
    extract_to_side_files(
        &mut Cursor::new(&container),
        Endian::Big,
        &mut files,
        Some(&table),
        &mut sink,
    )?;

    let mut out = Cursor::new(Vec::new());
    insert_from_side_files(&mut out, Endian::Big, &files, Some(&table), &mut sink)?;
    assert_str_eq!(
        format!("{:02X?}", out.into_inner()),
        format!("{:02X?}", container)
    );

    let text = String::from_utf8(files.read("0000.txt")?).unwrap();
    files.write("0000.txt", text.replacen("AB", "BA", 1).as_bytes())?;

    let mut out = Cursor::new(Vec::new());
    insert_from_side_files(&mut out, Endian::Big, &files, Some(&table), &mut sink)?;
    let mut expected = container.clone();
    expected[12..16].copy_from_slice(&[0x42, 0x00, 0x41, 0x00]);
    assert_str_eq!(
        format!("{:02X?}", out.into_inner()),
        format!("{:02X?}", expected)
    );

    Ok(())
}

#[test]
fn text_side_file_must_be_utf8() -> Result<()> {
    let table = CodeTable::parse("4100=A");

    #[rustfmt::skip]
    let container = vec![
        0x00, 0x00, 0x00, 0x0E,
        0x00, 0x00, 0x00, 0x01,
        0x00, 0x00, 0x00, 0x08,
        0x41, 0x00, 0xFF, 0xFF,
        0xFE, 0xFF,
        0xFF, 0xFF,
    ];

    let mut files = MemorySideFiles::new();
    let mut sink = CollectedDiagnostics::new();
    extract_to_side_files(
        &mut Cursor::new(&container),
        Endian::Big,
        &mut files,
        Some(&table),
        &mut sink,
    )?;
    files.write("0000.txt", &[0x41, 0xFF, 0x0A])?;

    let result = insert_from_side_files(
        &mut Cursor::new(Vec::new()),
        Endian::Big,
        &files,
        Some(&table),
        &mut sink,
    );
    assert!(matches!(result, Err(Error::InvalidUtf8 { name, .. }) if name == "0000.txt"));

    Ok(())
}
