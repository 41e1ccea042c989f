#![allow(dead_code)]

use binrw::Endian;
use rdx_io::CollectedDiagnostics;
use rdx_resource::{Language, Platform};
use rdx_text::{CodeTable, TextBlock};
use rdx_texture::TextureFormat;

pub const TABLE: &str = "4100=A\n4200=B\n4300=C\n0A00=\\n";

pub const JAPANESE_TEXT: u32 = 0x100;
pub const ENGLISH_TEXT: u32 = 0x120;
pub const UNKNOWN_BLOCK: u32 = 0x140;
pub const TEXTURE_BLOCK: u32 = 0x160;
pub const FIRST_TEXTURE: u32 = 0x180;

pub fn table() -> CodeTable {
    CodeTable::parse(TABLE)
}

pub fn block(runs: &[&str]) -> TextBlock {
    runs.iter().map(|run| run.to_string()).collect()
}

fn put(data: &mut [u8], offset: u32, value: u32, endian: Endian) {
    let bytes = match endian {
        Endian::Big => value.to_be_bytes(),
        Endian::Little => value.to_le_bytes(),
    };
    let offset = offset as usize;
    data[offset..offset + 4].copy_from_slice(&bytes);
}

/// A texture container holding nothing but a stub and the sentinel
pub fn texture(format: TextureFormat) -> Vec<u8> {
    let mut data = match format {
        TextureFormat::Tm2 => {
            let mut item = b"NULL".to_vec();
            item.resize(0x20, 0x11);
            item
        }
        TextureFormat::Pvr | TextureFormat::Gvr => {
            let mut chunk = b"PADD".to_vec();
            chunk.resize(0x10, 0x22);
            chunk
        }
    };
    data.extend([0xFF; 4]);
    data
}

/// Resource file with Japanese and English text, one unknown block and two textures
///
/// | Offset | Content                    |
/// |--------|----------------------------|
/// | 0x000  | header, sub-block table    |
/// | 0x100  | Japanese `AB`              |
/// | 0x120  | English `CAB`              |
/// | 0x140  | unknown block, 0xAB filled |
/// | 0x160  | texture pointers           |
/// | 0x180  | two texture containers     |
pub fn resource(platform: Platform, textures: bool) -> Vec<u8> {
    let variant = platform.variant();
    let endian = variant.endian;
    let table = table();
    let mut sink = CollectedDiagnostics::new();

    let mut data = vec![0u8; JAPANESE_TEXT as usize];
    put(&mut data, 0x00, variant.magics[0], endian);
    put(&mut data, 0x04, 0x38, endian);
    put(&mut data, 0x08, UNKNOWN_BLOCK, endian);
    if textures {
        put(&mut data, 0x14, TEXTURE_BLOCK, endian);
    }
    data[0x18..0x1E].copy_from_slice(b"tester");

    for (language, pointer) in [
        (Language::Japanese, JAPANESE_TEXT),
        (Language::English, ENGLISH_TEXT),
    ] {
        let index = variant.sub_block(language).unwrap() as u32;
        put(&mut data, 0x38 + 4 * index, pointer, endian);
    }

    for (runs, end) in [(["AB"], ENGLISH_TEXT), (["CAB"], UNKNOWN_BLOCK)] {
        let bytes = block(&runs).to_bytes(endian, &table, &mut sink).unwrap();
        data.extend(bytes);
        data.resize(end as usize, 0);
    }

    data.resize(TEXTURE_BLOCK as usize, 0xAB);
    if !textures {
        return data;
    }

    let container = texture(variant.textures);
    let second = FIRST_TEXTURE + container.len() as u32;
    data.resize(FIRST_TEXTURE as usize, 0);
    put(&mut data, TEXTURE_BLOCK, 3, endian);
    put(&mut data, TEXTURE_BLOCK + 4, FIRST_TEXTURE, endian);
    put(&mut data, TEXTURE_BLOCK + 12, second, endian);
    data.extend(&container);
    data.extend(&container);

    assert!(sink.is_empty());
    data
}
