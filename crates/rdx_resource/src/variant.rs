//! Per-platform layout of RDX files

use binrw::Endian;
use derive_more::Display;
use rdx_texture::TextureFormat;

/// Platforms with a known RDX layout
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Dreamcast release
    Dreamcast,
    /// GameCube release
    GameCube,
    /// PlayStation 2 release
    #[display("PlayStation 2")]
    PlayStation2,
}

/// Text languages found across the releases
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[display("{}", self.name())]
pub enum Language {
    /// Japanese, first sub-block on every platform
    Japanese,
    /// English
    English,
    /// French
    French,
    /// German
    German,
    /// Spanish
    Spanish,
    /// Italian, missing from the Dreamcast release
    Italian,
}

impl Language {
    /// Every language, in no particular platform order
    pub const ALL: [Language; 6] = [
        Language::Japanese,
        Language::English,
        Language::French,
        Language::German,
        Language::Spanish,
        Language::Italian,
    ];

    /// Lower-case name, also the stem of the extracted text file
    pub fn name(self) -> &'static str {
        match self {
            Language::Japanese => "japanese",
            Language::English => "english",
            Language::French => "french",
            Language::German => "german",
            Language::Spanish => "spanish",
            Language::Italian => "italian",
        }
    }

    /// Side file holding the text of this language
    pub fn file_name(self) -> String {
        format!("text/{}.txt", self.name())
    }
}

/// Layout parameters of one platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    /// The platform described
    pub platform: Platform,
    /// Byte order of every pointer and count
    pub endian: Endian,
    /// Accepted values of the magic field
    pub magics: &'static [u32],
    /// Number of entries in the text sub-block table
    pub sub_blocks: usize,
    /// Format of the embedded textures
    pub textures: TextureFormat,
    /// Sub-block index of every language the platform ships
    pub languages: &'static [(Language, usize)],
}

static DREAMCAST: Variant = Variant {
    platform: Platform::Dreamcast,
    endian: Endian::Little,
    magics: &[0x0000_0004],
    sub_blocks: 14,
    textures: TextureFormat::Pvr,
    languages: &[
        (Language::Japanese, 0),
        (Language::English, 1),
        (Language::French, 2),
        (Language::German, 3),
        (Language::Spanish, 4),
    ],
};

static GAMECUBE: Variant = Variant {
    platform: Platform::GameCube,
    endian: Endian::Big,
    magics: &[0x0000_0006, 0x0000_0007],
    sub_blocks: 21,
    textures: TextureFormat::Gvr,
    languages: &[
        (Language::Japanese, 0),
        (Language::English, 1),
        (Language::German, 2),
        (Language::French, 3),
        (Language::Spanish, 4),
        (Language::Italian, 5),
    ],
};

static PLAYSTATION2: Variant = Variant {
    platform: Platform::PlayStation2,
    endian: Endian::Little,
    magics: &[0x0000_0005],
    sub_blocks: 16,
    textures: TextureFormat::Tm2,
    languages: &[
        (Language::Japanese, 0),
        (Language::English, 2),
        (Language::German, 4),
        (Language::French, 6),
        (Language::Spanish, 8),
        (Language::Italian, 10),
    ],
};

impl Platform {
    /// Layout of this platform's resource files
    pub fn variant(self) -> &'static Variant {
        match self {
            Platform::Dreamcast => &DREAMCAST,
            Platform::GameCube => &GAMECUBE,
            Platform::PlayStation2 => &PLAYSTATION2,
        }
    }
}

impl Variant {
    /// Whether `magic` identifies a file of this platform
    pub fn accepts(&self, magic: u32) -> bool {
        self.magics.contains(&magic)
    }

    /// Sub-block index of a language
    pub fn sub_block(&self, language: Language) -> Option<usize> {
        self.languages
            .iter()
            .find(|(candidate, _)| *candidate == language)
            .map(|(_, index)| *index)
    }

    /// Languages shipped on this platform, in sub-block order
    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.languages.iter().map(|(language, _)| *language)
    }
}
