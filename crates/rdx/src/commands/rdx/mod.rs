pub mod extract;
pub mod insert;
pub mod verify;

use clap::ValueEnum;
use rdx_resource::{Language, Platform};

#[derive(clap::Subcommand)]
pub enum RdxCommands {
    /// Extract the text and textures of an RDX file into a directory
    Extract(extract::ExtractArgs),
    /// Insert edited text and textures into an RDX file
    Insert(insert::InsertArgs),
    /// Check that RDX files survive an extraction and insertion unchanged
    Verify(verify::VerifyArgs),
}

impl RdxCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            RdxCommands::Extract(extract) => extract.handle(),
            RdxCommands::Insert(insert) => insert.handle(),
            RdxCommands::Verify(verify) => verify.handle(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    Dreamcast,
    Gamecube,
    Ps2,
}

impl From<PlatformArg> for Platform {
    fn from(value: PlatformArg) -> Self {
        match value {
            PlatformArg::Dreamcast => Platform::Dreamcast,
            PlatformArg::Gamecube => Platform::GameCube,
            PlatformArg::Ps2 => Platform::PlayStation2,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    Japanese,
    English,
    French,
    German,
    Spanish,
    Italian,
}

impl From<LanguageArg> for Language {
    fn from(value: LanguageArg) -> Self {
        match value {
            LanguageArg::Japanese => Language::Japanese,
            LanguageArg::English => Language::English,
            LanguageArg::French => Language::French,
            LanguageArg::German => Language::German,
            LanguageArg::Spanish => Language::Spanish,
            LanguageArg::Italian => Language::Italian,
        }
    }
}
