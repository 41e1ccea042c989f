pub mod afs;
pub mod ald;
pub mod rdx;
pub mod text;
pub mod texture;

use std::{fs::File, path::Path};

use binrw::Endian;
use clap::ValueEnum;
use miette::{Context, IntoDiagnostic, Result};
use rdx_text::CodeTable;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle single text blocks
    Text {
        #[command(subcommand)]
        command: text::TextCommands,
    },
    /// Handle ALD block containers
    Ald {
        #[command(subcommand)]
        command: ald::AldCommands,
    },
    /// Handle PVR, GVR and TM2 texture containers
    Texture {
        #[command(subcommand)]
        command: texture::TextureCommands,
    },
    /// Handle RDX resource files
    Rdx {
        #[command(subcommand)]
        command: rdx::RdxCommands,
    },
    /// Handle AFS metadata files
    Afs {
        #[command(subcommand)]
        command: afs::AfsCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> Result<()> {
        match self {
            Commands::Text { command } => command.handle(),
            Commands::Ald { command } => command.handle(),
            Commands::Texture { command } => command.handle(),
            Commands::Rdx { command } => command.handle(),
            Commands::Afs { command } => command.handle(),
        }
    }
}

/// Byte order of a container
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ByteOrder {
    /// Dreamcast and PlayStation 2
    #[default]
    Little,
    /// GameCube
    Big,
}

impl From<ByteOrder> for Endian {
    fn from(value: ByteOrder) -> Self {
        match value {
            ByteOrder::Little => Endian::Little,
            ByteOrder::Big => Endian::Big,
        }
    }
}

pub(crate) fn open(path: &Path) -> Result<File> {
    File::open(path)
        .into_diagnostic()
        .context(format!("path: {}", path.display()))
}

pub(crate) fn create(path: &Path, overwrite: bool) -> Result<File> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    if !overwrite {
        File::create_new(path)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))
    } else {
        File::create(path)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))
    }
}

pub(crate) fn load_table(path: Option<&Path>) -> Result<Option<CodeTable>> {
    path.map(|path| {
        CodeTable::load(path).context(format!("loading table {}", path.display()))
    })
    .transpose()
}
