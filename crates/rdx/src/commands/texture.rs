use std::{io::BufReader, path::PathBuf};

use clap::{Args, ValueEnum};
use miette::{Context, Result};
use rdx_io::{DirectorySideFiles, TracingDiagnostics};
use rdx_texture::TextureFormat;
use tracing::info;

use super::{create, open};

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Dreamcast chunk container
    Pvr,
    /// GameCube chunk container
    Gvr,
    /// PlayStation 2 bundle
    Tm2,
}

impl From<Format> for TextureFormat {
    fn from(value: Format) -> Self {
        match value {
            Format::Pvr => TextureFormat::Pvr,
            Format::Gvr => TextureFormat::Gvr,
            Format::Tm2 => TextureFormat::Tm2,
        }
    }
}

#[derive(clap::Subcommand)]
pub enum TextureCommands {
    /// Split a texture container into texture files and metadata
    Extract(TextureArgs),
    /// Rebuild a texture container from texture files and metadata
    Insert(TextureArgs),
}

impl TextureCommands {
    pub fn handle(&self) -> Result<()> {
        match self {
            TextureCommands::Extract(args) => args.extract(),
            TextureCommands::Insert(args) => args.insert(),
        }
    }
}

#[derive(Args)]
pub struct TextureArgs {
    /// The texture container
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// The side-file directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Container format
    #[arg(long, value_enum)]
    format: Format,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl TextureArgs {
    fn extract(&self) -> Result<()> {
        let mut reader = BufReader::new(open(&self.file)?);
        let mut files = DirectorySideFiles::new(&self.directory);

        rdx_texture::extract_to_side_files(
            &mut reader,
            self.format.into(),
            &mut files,
            &mut TracingDiagnostics,
        )
        .context(format!("extracting {}", self.file.display()))?;

        info!("extracted {} to {}", self.file.display(), self.directory.display());
        Ok(())
    }

    fn insert(&self) -> Result<()> {
        let files = DirectorySideFiles::new(&self.directory);

        info!("creating {}", self.file.display());
        let mut out = create(&self.file, self.overwrite)?;
        let written = rdx_texture::insert_from_side_files(&mut out, self.format.into(), &files)
            .context(format!("rebuilding {}", self.file.display()))?;

        info!("wrote {written:#x} bytes");
        Ok(())
    }
}
