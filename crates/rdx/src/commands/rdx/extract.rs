use std::{io::BufReader, path::PathBuf};

use clap::Args;
use miette::{Context, Result};
use rdx_io::{DirectorySideFiles, TracingDiagnostics};
use rdx_resource::{RdxArchive, RdxExtractOptions};
use tracing::info;

use super::{LanguageArg, PlatformArg};
use crate::commands::{load_table, open};

#[derive(Args)]
pub struct ExtractArgs {
    /// An input RDX file, already decompressed
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Platform the file comes from
    #[arg(short, long, value_enum)]
    platform: PlatformArg,

    /// The table file of the game, required unless --no-text is given
    #[arg(short, long, value_name = "FILE")]
    table: Option<PathBuf>,

    /// Only extract these languages
    #[arg(short, long, value_enum)]
    language: Vec<LanguageArg>,

    /// Skip the text
    #[arg(long, default_value_t = false)]
    no_text: bool,

    /// Skip the textures
    #[arg(long, default_value_t = false)]
    no_textures: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let table = load_table(self.table.as_deref())?;
        let reader = BufReader::new(open(&self.file)?);
        let mut rdx = RdxArchive::new(reader, self.platform.into())
            .context(format!("opening {}", self.file.display()))?;
        info!("{} by {}", self.file.display(), rdx.author_name());

        let options = RdxExtractOptions::builder()
            .text(!self.no_text)
            .textures(!self.no_textures)
            .maybe_languages(
                (!self.language.is_empty())
                    .then(|| self.language.iter().map(|language| (*language).into()).collect()),
            )
            .build();

        let mut files = DirectorySideFiles::new(&self.directory);
        rdx.extract_to_side_files(&mut files, table.as_ref(), &options, &mut TracingDiagnostics)
            .context(format!("extracting {}", self.file.display()))?;

        info!("extracted to {}", self.directory.display());
        Ok(())
    }
}
