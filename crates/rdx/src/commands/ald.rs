use std::{io::BufReader, path::PathBuf};

use clap::Args;
use miette::{Context, Result};
use rdx_io::{DirectorySideFiles, TracingDiagnostics};
use tracing::info;

use super::{create, load_table, open, ByteOrder};

#[derive(clap::Subcommand)]
pub enum AldCommands {
    /// Extract an ALD file into a directory
    Extract(AldArgs),
    /// Rebuild an ALD file from a directory
    Insert(AldArgs),
}

impl AldCommands {
    pub fn handle(&self) -> Result<()> {
        match self {
            AldCommands::Extract(args) => args.extract(),
            AldCommands::Insert(args) => args.insert(),
        }
    }
}

#[derive(Args)]
pub struct AldArgs {
    /// The ALD file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// The side-file directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Treat every block as text, decoded with this table
    #[arg(short, long, value_name = "FILE")]
    table: Option<PathBuf>,

    /// Byte order of the block sizes
    #[arg(short, long, value_enum, default_value_t = ByteOrder::Little)]
    endian: ByteOrder,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl AldArgs {
    fn extract(&self) -> Result<()> {
        let table = load_table(self.table.as_deref())?;
        let mut reader = BufReader::new(open(&self.file)?);
        let mut files = DirectorySideFiles::new(&self.directory);

        let metadata = rdx_ald::extract_to_side_files(
            &mut reader,
            self.endian.into(),
            &mut files,
            table.as_ref(),
            &mut TracingDiagnostics,
        )
        .context(format!("extracting {}", self.file.display()))?;

        info!(
            "extracted {} blocks to {}",
            metadata.blocks.len(),
            self.directory.display()
        );
        Ok(())
    }

    fn insert(&self) -> Result<()> {
        let table = load_table(self.table.as_deref())?;
        let files = DirectorySideFiles::new(&self.directory);

        info!("creating {}", self.file.display());
        let mut out = create(&self.file, self.overwrite)?;
        let metadata = rdx_ald::insert_from_side_files(
            &mut out,
            self.endian.into(),
            &files,
            table.as_ref(),
            &mut TracingDiagnostics,
        )
        .context(format!("rebuilding {}", self.file.display()))?;

        info!("wrote {} blocks", metadata.blocks.len());
        Ok(())
    }
}
