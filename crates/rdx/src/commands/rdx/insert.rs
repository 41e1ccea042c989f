use std::{fs, io::Cursor, path::PathBuf};

use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use rdx_io::{DirectorySideFiles, TracingDiagnostics};
use rdx_resource::{Placement, RdxArchive};
use tracing::info;

use super::PlatformArg;
use crate::commands::load_table;

#[derive(Args)]
pub struct InsertArgs {
    /// The RDX file the side files were extracted from
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// The directory holding the side files
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Platform the file comes from
    #[arg(short, long, value_enum)]
    platform: PlatformArg,

    /// The table file of the game, required when the directory holds text
    #[arg(short, long, value_name = "FILE")]
    table: Option<PathBuf>,

    /// Write the result here instead of replacing the input
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl InsertArgs {
    pub fn handle(&self) -> Result<()> {
        let table = load_table(self.table.as_deref())?;
        let data = fs::read(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", self.file.display()))?;

        let mut rdx = RdxArchive::new(Cursor::new(data), self.platform.into())
            .context(format!("opening {}", self.file.display()))?;
        let files = DirectorySideFiles::new(&self.directory);

        let placements = rdx
            .insert_from_side_files(&files, table.as_ref(), &mut TracingDiagnostics)
            .context(format!("inserting {}", self.directory.display()))?;
        for (language, placement) in placements {
            match placement {
                Placement::Unchanged => info!("{language}: unchanged"),
                Placement::InPlace => info!("{language}: replaced"),
                Placement::Relocated { text, textures } => {
                    info!("{language}: moved to {text:#x}, textures moved to {textures:#x}")
                }
                Placement::Appended { text } => info!("{language}: appended at {text:#x}"),
            }
        }

        let output = self.output.as_ref().unwrap_or(&self.file);
        info!("writing {}", output.display());
        fs::write(output, rdx.into_inner().into_inner())
            .into_diagnostic()
            .context(format!("writing {}", output.display()))
    }
}
