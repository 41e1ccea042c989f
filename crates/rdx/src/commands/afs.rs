use std::path::PathBuf;

use clap::Args;
use miette::{Context, Result};
use rdx_afs::AfsMetadata;
use tracing::info;

#[derive(clap::Subcommand)]
pub enum AfsCommands {
    /// Upgrade a metadata file to the current version
    Migrate(MigrateArgs),
    /// Show or change the unknown attribute of an entry
    Attribute(AttributeArgs),
}

impl AfsCommands {
    pub fn handle(&self) -> Result<()> {
        match self {
            AfsCommands::Migrate(args) => args.handle(),
            AfsCommands::Attribute(args) => args.handle(),
        }
    }
}

#[derive(Args)]
pub struct MigrateArgs {
    /// The metadata file, rewritten in place
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl MigrateArgs {
    pub fn handle(&self) -> Result<()> {
        let metadata = AfsMetadata::load(&self.file)
            .context(format!("loading {}", self.file.display()))?;
        metadata
            .save(&self.file)
            .context(format!("saving {}", self.file.display()))?;

        info!(
            "{} holds {} entries",
            self.file.display(),
            metadata.entries.len()
        );
        Ok(())
    }
}

#[derive(Args)]
pub struct AttributeArgs {
    /// The metadata file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Name of the extracted file
    #[arg(short, long)]
    entry: String,

    /// New value, the current one is printed when missing
    #[arg(long, value_parser = parse_attribute)]
    set: Option<u32>,
}

fn parse_attribute(value: &str) -> std::result::Result<u32, std::num::ParseIntError> {
    match value.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    }
}

impl AttributeArgs {
    pub fn handle(&self) -> Result<()> {
        let mut metadata = AfsMetadata::load(&self.file)
            .context(format!("loading {}", self.file.display()))?;

        match self.set {
            Some(value) => {
                metadata.set_unknown_attribute(&self.entry, value)?;
                metadata
                    .save(&self.file)
                    .context(format!("saving {}", self.file.display()))?;
                info!("{}: {value:#x}", self.entry);
            }
            None => match metadata.unknown_attribute(&self.entry) {
                Some(value) => println!("{value:#x}"),
                None => println!("{} has no unknown attribute", self.entry),
            },
        }

        Ok(())
    }
}
