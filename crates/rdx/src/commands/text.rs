use std::{
    fs,
    io::{Read, Write},
    path::PathBuf,
};

use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use rdx_io::TracingDiagnostics;
use rdx_text::{decode_block, encode_block, CodeTable};
use tracing::info;

use super::{create, open, ByteOrder};

#[derive(clap::Subcommand)]
pub enum TextCommands {
    /// Decode a text block into an editable text file
    Decode(TextArgs),
    /// Encode an edited text file back into a text block
    Encode(TextArgs),
}

impl TextCommands {
    pub fn handle(&self) -> Result<()> {
        match self {
            TextCommands::Decode(args) => args.decode(),
            TextCommands::Encode(args) => args.encode(),
        }
    }
}

#[derive(Args)]
pub struct TextArgs {
    /// The table file of the game
    #[arg(short, long, value_name = "FILE")]
    table: PathBuf,

    /// An input file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// A target file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Byte order of the block header
    #[arg(short, long, value_enum, default_value_t = ByteOrder::Little)]
    endian: ByteOrder,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl TextArgs {
    fn table(&self) -> Result<CodeTable> {
        CodeTable::load(&self.table).context(format!("loading table {}", self.table.display()))
    }

    fn decode(&self) -> Result<()> {
        let table = self.table()?;

        let mut data = Vec::new();
        open(&self.input)?.read_to_end(&mut data).into_diagnostic()?;
        let text = decode_block(&data, self.endian.into(), &table, &mut TracingDiagnostics)
            .context(format!("decoding {}", self.input.display()))?;

        info!("writing {}", self.output.display());
        create(&self.output, self.overwrite)?
            .write_all(text.as_bytes())
            .into_diagnostic()
    }

    fn encode(&self) -> Result<()> {
        let table = self.table()?;

        let text = fs::read_to_string(&self.input)
            .into_diagnostic()
            .context(format!("path: {}", self.input.display()))?;
        let data = encode_block(&text, self.endian.into(), &table, &mut TracingDiagnostics)
            .context(format!("encoding {}", self.input.display()))?;

        info!("writing {}", self.output.display());
        create(&self.output, self.overwrite)?
            .write_all(&data)
            .into_diagnostic()
    }
}
