use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};

use clap::Args;
use itertools::Itertools;
use miette::{miette, Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use rdx_io::{CollectedDiagnostics, MemorySideFiles};
use rdx_resource::{Platform, RdxArchive, RdxExtractOptions};
use rdx_text::CodeTable;
use similar::{ChangeTag, TextDiff};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::PlatformArg;
use crate::commands::load_table;

/// Bytes per line of the hex dump shown for differences
const DUMP_WIDTH: usize = 16;

#[derive(Debug)]
enum Outcome {
    Identical { warnings: usize },
    Changed { first: usize, diff: String },
    Skipped,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// An RDX file or a directory searched for them
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Platform the files come from
    #[arg(short, long, value_enum)]
    platform: PlatformArg,

    /// The table file of the game, text is only checked with a table
    #[arg(short, long, value_name = "FILE")]
    table: Option<PathBuf>,
}

fn hex_dump(data: &[u8]) -> String {
    data.chunks(DUMP_WIDTH)
        .enumerate()
        .map(|(line, bytes)| {
            format!(
                "{:08X}  {}\n",
                line * DUMP_WIDTH,
                bytes.iter().map(|byte| format!("{byte:02X}")).join(" ")
            )
        })
        .collect()
}

fn changed_lines(original: &[u8], rebuilt: &[u8]) -> String {
    let original = hex_dump(original);
    let rebuilt = hex_dump(rebuilt);
    let diff = TextDiff::from_lines(&original, &rebuilt);

    diff.iter_all_changes()
        .filter_map(|change| match change.tag() {
            ChangeTag::Delete => Some(format!("- {}\n", change.value().trim_end().red())),
            ChangeTag::Insert => Some(format!("+ {}\n", change.value().trim_end().green())),
            ChangeTag::Equal => None,
        })
        .take(32)
        .join("")
}

impl VerifyArgs {
    fn verify(&self, path: &Path, platform: Platform, table: Option<&CodeTable>) -> Result<Outcome> {
        let original = fs::read(path)
            .into_diagnostic()
            .context(format!("path: {}", path.display()))?;

        let mut rdx = match RdxArchive::new(Cursor::new(original.clone()), platform) {
            Ok(rdx) => rdx,
            Err(error) if !error.is_fatal() => {
                debug!("skipping {}: {error}", path.display());
                return Ok(Outcome::Skipped);
            }
            Err(error) => return Err(error.into()),
        };

        let mut files = MemorySideFiles::new();
        let mut sink = CollectedDiagnostics::new();
        let options = RdxExtractOptions::builder().text(table.is_some()).build();
        rdx.extract_to_side_files(&mut files, table, &options, &mut sink)
            .context(format!("extracting {}", path.display()))?;
        debug!("{} side files", files.len());

        let mut rdx = RdxArchive::new(Cursor::new(original.clone()), platform)?;
        rdx.insert_from_side_files(&files, table, &mut sink)
            .context(format!("inserting into {}", path.display()))?;
        let rebuilt = rdx.into_inner().into_inner();

        for warning in sink.iter() {
            warn!("{}: {warning}", path.display());
        }

        match original.iter().zip(&rebuilt).position(|(left, right)| left != right) {
            None if original.len() == rebuilt.len() => Ok(Outcome::Identical {
                warnings: sink.len(),
            }),
            first => Ok(Outcome::Changed {
                first: first.unwrap_or(original.len().min(rebuilt.len())),
                diff: changed_lines(&original, &rebuilt),
            }),
        }
    }

    pub fn handle(&self) -> Result<()> {
        let table = load_table(self.table.as_deref())?;
        let platform: Platform = self.platform.into();

        let paths = if self.path.is_dir() {
            WalkDir::new(&self.path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| !e.file_type().is_dir())
                .map(|e| e.into_path())
                .sorted()
                .collect::<Vec<_>>()
        } else {
            vec![self.path.clone()]
        };

        let (mut identical, mut changed, mut skipped) = (0, 0, 0);
        for path in &paths {
            match self.verify(path, platform, table.as_ref())? {
                Outcome::Identical { warnings } => {
                    identical += 1;
                    match warnings {
                        0 => println!("✅ {}", path.display().green()),
                        n => println!("✅ {} ({n} warnings)", path.display().yellow()),
                    }
                }
                Outcome::Changed { first, diff } => {
                    changed += 1;
                    println!("❌ {} differs at {first:#x}", path.display().red());
                    println!("{diff}");
                }
                Outcome::Skipped => skipped += 1,
            }
        }

        info!("{identical} identical, {changed} changed, {skipped} not {platform} resource files");
        if changed > 0 {
            return Err(miette!("{changed} files did not survive the round trip"));
        }

        Ok(())
    }
}
