//! Saving metadata files
//!

use std::{fs, path::Path};

use tracing::instrument;

use crate::{error::Result, types::AfsMetadata};

impl AfsMetadata {
    /// Serialize in the current format, indented
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the metadata file at `path`, replacing it
    #[instrument(skip(self), fields(entries = self.entries.len()), err)]
    pub fn save(&self, path: impl AsRef<Path> + std::fmt::Debug) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
