//! Loading metadata files
//!

use std::{fs, path::Path};

use serde_json::Value;
use tracing::{instrument, trace};

use crate::{error::Result, migrate::migrate, types::AfsMetadata};

impl AfsMetadata {
    /// Parse metadata of any supported version.
    ///
    /// ```
    /// use rdx_afs::{AfsMetadata, METADATA_VERSION};
    ///
    /// let metadata = AfsMetadata::from_json(r#"{
    ///     "HeaderMagicType": "AFS_20",
    ///     "AttributesInfoType": "NoAttributes",
    ///     "Entries": [{ "Name": "a.bin", "RawName": "A.BIN", "HasUnknownAttribute": false, "UnknownAttribute": 0 }]
    /// }"#)?;
    ///
    /// assert_eq!(metadata.metadata_version, METADATA_VERSION);
    /// assert_eq!(metadata.entries[0].file_name, "a.bin");
    /// assert_eq!(metadata.entries[0].name, "A.BIN");
    /// # Ok::<(), rdx_afs::error::Error>(())
    /// ```
    pub fn from_json(text: &str) -> Result<AfsMetadata> {
        let mut value: Value = serde_json::from_str(text)?;
        let version = migrate(&mut value)?;
        trace!(version, "read metadata");

        Ok(serde_json::from_value(value)?)
    }

    /// Read and migrate the metadata file at `path`
    #[instrument(err)]
    pub fn load(path: impl AsRef<Path> + std::fmt::Debug) -> Result<AfsMetadata> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
