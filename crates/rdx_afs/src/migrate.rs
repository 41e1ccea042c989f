//! Upgrades of metadata written by older versions
//!
//! Migrations work on the raw JSON so old files never have to match the current model.

use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    error::{Error, Result},
    DEFAULT_ALIGNMENT, METADATA_VERSION,
};

/// Upgrade `value` in place to [`METADATA_VERSION`], returns the version it had.
///
/// Files without a version field are version 1.
pub fn migrate(value: &mut Value) -> Result<u64> {
    let root = value.as_object_mut().ok_or(Error::InvalidMetadata {
        reason: "the root is not an object",
    })?;

    let found = match root.get("MetadataVersion") {
        None => 1,
        Some(version) => version.as_u64().ok_or(Error::InvalidMetadata {
            reason: "MetadataVersion is not a number",
        })?,
    };
    if found > METADATA_VERSION {
        return Err(Error::UnsupportedVersion { version: found });
    }

    let mut version = found;
    while version < METADATA_VERSION {
        match version {
            1 => version_1_to_2(root)?,
            _ => {
                return Err(Error::InvalidMetadata {
                    reason: "MetadataVersion is below 1",
                })
            }
        }
        version += 1;
        debug!(version, "migrated metadata");
    }

    Ok(found)
}

/// Version 2 separates the stored name from the extracted file name and can hold empty slots
fn version_1_to_2(root: &mut Map<String, Value>) -> Result<()> {
    let entries = root
        .get_mut("Entries")
        .and_then(Value::as_array_mut)
        .ok_or(Error::InvalidMetadata {
            reason: "Entries is not an array",
        })?;

    for entry in entries {
        let entry = entry.as_object_mut().ok_or(Error::InvalidMetadata {
            reason: "an entry is not an object",
        })?;

        if let Some(file_name) = entry.remove("Name") {
            entry.insert("FileName".to_owned(), file_name);
        }
        if let Some(name) = entry.remove("RawName") {
            entry.insert("Name".to_owned(), name);
        }
        entry.insert("IsNull".to_owned(), Value::Bool(false));
    }

    root.insert(
        "EntryBlockAlignment".to_owned(),
        Value::from(DEFAULT_ALIGNMENT),
    );
    root.insert("MetadataVersion".to_owned(), Value::from(2u64));

    Ok(())
}
