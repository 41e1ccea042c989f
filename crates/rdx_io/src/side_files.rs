//! Storage for the files written next to an extracted container
//!
//! Extraction spills texture blobs, palettes, text and JSON metadata into side files, and
//! insertion reads them back by name. Names are `/` separated and relative to the store.

use std::{
    collections::BTreeMap,
    fs,
    io,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{instrument, trace};

use crate::error::{Error, Result};

/// Name of the side file for entry `index`, e.g. `0003.pvr`
pub fn side_file_name(index: usize, extension: &str) -> String {
    format!("{index:04}.{extension}")
}

/// A flat namespace of named byte blobs
pub trait SideFiles {
    /// Create or replace a file
    fn write(&mut self, name: &str, data: &[u8]) -> Result<()>;

    /// Read a whole file, failing with [`Error::MissingSideFile`] if it does not exist
    fn read(&self, name: &str) -> Result<Vec<u8>>;

    /// Whether a file exists
    fn contains(&self, name: &str) -> bool;
}

/// Serialize `value` as pretty JSON into `name`
pub fn write_json<T: Serialize>(files: &mut dyn SideFiles, name: &str, value: &T) -> Result<()> {
    let data = serde_json::to_vec_pretty(value)?;
    files.write(name, &data)
}

/// Deserialize the JSON stored in `name`
pub fn read_json<T: DeserializeOwned>(files: &dyn SideFiles, name: &str) -> Result<T> {
    let data = files.read(name)?;
    Ok(serde_json::from_slice(&data)?)
}

/// Side files stored in a directory on disk
#[derive(Debug, Clone)]
pub struct DirectorySideFiles {
    root: PathBuf,
}

impl DirectorySideFiles {
    /// Use `root` as the side-file directory, it is created on the first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The side-file directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, name: &str) -> PathBuf {
        name.split('/').fold(self.root.clone(), |path, part| path.join(part))
    }
}

impl SideFiles for DirectorySideFiles {
    #[instrument(skip(self, data), fields(size = data.len()), err)]
    fn write(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, data)?;
        trace!("wrote {}", path.display());
        Ok(())
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        fs::read(self.path(name)).map_err(|error| match error.kind() {
            io::ErrorKind::NotFound => Error::MissingSideFile {
                name: name.to_owned(),
            },
            _ => Error::from(error),
        })
    }

    fn contains(&self, name: &str) -> bool {
        self.path(name).is_file()
    }
}

/// Side files kept in memory, sorted by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySideFiles {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySideFiles {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Names of all stored files
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(|name| name.as_str())
    }

    /// Borrow a stored file
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(|data| data.as_slice())
    }

    /// Remove a stored file
    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.files.remove(name)
    }
}

impl SideFiles for MemorySideFiles {
    fn write(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.files.insert(name.to_owned(), data.to_vec());
        Ok(())
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| Error::MissingSideFile {
                name: name.to_owned(),
            })
    }

    fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }
}

enum Scope<'a> {
    Shared(&'a dyn SideFiles),
    Exclusive(&'a mut dyn SideFiles),
}

/// A sub-directory of another store
pub struct ScopedSideFiles<'a> {
    inner: Scope<'a>,
    prefix: String,
}

impl<'a> ScopedSideFiles<'a> {
    /// Resolve every name below `prefix` in `inner`
    pub fn new(inner: &'a mut dyn SideFiles, prefix: impl AsRef<str>) -> Self {
        Self {
            inner: Scope::Exclusive(inner),
            prefix: Self::normalize(prefix.as_ref()),
        }
    }

    /// Read-only variant of [`ScopedSideFiles::new`], writes fail with [`Error::ReadOnly`]
    pub fn shared(inner: &'a dyn SideFiles, prefix: impl AsRef<str>) -> Self {
        Self {
            inner: Scope::Shared(inner),
            prefix: Self::normalize(prefix.as_ref()),
        }
    }

    fn normalize(prefix: &str) -> String {
        format!("{}/", prefix.trim_end_matches('/'))
    }

    fn scoped(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    fn source(&self) -> &dyn SideFiles {
        match &self.inner {
            Scope::Shared(inner) => *inner,
            Scope::Exclusive(inner) => &**inner,
        }
    }
}

impl SideFiles for ScopedSideFiles<'_> {
    fn write(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let name = self.scoped(name);
        match &mut self.inner {
            Scope::Exclusive(inner) => inner.write(&name, data),
            Scope::Shared(_) => Err(Error::ReadOnly { name }),
        }
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        self.source().read(&self.scoped(name))
    }

    fn contains(&self, name: &str) -> bool {
        self.source().contains(&self.scoped(name))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn scoped_names_are_prefixed() -> Result<()> {
        let mut files = MemorySideFiles::new();
        {
            let mut scoped = ScopedSideFiles::new(&mut files, "textures/0001/");
            scoped.write("0000.pvr", &[1, 2, 3])?;
            assert!(scoped.contains("0000.pvr"));
            assert_eq!(scoped.read("0000.pvr")?, vec![1, 2, 3]);
        }

        assert_eq!(
            files.names().collect::<Vec<_>>(),
            vec!["textures/0001/0000.pvr"]
        );

        Ok(())
    }

    #[test]
    fn shared_scope_is_read_only() -> Result<()> {
        let mut files = MemorySideFiles::new();
        files.write("textures/0000/0000.TM2", &[7])?;

        let mut scoped = ScopedSideFiles::shared(&files, "textures/0000");
        assert_eq!(scoped.read("0000.TM2")?, vec![7]);
        assert!(matches!(
            scoped.write("0001.TM2", &[8]),
            Err(Error::ReadOnly { name }) if name == "textures/0000/0001.TM2"
        ));

        Ok(())
    }

    #[test]
    fn missing_files_are_reported_by_name() {
        let files = MemorySideFiles::new();
        match files.read("0002.gvp") {
            Err(Error::MissingSideFile { name }) => assert_eq!(name, "0002.gvp"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn json_round_trips_through_a_store() -> Result<()> {
        let mut files = MemorySideFiles::new();
        write_json(&mut files, "sizes.json", &vec![1u32, 2, 3])?;
        let sizes: Vec<u32> = read_json(&files, "sizes.json")?;
        assert_eq!(sizes, vec![1, 2, 3]);

        Ok(())
    }

    #[test]
    fn file_names_are_zero_padded() {
        assert_eq!(side_file_name(7, "TM2"), "0007.TM2");
        assert_eq!(side_file_name(12345, "bin"), "12345.bin");
    }
}
