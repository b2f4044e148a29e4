use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{PersistenceError, SessionSlot};

/// One file per key under a directory: `<dir>/<key>.json`.
///
/// The directory is created lazily on first write.
#[derive(Debug, Clone)]
pub struct FileSessionSlot {
    dir: PathBuf,
}

impl FileSessionSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SessionSlot for FileSessionSlot {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir)?;

        // Write-then-rename: readers never observe a half-written value.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_the_filesystem() {
        let tmp = tempfile::tempdir().unwrap();
        let slot = FileSessionSlot::new(tmp.path().join("nested"));

        assert_eq!(slot.load("current_principal").unwrap(), None);

        slot.store("current_principal", "{\"a\":1}").unwrap();
        assert!(tmp.path().join("nested/current_principal.json").exists());
        assert_eq!(
            slot.load("current_principal").unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        slot.remove("current_principal").unwrap();
        assert_eq!(slot.load("current_principal").unwrap(), None);
    }

    #[test]
    fn removing_missing_key_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let slot = FileSessionSlot::new(tmp.path());
        slot.remove("nothing").unwrap();
    }

    #[test]
    fn unreadable_location_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        // A regular file where the slot directory should be.
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let slot = FileSessionSlot::new(&blocker);
        assert!(slot.store("k", "v").is_err());
    }
}
