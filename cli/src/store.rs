use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};
use taixiu_execution::State;
use tracing::{debug, warn};

/// Key-value store persisted as a flat JSON object of strings.
///
/// The whole file is rewritten after every insert. A missing or unreadable
/// file starts empty.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring malformed state file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no state file yet");
                BTreeMap::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read state file");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> io::Result<()> {
        let raw = serde_json::to_string_pretty(&self.values)?;
        // Write then rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)
    }
}

impl State for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn insert(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
        if let Err(e) = self.flush() {
            warn!(path = %self.path.display(), key, error = %e, "failed to persist state");
        }
    }
}
