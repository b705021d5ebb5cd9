use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Destination for published documents. A write either lands whole or
/// returns an error.
pub trait Sink {
    fn write_document(&mut self, bytes: &[u8]) -> io::Result<()>;

    fn describe(&self) -> String;
}

/// Picks the file sink when a destination is given, stdout otherwise.
pub fn open_sink(destination: Option<&Path>) -> Box<dyn Sink + Send> {
    match destination {
        Some(path) => Box::new(FileSink::new(path)),
        None => Box::new(StdoutSink),
    }
}

/// One document per line on standard output.
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn write_document(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(bytes)?;
        stdout.write_all(b"\n")?;
        stdout.flush()
    }

    fn describe(&self) -> String {
        "stdout".to_string()
    }
}

/// Replaces the destination file on every write.
///
/// The document is written to `<path>.tmp` and renamed over the destination,
/// so readers see either the previous document or the new one.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn write_temp(&self, temp_path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut file = fs::File::create(temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }
}

impl Sink for FileSink {
    fn write_document(&mut self, bytes: &[u8]) -> io::Result<()> {
        let temp_path = self.temp_path();

        let result = self
            .write_temp(&temp_path, bytes)
            .and_then(|()| fs::rename(&temp_path, &self.path));

        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Keeps every document in memory; clones share the same storage.
#[derive(Clone, Default)]
pub struct MemorySink {
    documents: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> Vec<Vec<u8>> {
        self.documents
            .lock()
            .map(|docs| docs.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.documents.lock().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Sink for MemorySink {
    fn write_document(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.documents
            .lock()
            .map_err(|_| io::Error::other("memory sink poisoned"))?
            .push(bytes.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
