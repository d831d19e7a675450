//! In-memory zip archives for multi-file exports.

use std::io::{Cursor, Write};

use log::debug;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{GridlabError, Result};

/// Deflated zip written into a byte buffer.
pub(crate) struct Archive {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    entries: usize,
}

impl Archive {
    pub(crate) fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            entries: 0,
        }
    }

    /// Add one entry; `name` may contain `/` to nest it in a folder.
    pub(crate) fn add(&mut self, name: &str, contents: &[u8]) -> Result<()> {
        self.writer.start_file(name, self.options)?;
        self.writer
            .write_all(contents)
            .map_err(|e| GridlabError::Export(format!("failed to write '{}' to archive: {}", name, e)))?;
        self.entries += 1;
        Ok(())
    }

    pub(crate) fn finish(self) -> Result<Vec<u8>> {
        debug!("finished archive with {} entries", self.entries);
        Ok(self.writer.finish()?.into_inner())
    }
}

#[cfg(test)]
pub(crate) fn read_entry(bytes: &[u8], name: &str) -> Option<Vec<u8>> {
    use std::io::Read;

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).ok()?;
    let mut entry = archive.by_name(name).ok()?;
    let mut out = Vec::new();
    entry.read_to_end(&mut out).ok()?;
    Some(out)
}

#[cfg(test)]
pub(crate) fn entry_names(bytes: &[u8]) -> Vec<String> {
    match zip::ZipArchive::new(Cursor::new(bytes)) {
        Ok(archive) => archive.file_names().map(String::from).collect(),
        Err(_) => Vec::new(),
    }
}
