use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, error, info};
use tempfile::NamedTempFile;

use crate::errors::WikiError;
use crate::types::Page;

const PAGE_EXTENSION: &str = "txt";

/// Stores each page as `<title>.txt` under a data directory
#[derive(Clone)]
pub struct PageStore {
    data_dir: Arc<PathBuf>,
}

impl PageStore {
    /// Create a new page store rooted at `data_dir`
    pub fn new(data_dir: PathBuf) -> Self {
        debug!("Creating PageStore with data directory: {:?}", data_dir);
        Self { data_dir: Arc::new(data_dir) }
    }

    /// File backing the page with this title
    pub fn path_for(&self, title: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", title, PAGE_EXTENSION))
    }

    /// Write the page body, replacing any previous content.
    ///
    /// The body is written to a temporary file next to the target and renamed
    /// into place, so readers and concurrent writers never see a partial body.
    pub fn save(&self, page: &Page) -> Result<(), WikiError> {
        let target = self.path_for(&page.title);
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        debug!("Saving page '{}' to {:?}", page.title, target);

        let write = || -> io::Result<()> {
            let mut tmp = NamedTempFile::new_in(dir)?;
            tmp.write_all(&page.body)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        };

        write().map_err(|e| {
            error!("Failed to save page {:?}: {}", target, e);
            WikiError::Io(e)
        })?;

        info!("Saved page '{}', {} bytes", page.title, page.body.len());
        Ok(())
    }

    /// Read the page with this title
    pub fn load(&self, title: &str) -> Result<Page, WikiError> {
        let path = self.path_for(title);
        debug!("Loading page '{}' from {:?}", title, path);

        match fs::read(&path) {
            Ok(body) => {
                debug!("Loaded page '{}', {} bytes", title, body.len());
                Ok(Page { title: title.to_string(), body })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(WikiError::NotFound),
            Err(e) => {
                error!("Failed to read page {:?}: {}", path, e);
                Err(WikiError::Io(e))
            }
        }
    }
}
