//! Page cache over the table's backing file.
//!
//! Pages are loaded lazily on first access and live in a fixed array indexed
//! by page number, so each page has exactly one in-memory copy for the life of
//! the pager. Nothing is written back until [`Pager::flush`] is called.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::PagerError;
use crate::{PAGE_SIZE, ROW_SIZE, TABLE_MAX_PAGES};

pub type Page = [u8; PAGE_SIZE];

pub struct Pager {
    file: Option<File>,
    file_length: u64,
    pages: [Option<Box<Page>>; TABLE_MAX_PAGES],
}

impl Pager {
    /// Opens (or creates) the backing file at `path`.
    ///
    /// Every page but the last must be a whole `PAGE_SIZE` block and the last
    /// one must hold a whole number of rows, otherwise the file is rejected.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PagerError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        let file_length = file.metadata()?.len();

        let page_size = PAGE_SIZE as u64;
        let tail = file_length % page_size;
        if file_length.div_ceil(page_size) > TABLE_MAX_PAGES as u64 || tail % ROW_SIZE as u64 != 0
        {
            return Err(PagerError::Corrupt { len: file_length });
        }

        info!(path = %path.display(), file_length, "opened db file");
        Ok(Self {
            file: Some(file),
            file_length,
            pages: std::array::from_fn(|_| None),
        })
    }

    /// A pager with no backing file. Pages start zeroed and flushes are
    /// no-ops, so nothing outlives the session.
    pub fn memory() -> Self {
        Self {
            file: None,
            file_length: 0,
            pages: std::array::from_fn(|_| None),
        }
    }

    pub fn file_length(&self) -> u64 {
        self.file_length
    }

    pub fn is_persistent(&self) -> bool {
        self.file.is_some()
    }

    pub fn is_loaded(&self, page_num: usize) -> bool {
        self.pages.get(page_num).is_some_and(Option::is_some)
    }

    pub fn get_page(&mut self, page_num: usize) -> Result<&mut Page, PagerError> {
        if page_num >= TABLE_MAX_PAGES {
            return Err(PagerError::OutOfBounds {
                page: page_num,
                max: TABLE_MAX_PAGES,
            });
        }

        let page = match &mut self.pages[page_num] {
            Some(page) => page,
            slot => slot.insert(read_page(self.file.as_mut(), self.file_length, page_num)?),
        };
        Ok(&mut **page)
    }

    /// Writes the first `bytes` bytes of a cached page to its slot in the file.
    pub fn flush(&mut self, page_num: usize, bytes: usize) -> Result<(), PagerError> {
        let page = self
            .pages
            .get(page_num)
            .and_then(Option::as_deref)
            .ok_or(PagerError::NotLoaded(page_num))?;
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };

        let bytes = bytes.min(PAGE_SIZE);
        let offset = (page_num * PAGE_SIZE) as u64;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(&page[..bytes])?;

        self.file_length = self.file_length.max(offset + bytes as u64);
        debug!(page = page_num, bytes, "flushed page");
        Ok(())
    }

    /// Syncs and releases the backing file.
    pub fn close(self) -> Result<(), PagerError> {
        if let Some(file) = self.file {
            file.sync_all()?;
            info!(file_length = self.file_length, "closed db file");
        }
        Ok(())
    }
}

fn read_page(
    file: Option<&mut File>,
    file_length: u64,
    page_num: usize,
) -> Result<Box<Page>, PagerError> {
    let mut page = Box::new([0u8; PAGE_SIZE]);
    let offset = (page_num * PAGE_SIZE) as u64;

    // Pages past the end of the file have never been written.
    if let Some(file) = file {
        if offset < file_length {
            let available = (file_length - offset).min(PAGE_SIZE as u64) as usize;
            file.seek(SeekFrom::Start(offset))?;
            file.read_exact(&mut page[..available])?;
            debug!(page = page_num, bytes = available, "loaded page from disk");
        }
    }

    Ok(page)
}
