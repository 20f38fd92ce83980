use std::path::Path;

use tracing::{debug, info};

use crate::error::{ExecuteError, PagerError};
use crate::pager::Pager;
use crate::row::Row;
use crate::{PAGE_SIZE, ROW_SIZE, ROWS_PER_PAGE, TABLE_MAX_ROWS};

/// The single table of a session. Rows are appended in insertion order and
/// row `n` always lives in page `n / ROWS_PER_PAGE`.
pub struct Table {
    pager: Pager,
    num_rows: usize,
}

impl Table {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PagerError> {
        let table = Self::from_pager(Pager::open(path)?);
        info!(num_rows = table.num_rows, "table loaded");
        Ok(table)
    }

    pub fn memory() -> Self {
        Self::from_pager(Pager::memory())
    }

    pub fn from_pager(pager: Pager) -> Self {
        let num_rows = rows_in_file(pager.file_length());
        Self { pager, num_rows }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn is_full(&self) -> bool {
        self.num_rows >= TABLE_MAX_ROWS
    }

    /// Stores `row` after the last one. A full table is left untouched.
    pub fn append(&mut self, row: &Row) -> Result<(), ExecuteError> {
        if self.is_full() {
            debug!(num_rows = self.num_rows, "insert rejected, table is full");
            return Err(ExecuteError::TableFull);
        }

        let (page_num, offset) = row_slot(self.num_rows);
        let page = self.pager.get_page(page_num)?;
        page[offset..offset + ROW_SIZE].copy_from_slice(&row.encode());
        self.num_rows += 1;

        debug!(id = row.id, page = page_num, offset, "row appended");
        Ok(())
    }

    /// Iterates over every stored row in insertion order.
    pub fn scan(&mut self) -> Cursor<'_> {
        Cursor {
            table: self,
            row_num: 0,
        }
    }

    /// Writes back every page holding at least one row and releases the file.
    /// The last page is truncated to its occupied rows so the row count can be
    /// recovered from the file length.
    pub fn close(mut self) -> Result<(), PagerError> {
        let full_pages = self.num_rows / ROWS_PER_PAGE;
        let tail_rows = self.num_rows % ROWS_PER_PAGE;

        for page_num in 0..full_pages {
            if self.pager.is_loaded(page_num) {
                self.pager.flush(page_num, PAGE_SIZE)?;
            }
        }
        if tail_rows > 0 && self.pager.is_loaded(full_pages) {
            self.pager.flush(full_pages, tail_rows * ROW_SIZE)?;
        }

        info!(
            num_rows = self.num_rows,
            persistent = self.pager.is_persistent(),
            "table closed"
        );
        self.pager.close()
    }
}

/// Walks the table from row 0, loading pages as it reaches them.
pub struct Cursor<'a> {
    table: &'a mut Table,
    row_num: usize,
}

impl Iterator for Cursor<'_> {
    type Item = Result<Row, PagerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.row_num >= self.table.num_rows {
            return None;
        }

        let (page_num, offset) = row_slot(self.row_num);
        match self.table.pager.get_page(page_num) {
            Ok(page) => {
                self.row_num += 1;
                Some(Ok(Row::decode(&page[offset..offset + ROW_SIZE])))
            }
            Err(e) => {
                self.row_num = self.table.num_rows;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.table.num_rows.saturating_sub(self.row_num);
        (0, Some(left))
    }
}

fn row_slot(row_num: usize) -> (usize, usize) {
    (row_num / ROWS_PER_PAGE, (row_num % ROWS_PER_PAGE) * ROW_SIZE)
}

// Full pages are stored with their padding, so only the tail page can be
// divided by the row size.
fn rows_in_file(file_length: u64) -> usize {
    let full_pages = (file_length / PAGE_SIZE as u64) as usize;
    let tail = (file_length % PAGE_SIZE as u64) as usize;
    full_pages * ROWS_PER_PAGE + tail / ROW_SIZE
}
