use std::fmt;

use crate::{EMAIL_OFFSET, EMAIL_SIZE, ID_OFFSET, ID_SIZE, ROW_SIZE, USERNAME_OFFSET, USERNAME_SIZE};

/// One record of the table. Length limits are checked when a statement is
/// prepared, so every `Row` that reaches the codec already fits its slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    pub username: String,
    pub email: String,
}

impl Row {
    pub fn new(id: u32, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
        }
    }

    /// Serializes the row into its fixed-width on-page form: id (little
    /// endian), then the zero-padded username and email columns.
    pub fn encode(&self) -> [u8; ROW_SIZE] {
        let mut block = [0u8; ROW_SIZE];
        block[ID_OFFSET..ID_OFFSET + ID_SIZE].copy_from_slice(&self.id.to_le_bytes());
        write_column(&mut block[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE], &self.username);
        write_column(&mut block[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE], &self.email);
        block
    }

    /// Inverse of [`Row::encode`]. `block` must hold at least `ROW_SIZE` bytes.
    pub fn decode(block: &[u8]) -> Self {
        let mut id = [0u8; ID_SIZE];
        id.copy_from_slice(&block[ID_OFFSET..ID_OFFSET + ID_SIZE]);

        Self {
            id: u32::from_le_bytes(id),
            username: read_column(&block[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE]),
            email: read_column(&block[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE]),
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.username, self.email)
    }
}

fn write_column(dest: &mut [u8], value: &str) {
    let bytes = value.as_bytes();
    let len = bytes.len().min(dest.len());
    dest[..len].copy_from_slice(&bytes[..len]);
}

// Columns are zero padded, so the value ends at the first NUL.
fn read_column(src: &[u8]) -> String {
    let end = src.iter().position(|&b| b == 0).unwrap_or(src.len());
    String::from_utf8_lossy(&src[..end]).into_owned()
}
