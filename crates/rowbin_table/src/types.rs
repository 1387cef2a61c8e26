pub const TABLE_MAGIC: &[u8; 8] = b"RBTAB1\0\0";
pub const TABLE_EXT: &str = "rbt";
/// magic + entry_count + offsets_count
pub const TABLE_HEADER_LEN: u64 = 24;

/// Одна строка таблицы, как её видит читатель.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub index: u64, // 0-based позиция в файле
    pub key: String,
    pub value: Vec<u8>,
}
