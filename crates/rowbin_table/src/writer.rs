// crates/rowbin_table/src/writer.rs
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::codec::put_uvar;
use crate::crc::crc64_ecma;
use crate::error::TableError;
use crate::keys::{format_key, parse_key};
use crate::types::{TABLE_HEADER_LEN, TABLE_MAGIC};

/// Построитель таблицы. Строки копятся в памяти, файл пишется целиком в
/// `finish`: header, таблица смещений, payload, CRC64-футер.
pub struct TableWriter {
    path: PathBuf,
    key_width: usize,
    rows: Vec<(String, Vec<u8>)>,
}

impl TableWriter {
    pub fn create(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            key_width: 1,
            rows: Vec::new(),
        }
    }

    /// Нулевой паддинг автоключей (на адресацию не влияет).
    pub fn with_key_width(mut self, width: usize) -> Self {
        self.key_width = width.max(1);
        self
    }

    /// Добавить строку с автоключом = порядковому номеру.
    pub fn append(&mut self, value: &[u8]) {
        let key = format_key(self.rows.len() as u64, self.key_width);
        self.rows.push((key, value.to_vec()));
    }

    /// Ключ обязан разбираться в порядковый номер строки — файл остаётся
    /// самоописывающим.
    pub fn append_keyed(&mut self, key: &str, value: &[u8]) -> Result<(), TableError> {
        if parse_key(key)? != self.rows.len() as u64 {
            return Err(TableError::BadKey(key.to_string()));
        }
        self.rows.push((key.to_string(), value.to_vec()));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Записать файл, вернуть число строк. Пустая таблица — валидный файл.
    pub fn finish(self) -> Result<u64, TableError> {
        let count = self.rows.len() as u64;

        // payload + относительные смещения, включая защитное в конце
        let mut payload = Vec::new();
        let mut offsets: Vec<u64> = Vec::with_capacity(self.rows.len() + 1);
        for (key, value) in &self.rows {
            offsets.push(payload.len() as u64);
            put_uvar(key.len() as u64, &mut payload);
            payload.extend_from_slice(key.as_bytes());
            put_uvar(value.len() as u64, &mut payload);
            payload.extend_from_slice(value);
        }
        offsets.push(payload.len() as u64);

        let mut buf =
            Vec::with_capacity(TABLE_HEADER_LEN as usize + offsets.len() * 8 + payload.len() + 8);
        buf.extend_from_slice(TABLE_MAGIC);
        buf.extend_from_slice(&count.to_le_bytes());
        buf.extend_from_slice(&(count + 1).to_le_bytes());
        for off in &offsets {
            buf.extend_from_slice(&off.to_le_bytes());
        }
        buf.extend_from_slice(&payload);

        let crc = crc64_ecma(&buf);
        buf.extend_from_slice(&crc.to_le_bytes());

        let mut f = File::create(&self.path)?;
        f.write_all(&buf)?;
        Ok(count)
    }
}
