// crates/rowbin_table/src/reader.rs
use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use once_cell::sync::OnceCell;

use crate::codec::get_uvar;
use crate::crc::crc64_ecma;
use crate::error::TableError;
use crate::keys::parse_key;
use crate::types::{Entry, TABLE_HEADER_LEN, TABLE_MAGIC};

/// Читатель одного файла таблицы. Файл отображается в память и валидируется
/// при открытии: CRC64-футер, magic, согласованность заголовка и таблицы
/// смещений. Закрытие — Drop.
#[derive(Debug)]
pub struct TableReader {
    path: PathBuf,
    mmap: Mmap,
    entry_count: u64,
    payload_start: usize,
    cells: Vec<OnceCell<Entry>>, // ленивый кеш по позиции
}

impl TableReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref().to_path_buf();
        let f = File::open(&path)?;
        let mmap = unsafe { Mmap::map(&f)? };

        // минимум: header + защитное смещение + CRC
        if (mmap.len() as u64) < TABLE_HEADER_LEN + 8 + 8 {
            return Err(TableError::Malformed("file too small"));
        }
        let body = &mmap[..mmap.len() - 8];
        let crc_expect = u64::from_le_bytes(mmap[mmap.len() - 8..].try_into().unwrap());
        if crc64_ecma(body) != crc_expect {
            return Err(TableError::BadCrc);
        }
        if &body[0..8] != TABLE_MAGIC {
            return Err(TableError::BadMagic);
        }

        let entry_count = u64::from_le_bytes(body[8..16].try_into().unwrap());
        let offsets_count = u64::from_le_bytes(body[16..24].try_into().unwrap());
        if entry_count
            .checked_add(1)
            .map_or(true, |expect| offsets_count != expect)
        {
            return Err(TableError::Malformed("offsets_count mismatch"));
        }
        let offsets_bytes = offsets_count
            .checked_mul(8)
            .ok_or(TableError::Malformed("offsets table overflow"))?;
        let payload_start = TABLE_HEADER_LEN
            .checked_add(offsets_bytes)
            .ok_or(TableError::Malformed("offsets table overflow"))?;
        if payload_start > body.len() as u64 {
            return Err(TableError::Malformed("offsets table out of bounds"));
        }
        let payload_len = body.len() as u64 - payload_start;

        // защитное смещение обязано указывать на конец payload
        let guard_at = (TABLE_HEADER_LEN + entry_count * 8) as usize;
        let guard = u64::from_le_bytes(body[guard_at..guard_at + 8].try_into().unwrap());
        if guard != payload_len {
            return Err(TableError::Malformed("payload length mismatch"));
        }

        let cells = (0..entry_count).map(|_| OnceCell::new()).collect();
        Ok(Self {
            path,
            mmap,
            entry_count,
            payload_start: payload_start as usize,
            cells,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    #[inline]
    fn offsets_slice(&self) -> &[u8] {
        &self.mmap[TABLE_HEADER_LEN as usize..self.payload_start]
    }

    #[inline]
    fn payload_slice(&self) -> &[u8] {
        &self.mmap[self.payload_start..self.mmap.len() - 8] // без CRC
    }

    fn offset_at(&self, i: u64) -> u64 {
        let s = self.offsets_slice();
        let i = i as usize;
        u64::from_le_bytes(s[i * 8..i * 8 + 8].try_into().unwrap())
    }

    /// Позиционное чтение, 0-based.
    pub fn entry(&self, pos: u64) -> Result<Entry, TableError> {
        if pos >= self.entry_count {
            return Err(TableError::OutOfRange {
                pos,
                count: self.entry_count,
            });
        }
        let from = self.offset_at(pos) as usize;
        let to = self.offset_at(pos + 1) as usize;
        let payload = self.payload_slice();
        if from > to || to > payload.len() {
            return Err(TableError::Malformed("entry bounds out of order"));
        }
        parse_entry(pos, &payload[from..to])
    }

    /// Адресация по строковому ключу (десятичный порядковый номер; паддинг
    /// не значим). Разобранная строка кешируется.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        let pos = parse_key(key).ok()?;
        if pos >= self.entry_count {
            return None;
        }
        let cell = &self.cells[pos as usize];
        if let Some(e) = cell.get() {
            return Some(e);
        }
        let parsed = self.entry(pos).ok()?;
        let _ = cell.set(parsed);
        cell.get()
    }

    /// Последовательный курсор с позиции `start_key` (0-based десятичная
    /// строка), не более `limit` строк. Старт на конце или за ним даёт пустой
    /// курсор, не ошибку.
    pub fn cursor_from(
        &self,
        start_key: &str,
        limit: Option<u64>,
    ) -> Result<TableCursor<'_>, TableError> {
        let start = parse_key(start_key)?;
        let pos = start.min(self.entry_count);
        let end = match limit {
            Some(l) => pos.saturating_add(l).min(self.entry_count),
            None => self.entry_count,
        };
        Ok(TableCursor {
            reader: self,
            pos,
            end,
        })
    }
}

fn parse_entry(index: u64, slot: &[u8]) -> Result<Entry, TableError> {
    let mut p = 0usize;

    let (key_len, adv) = get_uvar(&slot[p..])?;
    p += adv;
    let key_end = p
        .checked_add(key_len as usize)
        .ok_or(TableError::Malformed("key out of bounds"))?;
    if key_end > slot.len() {
        return Err(TableError::Malformed("key out of bounds"));
    }
    let key = std::str::from_utf8(&slot[p..key_end])
        .map_err(|_| TableError::Malformed("key is not utf-8"))?
        .to_string();
    p = key_end;

    let (val_len, adv) = get_uvar(&slot[p..])?;
    p += adv;
    let val_end = p
        .checked_add(val_len as usize)
        .ok_or(TableError::Malformed("value out of bounds"))?;
    if val_end > slot.len() {
        return Err(TableError::Malformed("value out of bounds"));
    }
    let value = slot[p..val_end].to_vec();
    if val_end != slot.len() {
        return Err(TableError::Malformed("trailing bytes in entry"));
    }

    Ok(Entry { index, key, value })
}

/// Конечный последовательный курсор. Одноразовый: для повторного прохода
/// строится новый.
pub struct TableCursor<'a> {
    reader: &'a TableReader,
    pos: u64,
    end: u64,
}

impl TableCursor<'_> {
    /// Позиция следующей строки.
    pub fn position(&self) -> u64 {
        self.pos
    }
}

impl Iterator for TableCursor<'_> {
    type Item = Result<Entry, TableError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }
        let item = self.reader.entry(self.pos);
        self.pos += 1;
        if item.is_err() {
            // битая запись фатальна: дальше не читаем
            self.end = self.pos;
        }
        Some(item)
    }
}
