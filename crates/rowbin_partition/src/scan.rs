// crates/rowbin_partition/src/scan.rs
use rowbin_table::{Entry, TableReader};
use tracing::trace;

use crate::checkpoint::ScanCheckpoint;
use crate::error::PartitionError;
use crate::index::{open_member, Partition};

#[derive(Debug)]
enum ScanState {
    NotStarted,
    FileOpen {
        file_ix: usize,
        reader: TableReader,
        pos: u64, // 0-based позиция в открытом файле
    },
    Exhausted,
}

/// Ленивый проход по строкам партиции, прозрачно пересекающий границы
/// файлов. Одноразовый: для повторного прохода строится новый скан.
/// Открытый файл закрывается на любом пути выхода (Drop).
#[derive(Debug)]
pub struct PartitionScan<'a> {
    part: &'a Partition,
    state: ScanState,
    /// 1-based глобальный номер следующей строки.
    next_row: u64,
    remaining: Option<u64>,
    produced: u64,
}

impl<'a> PartitionScan<'a> {
    pub(crate) fn new(part: &'a Partition, start_row: u64, max_rows: Option<u64>) -> Self {
        Self {
            part,
            state: ScanState::NotStarted,
            next_row: start_row,
            remaining: max_rows,
            produced: 0,
        }
    }

    pub fn rows_produced(&self) -> u64 {
        self.produced
    }

    /// Точка продолжения: следующая глобальная строка + остаток бюджета.
    pub fn checkpoint(&self) -> ScanCheckpoint {
        ScanCheckpoint {
            total_rows: self.part.total_count(),
            next_row: self.next_row,
            remaining: self.remaining,
        }
    }
}

impl Iterator for PartitionScan<'_> {
    type Item = Result<Entry, PartitionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == Some(0) {
            self.state = ScanState::Exhausted;
            return None;
        }
        loop {
            match &mut self.state {
                ScanState::Exhausted => return None,
                ScanState::NotStarted => {
                    // старт за концом — мягкое исчерпание, не ошибка
                    let Some((file_ix, local)) = self.part.locate_ix(self.next_row) else {
                        self.state = ScanState::Exhausted;
                        return None;
                    };
                    match open_member(&self.part.files()[file_ix]) {
                        // локальное смещение 1-based, позиции файла 0-based
                        Ok(reader) => {
                            self.state = ScanState::FileOpen {
                                file_ix,
                                reader,
                                pos: local - 1,
                            }
                        }
                        Err(e) => {
                            self.state = ScanState::Exhausted;
                            return Some(Err(e));
                        }
                    }
                }
                ScanState::FileOpen {
                    file_ix,
                    reader,
                    pos,
                } => {
                    let ix = *file_ix;
                    if *pos < reader.entry_count() {
                        let item = reader.entry(*pos);
                        *pos += 1;
                        match item {
                            Ok(entry) => {
                                self.next_row += 1;
                                self.produced += 1;
                                if let Some(r) = &mut self.remaining {
                                    *r -= 1;
                                }
                                return Some(Ok(entry));
                            }
                            Err(source) => {
                                // целостность партиции нарушена — фатально
                                let file = self.part.files()[ix].clone();
                                self.state = ScanState::Exhausted;
                                return Some(Err(PartitionError::Format { file, source }));
                            }
                        }
                    }
                    // текущий файл исчерпан — переходим к следующему
                    let next_ix = ix + 1;
                    if next_ix >= self.part.file_count() {
                        self.state = ScanState::Exhausted;
                        return None;
                    }
                    trace!(file = %self.part.files()[next_ix].display(), "advance to next table file");
                    match open_member(&self.part.files()[next_ix]) {
                        Ok(reader) => {
                            self.state = ScanState::FileOpen {
                                file_ix: next_ix,
                                reader,
                                pos: 0,
                            }
                        }
                        Err(e) => {
                            self.state = ScanState::Exhausted;
                            return Some(Err(e));
                        }
                    }
                }
            }
        }
    }
}
