// crates/rowbin_partition/src/index.rs
use std::io;
use std::path::{Path, PathBuf};

use rowbin_table::keys::key_width;
use rowbin_table::{TableError, TableReader, TABLE_EXT};
use tracing::debug;

use crate::checkpoint::ScanCheckpoint;
use crate::error::PartitionError;
use crate::scan::PartitionScan;

/// Индекс партиции: каталог таблиц, отсортированных по имени файла.
///
/// Лексикографический порядок имён — канонический порядок строк партиции:
/// глобальная нумерация стабильна между запусками без отдельного манифеста.
/// После открытия индекс неизменяем и не держит открытых дескрипторов, его
/// можно свободно шарить между потоками.
#[derive(Debug)]
pub struct Partition {
    dir: PathBuf,
    files: Vec<PathBuf>,
    counts: Vec<u64>,
    cumulative: Vec<u64>,
}

impl Partition {
    /// Сканирует каталог, считает строки каждого файла-участника (заодно
    /// проверяя его CRC и заголовок) и строит префиксные суммы. Кривая
    /// партиция фатальна сразу — сама она не починится.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, PartitionError> {
        let dir = dir.as_ref().to_path_buf();
        let rd = match std::fs::read_dir(&dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PartitionError::NotFound(dir));
            }
            Err(e) => return Err(PartitionError::Io(e)),
        };

        let mut files: Vec<PathBuf> = Vec::new();
        for ent in rd {
            let ent = ent?;
            if !ent.file_type()?.is_file() {
                continue;
            }
            let path = ent.path();
            if path.extension().and_then(|e| e.to_str()) == Some(TABLE_EXT) {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut counts = Vec::with_capacity(files.len());
        let mut cumulative = Vec::with_capacity(files.len());
        let mut total = 0u64;
        for f in &files {
            let n = open_member(f)?.entry_count();
            counts.push(n);
            total += n;
            cumulative.push(total);
        }

        debug!(dir = %dir.display(), files = files.len(), rows = total, "partition opened");
        Ok(Self {
            dir,
            files,
            counts,
            cumulative,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.dir
    }

    /// Участники в каноническом порядке.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Число строк в i-м файле.
    pub fn rows_in_file(&self, ix: usize) -> Option<u64> {
        self.counts.get(ix).copied()
    }

    /// Сумма строк всех файлов.
    pub fn total_count(&self) -> u64 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// Ширина десятичного ключа для этой партиции.
    pub fn key_width(&self) -> usize {
        key_width(self.total_count())
    }

    /// Глобальный номер строки (1-based) -> (файл, локальное смещение,
    /// 1-based). 0 и всё за концом дают None — мягкий сигнал границы, не
    /// ошибка.
    pub fn locate(&self, n: u64) -> Option<(&Path, u64)> {
        let (ix, local) = self.locate_ix(n)?;
        Some((self.files[ix].as_path(), local))
    }

    /// Бинарный поиск по монотонным префиксным суммам: первый i, у которого
    /// n <= cumulative[i]. Пустые файлы при равенстве сумм пропускаются.
    pub(crate) fn locate_ix(&self, n: u64) -> Option<(usize, u64)> {
        if n == 0 || n > self.total_count() {
            return None;
        }
        let ix = self.cumulative.partition_point(|&c| c < n);
        let before = if ix == 0 { 0 } else { self.cumulative[ix - 1] };
        Some((ix, n - before))
    }

    /// Файл, следующий за `current` в порядке партиции.
    pub fn next_file(&self, current: &Path) -> Option<&Path> {
        let ix = self.files.iter().position(|f| f == current)?;
        self.files.get(ix + 1).map(|f| f.as_path())
    }

    /// Ленивое сканирование с глобального смещения `start_offset`, не более
    /// `max_rows` строк. 0 означает «с начала». Окно проверяется здесь, а не
    /// посреди итерации: start_offset + max_rows не должно выходить за total.
    pub fn scan(
        &self,
        start_offset: u64,
        max_rows: Option<u64>,
    ) -> Result<PartitionScan<'_>, PartitionError> {
        let total = self.total_count();
        if let Some(m) = max_rows {
            let end = start_offset.checked_add(m);
            if end.map_or(true, |e| e > total) {
                return Err(PartitionError::Range {
                    start: start_offset,
                    limit: max_rows,
                    total,
                });
            }
        }
        Ok(PartitionScan::new(self, start_offset.max(1), max_rows))
    }

    /// Продолжить сканирование с чекпойнта. Чекпойнт привязан к форме
    /// партиции; окно исходного скана заново не проверяется.
    pub fn resume(&self, cp: &ScanCheckpoint) -> Result<PartitionScan<'_>, PartitionError> {
        let total = self.total_count();
        if cp.total_rows != total {
            return Err(PartitionError::CheckpointMismatch {
                expected: cp.total_rows,
                actual: total,
            });
        }
        if cp.next_row == 0 || cp.next_row > total + 1 {
            return Err(PartitionError::Range {
                start: cp.next_row,
                limit: cp.remaining,
                total,
            });
        }
        Ok(PartitionScan::new(self, cp.next_row, cp.remaining))
    }
}

/// Открыть файл-участник; пропавший файл — это NotFound, всё остальное —
/// сломанный формат.
pub(crate) fn open_member(file: &Path) -> Result<TableReader, PartitionError> {
    TableReader::open(file).map_err(|source| {
        if matches!(&source, TableError::Io(e) if e.kind() == io::ErrorKind::NotFound) {
            PartitionError::NotFound(file.to_path_buf())
        } else {
            PartitionError::Format {
                file: file.to_path_buf(),
                source,
            }
        }
    })
}
