// crates/rowbin_partition/tests/helpers.rs
use std::path::Path;

use rowbin_table::{Entry, TableWriter};

/// Собирает каталог партиции: файлы с заданными числами строк.
/// Значение каждой строки — маркер "имя_файла:локальный_номер".
pub fn make_partition(dir: &Path, files: &[(&str, u64)]) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)?;
    for (name, rows) in files {
        let mut w = TableWriter::create(dir.join(name)).with_key_width(3);
        for i in 0..*rows {
            w.append(format!("{name}:{i}").as_bytes());
        }
        w.finish()?;
    }
    Ok(())
}

pub fn marker(entry: &Entry) -> String {
    String::from_utf8(entry.value.clone()).unwrap()
}
