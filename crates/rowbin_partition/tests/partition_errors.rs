// crates/rowbin_partition/tests/partition_errors.rs
//
// Целостность партиции: порча и пропажа участников. Ошибки конструктора
// фатальны сразу; ошибки на границе файлов фатальны для итерации.

mod helpers;

use std::path::Path;

use anyhow::Result;
use rowbin_partition::{Partition, PartitionError};

fn flip_last_byte(path: &Path) {
    use std::io::{Read, Seek, SeekFrom, Write};
    let mut f = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .unwrap();
    let len = f.metadata().unwrap().len();
    f.seek(SeekFrom::Start(len - 1)).unwrap();
    let mut b = [0u8; 1];
    f.read_exact(&mut b).unwrap();
    b[0] ^= 0xFF;
    f.seek(SeekFrom::Start(len - 1)).unwrap();
    f.write_all(&b).unwrap();
}

#[test]
fn corrupt_member_fails_open() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    helpers::make_partition(tmp.path(), &[("000.rbt", 3), ("001.rbt", 2)])?;
    flip_last_byte(&tmp.path().join("001.rbt"));

    let err = Partition::open(tmp.path()).unwrap_err();
    match err {
        PartitionError::Format { file, .. } => assert!(file.ends_with("001.rbt")),
        other => panic!("expected Format, got {other}"),
    }
    Ok(())
}

#[test]
fn vanished_member_is_fatal_mid_scan() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    helpers::make_partition(tmp.path(), &[("000.rbt", 3), ("001.rbt", 2)])?;
    let p = Partition::open(tmp.path())?;

    // файл пропадает после построения индекса
    std::fs::remove_file(tmp.path().join("001.rbt"))?;

    let mut s = p.scan(0, None)?;
    for _ in 0..3 {
        assert!(s.next().unwrap().is_ok());
    }
    let err = s.next().unwrap().unwrap_err();
    assert!(matches!(err, PartitionError::NotFound(_)), "{err}");
    // после фатальной ошибки итерация закончена
    assert!(s.next().is_none());
    Ok(())
}

#[test]
fn corrupted_member_is_fatal_mid_scan() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    helpers::make_partition(tmp.path(), &[("000.rbt", 3), ("001.rbt", 2)])?;
    let p = Partition::open(tmp.path())?;

    // файл портится после построения индекса
    std::fs::write(tmp.path().join("001.rbt"), b"garbage")?;

    let mut s = p.scan(0, None)?;
    for _ in 0..3 {
        assert!(s.next().unwrap().is_ok());
    }
    let err = s.next().unwrap().unwrap_err();
    assert!(matches!(err, PartitionError::Format { .. }), "{err}");
    assert!(s.next().is_none());
    Ok(())
}
