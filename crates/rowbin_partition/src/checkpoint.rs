use serde::{Deserialize, Serialize};

/// Сериализуемая точка продолжения сканирования.
/// `total_rows` фиксирует форму партиции: чекпойнт от другой партиции
/// (или после изменения состава файлов) отклоняется при resume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanCheckpoint {
    pub total_rows: u64,
    /// 1-based глобальный номер следующей строки; total_rows + 1 — конец.
    pub next_row: u64,
    pub remaining: Option<u64>,
}

impl ScanCheckpoint {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}
