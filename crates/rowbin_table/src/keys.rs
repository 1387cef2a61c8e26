//! Десятичные строковые ключи строк. Ключ — порядковый номер строки;
//! нулевой паддинг выравнивает лексикографический и числовой порядок.

use crate::error::TableError;

/// Ширина ключа в цифрах для таблицы/партиции на `total` строк.
pub fn key_width(total: u64) -> usize {
    let mut w = 1usize;
    let mut t = total;
    while t >= 10 {
        w += 1;
        t /= 10;
    }
    w
}

pub fn format_key(pos: u64, width: usize) -> String {
    format!("{pos:0width$}")
}

/// Строгий разбор: непустая строка из ASCII-цифр, влезает в u64.
/// Ведущие нули не значимы.
pub fn parse_key(key: &str) -> Result<u64, TableError> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TableError::BadKey(key.to_string()));
    }
    key.parse::<u64>()
        .map_err(|_| TableError::BadKey(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_follows_digit_count() {
        assert_eq!(key_width(0), 1);
        assert_eq!(key_width(5), 1);
        assert_eq!(key_width(9), 1);
        assert_eq!(key_width(10), 2);
        assert_eq!(key_width(99), 2);
        assert_eq!(key_width(1_000_000), 7);
    }

    #[test]
    fn format_and_parse_agree() {
        assert_eq!(format_key(7, 4), "0007");
        assert_eq!(parse_key("0007").unwrap(), 7);
        assert_eq!(parse_key("7").unwrap(), 7);
        assert_eq!(parse_key("0").unwrap(), 0);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_key("").is_err());
        assert!(parse_key("12a").is_err());
        assert!(parse_key("-1").is_err());
        assert!(parse_key(" 1").is_err());
        // не влезает в u64
        assert!(parse_key("99999999999999999999").is_err());
    }
}
