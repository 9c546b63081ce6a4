/// Парсит строку частоты в герцы.
///
/// Поддерживает суффиксы `GHz`, `MHz`, `kHz`, `Hz` и краткую научную
/// запись `G`, `M`, `k` (регистронезависимо).
///
/// # Примеры
/// ```
/// use rtlink_cli::freq::parse_freq_hz;
/// assert_eq!(parse_freq_hz("100M").unwrap(), 100_000_000);
/// assert_eq!(parse_freq_hz("2.4M").unwrap(), 2_400_000);
/// assert_eq!(parse_freq_hz("1.602GHz").unwrap(), 1_602_000_000);
/// assert_eq!(parse_freq_hz("2000000").unwrap(), 2_000_000);
/// ```
pub fn parse_freq_hz(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let lower = s.to_lowercase();

    let (num_str, mult) = if let Some(v) = lower.strip_suffix("ghz") {
        (v.trim(), 1_000_000_000_f64)
    } else if let Some(v) = lower.strip_suffix("mhz") {
        (v.trim(), 1_000_000_f64)
    } else if let Some(v) = lower.strip_suffix("khz") {
        (v.trim(), 1_000_f64)
    } else if let Some(v) = lower.strip_suffix("hz") {
        (v.trim(), 1_f64)
    } else if let Some(v) = lower.strip_suffix('g') {
        (v.trim(), 1_000_000_000_f64)
    } else if let Some(v) = lower.strip_suffix('m') {
        (v.trim(), 1_000_000_f64)
    } else if let Some(v) = lower.strip_suffix('k') {
        (v.trim(), 1_000_f64)
    } else {
        // Без суффикса — целое число в герцах
        return s
            .parse::<u64>()
            .map_err(|e| format!("Invalid frequency '{s}': {e}"));
    };

    let n: f64 = num_str
        .parse()
        .map_err(|e| format!("Invalid frequency value '{num_str}': {e}"))?;

    Ok((n * mult).round() as u64)
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_freq_hz_full_suffixes() {
        assert_eq!(parse_freq_hz("1602MHz").unwrap(), 1_602_000_000);
        assert_eq!(parse_freq_hz("1.602GHz").unwrap(), 1_602_000_000);
        assert_eq!(parse_freq_hz("2000kHz").unwrap(), 2_000_000);
        assert_eq!(parse_freq_hz("2000000Hz").unwrap(), 2_000_000);
    }

    #[test]
    fn test_parse_freq_hz_short_suffixes() {
        assert_eq!(parse_freq_hz("100M").unwrap(), 100_000_000);
        assert_eq!(parse_freq_hz("2.4M").unwrap(), 2_400_000);
        assert_eq!(parse_freq_hz("1.602G").unwrap(), 1_602_000_000);
        assert_eq!(parse_freq_hz("450k").unwrap(), 450_000);
        assert_eq!(parse_freq_hz("2.4m").unwrap(), 2_400_000);
    }

    #[test]
    fn test_parse_freq_hz_bare_number() {
        assert_eq!(parse_freq_hz("2000000").unwrap(), 2_000_000);
        assert_eq!(parse_freq_hz(" 28800000 ").unwrap(), 28_800_000);
    }

    #[test]
    fn test_parse_freq_hz_rejects_garbage() {
        assert!(parse_freq_hz("abc").is_err());
        assert!(parse_freq_hz("MHz").is_err());
        assert!(parse_freq_hz("").is_err());
    }
}
