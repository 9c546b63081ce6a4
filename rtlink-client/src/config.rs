/// Полный набор управляемых параметров донгла.
///
/// Запись принадлежит вызывающему; клиент только читает её, транслируя
/// каждое поле в команду. Порядок объявления полей — это и порядок
/// применения в [`Sdr::configure`](crate::device::Sdr::configure).
/// IF-усиление тюнера в набор по умолчанию намеренно не входит
/// (отдельный метод [`set_tuner_if_gain`](crate::device::Sdr::set_tuner_if_gain)).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Несущая частота (Гц)
    pub center_freq: u32,
    /// Частота дискретизации (Гц)
    pub sample_rate: u32,
    /// true — ручное управление усилением, false — авто
    pub tuner_gain_mode: bool,
    /// Усиление тюнера (дБ); на провод уходит в десятых долях дБ
    pub tuner_gain_db: f64,
    /// Коррекция частоты (ppm), знаковая
    pub freq_correction_ppm: i32,
    /// Тестовый режим (счётчик вместо выборок)
    pub test_mode: bool,
    /// RTL AGC
    pub agc_mode: bool,
    /// Прямая выборка (direct sampling)
    pub direct_sampling: bool,
    /// Offset tuning
    pub offset_tuning: bool,
    /// Частота кварца RTL (Гц)
    pub rtl_xtal_freq: u32,
    /// Частота кварца тюнера (Гц)
    pub tuner_xtal_freq: u32,
    /// Усиление по индексу из таблицы устройства (<= gain_count)
    pub gain_by_index: u32,
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для Config
////////////////////////////////////////////////////////////////////////////////

impl Default for Config {
    /// 100 МГц / 2.4 Мвыб/с ("100M" / "2.4M"), остальное — нули.
    fn default() -> Self {
        Self {
            center_freq: 100_000_000,
            sample_rate: 2_400_000,
            tuner_gain_mode: false,
            tuner_gain_db: 0.0,
            freq_correction_ppm: 0,
            test_mode: false,
            agc_mode: false,
            direct_sampling: false,
            offset_tuning: false,
            rtl_xtal_freq: 0,
            tuner_xtal_freq: 0,
            gain_by_index: 0,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.center_freq, 100_000_000);
        assert_eq!(config.sample_rate, 2_400_000);
        assert!(!config.tuner_gain_mode);
        assert_eq!(config.gain_by_index, 0);
    }
}
