/// Тип тюнера, сообщаемый сервером в handshake-записи.
///
/// Открытое перечисление: неизвестный код — не ошибка, он сохраняется
/// как [`TunerKind::Unknown`] и отображается меткой `UNKNOWN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunerKind {
    E4000,
    Fc0012,
    Fc0013,
    Fc2580,
    R820t,
    R828d,
    Unknown(u32),
}

impl TunerKind {
    pub fn from_u32(v: u32) -> Self {
        match v {
            1 => TunerKind::E4000,
            2 => TunerKind::Fc0012,
            3 => TunerKind::Fc0013,
            4 => TunerKind::Fc2580,
            5 => TunerKind::R820t,
            6 => TunerKind::R828d,
            _ => TunerKind::Unknown(v),
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            TunerKind::E4000 => 1,
            TunerKind::Fc0012 => 2,
            TunerKind::Fc0013 => 3,
            TunerKind::Fc2580 => 4,
            TunerKind::R820t => 5,
            TunerKind::R828d => 6,
            TunerKind::Unknown(v) => *v,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для TunerKind
////////////////////////////////////////////////////////////////////////////////

impl std::fmt::Display for TunerKind {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let label = match self {
            TunerKind::E4000 => "E4000",
            TunerKind::Fc0012 => "FC0012",
            TunerKind::Fc0013 => "FC0013",
            TunerKind::Fc2580 => "FC2580",
            TunerKind::R820t => "R820T",
            TunerKind::R828d => "R828D",
            TunerKind::Unknown(_) => "UNKNOWN",
        };
        write!(f, "{label}")
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
