use byteorder::{BigEndian, ByteOrder};

use crate::error::{ProtoError, ProtoResult};

/// Размер командной записи: opcode(1) + parameter(4).
pub const COMMAND_SIZE: usize = 5;

/// Коды команд rtl_tcp (определены в rtl_tcp.c).
///
/// Последовательность 1..=13 — часть wire-контракта и должна совпадать
/// с сервером байт-в-байт. Значения заданы литералами, а не счётчиком:
/// перестановка вариантов при эволюции набора не должна менять кодировку.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ControlOp {
    CenterFreq = 1,
    SampleRate = 2,
    TunerGainMode = 3,
    TunerGain = 4,
    FreqCorrection = 5,
    TunerIfGain = 6,
    TestMode = 7,
    AgcMode = 8,
    DirectSampling = 9,
    OffsetTuning = 10,
    RtlXtalFreq = 11,
    TunerXtalFreq = 12,
    GainByIndex = 13,
}

impl ControlOp {
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn from_u8(v: u8) -> ProtoResult<Self> {
        match v {
            1 => Ok(ControlOp::CenterFreq),
            2 => Ok(ControlOp::SampleRate),
            3 => Ok(ControlOp::TunerGainMode),
            4 => Ok(ControlOp::TunerGain),
            5 => Ok(ControlOp::FreqCorrection),
            6 => Ok(ControlOp::TunerIfGain),
            7 => Ok(ControlOp::TestMode),
            8 => Ok(ControlOp::AgcMode),
            9 => Ok(ControlOp::DirectSampling),
            10 => Ok(ControlOp::OffsetTuning),
            11 => Ok(ControlOp::RtlXtalFreq),
            12 => Ok(ControlOp::TunerXtalFreq),
            13 => Ok(ControlOp::GainByIndex),
            _ => Err(ProtoError::UnknownOpcode(v)),
        }
    }
}

/// Командная запись: код операции + 32-битный параметр.
///
/// Эфемерная: создаётся, кодируется в 5 байт, отправляется и забывается.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub op: ControlOp,
    pub param: u32,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl Command {
    pub fn new(
        op: ControlOp,
        param: u32,
    ) -> Self {
        Self { op, param }
    }

    /// Кодирует команду в фиксированные 5 байт (big-endian, без padding).
    pub fn encode(&self) -> [u8; COMMAND_SIZE] {
        let mut buf = [0u8; COMMAND_SIZE];
        buf[0] = self.op.as_u8();
        BigEndian::write_u32(&mut buf[1..5], self.param);
        buf
    }

    /// Обратная операция к [`encode`](Self::encode). Клиенту при работе не
    /// нужна, используется тестами и фейковыми серверами.
    pub fn decode(buf: &[u8; COMMAND_SIZE]) -> ProtoResult<Self> {
        Ok(Self {
            op: ControlOp::from_u8(buf[0])?,
            param: BigEndian::read_u32(&buf[1..5]),
        })
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для ControlOp
////////////////////////////////////////////////////////////////////////////////

impl std::fmt::Display for ControlOp {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let name = match self {
            ControlOp::CenterFreq => "center_freq",
            ControlOp::SampleRate => "sample_rate",
            ControlOp::TunerGainMode => "tuner_gain_mode",
            ControlOp::TunerGain => "tuner_gain",
            ControlOp::FreqCorrection => "freq_correction",
            ControlOp::TunerIfGain => "tuner_if_gain",
            ControlOp::TestMode => "test_mode",
            ControlOp::AgcMode => "agc_mode",
            ControlOp::DirectSampling => "direct_sampling",
            ControlOp::OffsetTuning => "offset_tuning",
            ControlOp::RtlXtalFreq => "rtl_xtal_freq",
            ControlOp::TunerXtalFreq => "tuner_xtal_freq",
            ControlOp::GainByIndex => "gain_by_index",
        };
        write!(f, "{name}")
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_freq_golden_bytes() {
        // 100 МГц → 0x05F5E100
        let cmd = Command::new(ControlOp::CenterFreq, 100_000_000);
        assert_eq!(cmd.encode(), [0x01, 0x05, 0xf5, 0xe1, 0x00]);
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let cases = [
            Command::new(ControlOp::CenterFreq, 1_602_000_000),
            Command::new(ControlOp::SampleRate, 2_400_000),
            Command::new(ControlOp::TunerGainMode, 1),
            Command::new(ControlOp::GainByIndex, 0),
            Command::new(ControlOp::TunerXtalFreq, u32::MAX),
        ];

        for cmd in cases {
            let decoded = Command::decode(&cmd.encode()).unwrap();
            assert_eq!(decoded, cmd);
        }
    }

    #[test]
    fn test_opcode_wire_values() {
        // Порядок — контракт протокола, не деталь реализации
        assert_eq!(ControlOp::CenterFreq.as_u8(), 1);
        assert_eq!(ControlOp::TunerIfGain.as_u8(), 6);
        assert_eq!(ControlOp::TestMode.as_u8(), 7);
        assert_eq!(ControlOp::GainByIndex.as_u8(), 13);
    }

    #[test]
    fn test_unknown_opcode_rejected() {
        let buf = [0x00, 0x00, 0x00, 0x00, 0x01];
        assert!(matches!(
            Command::decode(&buf),
            Err(ProtoError::UnknownOpcode(0))
        ));

        let buf = [0x0e, 0x00, 0x00, 0x00, 0x01];
        assert!(matches!(
            Command::decode(&buf),
            Err(ProtoError::UnknownOpcode(14))
        ));
    }

    #[test]
    fn test_op_display_names() {
        assert_eq!(ControlOp::CenterFreq.to_string(), "center_freq");
        assert_eq!(ControlOp::GainByIndex.to_string(), "gain_by_index");
    }
}
