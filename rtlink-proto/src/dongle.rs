use std::io::Read;

use byteorder::{BigEndian, ByteOrder};

use crate::{
    error::{ProtoError, ProtoResult},
    tuner::TunerKind,
};

/// Магическое число handshake-записи: b"RTL0".
pub const DONGLE_MAGIC: [u8; 4] = [b'R', b'T', b'L', b'0'];

/// Размер handshake-записи: magic(4) + tuner(4) + gain_count(4).
pub const DONGLE_INFO_SIZE: usize = 12;

/// Идентификационная запись донгла, которую сервер отправляет один раз,
/// сразу после установки соединения. После чтения не изменяется.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DongleInfo {
    /// Сырые 4 байта magic (не строка)
    pub magic: [u8; 4],
    /// Тип тюнера
    pub tuner: TunerKind,
    /// Кол-во валидных значений усиления (для установки gain по индексу)
    pub gain_count: u32,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl DongleInfo {
    /// Декодирует 12 байт handshake-записи. Без валидации magic.
    pub fn decode(buf: &[u8; DONGLE_INFO_SIZE]) -> Self {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&buf[0..4]);

        Self {
            magic,
            tuner: TunerKind::from_u32(BigEndian::read_u32(&buf[4..8])),
            gain_count: BigEndian::read_u32(&buf[8..12]),
        }
    }

    /// Кодирует запись обратно в 12 байт (для фейковых серверов и тестов).
    pub fn encode(&self) -> [u8; DONGLE_INFO_SIZE] {
        let mut buf = [0u8; DONGLE_INFO_SIZE];
        buf[0..4].copy_from_slice(&self.magic);
        BigEndian::write_u32(&mut buf[4..8], self.tuner.as_u32());
        BigEndian::write_u32(&mut buf[8..12], self.gain_count);
        buf
    }

    /// Проверяет, что полученный magic совпадает с b"RTL0".
    pub fn is_valid(&self) -> bool {
        self.magic == DONGLE_MAGIC
    }

    /// То же, что [`is_valid`](Self::is_valid), но с диагностикой:
    /// ошибка несёт и ожидаемые, и полученные байты.
    pub fn validate(&self) -> ProtoResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ProtoError::InvalidMagic {
                expected: DONGLE_MAGIC,
                received: self.magic,
            })
        }
    }

    /// Читает ровно 12 байт из потока, декодирует и валидирует запись.
    ///
    /// Единственный потребитель начальных байт протокола: после успешного
    /// возврата все дальнейшие байты соединения — либо исходящие команды,
    /// либо входящий поток выборок. Короткое чтение или обрыв соединения
    /// возвращаются как [`ProtoError::Io`].
    pub fn read_from<R: Read>(reader: &mut R) -> ProtoResult<Self> {
        let mut buf = [0u8; DONGLE_INFO_SIZE];
        reader.read_exact(&mut buf)?;

        let info = Self::decode(&buf);
        info.validate()?;

        Ok(info)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для DongleInfo
////////////////////////////////////////////////////////////////////////////////

impl std::fmt::Display for DongleInfo {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{{Magic:{:?} Tuner:{} GainCount:{}}}",
            String::from_utf8_lossy(&self.magic),
            self.tuner,
            self.gain_count
        )
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const GOLDEN: [u8; DONGLE_INFO_SIZE] = [
        0x52, 0x54, 0x4c, 0x30, // "RTL0"
        0x00, 0x00, 0x00, 0x01, // E4000
        0x00, 0x00, 0x00, 0x0a, // 10 значений усиления
    ];

    #[test]
    fn test_decode_golden_record() {
        let info = DongleInfo::decode(&GOLDEN);

        assert_eq!(info.magic, DONGLE_MAGIC);
        assert_eq!(info.tuner, TunerKind::E4000);
        assert_eq!(info.gain_count, 10);
        assert!(info.is_valid());
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let info = DongleInfo::decode(&GOLDEN);
        assert_eq!(info.encode(), GOLDEN);
    }

    #[test]
    fn test_invalid_magic_carries_both_sides() {
        let mut buf = GOLDEN;
        buf[0..4].copy_from_slice(b"XXXX");

        let info = DongleInfo::decode(&buf);
        assert!(!info.is_valid());

        match info.validate() {
            Err(ProtoError::InvalidMagic { expected, received }) => {
                assert_eq!(expected, DONGLE_MAGIC);
                assert_eq!(&received, b"XXXX");
            }
            other => panic!("expected InvalidMagic, got {other:?}"),
        }
    }

    #[test]
    fn test_read_from_consumes_exactly_12_bytes() {
        // После handshake-записи идёт поток выборок — он не должен
        // затрагиваться
        let mut stream = GOLDEN.to_vec();
        stream.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

        let mut cursor = Cursor::new(stream);
        let info = DongleInfo::read_from(&mut cursor).unwrap();

        assert_eq!(info.gain_count, 10);
        assert_eq!(cursor.position(), DONGLE_INFO_SIZE as u64);
    }

    #[test]
    fn test_short_read_is_io_error() {
        let mut cursor = Cursor::new(vec![0x52, 0x54, 0x4c]);

        match DongleInfo::read_from(&mut cursor) {
            Err(ProtoError::Io(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof);
            }
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn test_display_format() {
        let info = DongleInfo::decode(&GOLDEN);
        assert_eq!(
            info.to_string(),
            "{Magic:\"RTL0\" Tuner:E4000 GainCount:10}"
        );
    }
}
