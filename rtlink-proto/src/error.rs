use thiserror::Error;

/// Результат для wire-операций протокола rtl_tcp.
pub type ProtoResult<T> = std::result::Result<T, ProtoError>;

/// Ошибки бинарного протокола rtl_tcp.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// Неправильное магическое число в handshake-записи
    #[error("invalid magic: expected {expected:02x?}, received {received:02x?}")]
    InvalidMagic {
        expected: [u8; 4],
        received: [u8; 4],
    },

    /// Неизвестный код команды (возможен только при декодировании)
    #[error("unknown opcode: {0}")]
    UnknownOpcode(u8),

    /// Ошибки ввода/вывода (автоконвертируются из std::io::Error)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
