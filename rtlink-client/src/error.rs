use std::io;

use rtlink_proto::{ControlOp, ProtoError};
use thiserror::Error;

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Не удалось установить TCP-соединение
    #[error("connecting to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Сбой handshake: обрыв потока или неверный magic
    #[error("dongle handshake: {0}")]
    Handshake(#[from] ProtoError),

    /// Транспортная ошибка при отправке команды
    #[error("sending {op} command: {source}")]
    Send {
        op: ControlOp,
        #[source]
        source: io::Error,
    },

    /// Индекс усиления за пределами таблицы устройства
    #[error("invalid gain index {index}: device reports {count} gain values")]
    GainIndex { index: u32, count: u32 },

    /// Сбой применения одного из полей конфигурации
    #[error("configuring {field}: {source}")]
    Configure {
        field: &'static str,
        #[source]
        source: Box<ClientError>,
    },
}
