//! Бинарный протокол rtl_tcp
//!
//! Wire-типы и кодек протокола управления, который экспонирует
//! rtl_tcp-сервер для удалённого RTL-SDR донгла. Все многобайтовые числа
//! передаются в порядке big-endian (сетевая последовательность), записи
//! фиксированной длины, без length-префиксов.
//!
//! # Быстрый старт
//!
//! ```
//! use rtlink_proto::{Command, ControlOp};
//!
//! let cmd = Command::new(ControlOp::CenterFreq, 100_000_000);
//! assert_eq!(cmd.encode(), [0x01, 0x05, 0xf5, 0xe1, 0x00]);
//! ```

pub mod command;
pub mod dongle;
pub mod error;
pub mod tuner;

pub use command::*;
pub use dongle::*;
pub use error::*;
pub use tuner::*;

/// Версия библиотеки.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
