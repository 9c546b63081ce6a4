//! Клиент протокола управления rtl_tcp
//!
//! Устанавливает соединение с rtl_tcp-сервером, читает идентификационную
//! запись донгла и отправляет команды конфигурации. Поток выборок читается
//! отдельно, через клон сокета — управляющий и data-канал не смешиваются.

pub mod config;
pub mod device;
pub mod error;

pub use config::*;
pub use device::*;
pub use error::*;
