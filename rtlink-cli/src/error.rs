use thiserror::Error;

pub type StreamResult<T> = std::result::Result<T, StreamError>;

#[derive(Debug, Error)]
pub enum StreamError {
    /// Ошибка клиента rtl_tcp
    #[error("rtl_tcp client: {0}")]
    Client(#[from] rtlink_client::ClientError),

    /// Ошибка записи в выходной поток
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
