use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Address parsing error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
