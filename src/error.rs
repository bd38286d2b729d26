use thiserror::Error;

#[derive(Error, Debug)]
pub enum TushieError {
    #[error("store error: {0}")]
    Store(String),

    #[error("provisioning error: {0}")]
    Provisioning(String),

    #[error("ledger error: {0}")]
    Ledger(String),

    #[error("load error: {0}")]
    Load(String),

    #[error("no rows, no schema and no synthesized key: nothing to create")]
    EmptySchema,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TushieError>;
