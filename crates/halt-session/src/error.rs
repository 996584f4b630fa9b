use thiserror::Error;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Proto(#[from] halt_proto::ProtoError),
    #[error("malformed trace export: {0}")]
    TraceExport(#[from] serde_json::Error),
}
