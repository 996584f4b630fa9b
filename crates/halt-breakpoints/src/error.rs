use thiserror::Error;

pub type WireResult<T> = Result<T, WireError>;

#[derive(Error, Debug)]
pub enum WireError {
    #[error("breakpoint document of {len} bytes exceeds the {max} byte limit")]
    TooLarge { len: usize, max: usize },
    #[error("malformed breakpoint json: {0}")]
    Json(#[from] serde_json::Error),
}
