use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingError {
    #[error("1 or 2 arguments must be given, got {0}")]
    InvalidArgumentCount(usize),
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("Given object is not observable")]
    NotObservable,
    #[error("No object is bound")]
    NoBoundObject,
    #[error("Binding is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, BindingError>;
