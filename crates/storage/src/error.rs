use std::sync::Arc;
use thiserror::Error;

/// Outcome of a failed resolve. A coalesced lookup hands the same error to
/// every waiter, hence the `Arc`.
#[derive(Error, Debug)]
pub enum Error<E> {
    #[error("{0}")]
    Lookup(Arc<E>),

    #[error("lookup aborted: {0}")]
    LookupAborted(String),
}

impl<E> Error<E> {
    /// The provider's own error, if the lookup ran to completion.
    pub fn lookup_error(&self) -> Option<&E> {
        match self {
            Self::Lookup(e) => Some(e),
            Self::LookupAborted(_) => None,
        }
    }
}

impl<E> Clone for Error<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Lookup(e) => Self::Lookup(e.clone()),
            Self::LookupAborted(msg) => Self::LookupAborted(msg.clone()),
        }
    }
}

pub type Result<T, E> = std::result::Result<T, Error<E>>;
