use thiserror::Error;

use crate::{inference::InferenceError, router::RouterError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    Router(#[from] RouterError),
}
