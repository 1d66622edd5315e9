use thiserror::Error;

use crate::model::{ClassError, LoginValidation};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Class(#[from] ClassError),
    #[error(transparent)]
    Login(#[from] LoginValidation),
}
