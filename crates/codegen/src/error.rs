use codegen_core::error::{InputError, ServiceError};

#[derive(thiserror::Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Failed to save {path}: {message}")]
    Save { path: String, message: String },
}
