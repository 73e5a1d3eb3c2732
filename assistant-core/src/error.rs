use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0} is called before the first receive call")]
    StorageNotInitialized(&'static str),

    #[error("Failed to delete user data, response code: {code}, message: {message}")]
    DeleteUserData { code: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AssistantError>;
