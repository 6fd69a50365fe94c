use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Entity model error: {0}")]
    EntityModel(String),

    #[error("Intent model error: {0}")]
    IntentModel(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BotError>;
