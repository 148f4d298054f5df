use thiserror::Error;

pub type Result<T> = std::result::Result<T, BudgetError>;

#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Invalid cost configuration: {0}")]
    InvalidConfig(String),
}

impl BudgetError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
