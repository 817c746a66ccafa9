use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("episode is over; call reset before stepping again")]
    NeedsReset,
    #[error("no action supplied for live agent '{0}'")]
    MissingAction(String),
    #[error("action {action} for agent '{agent}' is outside the action space")]
    InvalidAction { agent: String, action: usize },
    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),
}
