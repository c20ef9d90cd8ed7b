use std::any::Any;

/// Failure of a single periodic tick. The timer stays armed after either.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    #[error("tick {tick}: mutation failed: {source}")]
    Mutation {
        tick: u64,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
    #[error("tick {tick}: mutation panicked: {message}")]
    Panicked { tick: u64, message: String },
}

impl TickError {
    pub fn tick(&self) -> u64 {
        match self {
            TickError::Mutation { tick, .. } | TickError::Panicked { tick, .. } => *tick,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid interval {0:?}: expected a whole number of seconds")]
    InvalidInterval(String),
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    }
}
