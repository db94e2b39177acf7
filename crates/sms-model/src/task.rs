use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    #[default]
    Pending,
    Sent,
    Failed,
}

/// A single outbound SMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub to: String,
    pub message: String,
}

impl OutboundMessage {
    pub fn new(to: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            message: message.into(),
        }
    }
}

/// Bundle of notification messages owed to one contact tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub state: TaskState,
    pub messages: Vec<OutboundMessage>,
}

impl Task {
    pub fn pending(messages: Vec<OutboundMessage>) -> Self {
        Self {
            state: TaskState::Pending,
            messages,
        }
    }
}
