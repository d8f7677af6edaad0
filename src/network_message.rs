use anyhow::Result;
use core_mechanics::board::{Action, Board};
use iroh::NodeId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything said at a shared table. Only the table host sends
/// `Announcement` and `BoardStateUpdated`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    JoinTable {
        from: NodeId,
        name: String,
        message_id: Uuid,
    },
    StartGame {
        from: NodeId,
        message_id: Uuid,
    },
    Action {
        from: NodeId,
        action: Action,
        message_id: Uuid,
    },
    Announcement {
        from: NodeId,
        message: String,
        message_id: Uuid,
    },
    BoardStateUpdated {
        from: NodeId,
        board: Board,
        message_id: Uuid,
    },
}

impl Message {
    pub fn join_table(from: NodeId, name: impl Into<String>) -> Self {
        Message::JoinTable {
            from,
            name: name.into(),
            message_id: Uuid::new_v4(),
        }
    }

    pub fn start_game(from: NodeId) -> Self {
        Message::StartGame {
            from,
            message_id: Uuid::new_v4(),
        }
    }

    pub fn action(from: NodeId, action: Action) -> Self {
        Message::Action {
            from,
            action,
            message_id: Uuid::new_v4(),
        }
    }

    pub fn announcement(from: NodeId, message: impl Into<String>) -> Self {
        Message::Announcement {
            from,
            message: message.into(),
            message_id: Uuid::new_v4(),
        }
    }

    pub fn board_state_updated(from: NodeId, board: Board) -> Self {
        Message::BoardStateUpdated {
            from,
            board,
            message_id: Uuid::new_v4(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(Into::into)
    }

    pub fn to_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(Into::into)
    }
}
