use anyhow::Result;
use core::fmt;
use iroh::NodeAddr;
use iroh_gossip::proto::TopicId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Everything a player needs to find a table: the room topic and the
/// addresses of the peers already sitting at it.
#[derive(Debug, Serialize, Deserialize)]
pub struct Ticket {
    topic: TopicId,
    nodes: Vec<NodeAddr>,
}

impl Ticket {
    pub fn new(topic: TopicId, nodes: Vec<NodeAddr>) -> Self {
        Self { topic, nodes }
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(Into::into)
    }

    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn topic(&self) -> TopicId {
        self.topic
    }

    pub fn nodes(&self) -> &[NodeAddr] {
        &self.nodes
    }
}

/// Lower case base32 of the JSON form, easy to paste in a chat.
impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bytes = self.to_bytes().map_err(|_| fmt::Error)?;
        let mut text = data_encoding::BASE32_NOPAD.encode(&bytes);
        text.make_ascii_lowercase();
        write!(f, "{}", text)
    }
}

impl FromStr for Ticket {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = data_encoding::BASE32_NOPAD.decode(s.trim().to_ascii_uppercase().as_bytes())?;
        Self::from_bytes(&bytes)
    }
}
