use std::fmt;

use serde::{Deserialize, Serialize};

/// A block header reduced to what the timestamp search needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub number: u64,
    /// Unix seconds.
    pub timestamp: u64,
}

/// Which block a contract read is evaluated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockTag {
    Number(u64),
    Latest,
}

impl From<u64> for BlockTag {
    fn from(number: u64) -> Self {
        BlockTag::Number(number)
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockTag::Number(n) => write!(f, "block {n}"),
            BlockTag::Latest => write!(f, "latest block"),
        }
    }
}
