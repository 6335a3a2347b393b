//! Insertion records - the host-notification analog
//!
//! The host rendering engine reports subtree insertions as discrete
//! batches. `DocumentTree` queues one record per insertion; draining the
//! queue yields a batch in arrival order.

use serde::{Deserialize, Serialize};

use crate::dom::tree::NodeId;

/// A single reported insertion: `added` nodes were attached under `target`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationRecord {
    pub target: NodeId,
    pub added: Vec<NodeId>,
}
