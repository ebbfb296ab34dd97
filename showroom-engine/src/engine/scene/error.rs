use thiserror::Error;

use super::graph::NodeId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("node '{node}' references unknown parent '{parent}'")]
    UnknownParent { node: String, parent: String },

    #[error("parent {0:?} is not part of the scene graph")]
    UnknownParentId(NodeId),

    #[error("node '{node}' references unknown material '{material}'")]
    UnknownMaterial { node: String, material: String },

    #[error("zone '{0}' is registered more than once")]
    DuplicateZone(String),

    #[error("zones '{first}' and '{second}' share part of their subtree")]
    OverlappingZones { first: String, second: String },
}
