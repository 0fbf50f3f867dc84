use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type ProjectId = i64;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProjectId>,
    #[serde(rename = "ownerId", default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "defaultPermissions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub default_permissions: Option<Permissions>,
    /// Fields the client does not interpret, kept as the server sent them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissions {
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
    #[serde(default)]
    pub admin: bool,
}

/// Body of a create request.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
