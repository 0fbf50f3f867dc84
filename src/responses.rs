//! Response envelopes returned by the projects API.

use serde::Deserialize;

use crate::types::{Project, ProjectId};

/// Every API response wraps its payload as `{ code, message, data }`.
#[derive(Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Payload of `GET /api/v1/projects`.
#[derive(Deserialize)]
pub struct ProjectsData {
    /// The server encodes an empty list as `null`.
    #[serde(default)]
    pub projects: Option<Vec<Project>>,
}

/// Payload of `POST /api/v1/projects`.
#[derive(Deserialize)]
pub struct CreatedProject {
    #[serde(rename = "projectId")]
    pub project_id: Option<ProjectId>,
}

impl ApiResponse<ProjectsData> {
    pub fn into_projects(self) -> Vec<Project> {
        self.data
            .and_then(|data| data.projects)
            .unwrap_or_default()
    }
}
