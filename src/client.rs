use std::future::Future;

use reqwest::{Client, Response, StatusCode};
use url::Url;

use crate::error::{ProjectsError, Result};
use crate::responses::{ApiResponse, CreatedProject, ProjectsData};
use crate::types::{NewProject, Project};

const PROJECTS_PATH: &str = "api/v1/projects";

/// Remote operations the project store depends on.
pub trait ProjectsApi: Send + Sync {
    /// `GET /api/v1/projects`
    fn list_projects(&self, token: &str) -> impl Future<Output = Result<Vec<Project>>> + Send;

    /// `POST /api/v1/projects`
    fn create_project(
        &self,
        token: &str,
        project: &NewProject,
    ) -> impl Future<Output = Result<()>> + Send;
}

pub struct ApiClient {
    http: Client,
    projects_url: Url,
}

#[derive(Clone, Copy, Debug)]
enum Request {
    List,
    Create,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            projects_url: projects_endpoint(base_url)?,
        })
    }

    pub fn projects_url(&self) -> &Url {
        &self.projects_url
    }
}

impl ProjectsApi for ApiClient {
    async fn list_projects(&self, token: &str) -> Result<Vec<Project>> {
        tracing::debug!(url = %self.projects_url, "fetching projects");

        let response = self
            .http
            .get(self.projects_url.clone())
            .bearer_auth(token)
            .send()
            .await?;
        let response = check_status(Request::List, response).await?;

        let body: ApiResponse<ProjectsData> = response.json().await?;
        Ok(body.into_projects())
    }

    async fn create_project(&self, token: &str, project: &NewProject) -> Result<()> {
        tracing::debug!(url = %self.projects_url, title = %project.title, "creating project");

        let response = self
            .http
            .post(self.projects_url.clone())
            .bearer_auth(token)
            .header("Content-Type", "application/json;charset=utf-8")
            .json(project)
            .send()
            .await?;
        let response = check_status(Request::Create, response).await?;

        let body: ApiResponse<CreatedProject> = response.json().await?;
        if let Some(created) = body.data {
            tracing::debug!(project_id = ?created.project_id, "project created");
        }
        Ok(())
    }
}

/// Resolve the projects collection URL against a base URL, treating the base
/// as a directory even without a trailing slash.
fn projects_endpoint(base_url: &str) -> Result<Url> {
    let mut base =
        Url::parse(base_url).map_err(|_| ProjectsError::InvalidUrl(base_url.to_string()))?;

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(PROJECTS_PATH)
        .map_err(|_| ProjectsError::InvalidUrl(base_url.to_string()))
}

async fn check_status(request: Request, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read response body>".to_string());

    Err(status_error(request, status, message))
}

fn status_error(request: Request, status: StatusCode, message: String) -> ProjectsError {
    match (request, status) {
        (Request::List, StatusCode::UNAUTHORIZED) => ProjectsError::Unauthorized,
        (Request::Create, StatusCode::CONFLICT) => ProjectsError::Duplicate,
        _ => ProjectsError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_with_and_without_slash() {
        assert_eq!(
            projects_endpoint("http://localhost:8080").unwrap().as_str(),
            "http://localhost:8080/api/v1/projects"
        );
        assert_eq!(
            projects_endpoint("https://example.com/board/").unwrap().as_str(),
            "https://example.com/board/api/v1/projects"
        );
        assert_eq!(
            projects_endpoint("https://example.com/board").unwrap().as_str(),
            "https://example.com/board/api/v1/projects"
        );
    }

    #[test]
    fn endpoint_rejects_garbage() {
        assert!(matches!(
            projects_endpoint("not a url"),
            Err(ProjectsError::InvalidUrl(_))
        ));
    }

    #[test]
    fn list_maps_401_to_unauthorized() {
        let err = status_error(Request::List, StatusCode::UNAUTHORIZED, String::new());
        assert!(matches!(err, ProjectsError::Unauthorized));
    }

    #[test]
    fn create_maps_409_to_duplicate() {
        let err = status_error(Request::Create, StatusCode::CONFLICT, String::new());
        assert!(err.is_duplicate());
    }

    #[test]
    fn other_statuses_are_generic() {
        let err = status_error(
            Request::List,
            StatusCode::CONFLICT,
            "conflict".to_string(),
        );
        assert!(matches!(err, ProjectsError::Api { status: 409, .. }));

        let err = status_error(
            Request::Create,
            StatusCode::INTERNAL_SERVER_ERROR,
            "oops".to_string(),
        );
        assert!(matches!(err, ProjectsError::Api { status: 500, ref message } if message == "oops"));
    }

    #[test]
    fn client_exposes_resolved_url() {
        let client = ApiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(
            client.projects_url().as_str(),
            "http://localhost:8080/api/v1/projects"
        );
    }
}
