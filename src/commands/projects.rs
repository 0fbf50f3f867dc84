use tabled::Tabled;

use projects_client::cache::Cache;
use projects_client::error::{ProjectsError, Result};
use projects_client::validate;
use projects_client::{
    Field, NewProject, Project, ProjectListState, ProjectStore, ProjectsApi, TokenStore,
};

use crate::cli::{CreateArgs, UseArgs};
use crate::output;

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl ProjectRow {
    fn new(project: &Project, current: bool) -> Self {
        Self {
            marker: if current { "*" } else { "" },
            id: project.id.map(|id| id.to_string()).unwrap_or_default(),
            title: project.title.clone(),
            description: output::truncate(project.description.as_deref().unwrap_or_default(), 60),
        }
    }
}

fn print_projects(state: &ProjectListState) {
    output::print_table(state.projects(), |p| {
        ProjectRow::new(p, p.id.is_some() && p.id == state.current)
    });
}

/// Reload the store and apply the persisted selection.
async fn load<A: ProjectsApi, T: TokenStore>(
    store: &ProjectStore<A, T>,
    cache: &Cache,
) -> Result<ProjectListState> {
    store.refresh().await;

    if !store.session().is_authorized() {
        return Err(ProjectsError::Unauthorized);
    }
    if store.snapshot().error.is_some() {
        return Err(ProjectsError::LoadFailed);
    }

    if let Some(id) = cache.current() {
        store.set_current(id);
    }
    Ok(store.snapshot())
}

pub async fn list<A: ProjectsApi, T: TokenStore>(
    store: &ProjectStore<A, T>,
    cache: &Cache,
) -> Result<()> {
    let state = load(store, cache).await?;
    print_projects(&state);
    Ok(())
}

/// Create a project. Once the server has accepted it the command succeeds,
/// even when reloading the list afterwards fails.
pub async fn create<A: ProjectsApi, T: TokenStore>(
    store: &ProjectStore<A, T>,
    cache: &Cache,
    args: CreateArgs,
) -> Result<()> {
    let data = NewProject {
        title: args.title,
        description: args.description,
    };

    store
        .validate(&data)
        .map_err(|errors| ProjectsError::Validation { errors })?;

    let mut failure = None;
    if !store.create(&data, |e| failure = Some(e)).await {
        return Err(failure.unwrap_or(ProjectsError::MissingToken));
    }

    output::print_message(&format!("Created project '{}'", data.title));

    if store.snapshot().error.is_some() {
        output::print_warning(&ProjectsError::LoadFailed.to_string());
        return Ok(());
    }

    if let Some(id) = cache.current() {
        store.set_current(id);
    }
    if !output::is_json_output() {
        print_projects(&store.snapshot());
    }
    Ok(())
}

/// Forget the persisted selection. Needs neither a token nor the server.
pub fn clear_current(cache: &mut Cache) {
    cache.set_current(None);
    cache.save();
    output::print_message("Cleared current project");
}

pub async fn use_project<A: ProjectsApi, T: TokenStore>(
    store: &ProjectStore<A, T>,
    cache: &mut Cache,
    args: UseArgs,
) -> Result<()> {
    let Some(id) = args.id.filter(|_| !args.clear) else {
        store.unset_current();
        clear_current(cache);
        return Ok(());
    };

    let state = load(store, cache).await?;
    let project = state
        .projects()
        .iter()
        .find(|p| p.id == Some(id))
        .ok_or(ProjectsError::ProjectNotFound(id))?;

    store.set_current(id);
    cache.set_current(Some(id));
    cache.save();

    output::print_message(&format!("Current project: {} ({id})", project.title));
    Ok(())
}

pub fn validate(field: Field, value: &str) -> Result<()> {
    validate::validate_prop(field, value)
        .map_err(|e| ProjectsError::Validation { errors: vec![e] })?;

    output::print_message(&format!("{field} is valid"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use projects_client::Session;

    use super::*;

    /// Accepts every create but fails every list request.
    #[derive(Clone, Default)]
    struct ListOutage {
        creates: Arc<AtomicUsize>,
    }

    impl ProjectsApi for ListOutage {
        async fn list_projects(&self, _token: &str) -> Result<Vec<Project>> {
            Err(ProjectsError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }

        async fn create_project(&self, _token: &str, _project: &NewProject) -> Result<()> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Token;

    impl TokenStore for Token {
        fn token(&self) -> Option<String> {
            Some("token".to_string())
        }
    }

    #[tokio::test]
    async fn create_succeeds_when_only_the_reload_fails() {
        let api = ListOutage::default();
        let store = ProjectStore::new(api.clone(), Token, Session::new(true));
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::load_from(&dir.path().join("state.json"));

        let args = CreateArgs {
            title: "Backend".to_string(),
            description: None,
        };
        create(&store, &cache, args).await.unwrap();

        assert_eq!(api.creates.load(Ordering::SeqCst), 1);
        assert!(store.snapshot().error.is_some());
    }

    #[tokio::test]
    async fn list_reports_load_failure() {
        let store = ProjectStore::new(ListOutage::default(), Token, Session::new(true));
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::load_from(&dir.path().join("state.json"));

        assert!(matches!(
            list(&store, &cache).await,
            Err(ProjectsError::LoadFailed)
        ));
    }

    #[test]
    fn clear_current_persists_without_a_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut cache = Cache::load_from(&path);
        cache.set_current(Some(4));
        cache.save();

        let mut cache = Cache::load_from(&path);
        clear_current(&mut cache);

        assert_eq!(Cache::load_from(&path).current(), None);
    }

    fn project(id: Option<i64>, description: Option<&str>) -> Project {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": "Backend",
            "description": description,
        }))
        .unwrap()
    }

    #[test]
    fn row_marks_current_project() {
        let row = ProjectRow::new(&project(Some(4), Some("API")), true);
        assert_eq!(row.marker, "*");
        assert_eq!(row.id, "4");
        assert_eq!(row.description, "API");
    }

    #[test]
    fn row_tolerates_missing_fields() {
        let row = ProjectRow::new(&project(None, None), false);
        assert_eq!(row.marker, "");
        assert_eq!(row.id, "");
        assert_eq!(row.description, "");
    }
}
