pub mod init;
pub mod projects;
pub mod session;

use projects_client::{ApiClient, FileTokenStore, ProjectStore};

pub type Store = ProjectStore<ApiClient, FileTokenStore>;
