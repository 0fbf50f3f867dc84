mod project;

pub use project::{NewProject, Permissions, Project, ProjectId};
