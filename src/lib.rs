//! Client-side store for the projects API.
//!
//! [`ProjectStore`] keeps the last successfully fetched project list, the
//! current selection and the last load error, and follows a [`Session`] so
//! the cache is dropped on logout and reloaded on login.

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod notify;
pub mod responses;
pub mod store;
pub mod token;
pub mod types;
pub mod validate;

pub use auth::{AuthState, Session};
pub use client::{ApiClient, ProjectsApi};
pub use config::Config;
pub use error::{ProjectsError, Result};
pub use notify::Subscription;
pub use store::{ProjectListState, ProjectStore, SessionBinding};
pub use token::{FileTokenStore, TokenStore};
pub use types::{NewProject, Project, ProjectId};
pub use validate::{Field, FieldError};
