//! Observable cache of the user's projects.
//!
//! The store owns a single [`ProjectListState`]. Every change is published to
//! a `tokio::sync::watch` channel (latest value only) and to the callbacks
//! registered with [`ProjectStore::subscribe_with`] (every value, in order).
//! It is filled by [`ProjectStore::refresh`], emptied the moment the
//! [`Session`] loses authorization and refilled when it regains it (see
//! [`ProjectStore::bind_session`]).

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::auth::Session;
use crate::client::ProjectsApi;
use crate::error::{ProjectsError, Result};
use crate::notify::{Listeners, Subscription};
use crate::token::TokenStore;
use crate::types::{NewProject, Project, ProjectId};
use crate::validate::{self, Field, FieldError};

/// Message stored in [`ProjectListState::error`] when a refresh fails.
pub const LOAD_ERROR: &str = "Load projects error";

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProjectListState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<Project>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<ProjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProjectListState {
    pub fn is_empty(&self) -> bool {
        self.list.is_none() && self.current.is_none() && self.error.is_none()
    }

    pub fn projects(&self) -> &[Project] {
        self.list.as_deref().unwrap_or_default()
    }

    /// The selected project, if it is present in the loaded list.
    pub fn current_project(&self) -> Option<&Project> {
        let current = self.current?;
        self.projects().iter().find(|p| p.id == Some(current))
    }
}

pub struct ProjectStore<A, T> {
    api: A,
    tokens: T,
    session: Session,
    state: watch::Sender<ProjectListState>,
    listeners: Listeners<ProjectListState>,
}

impl<A: ProjectsApi, T: TokenStore> ProjectStore<A, T> {
    pub fn new(api: A, tokens: T, session: Session) -> Self {
        let (state, _rx) = watch::channel(ProjectListState::default());
        Self {
            api,
            tokens,
            session,
            state,
            listeners: Listeners::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Receiver that sees the current state at once and every later change.
    pub fn subscribe(&self) -> watch::Receiver<ProjectListState> {
        self.state.subscribe()
    }

    /// Run `callback` with the current state now and synchronously after
    /// every change, until the returned handle is dropped or unsubscribed.
    pub fn subscribe_with<F>(&self, mut callback: F) -> Subscription
    where
        F: FnMut(&ProjectListState) + Send + 'static,
    {
        callback(&self.snapshot());
        self.listeners.add(callback)
    }

    pub fn snapshot(&self) -> ProjectListState {
        self.state.borrow().clone()
    }

    /// Reload the list from the server.
    ///
    /// Without a token this does nothing. A list that arrives after the
    /// session stopped being authorized is discarded. Failures never
    /// propagate: they are logged and recorded in [`ProjectListState::error`],
    /// keeping the list from the last successful load.
    pub async fn refresh(&self) {
        let Some(token) = self.tokens.token() else {
            tracing::debug!("no token, skipping project refresh");
            return;
        };

        match self.api.list_projects(&token).await {
            Ok(_) if !self.session.is_authorized() => {
                tracing::debug!("session ended during refresh, dropping projects");
            }
            Ok(projects) => {
                tracing::debug!(count = projects.len(), "projects loaded");
                self.set(ProjectListState {
                    list: Some(projects),
                    ..ProjectListState::default()
                });
            }
            Err(e) => {
                if matches!(e, ProjectsError::Unauthorized) {
                    self.session.unauthorized();
                }
                tracing::warn!(error = %e, "failed to load projects");
                self.update(|state| {
                    state.error = Some(LOAD_ERROR.to_string());
                });
            }
        }
    }

    /// Create a project and reload the list once the server accepts it.
    ///
    /// A missing token also marks the session unauthorized.
    pub async fn try_create(&self, data: &NewProject) -> Result<()> {
        let Some(token) = self.tokens.token() else {
            self.session.unauthorized();
            return Err(ProjectsError::MissingToken);
        };

        self.api.create_project(&token, data).await?;
        self.refresh().await;
        Ok(())
    }

    /// Callback form of [`try_create`](Self::try_create): returns whether the
    /// project was created and hands any request failure to `on_error`.
    ///
    /// A missing token is not reported to `on_error`; the session is marked
    /// unauthorized instead.
    pub async fn create<F>(&self, data: &NewProject, on_error: F) -> bool
    where
        F: FnOnce(ProjectsError),
    {
        match self.try_create(data).await {
            Ok(()) => true,
            Err(ProjectsError::MissingToken) => false,
            Err(e) => {
                tracing::debug!(error = %e, "project create failed");
                on_error(e);
                false
            }
        }
    }

    pub fn set_current(&self, id: ProjectId) {
        self.update(|state| state.current = Some(id));
    }

    pub fn unset_current(&self) {
        self.update(|state| state.current = None);
    }

    /// Drop everything cached.
    pub fn release(&self) {
        self.set(ProjectListState::default());
    }

    pub fn validate(&self, data: &NewProject) -> std::result::Result<(), Vec<FieldError>> {
        validate::validate(data)
    }

    pub fn validate_prop(&self, field: Field, value: &str) -> std::result::Result<(), FieldError> {
        validate::validate_prop(field, value)
    }

    fn set(&self, state: ProjectListState) {
        self.state.send_replace(state);
        self.publish();
    }

    fn update(&self, modify: impl FnOnce(&mut ProjectListState)) {
        self.state.send_modify(modify);
        self.publish();
    }

    fn publish(&self) {
        self.listeners.notify(&self.snapshot());
    }
}

impl<A, T> ProjectStore<A, T>
where
    A: ProjectsApi + 'static,
    T: TokenStore + 'static,
{
    /// Follow the session: release the cache as soon as it stops being
    /// authorized and refresh whenever it becomes authorized. The current
    /// session state is applied first.
    ///
    /// The release runs synchronously inside the logout call, so a logout
    /// immediately followed by a login still empties the cache. The refresh
    /// runs on a spawned task; must be called from within a tokio runtime.
    pub fn bind_session(self: &Arc<Self>) -> SessionBinding {
        let weak = Arc::downgrade(self);
        let on_logout = self.session.on_change(move |auth| {
            if auth.authorized {
                return;
            }
            if let Some(store) = weak.upgrade() {
                store.release();
            }
        });

        let store = Arc::clone(self);
        let mut auth = self.session.subscribe();

        let task = tokio::spawn(async move {
            loop {
                let authorized = auth.borrow_and_update().authorized;
                if authorized {
                    store.refresh().await;
                } else {
                    store.release();
                }

                if auth.changed().await.is_err() {
                    break;
                }
            }
        });

        SessionBinding {
            task,
            _on_logout: on_logout,
        }
    }
}

/// Handle returned by [`ProjectStore::bind_session`]; dropping it stops
/// following the session.
pub struct SessionBinding {
    task: JoinHandle<()>,
    _on_logout: Subscription,
}

impl SessionBinding {
    pub fn unbind(self) {
        drop(self);
    }
}

impl Drop for SessionBinding {
    fn drop(&mut self) {
        self.task.abort();
    }
}
