//! Authentication session shared between the stores of a client.

use std::sync::Arc;

use tokio::sync::watch;

use crate::notify::{Listeners, Subscription};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub authorized: bool,
}

/// Observable login state. Cloning yields another handle to the same session.
#[derive(Clone, Debug)]
pub struct Session {
    state: Arc<watch::Sender<AuthState>>,
    listeners: Listeners<AuthState>,
}

impl Session {
    pub fn new(authorized: bool) -> Self {
        let (tx, _rx) = watch::channel(AuthState { authorized });
        Self {
            state: Arc::new(tx),
            listeners: Listeners::new(),
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.state.borrow().authorized
    }

    pub fn login(&self) {
        self.set_authorized(true);
    }

    /// Drop the session, e.g. after the server rejected the token.
    pub fn unauthorized(&self) {
        tracing::info!("session is no longer authorized");
        self.set_authorized(false);
    }

    pub fn logout(&self) {
        self.unauthorized();
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Run `callback` synchronously on every transition, in order.
    pub fn on_change<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&AuthState) + Send + 'static,
    {
        self.listeners.add(callback)
    }

    // Subscribers only hear about transitions.
    fn set_authorized(&self, authorized: bool) {
        let changed = self.state.send_if_modified(|state| {
            if state.authorized == authorized {
                return false;
            }
            state.authorized = authorized;
            true
        });

        if changed {
            self.listeners.notify(&AuthState { authorized });
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_and_logout_toggle_state() {
        let session = Session::default();
        assert!(!session.is_authorized());

        session.login();
        assert!(session.is_authorized());

        session.logout();
        assert!(!session.is_authorized());
    }

    #[test]
    fn only_transitions_notify() {
        let session = Session::new(true);
        let mut rx = session.subscribe();
        rx.borrow_and_update();

        session.login();
        assert!(!rx.has_changed().unwrap());

        session.unauthorized();
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().authorized);
    }

    #[test]
    fn on_change_sees_every_transition() {
        let session = Session::new(true);
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = session.on_change(move |state| {
            sink.lock().unwrap().push(state.authorized);
        });

        session.logout();
        session.login();
        session.login();

        assert_eq!(*seen.lock().unwrap(), [false, true]);
    }

    #[test]
    fn clones_share_state() {
        let session = Session::new(false);
        let other = session.clone();
        other.login();
        assert!(session.is_authorized());
    }
}
