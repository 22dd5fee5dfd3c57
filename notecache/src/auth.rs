use log::info;
use tokio::sync::watch;
use crate::user_id::UserId;

/// Who is signed in right now.
pub trait AuthProvider: Send + Sync {
    fn current_user_id(&self) -> Option<UserId>;

    /// Sees every sign-in and sign-out from now on.
    fn auth_state_changes(&self) -> watch::Receiver<Option<UserId>>;
}

/// Sign-in state kept in the process, no identity provider involved.
pub struct LocalAuth {
    current_user: watch::Sender<Option<UserId>>,
}

impl LocalAuth {
    pub fn new() -> Self {
        LocalAuth {
            current_user: watch::Sender::new(None),
        }
    }

    pub fn signed_in(user_id: UserId) -> Self {
        let ret = Self::new();
        ret.sign_in(user_id);
        ret
    }

    pub fn sign_in(&self, user_id: UserId) {
        info!("user \"{user_id}\" signed in");
        self.current_user.send_replace(Some(user_id));
    }

    pub fn sign_out(&self) {
        if let Some(user_id) = self.current_user.send_replace(None) {
            info!("user \"{user_id}\" signed out");
        }
    }
}

impl Default for LocalAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthProvider for LocalAuth {
    fn current_user_id(&self) -> Option<UserId> {
        self.current_user.borrow().clone()
    }

    fn auth_state_changes(&self) -> watch::Receiver<Option<UserId>> {
        self.current_user.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::user;
    use super::*;

    #[test]
    fn starts_signed_out() {
        assert_eq!(LocalAuth::new().current_user_id(), None);
    }

    #[test]
    fn sign_in_and_out() {
        let auth = LocalAuth::signed_in(user("u1"));
        assert_eq!(auth.current_user_id(), Some(user("u1")));
        auth.sign_in(user("u2"));
        assert_eq!(auth.current_user_id(), Some(user("u2")));
        auth.sign_out();
        auth.sign_out();
        assert_eq!(auth.current_user_id(), None);
    }

    #[tokio::test]
    async fn changes_are_observable() {
        let auth = LocalAuth::new();
        let mut changes = auth.auth_state_changes();
        auth.sign_in(user("u1"));
        changes.changed().await.expect("sender is alive");
        assert_eq!(*changes.borrow_and_update(), Some(user("u1")));
        auth.sign_out();
        changes.changed().await.expect("sender is alive");
        assert_eq!(*changes.borrow_and_update(), None);
    }
}
