//! Module `state`
//!
//! Authentication state of a client session.

/// Phase of a client session.
///
/// A session starts in `Authenticating` and moves to `Authenticated` exactly
/// once, when the peer sends the login marker. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Authenticating,
    Authenticated,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated)
    }
}
