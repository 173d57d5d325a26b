use chrono::Utc;
use rand::distr::Alphanumeric;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Mutex;
use thiserror::Error;

/// Credential mismatch. Deliberately carries no detail about which check
/// failed.
#[derive(Debug, Error)]
#[error("Invalid password")]
pub struct AuthError;

/// Opaque marker returned on a successful login. It embeds the issuance
/// time plus random material so two logins never produce the same marker,
/// but it carries no signature or expiry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionToken(pub String);

impl SessionToken {
    fn generate() -> SessionToken {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        SessionToken(format!("{}-{}", Utc::now().timestamp_millis(), suffix))
    }
}

/// Validates the shared admin secret and issues session markers.
///
/// The comparison is a plain exact match against the configured secret.
/// Issued markers are remembered for the life of the process so the optional
/// auth-enforcement layer can recognize them; nothing about them is
/// verifiable on its own.
pub struct AdminGate {
    password: String,
    enforce_auth: bool,
    issued: Mutex<HashSet<String>>,
}

impl AdminGate {
    pub fn new(password: String, enforce_auth: bool) -> Self {
        AdminGate {
            password,
            enforce_auth,
            issued: Mutex::new(HashSet::new()),
        }
    }

    pub fn authenticate(&self, candidate: &str) -> Result<SessionToken, AuthError> {
        if candidate != self.password {
            return Err(AuthError);
        }
        let token = SessionToken::generate();
        self.issued.lock().unwrap().insert(token.0.clone());
        Ok(token)
    }

    /// Whether this marker was issued by a successful login in this process.
    pub fn verify(&self, token: &str) -> bool {
        self.issued.lock().unwrap().contains(token)
    }

    /// Whether mutating content endpoints require a session marker.
    pub fn enforce_auth(&self) -> bool {
        self.enforce_auth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_password_never_yields_a_marker() {
        let gate = AdminGate::new("hunter2".to_string(), false);
        assert!(gate.authenticate("wrong").is_err());
        assert!(gate.authenticate("").is_err());
    }

    #[test]
    fn successful_logins_yield_distinct_markers() {
        let gate = AdminGate::new("hunter2".to_string(), false);
        let first = gate.authenticate("hunter2").unwrap();
        let second = gate.authenticate("hunter2").unwrap();

        assert_ne!(first, second);
        assert!(!first.0.is_empty());
    }

    #[test]
    fn verify_only_accepts_issued_markers() {
        let gate = AdminGate::new("hunter2".to_string(), true);
        let token = gate.authenticate("hunter2").unwrap();

        assert!(gate.verify(&token.0));
        assert!(!gate.verify("fabricated"));
    }
}
