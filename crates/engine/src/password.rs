//! Password hashing collaborator.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::{EngineError, ResultEngine};

pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> ResultEngine<String>;
    fn verify(&self, plaintext: &str, digest: &str) -> ResultEngine<bool>;
}

/// bcrypt-backed hasher.
#[derive(Clone, Copy, Debug)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Lower costs are only meant for tests.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> ResultEngine<String> {
        hash(plaintext, self.cost).map_err(|err| {
            tracing::error!("failed to hash password: {err}");
            EngineError::InvalidRequest("password could not be hashed".to_string())
        })
    }

    fn verify(&self, plaintext: &str, digest: &str) -> ResultEngine<bool> {
        verify(plaintext, digest).map_err(|err| {
            tracing::error!("failed to verify password: {err}");
            EngineError::Unauthorized("invalid credentials".to_string())
        })
    }
}
