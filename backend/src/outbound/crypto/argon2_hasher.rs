//! Argon2id implementation of [`CredentialHasher`].
//!
//! Hashes are stored as PHC strings, so parameters travel with each hash and
//! can be raised later without invalidating existing accounts.

use argon2::password_hash::{PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use rand::RngCore;
use rand::rngs::OsRng;
use tokio::task;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{CredentialHasher, CredentialHasherError};

const SALT_LEN: usize = 16;

/// Argon2id hasher; work runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct Argon2CredentialHasher {
    params: Params,
}

impl Default for Argon2CredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Argon2CredentialHasher {
    /// Hasher using the crate's recommended Argon2id parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Hasher with explicit cost parameters. Tests use this to stay fast.
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::default(), self.params.clone())
    }
}

fn hash_blocking(argon2: &Argon2<'_>, password: &[u8]) -> Result<String, CredentialHasherError> {
    let mut salt_bytes = [0_u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|err| CredentialHasherError::hashing(err.to_string()))?;
    argon2
        .hash_password(password, &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| CredentialHasherError::hashing(err.to_string()))
}

fn verify_blocking(argon2: &Argon2<'_>, password: &[u8], phc: &str) -> Result<bool, CredentialHasherError> {
    let parsed = PhcHash::new(phc).map_err(|err| CredentialHasherError::malformed_hash(err.to_string()))?;
    Ok(argon2.verify_password(password, &parsed).is_ok())
}

fn join_error(err: task::JoinError) -> CredentialHasherError {
    CredentialHasherError::hashing(format!("hashing task failed: {err}"))
}

#[async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHasherError> {
        let argon2 = self.argon2();
        let material = Zeroizing::new(password.as_bytes().to_vec());
        let phc = task::spawn_blocking(move || hash_blocking(&argon2, &material))
            .await
            .map_err(join_error)??;
        Ok(PasswordHash::new(phc))
    }

    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, CredentialHasherError> {
        let argon2 = self.argon2();
        let material = Zeroizing::new(password.as_bytes().to_vec());
        let phc = hash.as_str().to_owned();
        task::spawn_blocking(move || verify_blocking(&argon2, &material, &phc))
            .await
            .map_err(join_error)?
    }
}
