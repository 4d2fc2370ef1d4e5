//! Session settings parsing in debug and release modes.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;
use uuid::Uuid;

struct TempKeyFile {
    path: PathBuf,
}

impl TempKeyFile {
    fn new(len: usize) -> Self {
        let path = std::env::temp_dir().join(format!("shuttle-session-key-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b'k'; len]).expect("write key file");
        Self { path }
    }

    fn path_str(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl Drop for TempKeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn env_with(vars: &[(&str, &str)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string().times(0..).returning(move |key| vars.get(key).cloned());
    env
}

#[rstest]
fn release_accepts_a_complete_configuration() {
    let key = TempKeyFile::new(SESSION_KEY_MIN_LEN);
    let path = key.path_str();
    let env = env_with(&[
        (KEY_FILE_ENV, &path),
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Strict"),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ]);
    let settings = session_settings_from_env(&env, BuildMode::Release).expect("valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
fn release_requires_cookie_secure() {
    let env = env_with(&[]);
    let err = session_settings_from_env(&env, BuildMode::Release).err();
    assert!(matches!(
        err,
        Some(SessionConfigError::MissingEnv { name: COOKIE_SECURE_ENV })
    ));
}

#[rstest]
#[case("maybe")]
#[case("")]
fn release_rejects_malformed_booleans(#[case] value: &str) {
    let env = env_with(&[(COOKIE_SECURE_ENV, value)]);
    let err = session_settings_from_env(&env, BuildMode::Release).err();
    assert!(matches!(err, Some(SessionConfigError::InvalidEnv { .. })));
}

#[rstest]
fn release_rejects_samesite_none_without_secure() {
    let env = env_with(&[(COOKIE_SECURE_ENV, "0"), (SAMESITE_ENV, "None")]);
    let err = session_settings_from_env(&env, BuildMode::Release).err();
    assert!(matches!(err, Some(SessionConfigError::InsecureSameSiteNone)));
}

#[rstest]
fn release_rejects_ephemeral_keys() {
    let env = env_with(&[
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Lax"),
        (ALLOW_EPHEMERAL_ENV, "yes"),
    ]);
    let err = session_settings_from_env(&env, BuildMode::Release).err();
    assert!(matches!(err, Some(SessionConfigError::EphemeralNotAllowed)));
}

#[rstest]
fn release_rejects_short_keys() {
    let key = TempKeyFile::new(8);
    let path = key.path_str();
    let env = env_with(&[
        (KEY_FILE_ENV, &path),
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Lax"),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ]);
    let err = session_settings_from_env(&env, BuildMode::Release).err();
    assert!(matches!(err, Some(SessionConfigError::KeyTooShort { length: 8, .. })));
}

#[rstest]
fn debug_defaults_to_secure_lax_and_a_generated_key() {
    let env = env_with(&[(KEY_FILE_ENV, "/nonexistent/shuttle/session_key")]);
    let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
#[case("TRUE", Some(true))]
#[case("n", Some(false))]
#[case("2", None)]
fn booleans_accept_common_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool(raw), expected);
}
