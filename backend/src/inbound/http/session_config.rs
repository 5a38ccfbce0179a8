//! Session cookie settings read from `ROTA_SESSION_*` variables.
//!
//! | Variable                        | Debug default | Release        |
//! |---------------------------------|---------------|----------------|
//! | `ROTA_SESSION_COOKIE_SECURE`    | `true`        | required       |
//! | `ROTA_SESSION_SAMESITE`         | `Lax`         | required       |
//! | `ROTA_SESSION_ALLOW_EPHEMERAL`  | `false`       | required, `0`  |
//! | `ROTA_SESSION_KEY_FILE`         | see below     | see below      |
//!
//! The key file defaults to `/var/run/secrets/rota_session_key`. Debug builds
//! generate a throwaway key when it cannot be read.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::{info, warn};
use zeroize::Zeroizing;

const DEFAULT_KEY_FILE: &str = "/var/run/secrets/rota_session_key";
const MIN_KEY_BYTES: usize = 64;
const FLAG_VALUES: &str = "1|0|true|false|yes|no|on|off";
const SAME_SITE_VALUES: &str = "Strict|Lax|None";

pub(crate) const COOKIE_SECURE_ENV: &str = "ROTA_SESSION_COOKIE_SECURE";
pub(crate) const SAMESITE_ENV: &str = "ROTA_SESSION_SAMESITE";
pub(crate) const ALLOW_EPHEMERAL_ENV: &str = "ROTA_SESSION_ALLOW_EPHEMERAL";
pub(crate) const KEY_FILE_ENV: &str = "ROTA_SESSION_KEY_FILE";

/// How strictly session variables are validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing or malformed values fall back to defaults with a warning.
    Debug,
    /// Every variable must be present and valid.
    Release,
}

impl BuildMode {
    /// Pick the mode matching `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rota::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Resolved session cookie settings.
pub struct SessionSettings {
    /// Key encrypting the session cookie.
    pub key: Key,
    /// Whether the cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
    /// `SameSite` attribute of the cookie.
    pub same_site: SameSite,
}

/// Reasons session settings could not be resolved.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("{name} must be set")]
    MissingEnv { name: &'static str },
    #[error("{name}='{value}' is not one of {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("cannot read session key {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key {path} holds {length} bytes; at least {min_len} are required")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SameSite=None needs {COOKIE_SECURE_ENV} enabled")]
    InsecureSameSiteNone,
    #[error("{ALLOW_EPHEMERAL_ENV} cannot be enabled in release builds")]
    EphemeralNotAllowed,
}

/// Resolve session settings from the environment.
///
/// # Examples
///
/// ```rust
/// use rota::inbound::http::session_config::{BuildMode, session_settings_from_env};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
///
/// let settings = session_settings_from_env(&env, BuildMode::Debug)?;
/// assert!(settings.cookie_secure);
/// # Ok(())
/// # }
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let reader = SessionEnv { env, mode };
    let cookie_secure = reader.flag(COOKIE_SECURE_ENV, true)?;
    let same_site = reader.same_site(cookie_secure)?;
    let allow_ephemeral = reader.flag(ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = reader.key(allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

struct SessionEnv<'a, E> {
    env: &'a E,
    mode: BuildMode,
}

impl<E: Env> SessionEnv<'_, E> {
    /// Substitute `fallback` in debug builds, otherwise surface `error`.
    fn lenient<T>(&self, fallback: T, error: SessionConfigError) -> Result<T, SessionConfigError> {
        match self.mode {
            BuildMode::Debug => {
                warn!(%error, "session setting falls back to its default");
                Ok(fallback)
            }
            BuildMode::Release => Err(error),
        }
    }

    fn flag(&self, name: &'static str, default: bool) -> Result<bool, SessionConfigError> {
        let Some(value) = self.env.string(name) else {
            return self.lenient(default, SessionConfigError::MissingEnv { name });
        };
        match parse_flag(&value) {
            Some(flag) => Ok(flag),
            None => self.lenient(
                default,
                SessionConfigError::InvalidEnv {
                    name,
                    value,
                    expected: FLAG_VALUES,
                },
            ),
        }
    }

    fn same_site(&self, cookie_secure: bool) -> Result<SameSite, SessionConfigError> {
        let default = match self.mode {
            BuildMode::Debug => SameSite::Lax,
            BuildMode::Release => SameSite::Strict,
        };
        let Some(value) = self.env.string(SAMESITE_ENV) else {
            return self.lenient(default, SessionConfigError::MissingEnv { name: SAMESITE_ENV });
        };
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(SameSite::Strict),
            "lax" => Ok(SameSite::Lax),
            "none" if cookie_secure => Ok(SameSite::None),
            "none" => self.lenient(SameSite::None, SessionConfigError::InsecureSameSiteNone),
            _ => self.lenient(
                default,
                SessionConfigError::InvalidEnv {
                    name: SAMESITE_ENV,
                    value,
                    expected: SAME_SITE_VALUES,
                },
            ),
        }
    }

    fn key(&self, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
        let path = PathBuf::from(
            self.env
                .string(KEY_FILE_ENV)
                .unwrap_or_else(|| DEFAULT_KEY_FILE.to_owned()),
        );
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => Zeroizing::new(bytes),
            Err(source) if self.mode == BuildMode::Debug || allow_ephemeral => {
                warn!(path = %path.display(), error = %source, "generating ephemeral session key");
                return Ok(Key::generate());
            }
            Err(source) => return Err(SessionConfigError::KeyRead { path, source }),
        };
        if self.mode == BuildMode::Release && bytes.len() < MIN_KEY_BYTES {
            return Err(SessionConfigError::KeyTooShort {
                length: bytes.len(),
                path,
                min_len: MIN_KEY_BYTES,
            });
        }
        info!(path = %path.display(), "session key loaded");
        Ok(Key::derive_from(&bytes))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use mockable::MockEnv;
    use rstest::{fixture, rstest};
    use std::collections::HashMap;
    use uuid::Uuid;

    /// Key file removed when dropped.
    struct KeyFile(PathBuf);

    impl KeyFile {
        fn with_len(len: usize) -> Self {
            let path = std::env::temp_dir().join(format!("rota-key-{}", Uuid::new_v4()));
            std::fs::write(&path, vec![7_u8; len]).expect("write key file");
            Self(path)
        }

        fn path(&self) -> String {
            self.0.display().to_string()
        }
    }

    impl Drop for KeyFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn env_of(vars: &[(&str, &str)]) -> MockEnv {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |name| vars.get(name).cloned());
        env
    }

    #[fixture]
    fn key_file() -> KeyFile {
        KeyFile::with_len(MIN_KEY_BYTES)
    }

    fn release_vars(key: &KeyFile) -> Vec<(&'static str, String)> {
        vec![
            (COOKIE_SECURE_ENV, "1".to_owned()),
            (SAMESITE_ENV, "Strict".to_owned()),
            (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
            (KEY_FILE_ENV, key.path()),
        ]
    }

    fn release_env_with(key: &KeyFile, name: &str, value: Option<&str>) -> MockEnv {
        let vars = release_vars(key);
        let pairs: Vec<(&str, &str)> = vars
            .iter()
            .filter(|(var, _)| *var != name)
            .map(|(var, val)| (*var, val.as_str()))
            .chain(value.map(|value| (name, value)))
            .collect();
        env_of(&pairs)
    }

    #[rstest]
    fn debug_defaults_apply_when_nothing_is_set() {
        let env = env_of(&[(KEY_FILE_ENV, "/nonexistent/rota-key")]);
        let settings =
            session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults resolve");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[rstest]
    fn release_accepts_a_complete_environment(key_file: KeyFile) {
        let env = release_env_with(&key_file, SAMESITE_ENV, Some("lax"));
        let settings =
            session_settings_from_env(&env, BuildMode::Release).expect("release settings");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[rstest]
    #[case::cookie_secure(COOKIE_SECURE_ENV)]
    #[case::same_site(SAMESITE_ENV)]
    #[case::allow_ephemeral(ALLOW_EPHEMERAL_ENV)]
    fn release_requires_every_toggle(key_file: KeyFile, #[case] name: &'static str) {
        let env = release_env_with(&key_file, name, None);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("missing toggle fails");
        assert!(matches!(err, SessionConfigError::MissingEnv { name: missing } if missing == name));
    }

    #[rstest]
    #[case::cookie_secure(COOKIE_SECURE_ENV, "maybe")]
    #[case::same_site(SAMESITE_ENV, "sometimes")]
    fn release_rejects_malformed_values(
        key_file: KeyFile,
        #[case] name: &'static str,
        #[case] value: &str,
    ) {
        let env = release_env_with(&key_file, name, Some(value));
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("malformed toggle fails");
        assert!(matches!(err, SessionConfigError::InvalidEnv { name: bad, .. } if bad == name));
    }

    #[rstest]
    fn debug_tolerates_malformed_values() {
        let env = env_of(&[
            (COOKIE_SECURE_ENV, "maybe"),
            (SAMESITE_ENV, "sometimes"),
            (KEY_FILE_ENV, "/nonexistent/rota-key"),
        ]);
        let settings = session_settings_from_env(&env, BuildMode::Debug).expect("fallbacks");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[rstest]
    fn same_site_none_requires_a_secure_cookie(key_file: KeyFile) {
        let env = env_of(&[
            (COOKIE_SECURE_ENV, "0"),
            (SAMESITE_ENV, "None"),
            (ALLOW_EPHEMERAL_ENV, "0"),
            (KEY_FILE_ENV, &key_file.path()),
        ]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("insecure SameSite=None fails");
        assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
    }

    #[rstest]
    fn release_refuses_ephemeral_keys(key_file: KeyFile) {
        let env = release_env_with(&key_file, ALLOW_EPHEMERAL_ENV, Some("yes"));
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("ephemeral keys fail");
        assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
    }

    #[rstest]
    fn release_rejects_short_keys() {
        let short = KeyFile::with_len(MIN_KEY_BYTES - 1);
        let env = release_env_with(&short, KEY_FILE_ENV, Some(&short.path()));
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("short key fails");
        assert!(matches!(
            err,
            SessionConfigError::KeyTooShort { length, .. } if length == MIN_KEY_BYTES - 1
        ));
    }

    #[rstest]
    fn release_requires_a_readable_key() {
        let missing = KeyFile(std::env::temp_dir().join("rota-key-absent"));
        let env = release_env_with(&missing, KEY_FILE_ENV, Some(&missing.path()));
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("unreadable key fails");
        assert!(matches!(err, SessionConfigError::KeyRead { .. }));
    }

    #[rstest]
    #[case("TRUE", Some(true))]
    #[case(" on ", Some(true))]
    #[case("No", Some(false))]
    #[case("0", Some(false))]
    #[case("", None)]
    #[case("enabled", None)]
    fn flags_parse_case_insensitively(#[case] raw: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_flag(raw), expected);
    }
}
