//! Shared helpers for integration tests that touch the real process
//! environment.

use std::sync::{Mutex, MutexGuard};

/// Global mutex protecting environment variable access.
///
/// `#[serial]` already prevents concurrent test execution; holding this lock
/// makes the exclusive access visible in test code.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Patches environment variables for the lifetime of the value and restores
/// the previous values on drop.
///
/// # Example
///
/// ```ignore
/// let _env = PatchedEnv::apply(&[("DOCKER_HOST", None), ("HOME", Some("/tmp"))]);
/// // DOCKER_HOST is unset, HOME is /tmp
/// // previous values return when `_env` is dropped
/// ```
pub struct PatchedEnv {
    saved: Vec<(String, Option<String>)>,
    _guard: MutexGuard<'static, ()>,
}

impl PatchedEnv {
    /// Sets (`Some`) or removes (`None`) each variable.
    ///
    /// # Safety
    ///
    /// `std::env::set_var` and `remove_var` are unsafe in Rust 2024. The
    /// global mutex held by the returned value guarantees exclusive access.
    #[must_use]
    pub fn apply(vars: &[(&str, Option<&str>)]) -> Self {
        let guard = ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let saved = vars
            .iter()
            .map(|(key, _)| (String::from(*key), std::env::var(key).ok()))
            .collect();

        for (key, value) in vars {
            // SAFETY: the mutex guard ensures exclusive access to the environment.
            unsafe {
                match value {
                    Some(v) => std::env::set_var(key, v),
                    None => std::env::remove_var(key),
                }
            }
        }

        Self {
            saved,
            _guard: guard,
        }
    }
}

impl Drop for PatchedEnv {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            // SAFETY: the mutex guard is still held until after this loop.
            unsafe {
                match value {
                    Some(v) => std::env::set_var(key, v),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
