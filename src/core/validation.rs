//! Configuration checks.

use crate::core::Store;
use crate::error::{ConfigError, Result};

/// A check run against a loaded store.
pub type Checker = Box<dyn Fn(&Store) -> Result<()> + Send + Sync>;

/// Run every checker in order and stop at the first failure.
///
/// # Errors
///
/// Returns the first checker's error unchanged.
///
/// # Examples
///
/// ```rust
/// use treeconf::core::{check, require_keys, Checker, Store};
///
/// let store = Store::new();
/// store.load(b"database:\n  host: localhost\n").unwrap();
///
/// let checkers: Vec<Checker> = vec![
///     Box::new(|store: &Store| require_keys(store, &["database:host"])) as Checker,
///     Box::new(|store: &Store| require_keys(store, &["database:port"])) as Checker,
/// ];
/// let err = check(&store, &checkers).unwrap_err();
/// assert_eq!(err.to_string(), "Config Error: you should configure database:port");
/// ```
pub fn check(store: &Store, checkers: &[Checker]) -> Result<()> {
    checkers.iter().try_for_each(|checker| checker(store))
}

/// Fail unless every key in `keys` is present.
///
/// # Errors
///
/// Returns [`ConfigError::Check`] naming the first missing key.
pub fn require_keys(store: &Store, keys: &[&str]) -> Result<()> {
    for key in keys {
        if store.get(key).is_err() {
            return Err(ConfigError::Check(format!("you should configure {key}")));
        }
    }
    Ok(())
}
