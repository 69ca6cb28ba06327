//! Client configuration for MemeMeow.
//!
//! Configuration lives in a RON file (`~/.mememeow/config.ron` by default).
//! Every field has a default, so an absent file or a partial file is fine.
#![warn(unsafe_op_in_unsafe_fn)]

use std::{
    env,
    path::{Path, PathBuf},
};

mod defaults;
mod error;
mod loader;
mod types;

pub use error::Error;
pub use loader::{load_from_path, load_from_str, load_or_default};
pub use types::{Backend, Config, Notify, Timeouts};

/// Determine the preferred user config path (`~/.mememeow/config.ron`).
pub fn default_config_path() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".mememeow");
    p.push("config.ron");
    p
}

/// Resolve the effective config path.
///
/// Policy:
/// 1) Use `explicit` when provided (it must exist).
/// 2) Else use `~/.mememeow/config.ron` when it exists.
/// 3) Else `None`: run on built-in defaults.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>, Error> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Read {
                path: Some(path.to_path_buf()),
                message: "Config file does not exist".to_string(),
            });
        }
        return Ok(Some(path.to_path_buf()));
    }

    let preferred = default_config_path();
    if preferred.exists() {
        return Ok(Some(preferred));
    }
    Ok(None)
}
