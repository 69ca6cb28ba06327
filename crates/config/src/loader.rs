//! Parse and load user configuration.

use std::{fs, path::Path};

use tracing::debug;

use crate::{Config, Error, resolve_config_path};

/// Parse a configuration from RON source.
pub fn load_from_str(source: &str) -> Result<Config, Error> {
    ron::from_str(source).map_err(|e| Error::Parse {
        path: None,
        message: e.to_string(),
    })
}

/// Load a configuration from a RON file at `path`.
pub fn load_from_path(path: &Path) -> Result<Config, Error> {
    let source = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    load_from_str(&source).map_err(|e| match e {
        Error::Parse { message, .. } => Error::Parse {
            path: Some(path.to_path_buf()),
            message,
        },
        other => other,
    })
}

/// Load from `explicit`, else from the default location, else use defaults.
pub fn load_or_default(explicit: Option<&Path>) -> Result<Config, Error> {
    match resolve_config_path(explicit)? {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_from_path(&path)
        }
        None => {
            debug!("no config file; using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::defaults;

    #[test]
    fn empty_struct_is_all_defaults() {
        let cfg = load_from_str("()").expect("parse");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.timeouts.gateway(), Duration::from_millis(3000));
        assert_eq!(cfg.timeouts.search(), Duration::from_millis(15_000));
        assert_eq!(cfg.notify.app(), Duration::from_millis(5000));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = load_from_str(
            "(backend: (socket: \"/run/meow.sock\"), timeouts: (search_ms: 20000))",
        )
        .expect("parse");
        assert_eq!(cfg.backend.socket, "/run/meow.sock");
        assert_eq!(cfg.timeouts.search_ms, 20_000);
        assert_eq!(cfg.timeouts.save_debounce_ms, defaults::SAVE_DEBOUNCE_MS);
        assert_eq!(cfg.notify.recorder_error_ms, defaults::NOTIFY_RECORDER_ERROR_MS);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = load_from_str("(timeouts: (gateway: 1))").expect_err("unknown field");
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn missing_explicit_path_is_a_read_error() {
        let err = load_or_default(Some(Path::new("/nonexistent/mememeow.ron")))
            .expect_err("missing file");
        assert!(err.pretty().starts_with("Read error at /nonexistent/mememeow.ron"));
    }
}
