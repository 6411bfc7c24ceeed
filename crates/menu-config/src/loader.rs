//! Parse and load mode configuration from RON.

use std::{ffi::OsStr, fs, path::Path};

use ron::{Options, extensions::Extensions};
use tracing::debug;

use crate::{Error, ModeConfig, raw::RawModeConfig};

/// RON options used for all configuration text. Optional fields accept a
/// bare value, so `label: "Delete"` needs no `Some(..)` wrapper.
pub(crate) fn ron_options() -> Options {
    Options::default().with_default_extension(Extensions::IMPLICIT_SOME)
}

/// Parse a mode configuration from RON text. `path` is only used for error
/// reporting.
pub fn load_from_str(text: &str, path: Option<&Path>) -> Result<ModeConfig, Error> {
    let raw: RawModeConfig = ron_options().from_str(text).map_err(|e| {
        Error::parse(
            text,
            path,
            e.span.start.line,
            e.span.start.col,
            e.code.to_string(),
        )
    })?;
    let mut cfg = ModeConfig::new();
    for (name, entry) in raw.customizations {
        let c = ModeConfig::from_raw(entry).map_err(|e| match path {
            Some(p) => e.with_path(p),
            None => e,
        })?;
        debug!(customization = %name, "loaded customization");
        cfg.insert(name, c);
    }
    Ok(cfg)
}

/// Load a mode configuration from a `.ron` file at `path`.
pub fn load_from_path(path: &Path) -> Result<ModeConfig, Error> {
    if path.extension() != Some(OsStr::new("ron")) {
        return Err(Error::Read {
            path: Some(path.to_path_buf()),
            message: "Unsupported config format (expected a .ron file)".to_string(),
        });
    }
    let text = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    load_from_str(&text, Some(path))
}
