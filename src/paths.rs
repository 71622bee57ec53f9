// ~/ignite/src/paths.rs

use std::path::PathBuf;
use crate::warn;

/// Directory holding `ignite.yaml`, `ignite.log` and `ignite_state.json`.
///
/// `IGNITE_ROOT` overrides the default of the executable's directory.
pub fn ignite_root_dir() -> PathBuf {
    if let Ok(root) = std::env::var("IGNITE_ROOT") {
        if !root.is_empty() {
            return PathBuf::from(root);
        }
    }

    match std::env::current_exe() {
        Ok(path) => {
            if let Some(parent) = path.parent() {
                parent.to_path_buf()
            } else {
                warn!("Current executable has no parent, using current directory as ignite root");
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            }
        }
        Err(e) => {
            warn!("Failed to get current executable path: {e}, using current directory as ignite root");
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        }
    }
}
