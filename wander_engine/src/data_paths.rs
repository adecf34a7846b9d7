use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Cached path to the directory holding the bundled world files.
static DATA_ROOT: LazyLock<PathBuf> = LazyLock::new(detect_data_root);

/// Construct a data path relative to the resolved data root.
pub fn data_path(relative: impl AsRef<Path>) -> PathBuf {
    DATA_ROOT.join(relative)
}

/// Resolve the most likely location of the data directory.
fn detect_data_root() -> PathBuf {
    let mut candidates = vec![PathBuf::from("wander_engine/data"), PathBuf::from("data")];

    if let Ok(exe_path) = env::current_exe()
        && let Some(dir) = exe_path.parent()
    {
        candidates.push(dir.join("wander_engine/data"));
        candidates.push(dir.join("data"));
        if let Some(parent) = dir.parent() {
            candidates.push(parent.join("wander_engine/data"));
            candidates.push(parent.join("data"));
        }
    }

    candidates
        .into_iter()
        .find(|candidate| candidate.is_dir())
        .unwrap_or_else(|| PathBuf::from("wander_engine/data"))
}
