//! Rendering and writing of the EPICS RELEASE files under `configure/`.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, HalTarget, IocConfig};

/// Directory, relative to the package top, that the EPICS build reads from.
pub const CONFIGURE_DIR: &str = "configure";

pub const RELEASE_LOCAL: &str = "RELEASE.local";

const RELEASE_COMMON_PREFIX: &str = "RELEASE.Common.";

/// Name of the per-architecture release file for `target`.
pub fn hal_release_name(target: &str) -> String { format!("{}{}", RELEASE_COMMON_PREFIX, target) }

pub fn release_local_contents(config: &IocConfig) -> String {
    let mut contents = format!("EPICS_BASE = {}\n", config.epics_base);
    for module in &config.modules {
        contents.push_str(module.as_str());
        contents.push('\n');
    }
    contents
}

pub fn hal_release_contents(hal: &HalTarget) -> String { format!("ISEGHAL={}\n", hal.path) }

/// Create (or truncate) `path` and fill it with `contents`. The file is
/// closed when `f` drops, whether or not the write succeeded.
fn write_file(path: &Path, contents: &str) -> Result<(), ConfigError> {
    let mut f = File::create(path)?;
    f.write_all(contents.as_bytes())?;
    log::info!("wrote {}", path.display());
    Ok(())
}

pub fn write_release_local(dir: &Path, config: &IocConfig) -> Result<PathBuf, ConfigError> {
    let path = dir.join(RELEASE_LOCAL);
    write_file(&path, &release_local_contents(config))?;
    Ok(path)
}

pub fn write_hal_release(dir: &Path, hal: &HalTarget) -> Result<PathBuf, ConfigError> {
    let path = dir.join(hal_release_name(&hal.target));
    write_file(&path, &hal_release_contents(hal))?;
    Ok(path)
}

/// Write RELEASE.local followed by one RELEASE.Common file per isegHAL
/// target, in the order they were given. Returns every path written.
pub fn write_release_files(dir: &Path, config: &IocConfig) -> Result<Vec<PathBuf>, ConfigError> {
    let mut written = vec![write_release_local(dir, config)?];
    for hal in &config.iseghal {
        written.push(write_hal_release(dir, hal)?);
    }
    Ok(written)
}
