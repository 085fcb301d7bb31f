// debsolve-common/src/substvars.rs
//! `key=value` substitution variables consumed by the packaging tools.
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

pub const UPSTREAM_VERSION_KEY: &str = "maven.UpstreamPackageVersion";

pub fn load(path: &Path) -> Result<BTreeMap<String, String>> {
    let mut vars = BTreeMap::new();
    if !path.exists() {
        return Ok(vars);
    }
    for line in fs::read_to_string(path)?.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = trimmed.split_once('=') {
            vars.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    Ok(vars)
}

pub fn write(path: &Path, vars: &BTreeMap<String, String>) -> Result<()> {
    let mut out = String::new();
    for (key, value) in vars {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    debug!("Writing {} substitution variables to {}", vars.len(), path.display());
    fs::write(path, out)?;
    Ok(())
}

/// Overwrites the given keys and keeps every other variable already in the file.
pub fn merge(path: &Path, update: &BTreeMap<String, String>) -> Result<()> {
    let mut vars = load(path)?;
    vars.extend(update.iter().map(|(k, v)| (k.clone(), v.clone())));
    write(path, &vars)
}
