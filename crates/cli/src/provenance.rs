//! Session provenance: a JSON sidecar written next to every generated session
//! so a stimulus file can be traced back to the build, seed and config that
//! produced it.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Contents of `<session>.provenance.json`.
#[derive(Debug, Serialize)]
pub struct Sidecar<'a, P: Serialize> {
    pub code_rev: String,
    pub numerosity: &'static str,
    pub callsite: Callsite,
    pub params: &'a P,
    pub outputs: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Callsite {
    pub file: &'static str,
    pub line: u32,
}

impl From<&'static Location<'static>> for Callsite {
    fn from(loc: &'static Location<'static>) -> Self {
        Self {
            file: loc.file(),
            line: loc.line(),
        }
    }
}

/// Record `params` for the session at `session` and return the sidecar path.
#[track_caller]
pub fn write_sidecar<P: Serialize>(session: &Path, params: &P) -> Result<PathBuf> {
    let sidecar = Sidecar {
        code_rev: code_rev(),
        numerosity: numerosity::VERSION,
        callsite: Location::caller().into(),
        params,
        outputs: vec![session.display().to_string()],
    };
    let path = sidecar_path(session);
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
            .with_context(|| format!("creating provenance dir {}", dir.display()))?,
        _ => {}
    }
    let bytes = serde_json::to_vec_pretty(&sidecar).context("encoding provenance")?;
    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// `runs/s01.json` -> `runs/s01.provenance.json`.
fn sidecar_path(session: &Path) -> PathBuf {
    session.with_extension("provenance.json")
}

/// `GIT_COMMIT` baked in at build time, then the runtime variable, then `git`.
pub fn code_rev() -> String {
    let pinned = option_env!("GIT_COMMIT").map(str::to_owned);
    let runtime = std::env::var("GIT_COMMIT").ok();
    pinned
        .into_iter()
        .chain(runtime)
        .find(|rev| !rev.is_empty())
        .or_else(git_head)
        .unwrap_or_else(|| "unknown".to_owned())
}

fn git_head() -> Option<String> {
    let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?;
    Some(rev.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::tempdir;

    #[test]
    fn sidecar_sits_next_to_session() {
        assert_eq!(
            sidecar_path(Path::new("/tmp/sessions/s01.json")),
            Path::new("/tmp/sessions/s01.provenance.json")
        );
        assert_eq!(
            sidecar_path(Path::new("session")),
            Path::new("session.provenance.json")
        );
    }

    #[test]
    fn sidecar_records_params_and_callsite() {
        let dir = tempdir().unwrap();
        let session = dir.path().join("session.json");
        fs::write(&session, "[]").unwrap();
        let path = write_sidecar(&session, &json!({"seed": 11})).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], session.display().to_string());
        assert_eq!(parsed["params"]["seed"], 11);
        assert_eq!(parsed["numerosity"], numerosity::VERSION);
        assert!(parsed["callsite"]["file"]
            .as_str()
            .unwrap()
            .ends_with("provenance.rs"));
        assert!(!parsed["code_rev"].as_str().unwrap().is_empty());
    }
}
