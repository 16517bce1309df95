//! Shared helpers for CLI commands: project root resolution and loading.

use std::path::{Path, PathBuf};

use hlsflow_config::{load_project, Project, CONFIG_FILE};
use hlsflow_constraints::ExtractMode;

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `hlsflow.toml`.
///
/// Returns the directory containing `hlsflow.toml`, or an error if none is found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `hlsflow.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Resolves the project root and loads the project found there.
pub fn load(global: &GlobalArgs) -> Result<Project, Box<dyn std::error::Error>> {
    let root = resolve_project_root(global)?;
    Ok(load_project(&root)?)
}

/// Maps a `--strict` flag to an extraction mode.
pub fn extract_mode(strict: bool) -> ExtractMode {
    if strict {
        ExtractMode::Strict
    } else {
        ExtractMode::Permissive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn global(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            config,
        }
    }

    #[test]
    fn find_root_in_start_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("hlsflow.toml"), "[project]\nname = \"x\"\n").unwrap();
        assert_eq!(find_project_root(tmp.path()).unwrap(), tmp.path());
    }

    #[test]
    fn find_root_walks_up() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("hlsflow.toml"), "[project]\nname = \"x\"\n").unwrap();
        let nested = tmp.path().join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_root(&nested).unwrap(), tmp.path());
    }

    #[test]
    fn find_root_missing() {
        let tmp = TempDir::new().unwrap();
        let err = find_project_root(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("could not find hlsflow.toml"));
    }

    #[test]
    fn config_flag_file_uses_parent() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("hlsflow.toml");
        fs::write(&file, "[project]\nname = \"x\"\n").unwrap();
        let root = resolve_project_root(&global(Some(file.display().to_string()))).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn config_flag_dir_is_used_as_is() {
        let tmp = TempDir::new().unwrap();
        let root =
            resolve_project_root(&global(Some(tmp.path().display().to_string()))).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn load_reads_project() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("hlsflow.toml"), "[project]\nname = \"blink\"\n").unwrap();
        let project = load(&global(Some(tmp.path().display().to_string()))).unwrap();
        assert_eq!(project.name, "blink");
        assert_eq!(project.root, tmp.path());
    }

    #[test]
    fn strict_flag_mapping() {
        assert_eq!(extract_mode(true), ExtractMode::Strict);
        assert_eq!(extract_mode(false), ExtractMode::Permissive);
    }
}
