//! Project resolution: turning a parsed configuration into an immutable [`Project`].
//!
//! Resolution fixes everything a stage needs to know up front: the ordered
//! file list with kinds, the settings (defaults already applied during
//! parsing), the toolchain description, and the pin catalog of the target
//! device. Project-defined catalogs override built-in ones with the same key.

use std::path::{Path, PathBuf};

use hlsflow_constraints::{builtin_catalog, PinCatalog, DEFAULT_DEVICE};
use tracing::debug;

use crate::error::ConfigError;
use crate::settings::{Settings, SettingsUpdate};
use crate::types::{FileKind, ProjectConfig, ToolchainConfig};

/// Directory searched for sources when the configuration lists no files.
const SOURCE_DIR: &str = "src";

/// A project file with its role in the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the project root (or absolute, as configured).
    pub path: PathBuf,
    /// The role of the file.
    pub kind: FileKind,
}

/// A fully resolved project, read by the stage builders.
#[derive(Debug, Clone)]
pub struct Project {
    /// Project name; prefixes every stage artifact.
    pub name: String,
    /// Project root directory; stages run here.
    pub root: PathBuf,
    /// Files in configuration (or discovery) order.
    pub files: Vec<SourceFile>,
    /// Per-stage settings.
    pub settings: Settings,
    /// Stage executables and device files.
    pub toolchain: ToolchainConfig,
    /// Pins of the target device.
    pub catalog: PinCatalog,
}

impl Project {
    /// Returns the first file of the given kind, in project order.
    pub fn first_file(&self, kind: FileKind) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.kind == kind)
    }

    /// Resolves a project-relative path against the project root.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Returns a copy of this project with `update` applied to its settings.
    pub fn with_update(&self, update: SettingsUpdate) -> Project {
        Project {
            settings: self.settings.apply(update),
            ..self.clone()
        }
    }
}

/// Resolves `config` for a project rooted at `root`.
pub fn resolve_project(config: &ProjectConfig, root: &Path) -> Result<Project, ConfigError> {
    let files: Vec<SourceFile> = if config.files.is_empty() {
        discover_sources(&root.join(SOURCE_DIR))?
            .into_iter()
            .map(|path| SourceFile {
                path: path.strip_prefix(root).map(Path::to_path_buf).unwrap_or(path),
                kind: FileKind::Source,
            })
            .collect()
    } else {
        config
            .files
            .iter()
            .map(|entry| {
                let path = PathBuf::from(&entry.path);
                let kind = entry.kind.unwrap_or_else(|| FileKind::infer(&path));
                SourceFile { path, kind }
            })
            .collect()
    };

    let device = config.project.device.as_deref().unwrap_or(DEFAULT_DEVICE);
    let catalog = resolve_catalog(config, device)?;

    debug!(
        project = %config.project.name,
        device = catalog.device(),
        files = files.len(),
        "resolved project"
    );

    Ok(Project {
        name: config.project.name.clone(),
        root: root.to_path_buf(),
        files,
        settings: config.settings.clone(),
        toolchain: config.toolchain.clone(),
        catalog,
    })
}

/// Finds the pin catalog for `device`: project-defined first, then built-in.
fn resolve_catalog(config: &ProjectConfig, device: &str) -> Result<PinCatalog, ConfigError> {
    if let Some(custom) = config.devices.get(device) {
        return Ok(PinCatalog::new(
            device,
            custom.inputs.clone(),
            custom.outputs.clone(),
        )?);
    }
    builtin_catalog(device).ok_or_else(|| ConfigError::UnknownDevice(device.to_string()))
}

/// Discovers compilable sources below `dir` (recursive), sorted by path.
///
/// A missing directory yields no files.
fn discover_sources(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let mut files = Vec::new();
    if dir.is_dir() {
        walk_dir(dir, &mut files)?;
    }
    files.sort();
    Ok(files)
}

/// Recursively walks a directory collecting compilable sources.
fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ConfigError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if FileKind::infer(&path) == FileKind::Source {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;
    use hlsflow_constraints::Direction;
    use std::fs;

    #[test]
    fn explicit_files_keep_order_and_kinds() {
        let toml = r#"
[project]
name = "p"

[[files]]
path = "src/b.c"

[[files]]
path = "src/a.cpp"

[[files]]
path = "board.xml"
kind = "constraint"

[[files]]
path = "README.md"
"#;
        let config = load_config_from_str(toml).unwrap();
        let project = resolve_project(&config, Path::new("/proj")).unwrap();
        let kinds: Vec<_> = project.files.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FileKind::Source,
                FileKind::Source,
                FileKind::Constraint,
                FileKind::Other
            ]
        );
        assert_eq!(
            project.first_file(FileKind::Source).unwrap().path,
            PathBuf::from("src/b.c")
        );
        assert_eq!(
            project.files.iter().filter(|f| f.kind == FileKind::Source).count(),
            2
        );
        assert_eq!(project.path("board.xml"), PathBuf::from("/proj/board.xml"));
    }

    #[test]
    fn discovers_sources_when_no_files_listed() {
        let tmp = tempfile::TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("z.c"), "int z;").unwrap();
        fs::write(src.join("sub").join("a.cpp"), "int a;").unwrap();
        fs::write(src.join("notes.txt"), "").unwrap();

        let config = load_config_from_str("[project]\nname = \"p\"\n").unwrap();
        let project = resolve_project(&config, tmp.path()).unwrap();
        let paths: Vec<_> = project.files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("src").join("sub").join("a.cpp"),
                PathBuf::from("src").join("z.c"),
            ]
        );
    }

    #[test]
    fn no_src_dir_means_no_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = load_config_from_str("[project]\nname = \"p\"\n").unwrap();
        let project = resolve_project(&config, tmp.path()).unwrap();
        assert!(project.files.is_empty());
    }

    #[test]
    fn default_device_catalog() {
        let config = load_config_from_str("[project]\nname = \"p\"\n").unwrap();
        let project = resolve_project(&config, Path::new("/proj")).unwrap();
        assert_eq!(project.catalog.device(), DEFAULT_DEVICE);
    }

    #[test]
    fn project_catalog_overrides_builtin() {
        let toml = r#"
[project]
name = "p"
device = "fdp3p7"

[devices.fdp3p7]
inputs = ["X1"]
outputs = ["Y1"]
"#;
        let config = load_config_from_str(toml).unwrap();
        let project = resolve_project(&config, Path::new("/proj")).unwrap();
        assert_eq!(project.catalog.pins(Direction::Input), ["X1".to_string()]);
    }

    #[test]
    fn unknown_device_errors() {
        let toml = "[project]\nname = \"p\"\ndevice = \"nope\"\n";
        let config = load_config_from_str(toml).unwrap();
        let err = resolve_project(&config, Path::new("/proj")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDevice(ref d) if d == "nope"));
    }

    #[test]
    fn malformed_catalog_errors() {
        let toml = r#"
[project]
name = "p"
device = "bad"

[devices.bad]
inputs = ["A", "B"]
outputs = ["A"]
"#;
        let config = load_config_from_str(toml).unwrap();
        let err = resolve_project(&config, Path::new("/proj")).unwrap_err();
        assert!(matches!(err, ConfigError::Catalog(_)));
    }

    #[test]
    fn with_update_leaves_original() {
        let config = load_config_from_str("[project]\nname = \"p\"\n").unwrap();
        let project = resolve_project(&config, Path::new("/proj")).unwrap();
        let next = project.with_update(SettingsUpdate::TopFunction("fir".to_string()));
        assert_eq!(project.settings.top_function, "main");
        assert_eq!(next.settings.top_function, "fir");
    }
}
