//! `hlsflow init`: project scaffolding.
//!
//! Creates `hlsflow.toml` and a template C source under `src/`. The source
//! defines a function named after the project, which is also set as the top
//! function, so the scaffold runs through the whole flow unchanged.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hlsflow_config::{
    save_config, ConfigError, ProjectConfig, ProjectMeta, Settings, SettingsUpdate,
    ToolchainConfig, CONFIG_FILE,
};
use hlsflow_constraints::{builtin_catalog, builtin_devices};

use crate::GlobalArgs;

/// Runs the `hlsflow init` command.
///
/// If `name` is `Some`, creates a new subdirectory with that name.
/// Otherwise initializes in the current working directory.
/// Returns exit code 0 on success.
pub fn run(
    name: Option<String>,
    device: Option<String>,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    if let Some(ref d) = device {
        if builtin_catalog(d).is_none() {
            let known: Vec<_> = builtin_devices().collect();
            return Err(format!(
                "unknown device '{d}' (built in: {}); add a [devices.{d}] table to {CONFIG_FILE} instead",
                known.join(", ")
            )
            .into());
        }
    }

    let project_dir = match &name {
        Some(n) => {
            let dir = PathBuf::from(n);
            if dir.exists() {
                return Err(format!("directory '{n}' already exists").into());
            }
            fs::create_dir_all(&dir)?;
            dir
        }
        None => std::env::current_dir()?,
    };

    if project_dir.join(CONFIG_FILE).exists() {
        return Err(format!("{CONFIG_FILE} already exists in {}", project_dir.display()).into());
    }

    let project_name = project_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("my_project")
        .to_string();
    let function = function_name(&project_name);

    if !global.quiet {
        eprintln!("  Creating new hlsflow project `{project_name}`");
    }

    fs::create_dir_all(project_dir.join("src"))?;
    write_config(&project_dir, &project_name, &function, device.as_deref())?;
    write_source(&project_dir, &function)?;

    if !global.quiet {
        eprintln!("     Created {}", project_dir.join(CONFIG_FILE).display());
        eprintln!(
            "     Created {}",
            project_dir.join("src").join(format!("{function}.c")).display()
        );
    }

    Ok(0)
}

/// Turns a project name into a C identifier.
fn function_name(project: &str) -> String {
    let mut ident: String = project
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Writes the `hlsflow.toml` configuration file.
fn write_config(
    root: &Path,
    name: &str,
    function: &str,
    device: Option<&str>,
) -> Result<(), ConfigError> {
    let config = ProjectConfig {
        project: ProjectMeta {
            name: name.to_string(),
            device: device.map(str::to_string),
        },
        settings: Settings::default().apply(SettingsUpdate::TopFunction(function.to_string())),
        toolchain: ToolchainConfig::default(),
        devices: BTreeMap::new(),
        files: Vec::new(),
    };
    save_config(root, &config)
}

/// Writes the template C source.
fn write_source(root: &Path, function: &str) -> io::Result<()> {
    let content = format!(
        r#"/* Top function for high-level synthesis. */
int {function}(int a, int b)
{{
    return a + b;
}}
"#
    );
    fs::write(root.join("src").join(format!("{function}.c")), content)
}
