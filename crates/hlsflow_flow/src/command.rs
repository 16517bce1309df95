//! The command descriptor handed to the executor.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One external command: what to run, with which arguments, and where.
///
/// A plain value with no behavior of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// The program to run, as a path or a name resolved through `PATH`.
    pub executable: String,
    /// Arguments in order.
    pub arguments: Vec<String>,
    /// Directory the command runs in; artifact names are relative to it.
    pub working_directory: PathBuf,
}

impl CommandDescriptor {
    /// Renders the command as a single shell-like line, for display only.
    pub fn display_line(&self) -> String {
        let mut line = quote(&self.executable);
        for arg in &self.arguments {
            line.push(' ');
            line.push_str(&quote(arg));
        }
        line
    }
}

fn quote(word: &str) -> String {
    if !word.is_empty() && !word.contains([' ', '\t', '"', '\'']) {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', "'\\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_line_plain() {
        let cmd = CommandDescriptor {
            executable: "route".to_string(),
            arguments: vec!["-n".to_string(), "p_bambu_place.xml".to_string(), "-t".to_string()],
            working_directory: PathBuf::from("/proj"),
        };
        assert_eq!(cmd.display_line(), "route -n p_bambu_place.xml -t");
    }

    #[test]
    fn display_line_quotes_spaces() {
        let cmd = CommandDescriptor {
            executable: "/opt/my tools/bambu".to_string(),
            arguments: vec![String::new()],
            working_directory: PathBuf::from("."),
        };
        assert_eq!(cmd.display_line(), "'/opt/my tools/bambu' ''");
    }

    #[test]
    fn serializes_to_json() {
        let cmd = CommandDescriptor {
            executable: "map".to_string(),
            arguments: vec!["-i".to_string()],
            working_directory: PathBuf::from("/proj"),
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["executable"], "map");
        assert_eq!(json["arguments"][0], "-i");
        assert_eq!(json["working_directory"], "/proj");
    }
}
