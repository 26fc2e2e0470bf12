use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Starting content for a new icon.
pub const SVG_TEMPLATE: &str =
    "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 100 100\">\n  \n</svg>";

const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// An icon project: a name plus the SVG source stored at `path`.
#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
    pub code: String,
    /// False until the file exists on disk.
    pub saved: bool,
}

impl Project {
    /// Open an existing `.svg` file, or start an unsaved project seeded with
    /// the template when `path` does not exist yet.
    pub fn open(path: &Path) -> Result<Self> {
        let name = project_name(path);
        if !path.exists() {
            info!(target: "project", path = %path.display(), "new_unsaved");
            return Ok(Self {
                name,
                path: path.to_path_buf(),
                code: SVG_TEMPLATE.to_string(),
                saved: false,
            });
        }

        let code = read_source(path)?;
        info!(target: "project", path = %path.display(), bytes = code.len(), "opened");
        Ok(Self {
            name,
            path: path.to_path_buf(),
            code,
            saved: true,
        })
    }

    /// Write `code` to the project file.
    pub fn save(&mut self, code: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        fs::write(&self.path, code)
            .with_context(|| format!("Failed to save {}", self.path.display()))?;
        self.code = code.to_string();
        self.saved = true;
        info!(target: "project", path = %self.path.display(), bytes = code.len(), "saved");
        Ok(())
    }
}

fn project_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("untitled"))
}

fn read_source(path: &Path) -> Result<String> {
    let metadata =
        fs::metadata(path).with_context(|| format!("Failed to stat {}", path.display()))?;
    if metadata.len() > MAX_FILE_SIZE {
        anyhow::bail!("File too large to open (max 10MB)");
    }

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            anyhow::bail!("Cannot open binary file: {}", path.display())
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };
    if content.contains('\0') {
        anyhow::bail!("Cannot open binary file: {}", path.display());
    }
    Ok(content)
}

/// File name for a project called `name`: anything outside
/// `[A-Za-z0-9-_]` becomes `_`.
pub fn file_name_for(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = if stem.is_empty() {
        String::from("untitled")
    } else {
        stem
    };
    format!("{stem}.svg")
}

/// Create `<name>.svg` in `dir` from the template. Refuses to overwrite.
pub fn create_new_project(dir: &Path, name: &str) -> Result<PathBuf> {
    let path = dir.join(file_name_for(name));
    if path.exists() {
        anyhow::bail!("File '{}' already exists", path.display());
    }
    fs::write(&path, SVG_TEMPLATE)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    info!(target: "project", path = %path.display(), "created");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_opens_unsaved_template() {
        let dir = TempDir::new().unwrap();
        let project = Project::open(&dir.path().join("star.svg")).unwrap();
        assert_eq!(project.name, "star");
        assert_eq!(project.code, SVG_TEMPLATE);
        assert!(!project.saved);
    }

    #[test]
    fn save_then_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icons").join("dot.svg");
        let mut project = Project::open(&path).unwrap();
        project.save("<svg><circle r=\"1\"/></svg>").unwrap();
        assert!(project.saved);

        let reopened = Project::open(&path).unwrap();
        assert_eq!(reopened.code, "<svg><circle r=\"1\"/></svg>");
    }

    #[test]
    fn create_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = create_new_project(dir.path(), "my icon").unwrap();
        assert_eq!(path.file_name().unwrap(), "my_icon.svg");
        assert_eq!(fs::read_to_string(&path).unwrap(), SVG_TEMPLATE);
        assert!(create_new_project(dir.path(), "my icon").is_err());
    }

    #[test]
    fn file_names_are_sanitised() {
        assert_eq!(file_name_for("logo-v2_final"), "logo-v2_final.svg");
        assert_eq!(file_name_for("a/b"), "a_b.svg");
        assert_eq!(file_name_for("   "), "untitled.svg");
    }

    #[test]
    fn binary_content_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.svg");
        fs::write(&path, b"<svg>\0</svg>").unwrap();
        assert!(Project::open(&path).is_err());

        fs::write(&path, b"\xff\xfe<svg/>").unwrap();
        assert!(Project::open(&path).is_err());
    }
}
