use crate::richtext::notes_editor::Intent;
use crate::richtext::styled_text::Color;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use thiserror::Error;

const QUALIFIER: &str = "net.notes";
const ORGANIZATION: &str = "Notes";
const APPLICATION: &str = "notes-editor";
const CONFIG_FILE_NAME: &str = "editor.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to encode configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f32,
    pub leading: f32,
    pub bottom: f32,
    pub trailing: f32,
}

impl Default for EdgeInsets {
    fn default() -> Self {
        EdgeInsets {
            top: 8.0,
            leading: 16.0,
            bottom: 8.0,
            trailing: 16.0,
        }
    }
}

/// Feature toggles and layout hints for the surrounding editor UI.
///
/// The editing core does not enforce these; the UI decides which intents it
/// sends (see [`EditorConfiguration::permits`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfiguration {
    pub shows_toolbar: bool,
    pub allows_images: bool,
    pub allows_checklists: bool,
    pub allows_lists: bool,
    pub line_spacing: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Color>,
    pub content_inset: EdgeInsets,
}

impl Default for EditorConfiguration {
    fn default() -> Self {
        EditorConfiguration {
            shows_toolbar: true,
            allows_images: true,
            allows_checklists: true,
            allows_lists: true,
            line_spacing: 4.0,
            text_color: None,
            content_inset: EdgeInsets::default(),
        }
    }
}

impl EditorConfiguration {
    /// Whether the UI should offer `intent` under this configuration
    pub fn permits(&self, intent: &Intent) -> bool {
        use crate::richtext::notes_document::BlockType;

        match intent {
            Intent::InsertImage { .. } => self.allows_images,
            Intent::ToggleChecklist { .. } => self.allows_checklists,
            Intent::ToggleBlockType { block_type } => match block_type {
                BlockType::Checklist => self.allows_checklists,
                BlockType::Bullet | BlockType::Numbered => self.allows_lists,
                BlockType::Text => true,
            },
            Intent::ToggleStyle { .. } | Intent::SetColor { .. } => self.shows_toolbar,
            _ => true,
        }
    }
}

pub fn config_file_path() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Load the configuration at `path`; a missing file yields the defaults
pub fn load_config(path: &Path) -> Result<EditorConfiguration, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Ok(EditorConfiguration::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `config` to `path` as TOML, creating parent directories
pub fn save_config(path: &Path, config: &EditorConfiguration) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(config)?;
    let write_error = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, contents).map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::notes_document::BlockType;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EditorConfiguration = toml::from_str(
            r##"
allows_images = false
text_color = "#336699"

[content_inset]
top = 1.0
leading = 2.0
bottom = 3.0
trailing = 4.0
"##,
        )
        .unwrap();

        assert!(!config.allows_images);
        assert!(config.allows_lists);
        assert_eq!(config.line_spacing, 4.0);
        assert_eq!(config.text_color, Some(Color::rgb(0x33, 0x66, 0x99)));
        assert_eq!(config.content_inset.trailing, 4.0);
    }

    #[test]
    fn test_permits_follows_feature_toggles() {
        let config = EditorConfiguration {
            allows_images: false,
            allows_lists: false,
            ..Default::default()
        };

        assert!(!config.permits(&Intent::InsertImage {
            asset_id: "x".into()
        }));
        assert!(!config.permits(&Intent::ToggleBlockType {
            block_type: BlockType::Numbered
        }));
        assert!(config.permits(&Intent::ToggleBlockType {
            block_type: BlockType::Checklist
        }));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("notes-editor-missing-config/editor.toml");
        let config = load_config(&path).unwrap();
        assert_eq!(config, EditorConfiguration::default());
    }

    #[test]
    fn test_save_and_load_config() {
        let dir = std::env::temp_dir().join(format!("notes-editor-config-{}", std::process::id()));
        let path = dir.join("editor.toml");
        let config = EditorConfiguration {
            shows_toolbar: false,
            line_spacing: 6.5,
            ..Default::default()
        };

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);

        fs::write(&path, "line_spacing = \"wide\"").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_reports_unwritable_path() {
        let dir = std::env::temp_dir().join(format!("notes-editor-blocked-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("file");
        fs::write(&blocker, "").unwrap();

        let result = save_config(&blocker.join("editor.toml"), &EditorConfiguration::default());
        assert!(matches!(result, Err(ConfigError::Write { .. })));

        let _ = fs::remove_dir_all(&dir);
    }
}
