//! Scene CLI
//!
//! Runs scene actions against a JSON scene document on disk. The palette
//! cursor lives in a separate JSON settings file so it survives between
//! invocations.

#![warn(unreachable_pub)]
#![warn(missing_docs)]

use anyhow::{bail, Context, Result};
use scene_actions::{ActionRunner, ActionsConfig, MemoryHost, SceneDocument};
use scene_cycle::{stored_index, Direction, JsonFileSettings};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Action requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Step the stroke palette
    Cycle(Direction),
    /// Duplicate the selection
    Duplicate,
    /// Print the scene
    Show,
}

/// Files an invocation works on
#[derive(Debug, Clone)]
pub struct Session {
    /// Scene document
    pub scene: PathBuf,
    /// Settings file holding the palette cursor
    pub settings: PathBuf,
    /// Action configuration
    pub config: ActionsConfig,
}

/// What an invocation did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Notices shown by the action, in order
    pub notices: Vec<String>,
    /// Whether the scene file was rewritten
    pub saved: bool,
}

impl Session {
    /// Session with default configuration
    #[must_use]
    pub fn new(scene: impl Into<PathBuf>, settings: impl Into<PathBuf>) -> Self {
        Self {
            scene: scene.into(),
            settings: settings.into(),
            config: ActionsConfig::default(),
        }
    }

    /// With configuration
    #[must_use]
    pub fn with_config(mut self, config: ActionsConfig) -> Self {
        self.config = config;
        self
    }

    /// Run `action`, saving the scene if it changed
    ///
    /// Notices are collected even when the action fails; the error then
    /// carries them as context.
    ///
    /// # Errors
    /// Returns error if a file cannot be read or written, or the action fails
    pub fn run(&self, action: Action) -> Result<Report> {
        let document = load_scene(&self.scene)?;
        if action == Action::Show {
            return Ok(Report {
                notices: vec![self.render(&document)?],
                saved: false,
            });
        }

        let original = document.clone();
        let host = MemoryHost::with_settings(document, JsonFileSettings::new(&self.settings));
        let runner = ActionRunner::new(self.config.clone(), host)?;
        let result = match action {
            Action::Cycle(direction) => runner.cycle_color(direction).map(|_| ()),
            Action::Duplicate => runner.duplicate_selection().map(|_| ()),
            Action::Show => Ok(()),
        };

        let host = runner.into_host();
        let notices = host.take_notices();
        if let Err(e) = result {
            return Err(anyhow::Error::new(e).context(notices.join("\n")));
        }

        let document = host.document();
        let saved = document != original;
        if saved {
            save_scene(&self.scene, &document)?;
        }
        Ok(Report { notices, saved })
    }

    fn render(&self, document: &SceneDocument) -> Result<String> {
        let settings = JsonFileSettings::new(&self.settings);
        let palette = self.config.palette_sequence()?;
        let index = stored_index(&settings, &self.config.cycle_key)?
            .filter(|i| *i < palette.len())
            .unwrap_or(0);

        let mut out = String::new();
        if let Some(entry) = palette.get(index) {
            writeln!(out, "palette: {} ({})", entry.label, entry.value)?;
        }
        if let Some(tool) = &document.active_tool {
            writeln!(out, "tool: {tool}")?;
        }
        for entity in &document.entities {
            let marker = if document.selection.contains(&entity.id) { '*' } else { ' ' };
            write!(out, "{marker} {} {}", entity.id, entity.kind)?;
            if let Some(p) = entity.position {
                write!(out, " @({}, {})", p.x, p.y)?;
            }
            if let Some(color) = entity.field(&self.config.stroke_field) {
                write!(out, " {}={color}", self.config.stroke_field)?;
            }
            for r in &entity.references {
                write!(out, " {}->{}", r.slot, r.target)?;
            }
            out.push('\n');
        }
        Ok(out.trim_end().to_string())
    }
}

/// Read a scene document
///
/// # Errors
/// Returns error if the file is missing or not a scene document
pub fn load_scene(path: &Path) -> Result<SceneDocument> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot read scene {}", path.display()))?;
    let document: SceneDocument = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a scene document", path.display()))?;
    scene_model::collection::ensure_unique_ids(&document.entities)
        .with_context(|| format!("{} has repeated ids", path.display()))?;
    Ok(document)
}

/// Write a scene document through a temporary file
///
/// # Errors
/// Returns error if the file cannot be written
pub fn save_scene(path: &Path, document: &SceneDocument) -> Result<()> {
    let Some(name) = path.file_name() else {
        bail!("{} is not a file path", path.display());
    };
    let mut tmp_name = name.to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let raw = serde_json::to_string_pretty(document)?;
    fs::write(&tmp, raw).with_context(|| format!("cannot write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("cannot replace {}", path.display()))?;
    tracing::debug!(path = %path.display(), entities = document.entities.len(), "scene saved");
    Ok(())
}
