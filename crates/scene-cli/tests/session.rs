//! File-backed sessions.

use pretty_assertions::assert_eq;
use scene_actions::{ActionsConfig, SceneDocument};
use scene_cli::{load_scene, save_scene, Action, Session};
use scene_cycle::Direction;
use scene_model::FieldValue;
use scene_test_utils::{find, sample_scene, BLUE, ORANGE};
use std::path::Path;
use tempfile::TempDir;

fn workspace(doc: &SceneDocument) -> (TempDir, Session) {
    let dir = tempfile::tempdir().unwrap();
    let scene = dir.path().join("scene.json");
    save_scene(&scene, doc).unwrap();
    let session = Session::new(scene, dir.path().join("settings.json"));
    (dir, session)
}

fn stroke(path: &Path, id: &str) -> Option<FieldValue> {
    let doc = load_scene(path).unwrap();
    find(&doc.entities, id).field("strokeColor").cloned()
}

#[test]
fn cycle_is_saved_and_resumed() {
    let doc = SceneDocument::new(sample_scene()).with_selection(["circle"]);
    let (dir, session) = workspace(&doc);

    let report = session.run(Action::Cycle(Direction::Forward)).unwrap();
    assert!(report.saved);
    assert_eq!(report.notices, vec!["1 element(s) changed to Blue".to_string()]);
    assert_eq!(stroke(&session.scene, "circle"), Some(FieldValue::from(BLUE)));

    session.run(Action::Cycle(Direction::Backward)).unwrap();
    session.run(Action::Cycle(Direction::Backward)).unwrap();
    assert_eq!(stroke(&session.scene, "circle"), Some(FieldValue::from(ORANGE)));
    assert!(dir.path().join("settings.json").exists());
}

#[test]
fn skipped_cycle_leaves_file_alone() {
    let doc = SceneDocument::new(sample_scene());
    let (_dir, session) = workspace(&doc);

    let report = session.run(Action::Cycle(Direction::Forward)).unwrap();

    assert!(!report.saved);
    assert_eq!(load_scene(&session.scene).unwrap(), doc);
}

#[test]
fn duplicate_appends_and_selects() {
    let doc = SceneDocument::new(sample_scene()).with_selection(["arrow"]);
    let (_dir, session) = workspace(&doc);

    let report = session.run(Action::Duplicate).unwrap();

    assert!(report.saved);
    let saved = load_scene(&session.scene).unwrap();
    assert_eq!(saved.entities.len(), 5);
    assert_eq!(saved.selection.len(), 1);
    assert_eq!(saved.selection[0], saved.entities[4].id);
    assert_ne!(saved.selection[0].as_str(), "arrow");
}

#[test]
fn failed_action_reports_notice() {
    let doc = SceneDocument::new(sample_scene());
    let (_dir, session) = workspace(&doc);

    let err = session.run(Action::Duplicate).unwrap_err();

    assert!(format!("{err:#}").contains("No elements selected to duplicate"));
    assert_eq!(load_scene(&session.scene).unwrap(), doc);
}

#[test]
fn show_renders_scene() {
    let doc = SceneDocument::new(sample_scene())
        .with_selection(["box"])
        .with_active_tool("freedraw");
    let (_dir, session) = workspace(&doc);

    let report = session.run(Action::Show).unwrap();

    assert!(!report.saved);
    let text = &report.notices[0];
    assert!(text.starts_with("palette: Black (#1e1e1e)"));
    assert!(text.contains("tool: freedraw"));
    assert!(text.contains("* box rectangle"));
    assert!(text.contains("start->box"));
}

#[test]
fn config_changes_palette() {
    let doc = SceneDocument::new(sample_scene()).with_selection(["box"]);
    let (_dir, session) = workspace(&doc);
    let config = ActionsConfig::from_toml_str(
        r##"
            [[palette]]
            value = "#ff0000"
            label = "Red"

            [[palette]]
            value = "#00ff00"
            label = "Lime"
        "##,
    )
    .unwrap();
    let session = session.with_config(config);

    session.run(Action::Cycle(Direction::Forward)).unwrap();

    assert_eq!(stroke(&session.scene, "box"), Some(FieldValue::from("#00ff00")));
}
