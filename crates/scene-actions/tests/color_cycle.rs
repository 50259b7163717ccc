//! Color cycling through the action runner.

use pretty_assertions::assert_eq;
use scene_actions::{
    ActionError, ActionRunner, ActionsConfig, CycleOutcome, MemoryHost, SceneDocument,
    DEFAULT_CYCLE_KEY, NOTHING_TO_RECOLOR,
};
use scene_cycle::{stored_index, Direction, JsonFileSettings, MemorySettings, SettingsStore};
use scene_model::FieldValue;
use scene_test_utils::{find, palette, sample_scene, FailingSettings, BLACK, BLUE, GREEN, ORANGE};
use semver::Version;

fn runner_with<S: SettingsStore>(doc: SceneDocument, settings: S) -> ActionRunner<MemoryHost<S>> {
    ActionRunner::new(ActionsConfig::default(), MemoryHost::with_settings(doc, settings)).unwrap()
}

fn selected(ids: &[&str]) -> SceneDocument {
    SceneDocument::new(sample_scene()).with_selection(ids.iter().copied())
}

fn stroke(runner: &ActionRunner<MemoryHost<impl SettingsStore>>, id: &str) -> Option<FieldValue> {
    let doc = runner.host().document();
    find(&doc.entities, id).field("strokeColor").cloned()
}

#[test]
fn recolors_selection_and_persists_cursor() {
    let runner = runner_with(selected(&["arrow", "circle"]), MemorySettings::new());

    let outcome = runner.cycle_color(Direction::Forward).unwrap();

    assert_eq!(
        outcome,
        CycleOutcome::Selection {
            count: 2,
            value: BLUE.to_string(),
            label: "Blue".to_string(),
        }
    );
    assert_eq!(stroke(&runner, "arrow"), Some(FieldValue::from(BLUE)));
    assert_eq!(stroke(&runner, "circle"), Some(FieldValue::from(BLUE)));
    assert_eq!(stroke(&runner, "box"), Some(FieldValue::from(BLACK)));
    assert_eq!(
        stored_index(runner.host().settings(), DEFAULT_CYCLE_KEY).unwrap(),
        Some(1)
    );
    assert_eq!(runner.host().notices(), vec!["2 element(s) changed to Blue".to_string()]);
    assert_eq!(runner.host().history_len(), 1);
}

#[test]
fn recolor_keeps_ids_and_references() {
    let runner = runner_with(selected(&["box", "label", "arrow"]), MemorySettings::new());
    let before = runner.host().document().entities;

    runner.cycle_color(Direction::Forward).unwrap();
    let after = runner.host().document().entities;

    assert_eq!(before.len(), after.len());
    for (old, new) in before.iter().zip(&after) {
        assert_eq!(old.id, new.id);
        assert_eq!(old.references, new.references);
        assert_eq!(old.groups, new.groups);
        assert_eq!(old.position, new.position);
    }
}

#[test]
fn cycle_walks_palette_in_both_directions() {
    let runner = runner_with(selected(&["circle"]), MemorySettings::new());
    let labels: Vec<String> = (0..4)
        .map(|_| match runner.cycle_color(Direction::Forward).unwrap() {
            CycleOutcome::Selection { label, .. } => label,
            other => panic!("unexpected outcome {other:?}"),
        })
        .collect();
    assert_eq!(labels, ["Blue", "Green", "Orange", "Black"]);

    runner.cycle_color(Direction::Backward).unwrap();
    assert_eq!(stroke(&runner, "circle"), Some(FieldValue::from(ORANGE)));
}

#[test]
fn cursor_survives_a_new_runner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let first = runner_with(selected(&["circle"]), JsonFileSettings::new(&path));
    first.cycle_color(Direction::Forward).unwrap();
    first.cycle_color(Direction::Forward).unwrap();

    let second = runner_with(selected(&["circle"]), JsonFileSettings::new(&path));
    second.cycle_color(Direction::Forward).unwrap();

    let expected = palette().get(3).unwrap().value.clone();
    assert_eq!(stroke(&second, "circle"), Some(FieldValue::Text(expected)));
}

#[test]
fn no_selection_with_drawing_tool_sets_default() {
    let doc = SceneDocument::new(sample_scene()).with_active_tool("freedraw");
    let runner = runner_with(doc, MemorySettings::new());

    let outcome = runner.cycle_color(Direction::Backward).unwrap();

    assert_eq!(
        outcome,
        CycleOutcome::Tool {
            value: ORANGE.to_string(),
            label: "Orange".to_string(),
        }
    );
    let doc = runner.host().document();
    assert_eq!(doc.tool_defaults.get("strokeColor"), Some(&FieldValue::from(ORANGE)));
    assert_eq!(runner.host().history_len(), 0);
    assert_eq!(runner.host().notices(), vec!["Drawing color changed to Orange".to_string()]);
}

#[test]
fn no_selection_with_other_tool_is_skipped() {
    let doc = SceneDocument::new(sample_scene()).with_active_tool("selection");
    let runner = runner_with(doc, MemorySettings::new());

    let outcome = runner.cycle_color(Direction::Forward).unwrap();

    assert_eq!(outcome, CycleOutcome::Skipped);
    assert_eq!(
        stored_index(runner.host().settings(), DEFAULT_CYCLE_KEY).unwrap(),
        Some(0)
    );
    assert!(runner.host().document().tool_defaults.is_empty());
    assert_eq!(runner.host().notices(), vec![NOTHING_TO_RECOLOR.to_string()]);
}

#[test]
fn persistence_failure_leaves_scene_and_cursor() {
    let runner = runner_with(selected(&["circle"]), FailingSettings::new());
    runner.cycle_color(Direction::Forward).unwrap();
    assert_eq!(runner.host().settings().write_count(), 2);
    runner.host().settings().set_fail_writes(true);

    let err = runner.cycle_color(Direction::Forward).unwrap_err();

    assert!(matches!(err, ActionError::Persistence(_)));
    assert!(err.is_recoverable());
    assert_eq!(stroke(&runner, "circle"), Some(FieldValue::from(BLUE)));
    assert_eq!(
        stored_index(runner.host().settings(), DEFAULT_CYCLE_KEY).unwrap(),
        Some(1)
    );
    let notices = runner.host().notices();
    assert!(notices[1].starts_with("Could not save the color setting"));
}

#[test]
fn unwritable_settings_abort_first_use() {
    let runner = runner_with(selected(&["circle"]), FailingSettings::read_only());

    let err = runner.cycle_color(Direction::Forward).unwrap_err();

    assert!(matches!(err, ActionError::Persistence(_)));
    assert_eq!(stroke(&runner, "circle"), Some(FieldValue::from(BLACK)));
    assert_eq!(runner.host().history_len(), 0);
}

#[test]
fn unreadable_settings_abort() {
    let settings = FailingSettings::new();
    settings.set_fail_reads(true);
    let runner = runner_with(selected(&["circle"]), settings);

    assert!(matches!(
        runner.cycle_color(Direction::Forward),
        Err(ActionError::Persistence(_))
    ));
    assert_eq!(stroke(&runner, "circle"), Some(FieldValue::from(BLACK)));
}

#[test]
fn rejected_commit_steps_cursor_back() {
    let host = MemoryHost::new(selected(&["circle"])).with_view_mode(true);
    let runner = ActionRunner::new(ActionsConfig::default(), host).unwrap();

    let err = runner.cycle_color(Direction::Forward).unwrap_err();

    assert!(matches!(err, ActionError::Store(_)));
    assert_eq!(stroke(&runner, "circle"), Some(FieldValue::from(BLACK)));
    assert_eq!(
        stored_index(runner.host().settings(), DEFAULT_CYCLE_KEY).unwrap(),
        Some(0)
    );
}

#[test]
fn rejected_tool_update_steps_cursor_back() {
    let doc = SceneDocument::new(Vec::new()).with_active_tool("freedraw");
    let host = MemoryHost::new(doc).with_view_mode(true);
    let runner = ActionRunner::new(ActionsConfig::default(), host).unwrap();

    assert!(runner.cycle_color(Direction::Backward).is_err());
    assert_eq!(
        stored_index(runner.host().settings(), DEFAULT_CYCLE_KEY).unwrap(),
        Some(0)
    );
}

#[test]
fn old_host_is_refused_before_any_change() {
    let host = MemoryHost::new(selected(&["circle"])).with_version(Version::new(2, 1, 0));
    let runner = ActionRunner::new(ActionsConfig::default(), host).unwrap();

    let err = runner.cycle_color(Direction::Forward).unwrap_err();

    assert!(matches!(err, ActionError::UnsupportedHost { .. }));
    assert!(runner.host().settings().snapshot().is_empty());
    assert_eq!(
        runner.host().notices(),
        vec!["This action requires host version 2.14.2 or newer.".to_string()]
    );
}

#[test]
fn host_at_raised_minimum_is_accepted() {
    let config = ActionsConfig::new().with_min_host_version(Version::new(3, 0, 0));
    let runner = ActionRunner::new(config.clone(), MemoryHost::new(selected(&["circle"]))).unwrap();
    assert!(matches!(
        runner.cycle_color(Direction::Forward),
        Err(ActionError::UnsupportedHost { .. })
    ));

    let exact = MemoryHost::new(selected(&["circle"])).with_version(Version::new(3, 0, 0));
    let runner = ActionRunner::new(config, exact).unwrap();
    runner.cycle_color(Direction::Forward).unwrap();
    assert_eq!(stroke(&runner, "circle"), Some(FieldValue::from(BLUE)));
}

#[test]
fn resumes_from_existing_host_record() {
    let mut values = serde_json::Map::new();
    values.insert(DEFAULT_CYCLE_KEY.to_string(), serde_json::json!({ "value": 2 }));
    let runner = runner_with(selected(&["box"]), MemorySettings::with_values(values));

    runner.cycle_color(Direction::Forward).unwrap();

    assert_eq!(stroke(&runner, "box"), Some(FieldValue::from(ORANGE)));
    assert_eq!(
        stored_index(runner.host().settings(), DEFAULT_CYCLE_KEY).unwrap(),
        Some(3)
    );
}

#[test]
fn custom_palette_and_field() {
    let config = ActionsConfig::new()
        .with_palette([("#ffffff", "White"), (GREEN, "Green")])
        .with_stroke_field("backgroundColor")
        .with_cycle_key("Fill Index");
    let runner = ActionRunner::new(config, MemoryHost::new(selected(&["box"]))).unwrap();

    runner.cycle_color(Direction::Forward).unwrap();
    runner.cycle_color(Direction::Forward).unwrap();

    let doc = runner.host().document();
    let entity = find(&doc.entities, "box");
    assert_eq!(entity.field("backgroundColor"), Some(&FieldValue::from("#ffffff")));
    assert_eq!(entity.field("strokeColor"), Some(&FieldValue::from(BLACK)));
    assert_eq!(
        stored_index(runner.host().settings(), "Fill Index").unwrap(),
        Some(0)
    );
}

#[test]
fn invalid_config_is_refused() {
    let config = ActionsConfig::new().with_palette(Vec::<(String, String)>::new());
    let result = ActionRunner::new(config, MemoryHost::new(SceneDocument::default()));
    assert!(matches!(result, Err(ActionError::Configuration(_))));
}
