//! Integration tests for PromptStore
//!
//! These tests exercise the full init-then-render path over on-disk fixture
//! directories.

use std::fs;
use std::path::Path;

use promptstore::{PromptConfig, PromptError, PromptManager};
use serde_json::json;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("Failed to write fixture");
}

fn init(dir: &TempDir) -> PromptManager {
    let config = PromptConfig {
        source_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    PromptManager::init(config).expect("init failed")
}

// =============================================================================
// Aggregation
// =============================================================================

#[test]
fn test_units_aggregate_by_namespace_and_root() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "index.yaml", "x: y\nshared:\n  footer: F");
    write(dir.path(), "greetings.yaml", "formal: Hello\ncasual: Hey");
    write(dir.path(), "emails.yaml", "welcome:\n  subject: Welcome!");

    let store = init(&dir);

    assert_eq!(store.get_prompt("x", &json!({})).unwrap(), "y");
    assert_eq!(store.get_prompt("shared.footer", &json!({})).unwrap(), "F");
    assert_eq!(store.get_prompt("greetings.formal", &json!({})).unwrap(), "Hello");
    assert_eq!(
        store.get_prompt("emails.welcome.subject", &json!({})).unwrap(),
        "Welcome!"
    );
}

#[test]
fn test_namespace_units_do_not_clobber_each_other() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "index.yaml", "greetings:\n  formal: First\n  casual: Hey");
    write(dir.path(), "zz.yaml", "formal: Second");

    let store = init(&dir);

    // zz merges under its own stem, not over greetings
    assert_eq!(store.get_prompt("zz.formal", &json!({})).unwrap(), "Second");
    assert_eq!(store.get_prompt("greetings.formal", &json!({})).unwrap(), "First");
}

#[test]
fn test_branch_keys_accumulate_across_units() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "index.yaml", "emails:\n  welcome: W");
    write(dir.path(), "emails.yaml", "goodbye: G");

    let store = init(&dir);

    assert_eq!(store.get_prompt("emails.welcome", &json!({})).unwrap(), "W");
    assert_eq!(store.get_prompt("emails.goodbye", &json!({})).unwrap(), "G");
}

#[test]
fn test_later_unit_leaf_overwrites_earlier_branch() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "index.yaml", "emails:\n  welcome:\n    subject: S");
    write(dir.path(), "emails.yaml", "welcome: flattened");

    let store = init(&dir);

    assert_eq!(store.get_prompt("emails.welcome", &json!({})).unwrap(), "flattened");
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_render_with_variables_and_partials() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "partials.yaml", "header: \"== {{inputs.title}} ==\"");
    write(
        dir.path(),
        "emails.yaml",
        "welcome: |\n  {{> header}}\n  Hello {{inputs.name}}",
    );

    let store = init(&dir);
    let out = store
        .get_prompt("emails.welcome", &json!({"title": "Greeting", "name": "Ada"}))
        .unwrap();

    assert_eq!(out, "== Greeting ==\nHello Ada");
}

#[test]
fn test_missing_prompt_renders_empty_string() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "greetings.yaml", "formal: Hello");

    let store = init(&dir);
    assert_eq!(store.get_prompt("missing.path", &json!({})).unwrap(), "");
}

#[test]
fn test_missing_partials_file_does_not_crash_init() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "emails.yaml", "welcome: \"Hello {{inputs.name}}\"");

    let store = init(&dir);
    assert!(store.partials().is_empty());
    assert_eq!(
        store.get_prompt("emails.welcome", &json!({"name": "Ada"})).unwrap(),
        "Hello Ada"
    );

    // A template depending on a missing partial fails per engine behavior
    let dir2 = TempDir::new().unwrap();
    write(dir2.path(), "emails.yaml", "welcome: \"{{> header}}\"");
    let store2 = init(&dir2);
    assert!(matches!(
        store2.get_prompt("emails.welcome", &json!({})),
        Err(PromptError::Render { .. })
    ));
}

#[test]
fn test_rendered_output_is_whitespace_trimmed() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "greetings.yaml", "padded: \"  hi  \"");

    let store = init(&dir);
    assert_eq!(store.get_prompt("greetings.padded", &json!({})).unwrap(), "hi");
}

// =============================================================================
// Configuration and failure modes
// =============================================================================

#[test]
fn test_unrecognized_config_keys_are_accepted() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "greetings.yaml", "formal: Hello");

    let yaml = format!(
        "source-directory: {}\ncache-prompts: true",
        dir.path().display()
    );
    let config: PromptConfig = serde_yaml::from_str(&yaml).unwrap();
    let store = PromptManager::init(config).expect("init failed");

    assert_eq!(store.get_prompt("greetings.formal", &json!({})).unwrap(), "Hello");
    assert!(store.config().extra.contains_key("cache-prompts"));
}

#[test]
fn test_unparseable_unit_aborts_init() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "greetings.yaml", "formal: [unclosed");

    let config = PromptConfig {
        source_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    assert!(matches!(
        PromptManager::init(config),
        Err(PromptError::UnitParse { .. })
    ));
}

#[test]
fn test_manager_is_shareable_across_threads() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "greetings.yaml", "formal: \"Hello {{inputs.name}}\"");

    let store = std::sync::Arc::new(init(&dir));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let store = store.clone();
            std::thread::spawn(move || {
                store
                    .get_prompt("greetings.formal", &json!({"name": format!("t{i}")}))
                    .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("Hello t{i}"));
    }
}
