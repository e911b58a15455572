mod common;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sensortui::{
    App, AppConfig, AppEvent, FileSource, FilterMode, InputMode, LoadingState, SortField, Theme,
};
use std::io::Write;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;

fn press(app: &mut App, code: KeyCode) -> Option<AppEvent> {
    app.event(&AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

/// Issue a fetch and feed its completion back into the app.
fn fetch(app: &mut App, rx: &Receiver<AppEvent>) {
    assert!(app.event(&AppEvent::Fetch).is_none());
    assert!(app.loading_state().is_loading());
    let fetched = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("fetch did not complete");
    app.event(&fetched);
}

fn app_for(file: &NamedTempFile, config: AppConfig) -> (App, Receiver<AppEvent>) {
    let (tx, rx) = channel();
    let app = App::new_with_config(
        tx,
        Arc::new(FileSource::new(file.path())),
        Theme::default(),
        config,
    );
    (app, rx)
}

#[test]
fn test_loads_devices_from_file() {
    let file = common::json_file(&common::fleet(12));
    let (mut app, rx) = app_for(&file, AppConfig::default());
    assert_eq!(app.loading_state(), &LoadingState::Idle);

    fetch(&mut app, &rx);
    assert_eq!(app.loading_state(), &LoadingState::Loaded { count: 12 });
    let view = app.view();
    assert_eq!(view.total_filtered, 12);
    assert_eq!(view.rows.len(), 5);
    assert_eq!(view.page_count(), 3);
}

#[test]
fn test_keyboard_workflow() {
    let file = common::json_file(&common::fleet(12));
    let (mut app, rx) = app_for(&file, AppConfig::default());
    fetch(&mut app, &rx);

    // Narrow to sensor-1, sensor-10, sensor-11, sensor-12 and select them.
    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.input_mode, InputMode::Filtering);
    type_text(&mut app, "sensor-1");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.filter_input(), "sensor-1");
    assert_eq!(app.view().total_filtered, 4);

    press(&mut app, KeyCode::Char('a'));
    assert!(app.view().all_selected());

    // Sort by name descending: sensor-12 first.
    press(&mut app, KeyCode::Char('2'));
    press(&mut app, KeyCode::Char('2'));
    assert_eq!(app.view_state().order_by(), SortField::Name);
    assert_eq!(app.view().rows[0].record.name, "sensor-12");

    // Expand the second row.
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Char('e'));
    assert!(app.view_state().expanded.contains(&11));

    // Clearing the filter keeps selection and expansion.
    press(&mut app, KeyCode::Char('/'));
    app.event(&AppEvent::Key(KeyEvent::new(
        KeyCode::Char('u'),
        KeyModifiers::CONTROL,
    )));
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.view().total_filtered, 12);
    assert_eq!(app.view_state().selected.len(), 4);
    assert!(app.view_state().expanded.contains(&11));
    assert!(!app.view().all_selected());

    // Page forward then change rows per page.
    press(&mut app, KeyCode::Right);
    assert_eq!(app.view_state().page, 1);
    press(&mut app, KeyCode::Char('p'));
    assert_eq!(app.view_state().page_size, 10);
    assert_eq!(app.view_state().page, 0);

    assert!(matches!(
        press(&mut app, KeyCode::Char('q')),
        Some(AppEvent::Exit)
    ));
}

#[test]
fn test_regex_mode_bad_pattern_shows_everything() {
    let file = common::json_file(&common::fleet(7));
    let mut config = AppConfig::default();
    config.filter.mode = FilterMode::Regex;
    let (mut app, rx) = app_for(&file, config);
    fetch(&mut app, &rx);

    app.set_filter_text("sensor-[2-3]");
    assert_eq!(app.view().total_filtered, 2);
    assert!(app.view().notice.is_none());

    app.set_filter_text("sensor-(");
    let view = app.view();
    assert!(view.notice.is_some());
    assert_eq!(view.total_filtered, 7);
}

#[test]
fn test_refetch_picks_up_new_data() {
    let file = common::json_file(&common::fleet(3));
    let (mut app, rx) = app_for(&file, AppConfig::default());
    fetch(&mut app, &rx);
    assert_eq!(app.view().total_filtered, 3);

    let json = serde_json::to_string(&common::fleet(9)).unwrap();
    std::fs::write(file.path(), json).unwrap();

    assert!(matches!(
        press(&mut app, KeyCode::Char('r')),
        Some(AppEvent::Fetch)
    ));
    fetch(&mut app, &rx);
    assert_eq!(app.loading_state(), &LoadingState::Loaded { count: 9 });
    assert_eq!(app.view().total_filtered, 9);
}

#[test]
fn test_malformed_data_fails_the_fetch() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"[{\"id\": 1, \"name\": \"broken\"}]").unwrap();
    let (mut app, rx) = app_for(&file, AppConfig::default());
    fetch(&mut app, &rx);

    match app.loading_state() {
        LoadingState::Failed { message } => {
            assert!(message.starts_with("Received malformed device data"), "{}", message)
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(app.view().total_filtered, 0);
}

#[test]
fn test_duplicate_ids_fail_the_fetch() {
    let mut records = common::fleet(3);
    records[2].id = 1;
    let file = common::json_file(&records);
    let (mut app, rx) = app_for(&file, AppConfig::default());
    fetch(&mut app, &rx);

    match app.loading_state() {
        LoadingState::Failed { message } => {
            assert!(message.contains("duplicate record id 1"), "{}", message)
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn test_missing_file_fails_the_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let (tx, rx) = channel();
    let mut app = App::new(tx, Arc::new(FileSource::new(dir.path().join("devices.json"))));
    fetch(&mut app, &rx);

    match app.loading_state() {
        LoadingState::Failed { message } => {
            assert!(message.contains("not found"), "{}", message)
        }
        other => panic!("expected failure, got {:?}", other),
    }
}
