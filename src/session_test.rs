#![allow(clippy::float_cmp)]

use editor::autosave::MemoryStore;
use editor::catalog::Catalog;
use editor::doc::Category;
use editor::input::PaletteSource;
use editor::viewport::Point;

use super::*;

fn catalog() -> Catalog {
    let mut c = Catalog::new();
    c.push(Category::Floor, "floor_1", 16.0, 16.0);
    c.push(Category::Wall, "wall_mid", 16.0, 16.0);
    c
}

fn config() -> EditorConfig {
    EditorConfig { snap: true, autosave_secs: 1, ..EditorConfig::default() }
}

const PLACE_WALL: &str = r#"{"at_ms": 0, "event": "palette_drag_start", "category": "wall", "index": 0}
{"at_ms": 400, "event": "canvas_drop", "x": 20, "y": 10}
"#;

#[test]
fn script_line_parses_flattened_event() {
    let line: ScriptLine =
        serde_json::from_str(r#"{"at_ms": 7, "event": "pointer_move", "x": 1.5, "y": 2}"#).unwrap();
    assert_eq!(line.at_ms, 7);
    assert_eq!(line.event, InputEvent::PointerMove { x: 1.5, y: 2.0 });
}

#[test]
fn script_line_parses_palette_source() {
    let line: ScriptLine =
        serde_json::from_str(r#"{"at_ms": 0, "event": "palette_drag_start", "category": "enemy", "index": 2}"#)
            .unwrap();
    assert_eq!(line.event, InputEvent::PaletteDragStart { source: PaletteSource::new(Category::Enemy, 2) });
}

#[test]
fn blank_session_uses_configured_dimensions() {
    let cfg = EditorConfig { map_width: 64, map_height: 48, ..config() };
    let (session, report) = Session::start(catalog(), MemoryStore::new(), &cfg, Origin::Blank).unwrap();
    assert_eq!(report, LoadReport::default());
    assert_eq!((session.core.scene.width(), session.core.scene.height()), (64, 48));
    assert!(session.core.scene.is_empty());
}

#[test]
fn run_places_and_snaps() {
    let (mut session, _) = Session::start(catalog(), MemoryStore::new(), &config(), Origin::Blank).unwrap();
    let summary = session.run(PLACE_WALL.as_bytes()).unwrap();
    assert_eq!(summary.events, 2);
    assert_eq!(summary.spawned, 1);
    let el = &session.core.scene.elements()[0];
    assert_eq!(el.category, Category::Wall);
    assert_eq!(el.position, Point::new(16.0, 16.0));
}

#[test]
fn run_drags_and_deletes() {
    let script = format!(
        "{PLACE_WALL}\
         {{\"at_ms\": 500, \"event\": \"pointer_down\", \"x\": 20, \"y\": 20}}\n\
         {{\"at_ms\": 600, \"event\": \"pointer_move\", \"x\": 52, \"y\": 20}}\n\
         {{\"at_ms\": 700, \"event\": \"pointer_up\", \"x\": 52, \"y\": 20}}\n\
         {{\"at_ms\": 800, \"event\": \"secondary_click\", \"x\": 50, \"y\": 20}}\n"
    );
    let (mut session, _) = Session::start(catalog(), MemoryStore::new(), &config(), Origin::Blank).unwrap();
    let summary = session.run(script.as_bytes()).unwrap();
    assert_eq!(summary.moved, 1);
    assert_eq!(summary.deleted, 1);
    assert!(session.core.scene.is_empty());
}

#[test]
fn autosave_follows_event_timestamps() {
    let script = format!("{PLACE_WALL}{{\"at_ms\": 1200, \"event\": \"resize\", \"width\": 320, \"height\": 180}}\n");
    let mut store = MemoryStore::new();
    let (mut session, _) = Session::start(catalog(), &mut store, &config(), Origin::Blank).unwrap();
    let summary = session.run(script.as_bytes()).unwrap();
    assert_eq!(summary.backups, 1);
    drop(session);
    let backup = autosave::pending_backup(&store).unwrap().unwrap();
    assert!(backup.elements.contains("wall_mid"));
}

#[test]
fn finish_exports_and_clears_backup() {
    let mut store = MemoryStore::new();
    let (mut session, _) = Session::start(catalog(), &mut store, &config(), Origin::Blank).unwrap();
    session.run(PLACE_WALL.as_bytes()).unwrap();
    autosave::save(&session.core.scene, &mut session.store).unwrap();
    let json = session.finish().unwrap();
    assert!(json.contains(r#""type":"wall""#));
    assert!(autosave::pending_backup(&store).unwrap().is_none());
}

#[test]
fn resume_restores_backup() {
    let cat = catalog();
    let mut saved = Scene::new(96, 96);
    saved.spawn(&cat, Category::Floor, 0, 32.0, 32.0).unwrap();
    let mut store = MemoryStore::new();
    autosave::save(&saved, &mut store).unwrap();

    let origin = Origin::Resume { fallback: None };
    let (session, report) = Session::start(cat, &mut store, &config(), origin).unwrap();
    assert_eq!(report.loaded, 1);
    assert_eq!(session.core.scene.width(), 96);
    assert_eq!(session.core.scene.serialize(), saved.serialize());
}

#[test]
fn resume_without_backup_uses_fallback_map() {
    let map = r#"{"width": 48, "height": 32, "elements": [
        {"x": 0, "y": 0, "width": 16, "height": 16, "id": "floor_1", "type": "floor", "index": 0}
    ]}"#;
    let origin = Origin::Resume { fallback: Some(map) };
    let (session, report) = Session::start(catalog(), MemoryStore::new(), &config(), origin).unwrap();
    assert_eq!(report.loaded, 1);
    assert_eq!(session.core.scene.width(), 48);
}

#[test]
fn bad_script_line_reports_line_number() {
    let script = format!("{PLACE_WALL}\nnot json\n");
    let (mut session, _) = Session::start(catalog(), MemoryStore::new(), &config(), Origin::Blank).unwrap();
    assert!(matches!(session.run(script.as_bytes()), Err(AppError::Script { line: 4, .. })));
}

#[test]
fn stale_palette_index_fails_replay() {
    let script = r#"{"at_ms": 0, "event": "palette_drag_start", "category": "floor", "index": 9}
{"at_ms": 1, "event": "canvas_drop", "x": 0, "y": 0}
"#;
    let (mut session, _) = Session::start(catalog(), MemoryStore::new(), &config(), Origin::Blank).unwrap();
    assert!(matches!(session.run(script.as_bytes()), Err(AppError::Lookup(_))));
}
