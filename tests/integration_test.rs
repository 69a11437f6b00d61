// Integration tests for member-admin

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(tag: &str, ext: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("member_admin_{tag}_{}_{}.{ext}", std::process::id(), nonce));
    path
}

/// Serve exactly one HTTP response on a loopback port and return the URL.
fn serve_once(status_line: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let response = format!(
                "HTTP/1.1 {status_line}\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{addr}/adminui-problem/members.json")
}

fn local_client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .expect("client")
}

const MEMBERS_JSON: &str = r#"[
  {"id": "1", "name": "Aaron Miles", "email": "aaron@mailinator.com", "role": "member"},
  {"id": "2", "name": "Aishwarya Naik", "email": "aishwarya@mailinator.com", "role": "member"},
  {"id": "3", "name": "Arvind Kumar", "email": "arvind@mailinator.com", "role": "admin"}
]"#;

// 1) Theme config roundtrip
#[test]
fn theme_roundtrip_and_fallback() {
    use member_admin::app::Theme;

    let path = temp_path("theme", "conf");
    let t = Theme::mocha();
    t.write_file(&path).expect("write theme");
    let t2 = Theme::from_file(&path).expect("read theme");
    assert_eq!(format!("{:?}", t.text), format!("{:?}", t2.text));
    assert_eq!(format!("{:?}", t.selected_bg), format!("{:?}", t2.selected_bg));
    assert_eq!(format!("{:?}", t.danger), format!("{:?}", t2.danger));

    // explicit but missing path falls back to defaults
    let missing = temp_path("theme_missing", "conf");
    let fallback = Theme::load(Some(missing.as_path()));
    assert_eq!(format!("{:?}", fallback.title), format!("{:?}", Theme::mocha().title));

    let _ = std::fs::remove_file(&path);
}

// 2) Keybinds file roundtrip plus override
#[test]
fn keybinds_file_roundtrip_and_override() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use member_admin::app::keymap::{KeyAction, Keymap};

    let path = temp_path("keys", "conf");
    Keymap::default().write_file(&path).expect("write keymap");
    let mut contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("DeleteSelected = Shift+D"));
    contents.push_str("Reload = Ctrl+r\n");
    std::fs::write(&path, contents).unwrap();

    let km = Keymap::load(Some(path.as_path()));
    let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
    assert_eq!(km.resolve(&ctrl_r), Some(KeyAction::Reload));
    let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
    assert_eq!(km.resolve(&space), Some(KeyAction::ToggleSelect));

    let _ = std::fs::remove_file(&path);
}

// 3) Default config files are written where asked
#[test]
fn write_default_config_creates_both_files() {
    let dir = temp_path("cfg", "d");
    let written = member_admin::app::write_default_config(&dir).expect("write config");
    assert_eq!(written.len(), 2);
    assert!(dir.join("theme.conf").is_file());
    assert!(dir.join("keybinds.conf").is_file());
    let _ = std::fs::remove_dir_all(&dir);
}

// 4) File source feeds the app
#[test]
fn file_source_loads_members() {
    use member_admin::source::{FileSource, MemberSource};

    let path = temp_path("members", "json");
    std::fs::write(&path, MEMBERS_JSON).unwrap();
    let members = FileSource::new(&path).fetch().expect("fetch");
    assert_eq!(members.len(), 3);
    assert_eq!(members[2].role, "admin");

    std::fs::write(&path, "{\"not\": \"an array\"}").unwrap();
    assert!(matches!(
        FileSource::new(&path).fetch(),
        Err(member_admin::error::SourceError::Json(_))
    ));
    let _ = std::fs::remove_file(&path);
}

// 5) HTTP source against a local one-shot server
#[test]
fn http_source_fetches_json_array() {
    use member_admin::source::{HttpSource, MemberSource};

    let url = serve_once("200 OK", MEMBERS_JSON.to_string());
    let src = HttpSource::with_client(url.clone(), local_client());
    assert_eq!(src.describe(), url);
    let members = src.fetch().expect("fetch");
    let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Aaron Miles", "Aishwarya Naik", "Arvind Kumar"]);
}

#[test]
fn http_error_status_is_reported() {
    use member_admin::error::SourceError;
    use member_admin::source::{HttpSource, MemberSource};

    let url = serve_once("404 Not Found", "{}".to_string());
    let src = HttpSource::with_client(url, local_client());
    match src.fetch() {
        Err(SourceError::Status { status, .. }) => assert_eq!(status.as_u16(), 404),
        other => panic!("unexpected: {other:?}"),
    }
}

// 6) Unreachable source leaves the app with an empty list
#[test]
fn failed_fetch_starts_with_empty_table() {
    use member_admin::app::keymap::Keymap;
    use member_admin::app::{AppState, Theme};
    use member_admin::source::HttpSource;

    let addr = {
        let l = TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap()
    };
    let src = HttpSource::with_client(format!("http://{addr}/members.json"), local_client());
    let app = AppState::from_source(Box::new(src), Theme::dark(), Keymap::default());
    assert!(app.table.is_empty());
    assert_eq!(app.table.max_page(), 0);
    assert_eq!(app.table.current_page(), 1);
}

// 7) End to end: load, search, select, delete, reload via key presses
#[test]
fn key_driven_session_over_file_source() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use member_admin::app::keymap::Keymap;
    use member_admin::app::update::handle_key;
    use member_admin::app::{AppState, Theme};
    use member_admin::source::FileSource;

    let path = temp_path("session", "json");
    let many: Vec<String> = (1..=23)
        .map(|i| {
            let role = if i % 4 == 0 { "admin" } else { "member" };
            format!(
                r#"{{"id": "{i}", "name": "Name {i}", "email": "n{i}@x.io", "role": "{role}"}}"#
            )
        })
        .collect();
    std::fs::write(&path, format!("[{}]", many.join(","))).unwrap();

    let source = Box::new(FileSource::new(&path));
    let mut app = AppState::from_source(source, Theme::dark(), Keymap::default());
    let press = |app: &mut AppState, code: KeyCode| {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    };

    assert_eq!(app.table.max_page(), 3);

    // search role for "ADMIN"
    press(&mut app, KeyCode::Char('f'));
    press(&mut app, KeyCode::Char('f'));
    press(&mut app, KeyCode::Char('/'));
    for c in "ADMIN".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.table.visible_count(), 5);
    assert_eq!(app.table.max_page(), 1);

    // select all visible then delete them
    for _ in 0..5 {
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Down);
    }
    assert_eq!(app.table.selection_count(), 5);
    handle_key(&mut app, KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT));
    assert_eq!(app.table.len(), 18);
    assert_eq!(app.table.visible_count(), 0);
    let ids: Vec<u32> = app.table.members().map(|m| m.id).collect();
    assert_eq!(ids, (1..=18).collect::<Vec<_>>());

    // reload brings everything back
    press(&mut app, KeyCode::Char('r'));
    assert_eq!(app.table.len(), 23);
    assert!(app.table.active_search().is_none());

    let _ = std::fs::remove_file(&path);
}
