use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("recoveriq_main_test_{}_{}", std::process::id(), id));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_parse_render_defaults() {
    let cli = Cli::try_parse_from([
        "recoveriq-dash",
        "render",
        "--input",
        "a.json",
        "b.json.gz",
        "--out",
        "out",
    ])
    .unwrap();
    match cli.command {
        Command::Render {
            input,
            format,
            frame_step_ms,
            profile,
            ..
        } => {
            assert_eq!(input, vec![PathBuf::from("a.json"), PathBuf::from("b.json.gz")]);
            assert_eq!(format, ReportFormat::All);
            assert_eq!(frame_step_ms, DEFAULT_FRAME_STEP_MS);
            assert!(profile.is_none());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_render_requires_input() {
    assert!(Cli::try_parse_from(["recoveriq-dash", "render", "--out", "out"]).is_err());
}

#[test]
fn test_parse_format_and_flags() {
    let cli = Cli::try_parse_from([
        "recoveriq-dash",
        "demo",
        "--out",
        "out",
        "--format",
        "html",
        "-v",
    ])
    .unwrap();
    assert!(cli.verbose);
    match cli.command {
        Command::Demo { format, .. } => assert_eq!(format, ReportFormat::Html),
        other => panic!("unexpected {other:?}"),
    }
    assert!(Cli::try_parse_from(["recoveriq-dash", "-v", "-q", "demo", "--out", "o"]).is_err());
}

#[test]
fn test_parse_counter() {
    let cli = Cli::try_parse_from([
        "recoveriq-dash",
        "counter",
        "--target",
        "195",
        "--prefix",
        "₹",
    ])
    .unwrap();
    match cli.command {
        Command::Counter {
            target,
            prefix,
            duration_ms,
            step_ms,
            ..
        } => {
            assert_eq!(target, 195.0);
            assert_eq!(prefix, "₹");
            assert_eq!(duration_ms, 900);
            assert_eq!(step_ms, 100);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_render_keeps_earlier_view_after_failure() {
    let dir = make_temp_dir();
    let good = dir.join("good.json");
    std::fs::write(&good, demo_text()).unwrap();
    let bad = dir.join("bad.json");
    std::fs::write(&bad, r#"{"error": "Missing columns: Lead_State"}"#).unwrap();
    let out = dir.join("out");

    run(Command::Render {
        input: vec![good, bad],
        out: out.clone(),
        profile: None,
        format: ReportFormat::Json,
        frame_step_ms: 50,
    })
    .unwrap();

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("dashboard.json")).unwrap())
            .unwrap();
    assert_eq!(doc["dashboard"]["source"], "good.json");
    assert_eq!(doc["banner"], "Missing columns: Lead_State");
}

#[test]
fn test_render_fails_when_nothing_rendered() {
    let dir = make_temp_dir();
    let err = run(Command::Render {
        input: vec![dir.join("missing.json")],
        out: dir.join("out"),
        profile: None,
        format: ReportFormat::All,
        frame_step_ms: 50,
    })
    .unwrap_err();
    assert!(err.starts_with("nothing rendered"));
}

#[test]
fn test_demo_writes_reports() {
    let out = make_temp_dir().join("demo");
    run(Command::Demo {
        out: out.clone(),
        profile: None,
        format: ReportFormat::All,
    })
    .unwrap();
    assert!(out.join("dashboard.json").exists());
    assert!(out.join("report.txt").exists());
    assert!(out.join("dashboard.html").exists());
}

fn demo_text() -> String {
    use crate::input::PayloadSource;
    DemoSource.fetch().unwrap().to_string()
}
