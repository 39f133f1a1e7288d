#![allow(clippy::float_cmp)]

use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("hexmap").chain(args.iter().copied())).unwrap()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("hexmap-{}-{name}", std::process::id()))
}

#[test]
fn service_flags_accepted_after_subcommand() {
    let cli = parse(&["generate", "--count", "10", "--base-url", "http://127.0.0.1:1", "--api-key", "k"]);
    assert_eq!(cli.base_url, "http://127.0.0.1:1");
    assert_eq!(cli.api_key.as_deref(), Some("k"));
    assert!(matches!(cli.command, Command::Generate { count: 10, .. }));
}

#[test]
fn service_flags_accepted_before_subcommand() {
    let cli = parse(&["--base-url", "http://svc", "generate", "--count", "5"]);
    assert_eq!(cli.base_url, "http://svc");
}

#[test]
fn viewport_flags_accepted_after_subcommand() {
    let cli = parse(&["fit", "map.json", "--width", "320", "--height", "240", "--mobile"]);
    assert_eq!(cli.width, 320.0);
    assert_eq!(cli.height, 240.0);
    assert!(cli.mobile);
}

#[test]
fn pick_accepts_negative_coordinates() {
    let cli = parse(&["pick", "map.json", "--x", "-5", "--y", "12.5"]);
    let Command::Pick { x, y, .. } = cli.command else { panic!("expected pick") };
    assert_eq!((x, y), (-5.0, 12.5));
}

#[test]
fn unknown_flag_is_rejected() {
    assert!(Cli::try_parse_from(["hexmap", "fit", "map.json", "--zoom", "2"]).is_err());
}

#[test]
fn zero_viewport_is_rejected() {
    let cli = parse(&["fit", "map.json", "--width", "0"]);
    let err = Viewer::from_cli(&cli, ViewerConfig::default()).err().unwrap();
    assert!(matches!(err, CliError::InvalidViewport { .. }));
}

#[test]
fn empty_map_snapshot_uses_viewport_size() {
    let map = temp_path("empty.json");
    let out = temp_path("empty.svg");
    std::fs::write(&map, "[]").unwrap();

    let cli = parse(&["snapshot", "unused", "--out", "unused", "--width", "320", "--height", "200"]);
    let viewer = Viewer::from_cli(&cli, ViewerConfig::default()).unwrap();
    run_snapshot(&viewer, &map, &out, None).unwrap();

    let doc = std::fs::read_to_string(&out).unwrap();
    std::fs::remove_file(&map).unwrap();
    std::fs::remove_file(&out).unwrap();
    assert!(doc.contains("width=\"320\" height=\"200\""));
}
