use std::path::PathBuf;
use task_tools::cli::parse_args;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_flags_after_command_belong_to_title() {
    let inv = parse_args(args(&["parse", "Fix", "-v", "flag", "help"])).unwrap();
    assert!(!inv.verbose);
    assert!(!inv.help);
    assert_eq!(inv.command.as_deref(), Some("parse"));
    assert_eq!(inv.args, args(&["Fix", "-v", "flag", "help"]));
}

#[test]
fn test_global_options_before_command() {
    let inv = parse_args(args(&["-v", "--root", "/tmp/tt", "duration", "5min"])).unwrap();
    assert!(inv.verbose);
    assert_eq!(inv.root, Some(PathBuf::from("/tmp/tt")));
    assert_eq!(inv.command.as_deref(), Some("duration"));
    assert_eq!(inv.args, args(&["5min"]));
}

#[test]
fn test_help_and_missing_command() {
    let inv = parse_args(args(&["--help"])).unwrap();
    assert!(inv.help);
    assert!(inv.command.is_none());

    assert_eq!(parse_args(Vec::new()).unwrap().command, None);
}

#[test]
fn test_root_requires_path() {
    assert!(parse_args(args(&["-r"])).is_err());
}
