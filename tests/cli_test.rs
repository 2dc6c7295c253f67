//! Tests for CLI parsing and command execution

use std::path::PathBuf;

use clap::Parser;

use coursesite::cli::args::{Commands, ConfigCommands, OutputFormat};
use coursesite::cli::{execute, Cli};
use coursesite::exitcode;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

#[test]
fn given_scaffold_args_when_parse_then_flags_captured() {
    let cli = Cli::try_parse_from([
        "coursesite",
        "-dd",
        "scaffold",
        "course.toml",
        "--dry-run",
        "--format",
        "toml",
    ])
    .unwrap();

    assert_eq!(cli.debug, 2);
    match cli.command {
        Some(Commands::Scaffold {
            course_file,
            dry_run,
            format,
        }) => {
            assert_eq!(course_file, PathBuf::from("course.toml"));
            assert!(dry_run);
            assert_eq!(format, OutputFormat::Toml);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn given_config_path_args_when_parse_then_config_command() {
    let cli = Cli::try_parse_from(["coursesite", "config", "path"]).unwrap();

    assert!(matches!(
        cli.command,
        Some(Commands::Config {
            command: ConfigCommands::Path
        })
    ));
}

#[test]
fn given_no_command_when_execute_then_usage_error() {
    let cli = Cli::try_parse_from(["coursesite"]).unwrap();

    let err = execute(&cli).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_missing_course_file_when_slug_then_noinput() {
    let cli = Cli::try_parse_from(["coursesite", "slug", "/nonexistent/course.toml"]).unwrap();

    let err = execute(&cli).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}

#[test]
fn given_fixture_course_when_slug_then_ok() {
    let file = fixture("course.toml");
    let cli = Cli::try_parse_from(["coursesite".into(), "slug".into(), file.into_os_string()]).unwrap();

    assert!(execute(&cli).is_ok());
}

#[test]
fn given_malformed_course_file_when_slug_then_dataerr() {
    let temp = tempfile::TempDir::new().unwrap();
    let file = temp.path().join("course.toml");
    std::fs::write(&file, "id = \"42\"\n").unwrap();
    let cli = Cli::try_parse_from(["coursesite".into(), "slug".into(), file.into_os_string()]).unwrap();

    let err = execute(&cli).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
}
