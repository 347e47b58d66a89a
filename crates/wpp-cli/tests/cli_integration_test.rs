//! Integration tests for argument parsing and command dispatch.

use clap::Parser;
use std::fs::{self, File};
use std::path::Path;
use tempfile::TempDir;
use wpp_cli::{Cli, Commands, ConfigAction};
use wpp_cli::runner::execute_command;
use wpp_core::cli::{ExitCode, OutputFormat};
use wpp_core::config::CONFIG_FILE_NAME;

fn write_entry(project: &Path, body: &str) {
    let plugin = project.join("names-fusion");
    fs::create_dir_all(&plugin).expect("Failed to create plugin dir");
    fs::write(plugin.join("names-fusion.php"), body).expect("Failed to write entry file");
}

fn cli(project: &Path, args: &[&str]) -> Cli {
    let project_dir = project.to_string_lossy().into_owned();
    let mut argv = vec!["wp-packager", "--project-dir", project_dir.as_str()];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).expect("Failed to parse arguments")
}

#[test]
fn test_default_command_is_package() {
    let cli = Cli::parse_from(["wp-packager"]);
    assert!(cli.command.is_none());
    assert_eq!(cli.command_or_default(), Commands::Package);
    assert_eq!(cli.format, "pretty");
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::parse_from([
        "wp-packager",
        "validate",
        "--strict",
        "--format",
        "json",
        "--project-dir",
        "/srv/site",
    ]);
    assert_eq!(cli.command, Some(Commands::Validate));
    assert!(cli.strict);
    assert_eq!(cli.format, "json");
    assert_eq!(cli.project_dir, Path::new("/srv/site"));
}

#[test]
fn test_config_init_force_flag() {
    let cli = Cli::parse_from(["wp-packager", "config", "init", "--force"]);
    assert_eq!(
        cli.command,
        Some(Commands::Config {
            action: ConfigAction::Init { force: true }
        })
    );
}

#[test]
fn test_unknown_shell_rejected() {
    assert!(Cli::try_parse_from(["wp-packager", "completions", "tcsh"]).is_err());
}

#[tokio::test]
async fn test_config_init_twice_requires_force() {
    let temp = TempDir::new().unwrap();

    let code = execute_command(cli(temp.path(), &["config", "init"]), OutputFormat::Json)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
    assert!(temp.path().join(CONFIG_FILE_NAME).exists());

    let second = execute_command(cli(temp.path(), &["config", "init"]), OutputFormat::Json).await;
    assert!(second.is_err());
}

#[tokio::test]
async fn test_validate_reports_duplicates() {
    let temp = TempDir::new().unwrap();
    write_entry(
        temp.path(),
        "<?php\nfunction names_fusion_init() {}\nfunction names_fusion_init() {}\n",
    );

    let code = execute_command(cli(temp.path(), &["validate"]), OutputFormat::Json)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::ERROR);
}

#[tokio::test]
async fn test_validate_missing_entry_file_fails() {
    let temp = TempDir::new().unwrap();

    let code = execute_command(cli(temp.path(), &["validate"]), OutputFormat::Text)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::ERROR);
}

#[tokio::test]
async fn test_validate_clean_entry_file() {
    let temp = TempDir::new().unwrap();
    write_entry(
        temp.path(),
        "<?php\nfunction names_fusion_init() {}\nfunction names_fusion_shortcode() {}\n",
    );

    let code = execute_command(cli(temp.path(), &["validate"]), OutputFormat::Json)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
}

#[tokio::test]
async fn test_missing_explicit_config_is_an_error() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.toml");
    let missing = missing.to_string_lossy().into_owned();

    let result = execute_command(
        cli(temp.path(), &["--config", missing.as_str(), "validate"]),
        OutputFormat::Json,
    )
    .await;
    assert!(result.is_err());
}

#[cfg(unix)]
#[tokio::test]
async fn test_package_with_shell_bundler() {
    let temp = TempDir::new().unwrap();
    write_entry(
        temp.path(),
        "<?php\nfunction names_fusion_shortcode() {}\nadd_shortcode('names_fusion', 'names_fusion_shortcode');\n",
    );
    fs::write(
        temp.path().join(CONFIG_FILE_NAME),
        r#"[bundler]
program = "sh"
args = ["-c", "mkdir -p names-fusion/react-build/assets && touch names-fusion/react-build/assets/index.abc123.js names-fusion/react-build/assets/index.def456.css"]
fallback_args = []
minifier = ""
"#,
    )
    .unwrap();

    let code = execute_command(cli(temp.path(), &["package"]), OutputFormat::Json)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let archive = File::open(temp.path().join("names-fusion-plugin.zip")).unwrap();
    let mut zip = zip::ZipArchive::new(archive).unwrap();
    let names: Vec<String> = (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect();

    for expected in [
        "names-fusion/names-fusion.php",
        "names-fusion/react-build/assets/index.abc123.js",
        "names-fusion/react-build/assets/index.def456.css",
        "names-fusion/css/names-fusion.css",
        "names-fusion/js/names-fusion.js",
        "names-fusion/react-build/index.php",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing {expected} in {names:?}");
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_package_failing_bundler_exits_with_error() {
    let temp = TempDir::new().unwrap();
    write_entry(temp.path(), "<?php\nfunction names_fusion_init() {}\n");
    fs::write(
        temp.path().join(CONFIG_FILE_NAME),
        "[bundler]\nprogram = \"false\"\nargs = []\nminifier = \"\"\n",
    )
    .unwrap();

    let code = execute_command(cli(temp.path(), &["package"]), OutputFormat::Json)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::ERROR);
    assert!(!temp.path().join("names-fusion-plugin.zip").exists());
}
