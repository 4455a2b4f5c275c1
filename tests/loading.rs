//! Integration tests for loading and assembling configurations

mod common;

use common::{create_test_config, create_test_config_with_env};
use std::fs;
use tempfile::TempDir;
use yrun::config::{load_configuration_from, load_configuration_in, parse_config_file};
use yrun::{ConfigError, Error};

#[test]
fn test_declared_variables_resolved_at_load() {
    let (_dir, path) = create_test_config(
        r#"
name: test
variables:
  BUILD_DIR: ./build
  PROJECT_NAME: test-project
commands:
  build:
    description: Build the binary
    run: go build -o $BUILD_DIR/$PROJECT_NAME
"#,
    );

    let config = load_configuration_from(&path).unwrap();
    assert_eq!(config.commands["build"].run, "go build -o ./build/test-project");
}

#[test]
fn test_env_file_variables_resolved_at_load() {
    let (_dir, path) = create_test_config_with_env(
        r#"
commands:
  show:
    run: echo $ENV_VAR
"#,
        "ENV_VAR=env-value\n",
    );

    let config = load_configuration_from(&path).unwrap();
    assert_eq!(config.env["ENV_VAR"], "env-value");
    assert_eq!(config.commands["show"].run, "echo env-value");
}

#[test]
fn test_declared_shadows_env_file() {
    let (_dir, path) = create_test_config_with_env(
        r#"
variables:
  STAGE: declared
commands:
  show:
    run: echo ${STAGE}
"#,
        "STAGE=from-env-file\n",
    );

    let config = load_configuration_from(&path).unwrap();
    assert_eq!(config.commands["show"].run, "echo declared");
    // both sources are kept side by side
    assert_eq!(config.variables["STAGE"], "declared");
    assert_eq!(config.env["STAGE"], "from-env-file");
}

#[test]
fn test_unknown_placeholders_survive_load() {
    let (_dir, path) = create_test_config(
        r#"
commands:
  later:
    run: echo $YRUN_LOADING_UNSET_VAR and ${YRUN_LOADING_UNSET_VAR}
"#,
    );

    let config = load_configuration_from(&path).unwrap();
    assert_eq!(
        config.commands["later"].run,
        "echo $YRUN_LOADING_UNSET_VAR and ${YRUN_LOADING_UNSET_VAR}"
    );
}

#[test]
fn test_late_environment_change_visible_to_conditions() {
    let (_dir, path) = create_test_config(
        r#"
commands:
  gated:
    run: echo gated
    condition: $YRUN_LOADING_LATE_FLAG == on
"#,
    );

    std::env::remove_var("YRUN_LOADING_LATE_FLAG");
    let config = load_configuration_from(&path).unwrap();
    assert_eq!(config.should_run("gated"), Some(false));

    std::env::set_var("YRUN_LOADING_LATE_FLAG", "on");
    assert_eq!(config.should_run("gated"), Some(true));
    std::env::remove_var("YRUN_LOADING_LATE_FLAG");
}

#[test]
fn test_condition_not_resolved_at_load() {
    let (_dir, path) = create_test_config(
        r#"
variables:
  OS: linux
commands:
  build:
    run: make
    condition: $OS == linux
"#,
    );

    let config = load_configuration_from(&path).unwrap();
    let build = config.command("build").unwrap();
    assert_eq!(build.condition.as_deref(), Some("$OS == linux"));
    assert!(build.is_enabled(&config.context()));
}

#[test]
fn test_hooks_and_sub_commands_resolved() {
    let (_dir, path) = create_test_config(
        r#"
variables:
  OUT: dist
commands:
  package:
    pre: mkdir -p $OUT
    run: tar czf $OUT.tgz $OUT
    post: rm -rf ${OUT}
    timeout: 10m
    parallel: true
    commands:
      docs: cp -r docs $OUT
"#,
    );

    let config = load_configuration_from(&path).unwrap();
    let package = &config.commands["package"];
    assert_eq!(package.pre.as_deref(), Some("mkdir -p dist"));
    assert_eq!(package.run, "tar czf dist.tgz dist");
    assert_eq!(package.post.as_deref(), Some("rm -rf dist"));
    assert_eq!(package.commands["docs"], "cp -r docs dist");
    assert_eq!(package.timeout.as_deref(), Some("10m"));
}

#[test]
fn test_dependencies_passed_through_unchecked() {
    let (_dir, path) = create_test_config(
        r#"
commands:
  a:
    run: echo a
    dependencies: [a, b, does-not-exist]
  b:
    run: echo b
    dependencies: [a]
"#,
    );

    let config = load_configuration_from(&path).unwrap();
    assert_eq!(config.commands["a"].dependencies, vec!["a", "b", "does-not-exist"]);
    assert_eq!(config.commands["b"].dependencies, vec!["a"]);
}

#[test]
fn test_load_from_directory() {
    let (dir, _path) = create_test_config("commands:\n  a:\n    run: echo a\n");
    let config = load_configuration_in(dir.path()).unwrap();
    assert_eq!(config.command_names(), vec!["a"]);
}

#[test]
fn test_missing_config_is_load_error() {
    let dir = TempDir::new().unwrap();
    let result = load_configuration_in(dir.path());
    assert!(matches!(result, Err(Error::Config(ConfigError::NotFound(_)))));
}

#[test]
fn test_malformed_document_is_load_error() {
    let (_dir, path) = create_test_config("commands:\n  a: [\n");
    let result = load_configuration_from(&path);
    assert!(matches!(result, Err(Error::Config(ConfigError::Parse { .. }))));
}

#[test]
fn test_malformed_env_file_is_load_error() {
    let (_dir, path) = create_test_config_with_env(
        "commands:\n  a:\n    run: echo a\n",
        "NOT A VALID LINE\n",
    );
    let result = load_configuration_from(&path);
    assert!(matches!(result, Err(Error::Config(ConfigError::EnvFile { .. }))));
}

#[test]
fn test_parse_only_does_not_resolve() {
    let (dir, path) = create_test_config(
        r#"
variables:
  A: resolved
commands:
  a:
    run: echo $A
"#,
    );
    fs::write(dir.path().join(".env"), "B=ignored\n").unwrap();

    let config = parse_config_file(&path).unwrap();
    assert_eq!(config.commands["a"].run, "echo $A");
    assert!(config.env.is_empty());
}
