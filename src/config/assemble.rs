//! Load-time substitution pass
//!
//! Runs once, right after loading. Every command-line field of every command
//! (`run`, `pre`, `post` and the `commands` entries) has its placeholders
//! substituted. Conditions are left alone; they are evaluated just before a
//! command runs so they see the environment at that moment.

use crate::config::types::{Command, Config};
use crate::resolver::{resolve_map, resolve_variables, EnvLookup, ResolutionContext};
use tracing::trace;

/// Resolve the command lines of every command in place
pub fn assemble(config: &mut Config) {
    // Borrow the variable maps separately from the commands being rewritten.
    let Config {
        variables,
        commands,
        env,
        ..
    } = config;
    let ctx = ResolutionContext::new(variables, env);

    for (name, command) in commands.iter_mut() {
        assemble_command(&ctx, command);
        trace!(command = %name, run = %command.run, "resolved command");
    }
}

/// Resolve the command lines of a single command
pub fn assemble_command<E: EnvLookup>(ctx: &ResolutionContext<'_, E>, command: &mut Command) {
    command.run = resolve_variables(ctx, &command.run);

    for hook in [&mut command.pre, &mut command.post].into_iter().flatten() {
        *hook = resolve_variables(ctx, hook);
    }

    if !command.commands.is_empty() {
        command.commands = resolve_map(ctx, &command.commands);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use std::collections::HashMap;

    #[test]
    fn test_assemble_resolves_run() {
        let mut config = parse_config(
            r#"
variables:
  BUILD_DIR: ./build
  PROJECT_NAME: test-project
commands:
  build:
    run: go build -o $BUILD_DIR/$PROJECT_NAME
"#,
        )
        .unwrap();

        assemble(&mut config);
        assert_eq!(config.commands["build"].run, "go build -o ./build/test-project");
    }

    #[test]
    fn test_assemble_uses_overlay() {
        let mut config = parse_config(
            r#"
commands:
  show:
    run: echo $YRUN_ASSEMBLE_OVERLAY
"#,
        )
        .unwrap();
        config
            .env
            .insert("YRUN_ASSEMBLE_OVERLAY".to_string(), "env-value".to_string());

        assemble(&mut config);
        assert_eq!(config.commands["show"].run, "echo env-value");
    }

    #[test]
    fn test_assemble_leaves_condition_and_unknowns() {
        let mut config = parse_config(
            r#"
variables:
  OS: linux
commands:
  build:
    run: make $YRUN_NOT_DEFINED_ANYWHERE ${OS}
    condition: $OS == linux
    description: builds for $OS
    timeout: $OS
"#,
        )
        .unwrap();

        assemble(&mut config);
        let build = &config.commands["build"];
        assert_eq!(build.run, "make $YRUN_NOT_DEFINED_ANYWHERE linux");
        assert_eq!(build.condition.as_deref(), Some("$OS == linux"));
        assert_eq!(build.description.as_deref(), Some("builds for $OS"));
        assert_eq!(build.timeout.as_deref(), Some("$OS"));
    }

    #[test]
    fn test_assemble_command_lines() {
        let declared: HashMap<String, String> =
            [("OUT".to_string(), "dist".to_string())].into_iter().collect();
        let overlay = HashMap::new();
        let ctx = ResolutionContext::new(&declared, &overlay).with_env(HashMap::<String, String>::new());

        let mut command = Command {
            run: "build $OUT".to_string(),
            pre: Some("mkdir -p $OUT".to_string()),
            post: Some("ls ${OUT}".to_string()),
            commands: [("web".to_string(), "cp web $OUT".to_string())]
                .into_iter()
                .collect(),
            ..Command::default()
        };

        assemble_command(&ctx, &mut command);
        assert_eq!(command.run, "build dist");
        assert_eq!(command.pre.as_deref(), Some("mkdir -p dist"));
        assert_eq!(command.post.as_deref(), Some("ls dist"));
        assert_eq!(command.commands["web"], "cp web dist");
    }
}
