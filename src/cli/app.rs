//! Inspection CLI
//!
//! Loads the project configuration and reports what the resolver sees:
//! resolved command lines, variable sources and guard results. Nothing is
//! executed.

use crate::config::{
    find_config_file_in, load_configuration, load_configuration_with, validate_config, Config,
};
use crate::resolver::{evaluate_condition, parse_condition, resolve_strict, resolve_variables};
use anyhow::{anyhow, Context as _, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use colored::Colorize;
use std::collections::BTreeSet;
use std::env;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an explicit log filter
pub const LOG_ENV: &str = "YRUN_LOG";

/// Verbosity levels for log output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    Debug,
}

impl Verbosity {
    /// Default log filter for this level
    pub fn filter(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "yrun=warn",
            Verbosity::Verbose => "yrun=info",
            Verbosity::Debug => "yrun=debug",
        }
    }
}

/// Build the clap command tree
pub fn build_command() -> Command {
    Command::new("yrun")
        .version(crate::VERSION)
        .about("Inspect variable resolution and guards in a yrun.yml project")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Path to yrun.yml config file")
                .global(true),
        )
        .arg(
            Arg::new("env-file")
                .long("env-file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Environment file to use instead of the .env next to the config")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log more (repeat for debug output)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(Command::new("list").about("List commands"))
        .subcommand(
            Command::new("show")
                .about("Show a command with its command lines resolved")
                .arg(Arg::new("command").required(true).value_name("COMMAND")),
        )
        .subcommand(Command::new("vars").about("Show variables and where their values come from"))
        .subcommand(
            Command::new("resolve")
                .about("Substitute variables in a piece of text")
                .arg(Arg::new("text").required(true).value_name("TEXT"))
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .help("Fail if a variable is not defined anywhere")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("eval")
                .about("Evaluate a condition")
                .arg(Arg::new("condition").required(true).value_name("CONDITION")),
        )
        .subcommand(
            Command::new("guard")
                .about("Report whether a command's condition allows it to run")
                .arg(Arg::new("command").required(true).value_name("COMMAND")),
        )
        .subcommand(Command::new("validate").about("Check the configuration for structural problems"))
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_name("SHELL")
                        .value_parser(value_parser!(Shell)),
                ),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("quiet") {
        return Verbosity::Quiet;
    }
    match matches.get_count("verbose") {
        0 => Verbosity::Normal,
        1 => Verbosity::Verbose,
        _ => Verbosity::Debug,
    }
}

/// Install the global tracing subscriber
fn init_logging(verbosity: Verbosity) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(verbosity.filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Load the configuration selected by the global flags
fn load(matches: &ArgMatches) -> Result<Config> {
    let env_file = matches.get_one::<PathBuf>("env-file");

    let config_path = match matches.get_one::<PathBuf>("file") {
        Some(path) => path.clone(),
        None if env_file.is_none() => return Ok(load_configuration()?),
        None => find_config_file_in(&env::current_dir()?)?,
    };

    let config = load_configuration_with(&config_path, env_file.map(PathBuf::as_path))
        .with_context(|| format!("could not load {}", config_path.display()))?;
    Ok(config)
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<()> {
    let matches = build_command().get_matches();
    init_logging(get_verbosity(&matches));
    run_with(&matches)
}

/// Dispatch already-parsed arguments
pub fn run_with(matches: &ArgMatches) -> Result<()> {
    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("no subcommand given"))?;

    if name == "completions" {
        let shell = *sub
            .get_one::<Shell>("shell")
            .ok_or_else(|| anyhow!("missing shell"))?;
        clap_complete::generate(shell, &mut build_command(), "yrun", &mut io::stdout());
        return Ok(());
    }

    let config = load(matches)?;

    match name {
        "list" => list(&config),
        "show" => show(&config, required(sub, "command")?),
        "vars" => vars(&config),
        "resolve" => resolve(&config, required(sub, "text")?, sub.get_flag("strict")),
        "eval" => eval(&config, required(sub, "condition")?),
        "guard" => guard(&config, required(sub, "command")?),
        "validate" => {
            validate_config(&config)?;
            println!("{}", "configuration is valid".green());
            Ok(())
        }
        other => Err(anyhow!("unknown subcommand '{}'", other)),
    }
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing argument '{}'", id))
}

fn lookup_command<'a>(config: &'a Config, name: &str) -> Result<&'a crate::config::Command> {
    config
        .command(name)
        .ok_or_else(|| anyhow!("command '{}' is not defined", name))
}

fn list(config: &Config) -> Result<()> {
    if let Some(name) = &config.name {
        println!("{}", name.bold());
    }
    for name in config.command_names() {
        let command = &config.commands[name];
        match &command.description {
            Some(description) => println!("  {}  {}", name.green(), description.dimmed()),
            None => println!("  {}", name.green()),
        }
    }
    Ok(())
}

fn show(config: &Config, name: &str) -> Result<()> {
    let command = lookup_command(config, name)?;

    println!("{}", name.bold().green());
    if let Some(description) = &command.description {
        println!("  {:<13}{}", "description:", description);
    }
    if let Some(pre) = &command.pre {
        println!("  {:<13}{}", "pre:", pre);
    }
    println!("  {:<13}{}", "run:", command.run);
    if let Some(post) = &command.post {
        println!("  {:<13}{}", "post:", post);
    }
    if !command.dependencies.is_empty() {
        println!("  {:<13}{}", "dependencies:", command.dependencies.join(", "));
    }
    if let Some(condition) = &command.condition {
        let verdict = if config.evaluate_condition(condition) {
            "true".green()
        } else {
            "false".red()
        };
        println!("  {:<13}{} ({})", "condition:", condition, verdict);
    }
    if let Some(timeout) = &command.timeout {
        println!("  {:<13}{}", "timeout:", timeout);
    }
    if !command.commands.is_empty() {
        let mode = if command.parallel { "parallel" } else { "sequential" };
        println!("  {:<13}{}", "commands:", mode.dimmed());
        let mut entries: Vec<_> = command.commands.iter().collect();
        entries.sort();
        for (key, line) in entries {
            println!("    {}: {}", key, line);
        }
    }
    Ok(())
}

fn vars(config: &Config) -> Result<()> {
    let ctx = config.context();
    let names: BTreeSet<&String> = config.variables.keys().chain(config.env.keys()).collect();

    for name in names {
        if let Some((value, source)) = ctx.lookup(name) {
            println!("{}={}  {}", name.bold(), value, format!("({})", source).dimmed());
        }
    }
    Ok(())
}

fn resolve(config: &Config, text: &str, strict: bool) -> Result<()> {
    let ctx = config.context();
    let resolved = if strict {
        resolve_strict(&ctx, text)?
    } else {
        resolve_variables(&ctx, text)
    };
    println!("{}", resolved);
    Ok(())
}

fn eval(config: &Config, condition: &str) -> Result<()> {
    let ctx = config.context();
    let result = evaluate_condition(&ctx, condition);

    let resolved = resolve_variables(&ctx, condition);
    match parse_condition(&resolved) {
        Some(parsed) => tracing::info!(kind = parsed.kind(), condition = %resolved, "matched"),
        None => tracing::info!(condition = %resolved, "no predicate form matched"),
    }

    println!("{}", result);
    Ok(())
}

fn guard(config: &Config, name: &str) -> Result<()> {
    let command = lookup_command(config, name)?;
    if command.is_enabled(&config.context()) {
        println!("{} {}", "run".green(), name);
    } else {
        println!("{} {}", "skip".yellow(), name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_tree_is_consistent() {
        build_command().debug_assert();
    }

    #[test]
    fn test_get_verbosity_levels() {
        let matches = build_command().get_matches_from(["yrun", "list"]);
        assert_eq!(get_verbosity(&matches), Verbosity::Normal);

        let matches = build_command().get_matches_from(["yrun", "-v", "list"]);
        assert_eq!(get_verbosity(&matches), Verbosity::Verbose);

        let matches = build_command().get_matches_from(["yrun", "list", "-vv"]);
        assert_eq!(get_verbosity(&matches), Verbosity::Debug);

        let matches = build_command().get_matches_from(["yrun", "-q", "-v", "list"]);
        assert_eq!(get_verbosity(&matches), Verbosity::Quiet);
    }

    #[test]
    fn test_file_flag_parsed() {
        let matches = build_command().get_matches_from(["yrun", "-f", "other.yml", "list"]);
        assert_eq!(
            matches.get_one::<PathBuf>("file"),
            Some(&PathBuf::from("other.yml"))
        );
    }

    #[test]
    fn test_verbosity_filters() {
        assert_eq!(Verbosity::Quiet.filter(), "error");
        assert_eq!(Verbosity::Debug.filter(), "yrun=debug");
        assert!(Verbosity::Debug > Verbosity::Normal);
    }
}
