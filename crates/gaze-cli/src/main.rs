//! Command-line interface for GAZE
//!
//! Usage:
//!   gaze-cli view `[project]`          - Browse scenes in a terminal UI
//!   gaze-cli tree `<file>`             - Print the scene tree as JSON
//!   gaze-cli fmt `<file>` [--write]    - Re-serialize a scene
//!   gaze-cli check `<file>`            - Report skipped or guessed content
//!   gaze-cli from-json `<json>` `<out>` - Write a scene from its JSON view

mod commands;
mod tui;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use gaze_config::Config;
use gaze_engine::{ParseOptions, Severity, io};

fn cli() -> Command {
    let file_arg = || {
        Arg::new("file")
            .help("Path to a .tscn file")
            .required(true)
            .index(1)
    };

    Command::new("gaze-cli")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect, check and rewrite Godot scene files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Fail on duplicate node names")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("legacy")
                .long("legacy")
                .help("Resolve parents by last path segment only")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("view")
                .about("Browse the scenes of a project")
                .arg(
                    Arg::new("project")
                        .help("Project directory (defaults to the config file's project_path)")
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("tree")
                .about("Print the scene tree as JSON")
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("fmt")
                .about("Print the scene as the serializer writes it")
                .arg(file_arg())
                .arg(
                    Arg::new("write")
                        .long("write")
                        .short('w')
                        .help("Rewrite the file in place")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("List diagnostics; exits non-zero on warnings")
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("from-json")
                .about("Build a scene file from its JSON view")
                .arg(
                    Arg::new("json")
                        .help("JSON produced by `gaze-cli tree`")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("out")
                        .help("Scene file to write")
                        .required(true)
                        .index(2),
                ),
        )
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let matches = cli().get_matches();
    if let Err(e) = run(&matches) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config = load_config();
    let options = parse_options(matches, config.as_ref());

    match matches.subcommand() {
        Some(("view", sub)) => {
            let project = match sub.get_one::<String>("project") {
                Some(path) => PathBuf::from(path),
                None => project_from_config(config)?,
            };
            io::validate_project_dir(&project)?;
            log::info!("browsing {}", project.display());
            tui::run(project, options)
        }
        Some(("tree", sub)) => {
            println!("{}", commands::tree_json(file(sub, "file"), options)?);
            Ok(())
        }
        Some(("fmt", sub)) => {
            let path = file(sub, "file");
            let text = commands::format_scene(path, options)?;
            if sub.get_flag("write") {
                std::fs::write(path, text)?;
            } else {
                print!("{text}");
            }
            Ok(())
        }
        Some(("check", sub)) => {
            let diagnostics = commands::check(file(sub, "file"), options)?;
            for diagnostic in &diagnostics {
                let label = match diagnostic.severity() {
                    Severity::Warning => "warning",
                    Severity::Info => "info",
                };
                println!("{label}: {diagnostic}");
            }
            if diagnostics
                .iter()
                .any(|d| d.severity() == Severity::Warning)
            {
                process::exit(2);
            }
            Ok(())
        }
        Some(("from-json", sub)) => {
            let tree = commands::from_json(file(sub, "json"), file(sub, "out"))?;
            log::info!("wrote {} nodes", tree.node_count());
            Ok(())
        }
        _ => unreachable!("subcommand_required"),
    }
}

fn file<'a>(matches: &'a ArgMatches, id: &str) -> &'a Path {
    matches
        .get_one::<String>(id)
        .map(Path::new)
        .expect("required argument")
}

fn load_config() -> Option<Config> {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("ignoring config file: {e}");
            None
        }
    }
}

fn project_from_config(config: Option<Config>) -> Result<PathBuf> {
    match config {
        Some(config) => Ok(config.project_path),
        None => anyhow::bail!(
            "no project path given and no config file found; create {} or pass a directory",
            Config::config_path().display()
        ),
    }
}

/// Config file settings, overridden by `--strict` / `--legacy`.
fn parse_options(matches: &ArgMatches, config: Option<&Config>) -> ParseOptions {
    let mut options = config.map(Config::parse_options).unwrap_or_default();
    if matches.get_flag("legacy") {
        options.parent_resolution = ParseOptions::legacy().parent_resolution;
    }
    if matches.get_flag("strict") {
        options.duplicate_names = ParseOptions::strict().duplicate_names;
    }
    options
}
