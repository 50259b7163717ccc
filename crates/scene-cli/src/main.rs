use anyhow::Result;
use clap::{crate_version, value_parser, Arg, ArgMatches, Command};
use scene_actions::ActionsConfig;
use scene_cli::{Action, Session};
use scene_cycle::Direction;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("scene")
        .version(crate_version!())
        .about("Palette cycling and duplication for JSON scene documents")
        .subcommand_required(true)
        .arg(
            Arg::new("scene")
                .long("scene")
                .global(true)
                .default_value("scene.json")
                .value_parser(value_parser!(PathBuf))
                .help("Scene document to act on"),
        )
        .arg(
            Arg::new("settings")
                .long("settings")
                .global(true)
                .default_value("settings.json")
                .value_parser(value_parser!(PathBuf))
                .help("Settings file holding the palette cursor"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML action configuration"),
        )
        .subcommand(
            Command::new("cycle")
                .about("Step the stroke palette and recolor the selection")
                .arg(
                    Arg::new("direction")
                        .default_value("forward")
                        .value_parser(value_parser!(Direction))
                        .help("forward or backward"),
                ),
        )
        .subcommand(Command::new("duplicate").about("Duplicate the selected elements"))
        .subcommand(Command::new("show").about("Print the scene and the current palette entry"))
}

fn session(matches: &ArgMatches) -> Result<Session> {
    let scene = matches
        .get_one::<PathBuf>("scene")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("scene.json"));
    let settings = matches
        .get_one::<PathBuf>("settings")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("settings.json"));
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ActionsConfig::load(path)?,
        None => ActionsConfig::default(),
    };
    Ok(Session::new(scene, settings).with_config(config))
}

fn action(matches: &ArgMatches) -> Option<Action> {
    match matches.subcommand() {
        Some(("cycle", args)) => Some(Action::Cycle(
            args.get_one::<Direction>("direction")
                .copied()
                .unwrap_or(Direction::Forward),
        )),
        Some(("duplicate", _)) => Some(Action::Duplicate),
        Some(("show", _)) => Some(Action::Show),
        _ => None,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let Some(action) = action(&matches) else {
        cli().print_help()?;
        return Ok(());
    };

    let session = session(&matches)?;
    let report = session.run(action)?;
    for notice in &report.notices {
        println!("{notice}");
    }
    tracing::debug!(saved = report.saved, "done");
    Ok(())
}
