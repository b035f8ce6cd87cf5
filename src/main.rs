use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

use grofer::commands;

fn stats_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("refresh")
                .short('r')
                .long("refresh")
                .value_name("MS")
                .help("Refresh rate in milliseconds, at least 1000 (defaults to the configured value)")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("watch")
                .short('w')
                .long("watch")
                .help("Keep sampling every refresh period until Ctrl+C")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print records as JSON lines")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Append records as JSON lines to FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .conflicts_with("json"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("MS")
                .help("Abort a round that takes longer than MS milliseconds")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

fn millis_arg() -> Arg {
    Arg::new("millis")
        .help("Value in milliseconds")
        .required(true)
        .index(1)
        .value_parser(clap::value_parser!(u64))
}

fn build_cli() -> Command {
    stats_args(
        Command::new("grofer")
            .version(env!("CARGO_PKG_VERSION"))
            .about("grofer is a system and resource monitor")
            .long_about(
                "grofer is a system and resource monitor.\n\n\
                 Each run samples CPU, memory, disk, network and host information \
                 concurrently and prints one record per metric class.",
            ),
    )
    .subcommand(stats_args(
        Command::new("stats").about("Sample system-wide metrics (default command)"),
    ))
    .subcommand(
        Command::new("set")
            .about("Set configuration values (use 'grofer set --help' for subcommands)")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand(
                Command::new("refresh")
                    .about("Set the default refresh rate")
                    .arg(millis_arg()),
            )
            .subcommand(
                Command::new("timeout")
                    .about("Set the default round timeout (0 disables it)")
                    .arg(millis_arg()),
            ),
    )
    .subcommand(
        Command::new("get")
            .about("Get configuration values (use 'grofer get --help' for subcommands)")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand(Command::new("refresh").about("Get the default refresh rate"))
            .subcommand(Command::new("timeout").about("Get the default round timeout")),
    )
    .subcommand(Command::new("version").about("Shows version information"))
}

fn dispatch(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("stats", sub_matches)) => commands::stats(sub_matches),
        Some(("set", sub_matches)) => commands::config::handle_set(sub_matches),
        Some(("get", sub_matches)) => commands::config::handle_get(sub_matches),
        Some(("version", _)) => commands::version(),
        _ => commands::stats(matches),
    }
}

fn main() -> Result<()> {
    grofer::init_logging();

    let matches = build_cli().get_matches();
    dispatch(&matches)
}
