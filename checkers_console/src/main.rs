#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod network;
mod peer_config;
mod peer_main;
mod tui;

use anyhow::Context;
use clap::{Command, arg};
use peer_config::PeerConfig;


fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Checkers")
        .version(clap::crate_version!())
        .about("Two-player checkers over a direct network connection")
        .subcommand_required(true)
        .subcommand(Command::new("host").about("Wait for a peer to join").arg(
            arg!(<config_file> "Path to the configuration file: yaml-serialized PeerConfig."),
        ))
        .subcommand(
            Command::new("join")
                .about("Join a host")
                .arg(arg!(<host_address> "Host address, e.g. 192.168.0.10")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("host", sub_matches)) => {
            let config_file = sub_matches
                .get_one::<String>("config_file")
                .context("Missing config file argument")?;
            peer_main::run_host(read_config_file(config_file)?)
        },
        Some(("join", sub_matches)) => {
            let host_address = sub_matches
                .get_one::<String>("host_address")
                .context("Missing host address argument")?;
            peer_main::run_guest(host_address)
        },
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}

fn read_config_file(filename: &str) -> anyhow::Result<PeerConfig> {
    let contents = std::fs::read_to_string(filename)
        .with_context(|| format!("Failed to read config file '{filename}'"))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file '{filename}'"))
}
