//! Command line host for the IPTV PVR backend
//! Loads the provider catalog and prints what a media center would receive.

// Use mimalloc for faster memory allocation (Linux, macOS)
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use pvr_iptv_rest::epg::{format_datetime, format_time};
use pvr_iptv_rest::host::Genre;
use pvr_iptv_rest::{HostSink, PvrData, RestClient, Settings, Transfer};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

const SECONDS_IN_DAY: i64 = 86400;

#[derive(Parser)]
#[command(name = "pvr-iptv-rest", version, about = "IPTV REST PVR backend")]
struct Cli {
    /// Settings file, defaults to the user config directory
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Print debug logging
    #[arg(short, long)]
    verbose: bool,
    /// Print records as JSON lines
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List channels
    Channels {
        #[arg(long)]
        radio: bool,
    },
    /// List channel groups
    Groups {
        #[arg(long)]
        radio: bool,
    },
    /// List the channels of a group
    Members {
        group: String,
        #[arg(long)]
        radio: bool,
    },
    /// Show the programme guide of a channel
    Epg {
        unique_id: i32,
        /// Window start (Unix time), defaults to now
        #[arg(long)]
        start: Option<i64>,
        /// Window end (Unix time), defaults to start + 1 day
        #[arg(long)]
        end: Option<i64>,
    },
    /// Reload the catalog and report the update triggers
    Reload,
    /// Write a settings file with defaults to `--config` or the user config directory
    InitConfig,
}

/// Prints every transferred record to stdout
struct ConsoleSink {
    json: bool,
}

impl HostSink for ConsoleSink {
    fn emit(&mut self, transfer: Transfer) {
        if self.json {
            match serde_json::to_string(&transfer) {
                Ok(line) => println!("{}", line),
                Err(e) => log::error!("Cannot serialize record: {}", e),
            }
            return;
        }

        match transfer {
            Transfer::Channel(c) => println!(
                "{:>8}  {:>4}  {}  {}",
                c.unique_id, c.channel_number, c.channel_name, c.icon_path
            ),
            Transfer::ChannelGroup(g) => println!("{}", g.group_name),
            Transfer::ChannelGroupMember(m) => println!(
                "{:>8}  {:>4}  {}",
                m.channel_unique_id, m.channel_number, m.group_name
            ),
            Transfer::EpgTag(tag) => {
                let Genre::Text(genre) = &tag.genre;
                println!(
                    "{} - {}  {}  [{}]",
                    format_datetime(tag.start_time),
                    format_time(tag.end_time),
                    tag.title,
                    genre
                );
            }
            Transfer::TriggerChannelUpdate => println!("channels updated"),
            Transfer::TriggerChannelGroupsUpdate => println!("channel groups updated"),
        }
    }
}

/// Write default settings to `path`, or to the user config directory
fn init_config(path: Option<&Path>) -> ExitCode {
    let settings = Settings::default();
    let target = path.map(Path::to_path_buf).unwrap_or_else(Settings::config_path);

    if target.exists() {
        log::error!("{} already exists", target.display());
        return ExitCode::FAILURE;
    }

    let written = match path {
        Some(path) => settings.save_to(path),
        None => settings.save(),
    };
    if let Err(e) = written {
        log::error!("Cannot write {}: {}", target.display(), e);
        return ExitCode::FAILURE;
    }

    println!("{}", target.display());
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Command::InitConfig = cli.command {
        return init_config(cli.config.as_deref());
    }

    let settings = match &cli.config {
        Some(path) => match Settings::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Settings::load(),
    };

    if settings.rest_url.is_empty() {
        log::error!("No catalog endpoint configured (rest_url)");
        return ExitCode::FAILURE;
    }

    let fetcher = Arc::new(RestClient::from_settings(&settings));
    let data = PvrData::new(settings, fetcher);
    let mut sink = ConsoleSink { json: cli.json };

    match cli.command {
        Command::Channels { radio } => data.get_channels(&mut sink, radio),
        Command::Groups { radio } => data.get_channel_groups(&mut sink, radio),
        Command::Members { group, radio } => {
            data.get_channel_group_members(&mut sink, &group, radio)
        }
        Command::Epg { unique_id, start, end } => {
            if data.get_channel(unique_id).is_none() {
                log::error!("Channel {} not found", unique_id);
                return ExitCode::FAILURE;
            }
            let start = start.unwrap_or_else(|| chrono::Utc::now().timestamp());
            let end = end.unwrap_or(start.saturating_add(SECONDS_IN_DAY));
            let count = data.get_epg_for_channel(&mut sink, unique_id, start, end);
            log::info!("{} programmes", count);
        }
        Command::Reload => {
            if !data.reload_playlist(&mut sink) {
                return ExitCode::FAILURE;
            }
        }
        Command::InitConfig => {}
    }

    ExitCode::SUCCESS
}
