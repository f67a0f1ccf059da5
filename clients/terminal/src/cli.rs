use clap::Parser;
use echo_core::Config;
use std::path::PathBuf;

/// Ping a host by playing Pong in the terminal
#[derive(Parser, Debug)]
#[command(name = "pong", version, about)]
pub struct Cli {
    /// Host name or address to ping
    pub destination: String,

    /// Stop after sending <COUNT> packets
    #[arg(short = 'c', long, default_value_t = 4)]
    pub count: u32,

    /// Hop budget for every packet
    #[arg(short = 't', long, default_value_t = 64)]
    pub ttl: i32,

    /// Pattern appended to the packet payload
    #[arg(short = 'p', long, value_name = "PATTERN")]
    pub padding: Option<String>,

    /// Seed the random source for a repeatable match
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write tracing output to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Print the final statistics as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Game configuration for these arguments
    pub fn config(&self) -> Config {
        Config {
            rounds: self.count,
            hop_budget: self.ttl,
            payload: Config::payload_with_padding(self.padding.as_deref()),
            ..Config::default()
        }
    }
}
