use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "cardhub-api", about = "Card management promo-code backend")]
pub struct Cli {
    /// Address the HTTP server binds to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API (the default).
    Serve,
    /// Repair used codes that are missing their ledger entry, then exit.
    Reconcile,
}
