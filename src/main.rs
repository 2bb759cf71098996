mod cli;
mod commands;
mod config;
mod env;
mod error;
mod http;
mod install;
mod loader;
mod markup;
mod model;
mod opener;
mod output;
mod registry;
mod strings;
mod view;

#[cfg(test)]
mod test_support;

use clap::Parser;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(env::EnvVar::LOG, "warn"))
        .format_timestamp(None)
        .init();

    let cli = cli::Cli::parse();

    if let Err(err) = commands::dispatch(cli).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
