//! device-grant CLI binary entry point.

use device_grant::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    device_grant::cli::login::init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Login => device_grant::cli::login::handle_login(&cli.client).await,
        Commands::Get(args) => device_grant::cli::login::handle_get(&cli.client, &args.url).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
