use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lesswrong_bot::app::AppContext;
use lesswrong_bot::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so replies on stdout stay clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Commands::Help = cli.command {
        println!("{}", commands::help());
        return Ok(());
    }

    let ctx = AppContext::new(cli.config.as_deref())?;

    let reply = match cli.command {
        Commands::Random => commands::random(&ctx, cli.user).await,
        Commands::Top => commands::top(&ctx, cli.user).await,
        Commands::Source { code } => commands::source(&ctx, cli.user, code.as_deref()),
        Commands::Help => commands::help(),
    };
    println!("{reply}");

    Ok(())
}
