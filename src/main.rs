use clap::Parser;
use castctl::cli::{
    chat, handle_completions, handle_config_init, pages, settings, watch, Cli, Commands,
    ConfigCommands,
};
use castctl::logging::init_tracing;

async fn run(cli: Cli) -> anyhow::Result<()> {
    // These two work without a server or a config file.
    match &cli.command {
        Commands::Config(ConfigCommands::Init(args)) => {
            println!("{}", handle_config_init(args)?);
            return Ok(());
        }
        Commands::Completions(args) => {
            handle_completions(args);
            return Ok(());
        }
        _ => {}
    }

    let config = castctl::cli::resolve_config(&cli.global)?;
    if let Err(e) = init_tracing(&config.logging) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    let api = castctl::cli::connect(&config)?;
    let reset_after = config.polling.outcome_reset();

    let output = match &cli.command {
        Commands::Status(args) => pages::handle_status(api.as_ref(), args).await?,
        Commands::Server(args) => pages::handle_server(api.as_ref(), args).await?,
        Commands::Video(args) => pages::handle_video(api.as_ref(), args).await?,
        Commands::Logs(args) => pages::handle_logs(api.as_ref(), args).await?,
        Commands::Upgrade(args) => pages::handle_upgrade(api.as_ref(), args).await?,
        Commands::Chat(cmd) => chat::handle_chat(api, cmd, reset_after).await?,
        Commands::Tags(cmd) => settings::handle_tags(api, cmd, reset_after).await?,
        Commands::Variants(cmd) => settings::handle_variants(api, cmd, reset_after).await?,
        Commands::Set(args) => settings::handle_set(api, args, reset_after).await?,
        Commands::Watch(args) => {
            watch::handle_watch(api, args, &config.polling).await?;
            return Ok(());
        }
        Commands::Config(_) | Commands::Completions(_) => return Ok(()),
    };

    println!("{}", output);
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
