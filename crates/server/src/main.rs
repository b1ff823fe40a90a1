use herald_server::{ServerConfig, ToolServer};
use log::info;
use tokio::io::BufReader;

fn print_help() {
    eprintln!(
        r#"Herald - crypto news sentiment tool server (JSON-RPC over stdio)

USAGE:
    herald-server [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    LOG_LEVEL               Log filter (default: info)
    WEBHOOK_URL             Receiver for batch results (disabled if unset)
    WEBHOOK_TIMEOUT_SECS    Webhook request timeout (default: 10)
    TZ                      Timezone reported by the health check
    HERALD_ASSESSOR         Name of an external assessor (reported only)

EXAMPLES:
    # Run with defaults
    herald-server

    # Run with config file
    herald-server --config herald.json

    # Deliver batch results to a webhook
    WEBHOOK_URL=http://localhost:5678/webhook/news herald-server
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let config = match &config_path {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    }
    .with_env()?;

    // Logs go to stderr; stdout carries protocol frames
    env_logger::Builder::new()
        .parse_filters(&config.log_level)
        .target(env_logger::Target::Stderr)
        .init();

    match &config_path {
        Some(path) => info!("Loaded configuration from: {}", path),
        None => info!("Using default configuration"),
    }

    info!("Server: {} v{}", config.server_name, config.version);
    info!("Timezone: {}", config.timezone);
    info!(
        "Webhook: {}",
        if config.webhook.url().is_some() { "enabled" } else { "disabled" }
    );

    let mut server = ToolServer::from_config(config)?;
    info!("Lexicon: {} phrases", server.engine().lexicon().len());

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    server.run(stdin, stdout).await?;

    info!("Server stopped");
    Ok(())
}
