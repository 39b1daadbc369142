use math_server_rs::api::server::MathServer;
use math_server_rs::config::ServerConfig;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {}", err);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if config.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let default_ai = config.default_ai_config();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        model = %default_ai.model,
        api_base = %default_ai.api_base,
        has_api_key = !default_ai.api_key.is_empty(),
        "math server starting"
    );

    let server = match MathServer::new(config) {
        Ok(server) => server,
        Err(err) => {
            error!(error = %err, "could not build server");
            std::process::exit(1);
        }
    };
    if let Err(err) = server.start().await {
        error!(error = %err, "server error");
        std::process::exit(1);
    }
}
