use std::net::SocketAddr;
use std::sync::Arc;

use donation_functions::config::Config;
use donation_functions::content::SanityClient;
use donation_functions::handlers::{self, AppState};
use donation_functions::payments::StripeCheckout;
use donation_functions::schema;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Dump the content schema for the authoring studio and exit.
    if std::env::args().any(|arg| arg == "--print-schema") {
        println!("{}", serde_json::to_string_pretty(&schema::all_schemas())?);
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "donation_functions=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let content_store = Arc::new(SanityClient::new(&config));
    tracing::info!(
        "content store: project={} dataset={} cdn={}",
        config.sanity_project_id,
        config.sanity_dataset,
        config.sanity_use_cdn
    );
    let checkout = Arc::new(StripeCheckout::new(config.stripe_secret_key.clone()));

    let app = handlers::router(AppState::new(&config, content_store, checkout));

    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::debug!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
