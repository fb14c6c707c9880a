mod context;
mod error;
mod judging;
mod web;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let ctx = Arc::new(context::Context::from_env());
    info!("starting contest server");
    web::setup(ctx).await;
}
