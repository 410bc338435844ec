use std::net::SocketAddr;

use wbs_scheduler::{http_api, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging(tracing::Level::INFO);

    let addr: SocketAddr = std::env::var("WBS_SCHEDULER_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    println!("wbs-scheduler HTTP API listening on http://{addr}");
    http_api::serve(addr, http_api::AppState::new()).await?;
    Ok(())
}
