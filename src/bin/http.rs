#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::net::SocketAddr;

    use nexflow::{Schedule, ScheduleConfig, http_api, logging};

    logging::init_logging(None)?;

    let addr: SocketAddr = std::env::var("NEXFLOW_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;
    let config = ScheduleConfig::load_or_default(None)?;

    println!("nexflow HTTP API listening on http://{addr}");
    http_api::serve(addr, Schedule::with_config(config)).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
