//! Queries an ICAP service for its options.
//!
//! ```shell
//! cargo run --example options -- 127.0.0.1 1344 avscan
//! ```

use std::env;
use std::error::Error;

use micro_icap::config::{ConnectionConfig, DEFAULT_ICAP_PORT};
use micro_icap::connection::IcapConnection;
use micro_icap::protocol::{IcapRequest, Method};
use tokio::net::TcpStream;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut args = env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let port = args.next().and_then(|port| port.parse().ok()).unwrap_or(DEFAULT_ICAP_PORT);
    let service = args.next().unwrap_or_else(|| "options".to_string());

    if let Err(e) = query_options(host, port, service).await {
        error!(cause = %e, "options request failed");
    }
}

async fn query_options(host: String, port: u16, service: String) -> Result<(), Box<dyn Error>> {
    let config = ConnectionConfig::new(host.clone()).with_port(port).with_default_header("Host", host);

    info!(host = config.host(), port, "connecting");
    let stream = TcpStream::connect((config.host(), config.port())).await?;
    let (reader, writer) = stream.into_split();
    let mut connection = IcapConnection::new(reader, writer, &config);

    let request = IcapRequest::builder(Method::Options).path(service).build()?;
    let response = connection.request(request).await?;

    info!(status = %response.status, reason = %response.reason, "received options");
    for (name, value) in response.headers.iter() {
        info!("{name}: {value}");
    }
    if let Some(body) = &response.options_body {
        info!(len = body.len(), "options body");
    }
    Ok(())
}
