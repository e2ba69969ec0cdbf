//! Web server command.

use console::style;

use crate::config::{parse_bind_address, Config};

/// Start the web server. `bind` overrides the configured address.
pub async fn cmd_serve(config: &Config, bind: Option<&str>) -> anyhow::Result<()> {
    let bind = bind.unwrap_or(config.server.bind.as_str());
    let (host, port) = parse_bind_address(bind)?;

    println!(
        "{} Starting Menu OCR Service at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(config, &host, port).await
}
