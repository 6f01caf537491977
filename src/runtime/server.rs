//! Server mode
//!
//! Hosts the attribution middleware in front of the demo endpoint.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
};
use anyhow::Result;
use tracing::{info, warn};

use crate::api::middleware::UtmAttribution;
use crate::api::services::attribution_routes;
use crate::config::StaticConfig;

/// Run the HTTP server
///
/// The middleware is built (and its configuration validated) before any
/// worker starts, so a bad cookie domain aborts startup.
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let attribution = UtmAttribution::from_config(&config.attribution)?;
    let settings = attribution.settings();
    info!(
        "Attribution policy: {}, overwrite: {}, domain: {}",
        settings.policy(),
        settings.overwrite(),
        settings.domain().unwrap_or("<host only>")
    );
    info!("Cookie policies: {}", config.attribution.describe_policies());
    if !config.attribution.secure {
        warn!("Attribution cookies are sent without the Secure attribute");
    }

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .wrap(attribution.clone())
            .service(attribution_routes())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .workers(cpu_count)
    .bind(&bind_address)?;

    warn!("Starting server at http://{} ({} workers)", bind_address, cpu_count);
    server.run().await?;

    info!("Server stopped");
    Ok(())
}
