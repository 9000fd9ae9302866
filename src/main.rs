mod config;
mod dispatch;
mod errors;
mod event;
mod resolve;
mod signature;
mod types;
mod webhook;

use config::ServiceOptions;
use dispatch::{ActionRunner, ProcessRunner};
use rocket::{launch, routes, Build, Rocket};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Assembles the service from explicit options and an injected action
/// runner.
pub fn service(options: ServiceOptions, runner: Arc<dyn ActionRunner>) -> Rocket<Build> {
    let port = options.listen_port;
    rocket::build()
        .manage(options)
        .manage(runner)
        .mount(
            "/",
            routes![webhook::index, webhook::webhooks_get, webhook::webhooks_post],
        )
        .configure(rocket::Config {
            port,
            address: "0.0.0.0".parse().unwrap(),
            ..rocket::Config::default()
        })
}

fn init_tracing(debug_mode: bool) {
    let default_filter = if debug_mode { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

#[launch]
fn rocket() -> Rocket<Build> {
    dotenvy::dotenv().ok();

    let options = ServiceOptions::from_env();
    init_tracing(options.debug_mode);

    info!(
        port = options.listen_port,
        registry = %options.registry_path.display(),
        proxy_headers = options.trust_proxy_headers,
        "starting webhook dispatcher"
    );

    let runner = Arc::new(ProcessRunner::new(options.action_timeout));
    service(options, runner)
}
