use crate::config::{self, ServiceOptions};
use crate::dispatch::{self, ActionRunner};
use crate::errors::HookError;
use crate::event;
use crate::resolve;
use crate::signature;
use crate::types::Ack;
use rocket::{
    data::{Data, ToByteUnit},
    get, post,
    request::{FromRequest, Outcome, Request},
    serde::json::Json,
    State,
};
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{info, warn};

// Custom request guard to extract the headers we consume
pub struct WebhookHeaders {
    pub signature: Option<String>,
    pub event: Option<String>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for WebhookHeaders {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let signature = request
            .headers()
            .get_one("x-hub-signature")
            .map(|s| s.to_string());
        let event = request
            .headers()
            .get_one("x-github-event")
            .map(|s| s.to_string());

        Outcome::Success(WebhookHeaders { signature, event })
    }
}

/// Client address for request logging. With `trust_proxy_headers` set,
/// the first `X-Forwarded-For` entry wins over the socket peer address.
pub struct ClientAddr(pub Option<IpAddr>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ClientAddr {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let trust = request
            .rocket()
            .state::<ServiceOptions>()
            .map(|options| options.trust_proxy_headers)
            .unwrap_or(false);

        let forwarded = if trust {
            request
                .headers()
                .get_one("x-forwarded-for")
                .and_then(|value| value.split(',').next())
                .and_then(|value| value.trim().parse().ok())
        } else {
            None
        };

        Outcome::Success(ClientAddr(forwarded.or_else(|| request.client_ip())))
    }
}

impl fmt::Display for ClientAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(addr) => addr.fmt(f),
            None => f.write_str("unknown"),
        }
    }
}

/// Liveness response.
#[get("/")]
pub fn index() -> &'static str {
    "Hello World!"
}

/// Accidental browser visits and health probes land here.
#[get("/webhooks")]
pub fn webhooks_get() -> &'static str {
    "Invalid hook payload."
}

/// Handler for POST /webhooks: classify the event, resolve the registry
/// entry, verify the signature, run the entry's actions.
#[post("/webhooks", data = "<data>")]
pub async fn webhooks_post(
    options: &State<ServiceOptions>,
    runner: &State<Arc<dyn ActionRunner>>,
    headers: WebhookHeaders,
    client: ClientAddr,
    data: Data<'_>,
) -> Result<Json<Ack>, HookError> {
    // Ping and foreign events short-circuit before any registry access.
    match headers.event.as_deref() {
        Some("ping") => return Ok(Json(Ack::HI)),
        Some("push") => {}
        _ => return Ok(Json(Ack::WRONG_EVENT)),
    }

    let body = data
        .open(5.megabytes())
        .into_bytes()
        .await
        .map_err(|err| HookError::Body(err.to_string()))?;

    // Fresh snapshot per request; operator edits need no restart.
    let registry = config::load_registry(&options.registry_path)?;

    let push = event::normalize(&body)?;
    let (matched_key, entry) = resolve::resolve(&registry, &push)
        .ok_or_else(|| HookError::UnknownRepository(push.qualified_name()))?;

    if let Err(err) = signature::authenticate(entry, &body, headers.signature.as_deref()) {
        warn!(repository = matched_key, client = %client, error = %err, "rejecting webhook");
        return Err(err);
    }

    info!(repository = matched_key, client = %client, "dispatching actions");
    dispatch::dispatch(runner.inner().as_ref(), entry).await;

    Ok(Json(Ack::DONE))
}
