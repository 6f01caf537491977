//! Demo endpoint that reports the attribution chosen for the request.

use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Serialize;
use tracing::trace;

use crate::attribution::UtmContext;

#[derive(Debug, Serialize)]
pub struct AttributionReport {
    pub attributed: bool,
    pub path: String,
    pub context: Option<UtmContext>,
}

pub struct AttributionService;

impl AttributionService {
    pub async fn show(req: HttpRequest, ctx: Option<UtmContext>) -> impl Responder {
        trace!("Reporting attribution for {}", req.path());
        HttpResponse::Ok().json(AttributionReport {
            attributed: ctx.is_some(),
            path: req.path().to_string(),
            context: ctx,
        })
    }
}

/// Catch-all GET/HEAD route serving [`AttributionService::show`].
pub fn attribution_routes() -> actix_web::Resource {
    web::resource("/{tail:.*}")
        .route(web::get().to(AttributionService::show))
        .route(web::head().to(AttributionService::show))
}
