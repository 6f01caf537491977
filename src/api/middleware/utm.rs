//! UTM attribution middleware
//!
//! 每个请求：从 Cookie / 查询参数中选出归因记录，写入 request extensions，
//! 调用下游服务后再把归因 Cookie 写回响应。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;

use crate::attribution::{AttributionSettings, UtmContext, bake_cookies, resolve};
use crate::config::AttributionConfig;
use crate::errors::Result;

/// Attribution middleware factory
#[derive(Clone)]
pub struct UtmAttribution {
    settings: Arc<AttributionSettings>,
}

impl UtmAttribution {
    pub fn new(settings: AttributionSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }

    /// Validate `config` and build the middleware; invalid configuration
    /// fails here rather than on the first request.
    pub fn from_config(config: &AttributionConfig) -> Result<Self> {
        AttributionSettings::from_config(config).map(Self::new)
    }

    pub fn settings(&self) -> &AttributionSettings {
        &self.settings
    }
}

impl Default for UtmAttribution {
    fn default() -> Self {
        Self::new(AttributionSettings::default())
    }
}

impl<S, B> Transform<S, ServiceRequest> for UtmAttribution
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = UtmAttributionService<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(UtmAttributionService {
            service: Rc::new(service),
            settings: self.settings.clone(),
        }))
    }
}

pub struct UtmAttributionService<S> {
    service: Rc<S>,
    settings: Arc<AttributionSettings>,
}

impl<S, B> Service<ServiceRequest> for UtmAttributionService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let settings = self.settings.clone();

        let selection = resolve(&req, &settings);
        debug!(
            "Attribution for {}: origin={}, source={:?}",
            req.path(),
            selection.origin(),
            selection.record().map(|r| r.source.as_str())
        );

        let record = selection.into_record();
        if let Some(ref record) = record {
            req.extensions_mut().insert(UtmContext::new(record.clone()));
        }

        Box::pin(async move {
            // 下游错误原样返回，不写 Cookie
            let mut response = srv.call(req).await?;
            bake_cookies(&mut response, &settings, record.as_ref());
            Ok(response)
        })
    }
}
