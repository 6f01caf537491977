//! Read-only view of the request parts attribution looks at.

use actix_web::{HttpRequest, dev::ServiceRequest, http::header::REFERER};

/// The slice of an HTTP request that attribution reads: query string,
/// cookies, `Referer` and path.
pub trait RequestView {
    /// Last value of `name` in the query string, percent-decoded.
    fn query_value(&self, name: &str) -> Option<String>;
    /// Decoded cookie value.
    fn cookie_value(&self, name: &str) -> Option<String>;
    /// `Referer` as UTF-8 text; absent when the header is missing or not UTF-8.
    fn referer(&self) -> Option<String>;
    fn request_path(&self) -> &str;
}

/// Rack semantics: a repeated key keeps its last value.
pub(crate) fn query_lookup(query: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == name)
        .last()
        .map(|(_, value)| value.into_owned())
}

impl RequestView for HttpRequest {
    fn query_value(&self, name: &str) -> Option<String> {
        query_lookup(self.query_string(), name)
    }

    fn cookie_value(&self, name: &str) -> Option<String> {
        self.cookie(name).map(|c| c.value().to_string())
    }

    fn referer(&self) -> Option<String> {
        self.headers()
            .get(REFERER)
            .and_then(|h| std::str::from_utf8(h.as_bytes()).ok())
            .map(str::to_string)
    }

    fn request_path(&self) -> &str {
        self.path()
    }
}

impl RequestView for ServiceRequest {
    fn query_value(&self, name: &str) -> Option<String> {
        self.request().query_value(name)
    }

    fn cookie_value(&self, name: &str) -> Option<String> {
        self.request().cookie_value(name)
    }

    fn referer(&self) -> Option<String> {
        self.request().referer()
    }

    fn request_path(&self) -> &str {
        self.path()
    }
}
