//! Request dispatch module
//!
//! Entry point for HTTP request processing: mount prefix handling, method
//! validation, running the routing chain and translating its result into an
//! HTTP response.

use crate::config::AppState;
use crate::http::{self, cache, Body};
use crate::logger::{self, AccessLogEntry};
use crate::routing::{
    FetchError, HttpMethod, ResponseData, RoutingPath, RoutingRequest,
};
use hyper::body::Body as _;
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, SERVER};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// The parts of a request the dispatcher reads
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub version: Version,
    pub if_none_match: Option<String>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestHead {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };

        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            version: req.version(),
            if_none_match: header("if-none-match"),
            referer: header("referer"),
            user_agent: header("user-agent"),
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Body>, Infallible> {
    let start = Instant::now();
    let head = RequestHead::from_request(&req);
    drop(req);

    let response = dispatch(&head, &state).await;

    if state.config.logging.access_log {
        log_access(
            &head,
            &response,
            peer_addr,
            start,
            &state.config.logging.access_log_format,
        );
    }
    Ok(response)
}

/// Resolve one request against the routing chain
///
/// The routing only runs for paths below the mount prefix and for methods it
/// allows. HEAD runs as GET and OPTIONS is answered here unless the routing
/// accepts it itself.
pub async fn dispatch(head: &RequestHead, state: &AppState) -> Response<Body> {
    let mut response = dispatch_inner(head, state).await;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        headers.insert(SERVER, value);
    }
    if state.config.http.enable_cors {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
    response
}

async fn dispatch_inner(head: &RequestHead, state: &AppState) -> Response<Body> {
    let Some(path) = RoutingPath::parse(&head.path).strip_prefix(&state.mount_prefix) else {
        logger::log_debug(&format!("Outside mount prefix: {}", head.path));
        return http::build_404_response();
    };

    let allowed = state.routing.allowed_methods();
    let allow_header = allowed.allow_header();

    let Some(method) = HttpMethod::from_hyper(&head.method) else {
        logger::log_warning(&format!("Method not allowed: {}", head.method));
        return http::build_405_response(&allow_header);
    };

    let is_head = method == HttpMethod::Head && !allowed.contains(HttpMethod::Head);
    let effective = if is_head { HttpMethod::Get } else { method };

    if effective == HttpMethod::Options && !allowed.contains(HttpMethod::Options) {
        return http::build_options_response(&allow_header, state.config.http.enable_cors);
    }
    if !allowed.contains(effective) {
        logger::log_warning(&format!("Method not allowed: {} {}", head.method, head.path));
        return http::build_405_response(&allow_header);
    }

    let request =
        RoutingRequest::new(effective, head.path.clone()).with_query(head.query.clone());
    let data = fetch(state, path, request).await;
    into_response(data, head, is_head, state)
}

/// Run the synchronous fetch on the blocking pool
async fn fetch(state: &AppState, path: RoutingPath, request: RoutingRequest) -> ResponseData {
    let routing = Arc::clone(&state.routing);
    let viewer = Arc::clone(&state.viewer);

    tokio::task::spawn_blocking(move || routing.fetch_data(&path, &request, &*viewer))
        .await
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Routing task failed: {e}"));
            FetchError::internal("routing task failed").into()
        })
}

fn into_response(
    data: ResponseData,
    head: &RequestHead,
    is_head: bool,
    state: &AppState,
) -> Response<Body> {
    match data {
        ResponseData::Found { body, content_type } => {
            let etag = cache::generate_etag(&body);
            if cache::check_etag_match(head.if_none_match.as_deref(), &etag) {
                return http::build_304_response(&etag, state.cache_policy);
            }
            http::build_found_response(body, content_type, &etag, state.cache_policy, is_head)
        }
        ResponseData::NotFound => http::build_404_response(),
        ResponseData::Error(e) => {
            let status = e.status_code();
            if status.is_server_error() {
                logger::log_error(&format!("{} {}: {e}", head.method, head.path));
            } else {
                logger::log_debug(&format!("{} {}: {e}", head.method, head.path));
            }
            http::build_error_response(status, e.message(), is_head)
        }
    }
}

const fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

fn log_access(
    head: &RequestHead,
    response: &Response<Body>,
    peer_addr: SocketAddr,
    start: Instant,
    format: &str,
) {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        head.method.to_string(),
        head.path.clone(),
    );
    entry.query.clone_from(&head.query);
    entry.http_version = version_str(head.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer.clone_from(&head.referer);
    entry.user_agent.clone_from(&head.user_agent);
    entry.request_time_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
    logger::log_access(&entry, format);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::routing::{
        MethodSet, Routing, RoutingExt, RoutingStatic, RoutingTree, SharedRouting,
    };
    use crate::viewer::{ReportStore, ReportViewer};
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts fetches and answers from a fixed table
    struct Recorder {
        calls: Arc<AtomicUsize>,
        methods: MethodSet,
    }

    impl Routing for Recorder {
        fn allowed_methods(&self) -> MethodSet {
            self.methods
        }

        fn fetch_data(
            &self,
            path: &RoutingPath,
            request: &RoutingRequest,
            _viewer: &dyn ReportViewer,
        ) -> ResponseData {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match path.suffix().as_str() {
                "" => ResponseData::found(request.method().as_str(), "text/plain"),
                "bad" => FetchError::bad_request("bad id").into(),
                "panic" => panic!("routing bug"),
                _ => ResponseData::not_found(),
            }
        }
    }

    fn state_with(routing: SharedRouting, mount_prefix: &str) -> AppState {
        let mut config = Config::defaults().unwrap();
        config.viewer.mount_prefix = mount_prefix.to_string();
        config.http.server_name = "report-viewer-test".to_string();
        AppState::new(config, routing, Arc::new(ReportStore::new("test")))
    }

    fn recorder(methods: MethodSet) -> (SharedRouting, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let routing = Recorder {
            calls: Arc::clone(&calls),
            methods,
        };
        (routing.shared(), calls)
    }

    fn head(method: Method, uri: &str) -> RequestHead {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        RequestHead::from_request(&req)
    }

    async fn body_of(response: Response<Body>) -> Vec<u8> {
        response.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    #[tokio::test]
    async fn test_found_has_etag_and_server() {
        let tree = RoutingTree::new().route("healthz", RoutingStatic::text("ok"));
        let state = state_with(tree.shared(), "/");

        let response = dispatch(&head(Method::GET, "/healthz"), &state).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["Server"], "report-viewer-test");
        assert_eq!(response.headers()["Cache-Control"], "no-cache");
        assert!(response.headers().contains_key("ETag"));
        assert_eq!(body_of(response).await, b"ok");
    }

    #[tokio::test]
    async fn test_matching_etag_is_304() {
        let tree = RoutingTree::new().route("healthz", RoutingStatic::text("ok"));
        let state = state_with(tree.shared(), "/");

        let first = dispatch(&head(Method::GET, "/healthz"), &state).await;
        let etag = first.headers()["ETag"].to_str().unwrap().to_string();

        let req = Request::builder()
            .uri("/healthz")
            .header("If-None-Match", &etag)
            .body(())
            .unwrap();
        let response = dispatch(&RequestHead::from_request(&req), &state).await;
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_not_found_is_empty_404() {
        let (routing, calls) = recorder(MethodSet::GET);
        let state = state_with(routing, "/");

        let response = dispatch(&head(Method::GET, "/missing"), &state).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_of(response).await.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_outside_mount_prefix_skips_routing() {
        let (routing, calls) = recorder(MethodSet::GET);
        let state = state_with(routing, "/report");

        let response = dispatch(&head(Method::GET, "/other"), &state).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let response = dispatch(&head(Method::GET, "/report"), &state).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disallowed_method_is_405() {
        let (routing, calls) = recorder(MethodSet::GET);
        let state = state_with(routing, "/");

        let response = dispatch(&head(Method::POST, "/"), &state).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["Allow"], "GET, HEAD, OPTIONS");

        let response = dispatch(&head(Method::TRACE, "/"), &state).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_allowed_post_reaches_routing() {
        let (routing, _calls) = recorder(MethodSet::GET.with(HttpMethod::Post));
        let state = state_with(routing, "/");

        let response = dispatch(&head(Method::POST, "/"), &state).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, b"POST");
    }

    #[tokio::test]
    async fn test_head_is_get_without_body() {
        let (routing, _calls) = recorder(MethodSet::GET);
        let state = state_with(routing, "/");

        let response = dispatch(&head(Method::HEAD, "/"), &state).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["Content-Length"], "3");
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_options_answered_by_dispatcher() {
        let (routing, calls) = recorder(MethodSet::GET);
        let state = state_with(routing, "/");

        let response = dispatch(&head(Method::OPTIONS, "/"), &state).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["Allow"], "GET, HEAD, OPTIONS");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_error_status_from_kind() {
        let (routing, _calls) = recorder(MethodSet::GET);
        let state = state_with(routing, "/");

        let response = dispatch(&head(Method::GET, "/bad"), &state).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await, b"400 bad id");
    }

    #[tokio::test]
    async fn test_panicking_routing_is_500() {
        let (routing, _calls) = recorder(MethodSet::GET);
        let state = state_with(routing, "/");

        let response = dispatch(&head(Method::GET, "/panic"), &state).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // the server keeps serving
        let response = dispatch(&head(Method::GET, "/"), &state).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_fallback_chain_through_dispatcher() {
        let chain = RoutingTree::new()
            .route("healthz", RoutingStatic::text("ok"))
            .or(RoutingStatic::text("index"));
        let state = state_with(chain.shared(), "/");

        let response = dispatch(&head(Method::GET, "/"), &state).await;
        assert_eq!(body_of(response).await, b"index");
        let response = dispatch(&head(Method::GET, "/healthz"), &state).await;
        assert_eq!(body_of(response).await, b"ok");
    }
}
