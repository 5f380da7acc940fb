use axum::http::{header, HeaderValue, Method};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

#[cfg(not(test))]
use {
    axum::extract::ConnectInfo,
    std::net::{IpAddr, SocketAddr},
    std::sync::Arc,
    tower_governor::{governor::GovernorConfigBuilder, key_extractor::KeyExtractor, GovernorLayer},
    tracing::warn,
};

use crate::api::handlers::{self as api_handlers, AppState};
use crate::config::Settings;

/// Create the router with all endpoints
#[cfg_attr(test, allow(unused_variables))]
pub fn create_router(state: AppState, settings: &Settings) -> Router {
    #[cfg_attr(test, allow(unused_mut))]
    let mut api_routes = Router::new()
        .route("/get_courses", post(api_handlers::get_courses))
        .route("/terms", get(api_handlers::list_terms))
        .with_state(state.clone());

    // Apply rate limiting only in non-test builds
    // NOTE: Behind a reverse proxy every request appears to come from the proxy;
    // configure the proxy to set X-Real-IP and switch to SmartIpKeyExtractor.
    #[cfg(not(test))]
    {
        #[derive(Clone, Copy, Debug)]
        struct FallbackIpKeyExtractor;

        impl KeyExtractor for FallbackIpKeyExtractor {
            type Key = IpAddr;

            fn extract<B>(
                &self,
                req: &axum::http::Request<B>,
            ) -> Result<Self::Key, tower_governor::GovernorError> {
                if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
                    return Ok(addr.ip());
                }

                // Fall back to localhost for local development/testing
                Ok(IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)))
            }
        }

        match GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            .per_millisecond(refill_interval_ms(settings.server.api_rate_limit))
            .burst_size(settings.server.api_rate_limit as u32 * 2)
            .finish()
        {
            Some(config) => {
                api_routes = api_routes.layer(GovernorLayer {
                    config: Arc::new(config),
                });
            }
            None => warn!("Invalid rate limit configuration, API rate limiting disabled"),
        }
    }

    // The graph endpoint lives at the root for compatibility with existing clients
    let graph_routes = Router::new()
        .route("/generate_a_list", post(api_handlers::generate_graph))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(api_handlers::health_check))
        .route("/ready", get(api_handlers::readiness_check))
        .with_state(state);

    Router::new()
        .merge(graph_routes)
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(RequestBodyLimitLayer::new(
            settings.pagination.max_request_body_size,
        ))
        .layer(cors_layer(&settings.server.cors_origins))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// Milliseconds between quota refills for an allowance of `per_second` requests
fn refill_interval_ms(per_second: u64) -> u64 {
    (1000 / per_second.max(1)).max(1)
}

/// CORS restricted to the configured front-end origins
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(tower_http::cors::Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CourseRecord, TermKey};
    use crate::indexer::IndexOptions;
    use crate::service::CatalogService;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    // Helper to create test app state; the TempDir must outlive the router
    fn create_test_state() -> (AppState, TempDir) {
        let temp_dir = tempfile::tempdir().unwrap();

        let courses: Vec<CourseRecord> = serde_json::from_value(json!([
            {
                "code": "COP3502C",
                "codeWithSpace": "COP 3502C",
                "name": "Programming Fundamentals 1",
                "prerequisites": "",
                "sections": [{"deptName": "CISE", "instructors": [{"name": "Ada Lovelace"}]}]
            },
            {
                "code": "COP3503C",
                "codeWithSpace": "COP 3503C",
                "name": "Programming Fundamentals 2",
                "prerequisites": "Prereq: COP 3502C with a minimum grade of C.",
                "sections": [{"deptName": "CISE", "instructors": [{"name": "Alan Turing"}]}]
            }
        ]))
        .unwrap();

        let catalog = CatalogService::from_terms(
            temp_dir.path(),
            vec![(TermKey::new("25", "fall"), courses)],
            &IndexOptions::default(),
        )
        .unwrap();

        let state = AppState {
            catalog: Arc::new(catalog),
            settings: crate::config::test_settings(),
        };

        (state, temp_dir)
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_get_courses() {
        let (state, _dir) = create_test_state();
        let app = create_router(state.clone(), &state.settings);

        let (status, body) = post_json(
            app,
            "/api/get_courses",
            json!({"searchTerm": "COP3503C", "itemsPerPage": 10, "startFrom": 0, "year": "25", "term": "fall"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["code"], "COP3503C");
        assert_eq!(body[0]["sections"][0]["instructors"][0]["name"], "Alan Turing");
    }

    #[tokio::test]
    async fn test_get_courses_empty_search_term() {
        let (state, _dir) = create_test_state();
        let app = create_router(state.clone(), &state.settings);

        let (status, body) = post_json(
            app,
            "/api/get_courses",
            json!({"searchTerm": "", "year": "25", "term": "fall"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_get_courses_requires_term() {
        let (state, _dir) = create_test_state();
        let app = create_router(state.clone(), &state.settings);

        let (status, body) =
            post_json(app, "/api/get_courses", json!({"searchTerm": "cop", "year": "25"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("year"));
    }

    #[tokio::test]
    async fn test_get_courses_unknown_term() {
        let (state, _dir) = create_test_state();
        let app = create_router(state.clone(), &state.settings);

        let (status, _) = post_json(
            app,
            "/api/get_courses",
            json!({"searchTerm": "cop", "year": "19", "term": "fall"}),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_generate_graph() {
        let (state, _dir) = create_test_state();
        let app = create_router(state.clone(), &state.settings);

        let (status, body) = post_json(
            app,
            "/generate_a_list",
            json!({
                "selectedMajorServ": "CISE",
                "selectedCoursesServ": ["COP3502C", "MAC2311"],
                "year": "25",
                "term": "fall"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["edges"],
            json!([{"data": {"source": "COP\n3502", "target": "COP\n3503"}}])
        );
        assert_eq!(
            body["nodes"],
            json!([
                {"data": {"id": "COP\n3502"}, "classes": "selected"},
                {"data": {"id": "COP\n3503"}, "classes": "not_selected"},
                {"data": {"id": "MAC\n2311"}, "classes": "selected"}
            ])
        );
    }

    #[tokio::test]
    async fn test_generate_graph_unknown_term() {
        let (state, _dir) = create_test_state();
        let app = create_router(state.clone(), &state.settings);

        let (status, body) = post_json(
            app,
            "/generate_a_list",
            json!({"selectedMajorServ": "CISE", "selectedCoursesServ": []}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"nodes": [], "edges": []}));
    }

    #[test]
    fn test_refill_interval_from_allowance() {
        assert_eq!(refill_interval_ms(100), 10);
        assert_eq!(refill_interval_ms(1), 1000);
        assert_eq!(refill_interval_ms(3), 333);
        assert_eq!(refill_interval_ms(5000), 1);
        assert_eq!(refill_interval_ms(0), 1000);
    }

    #[tokio::test]
    async fn test_health_routes_exist() {
        let (state, _dir) = create_test_state();
        let app = create_router(state.clone(), &state.settings);

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
