use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::debug;

use crate::{
    api::models::*, catalog::CourseRecord, catalog::TermKey, config::Settings,
    service::{CatalogService, TermSummary},
    Error, Result,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub settings: Settings,
}

/// POST /api/get_courses - Search a term's courses
pub async fn get_courses(
    State(state): State<AppState>,
    Json(request): Json<CourseSearchRequest>,
) -> Result<Json<Vec<CourseRecord>>> {
    debug!("Course search request: {:?}", request);

    let (Some(year), Some(term)) = (request.year, request.term) else {
        return Err(Error::Validation(
            "Missing 'year' or 'term' in request body".to_string(),
        ));
    };

    let page_size = request
        .items_per_page
        .unwrap_or(state.settings.pagination.default_page_size)
        .min(state.settings.pagination.max_page_size);

    let courses = state.catalog.search(
        &TermKey::new(year, term),
        &request.search_term,
        page_size,
        request.start_from,
    )?;

    Ok(Json(courses))
}

/// POST /generate_a_list - Prerequisite graph for a department
pub async fn generate_graph(
    State(state): State<AppState>,
    Json(request): Json<GraphRequest>,
) -> Json<GraphResponse> {
    debug!(
        "Graph request: department={:?}, {} completed course(s)",
        request.department,
        request.completed.len()
    );

    // A missing term is just another unknown term: the graph comes back empty
    let term = TermKey::new(
        request.year.unwrap_or_default(),
        request.term.unwrap_or_default(),
    );
    let graph = state
        .catalog
        .render_graph(&term, &request.department, &request.completed);

    Json(graph.into())
}

/// GET /api/terms - Terms and their departments
pub async fn list_terms(State(state): State<AppState>) -> Json<Vec<TermSummary>> {
    Json(state.catalog.terms())
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /ready - Readiness check endpoint
pub async fn readiness_check(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let terms = state.catalog.term_count();

    Json(ReadinessResponse {
        ready: terms > 0,
        terms,
    })
}
