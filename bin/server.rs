// Land Plots - Web Server
// REST API with Axum over the plot catalog

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use land_plots::{
    convert, evaluate, price_bounds, suggest_locations, Catalog, Currency, FilterSpec,
    ProjectType, RawParams,
};

/// Shared application state. The catalog is read-only for the life of
/// the process, so a plain Arc is enough - no locking.
#[derive(Clone)]
struct AppState {
    catalog: Arc<Catalog>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn err(message: &str) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message.to_string()),
        }
    }
}

/// Stats response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    total_plots: usize,
    currency: Currency,
    min_price: Option<f64>,
    max_price: Option<f64>,
    total_area: f64,
    by_project_type: Vec<ProjectTypeStat>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectTypeStat {
    project_type: String,
    count: usize,
    total_value: f64,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/plots - Filtered plot list
/// Recognized query parameters: minPrice, maxPrice, location, currency
async fn list_plots(State(state): State<AppState>, RawQuery(query): RawQuery) -> impl IntoResponse {
    let spec = FilterSpec::from_query_string(query.as_deref().unwrap_or(""));
    let results = evaluate(&state.catalog, &spec);

    (StatusCode::OK, Json(ApiResponse::ok(results))).into_response()
}

/// GET /api/plots/:id - Single plot lookup
async fn get_plot(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.catalog.find_by_id(&id) {
        Some(plot) => (StatusCode::OK, Json(ApiResponse::ok(plot.clone()))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err(&format!("No plot with id {:?}", id))),
        )
            .into_response(),
    }
}

/// GET /api/locations - Location suggestions for the dropdown
/// Optional query parameter: location (partial text)
async fn list_locations(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    let params = RawParams::from_query_string(query.as_deref().unwrap_or(""));
    let partial = params.get("location").unwrap_or("");

    let locations: Vec<String> = suggest_locations(&state.catalog, partial)
        .into_iter()
        .map(String::from)
        .collect();

    (StatusCode::OK, Json(ApiResponse::ok(locations))).into_response()
}

/// GET /api/stats - Catalog statistics in the requested display currency
async fn get_stats(State(state): State<AppState>, RawQuery(query): RawQuery) -> impl IntoResponse {
    let params = RawParams::from_query_string(query.as_deref().unwrap_or(""));
    let currency = Currency::from_param(params.get("currency"));

    let bounds = price_bounds(&state.catalog, currency);
    let total_area: f64 = state.catalog.all().iter().map(|p| p.size).sum();

    let by_project_type: Vec<ProjectTypeStat> = ProjectType::all()
        .iter()
        .map(|project_type| {
            let mut count = 0;
            let mut total_value = 0.0;
            for plot in state.catalog.all() {
                if plot.project_type == *project_type {
                    count += 1;
                    total_value += convert(plot.price, currency);
                }
            }
            ProjectTypeStat {
                project_type: project_type.name().to_string(),
                count,
                total_value,
            }
        })
        .filter(|stat| stat.count > 0)
        .collect();

    let stats = StatsResponse {
        total_plots: state.catalog.len(),
        currency,
        min_price: bounds.map(|(low, _)| low),
        max_price: bounds.map(|(_, high)| high),
        total_area,
        by_project_type,
    };

    (StatusCode::OK, Json(ApiResponse::ok(stats))).into_response()
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 Land Plots - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Optional CSV catalog path; the sample catalog otherwise
    let args: Vec<String> = std::env::args().collect();
    let catalog = match args.get(1) {
        Some(path) => match Catalog::from_csv_path(path) {
            Ok(catalog) => {
                println!("✓ Catalog loaded from {}", path);
                catalog
            }
            Err(e) => {
                eprintln!("❌ Failed to load catalog: {:#}", e);
                std::process::exit(1);
            }
        },
        None => Catalog::seed(),
    };

    println!("✓ {} plots in catalog", catalog.len());

    // Create shared state
    let state = AppState {
        catalog: Arc::new(catalog),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/plots", get(list_plots))
        .route("/plots/:id", get(get_plot))
        .route("/locations", get(list_locations))
        .route("/stats", get(get_stats))
        .with_state(state.clone());

    // Build main router
    let app = Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new("web"))
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   API: http://localhost:3000/api/plots");
    println!("   UI:  http://localhost:3000");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
