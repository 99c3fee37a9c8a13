mod models;
mod services;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
};
use models::{GenerateRequest, GenerateResponse};
use services::{generator, llm::Completion, llm::LlmClient, outline};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, fmt};

struct AppState<C> {
    llm_client: Arc<C>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        AppState {
            llm_client: Arc::clone(&self.llm_client),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    // Create the LLM client
    let llm_client = Arc::new(LlmClient::new()?);

    // Run our application
    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app(llm_client)).await?;

    Ok(())
}

// Build our application with a route
fn app<C>(llm_client: Arc<C>) -> Router
where
    C: Completion + 'static,
{
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate::<C>))
        .route("/health", get(health_check))
        .with_state(AppState { llm_client })
        .layer(TraceLayer::new_for_http())
        // Add CORS layer
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::AllowMethods::any())
                .allow_headers(tower_http::cors::AllowHeaders::any()),
        )
}

async fn index() -> Html<String> {
    let html_content = r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>Slide Generation Service</title>
        <meta charset="utf-8">
        <style>
            body { font-family: Arial, sans-serif; margin: 40px; }
            .info-box { background-color: #f0f8ff; padding: 20px; border-radius: 8px; margin: 20px 0; }
            .endpoint { background-color: #f5f5f5; padding: 10px; margin: 10px 0; border-radius: 4px; font-family: monospace; }
        </style>
    </head>
    <body>
        <h1>Slide Generation Service</h1>

        <div class="info-box">
            <h2>Service Information</h2>
            <p>This service turns a free-text presentation outline into structured slide content.</p>
            <p>Each requested slide is generated independently; slides that fail come back with placeholder content and an error marker instead of breaking the batch.</p>
        </div>

        <h2>Available Endpoints:</h2>
        <div class="endpoint">GET / - This information page</div>
        <div class="endpoint">GET /health - Health check</div>
        <div class="endpoint">POST /generate - Generate content for selected slides</div>

        <h2>How to Use:</h2>
        <p>POST a JSON body to /generate: {"outline": "...", "selectedSlides": [1, 2, {"number": 3}], "pitchContext": {...}}</p>
    </body>
    </html>
    "#.to_string();

    Html(html_content)
}

async fn health_check() -> &'static str {
    "OK"
}

type ApiError = (StatusCode, Json<serde_json::Value>);

async fn generate<C>(
    State(state): State<AppState<C>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError>
where
    C: Completion + 'static,
{
    // Request-shape checks happen before any generation work starts.
    if request.outline.trim().is_empty() {
        return Err(bad_request("outline must not be empty"));
    }
    if request.selected_slides.is_empty() {
        return Err(bad_request("selectedSlides must not be empty"));
    }

    let descriptors = outline::parse_outline(&request.outline, request.selected_slides.len());
    tracing::info!(
        parsed = descriptors.len(),
        requested = request.selected_slides.len(),
        "parsed outline"
    );

    let selection = outline::select_slides(&descriptors, &request.selected_slides)
        .map_err(|e| bad_request(&e.to_string()))?;

    let generated = generator::generate_slides(
        Arc::clone(&state.llm_client),
        selection.slides,
        &request.outline,
        selection.total,
        request.pitch_context.as_ref(),
    )
    .await;

    let message = format!("Generated {} slides", generated.len());
    Ok(Json(GenerateResponse {
        generated_slides: generated,
        message,
    }))
}

fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
}
