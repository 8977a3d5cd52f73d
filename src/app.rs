use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers::{
    add_favorite_handler, delete_favorite_handler, get_preferences_handler, health_handler,
    list_favorites_handler, update_preferences_handler,
};
use crate::routes;
use crate::state::AppState;

/// Any origin, method and header may call the API
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Assemble every route, the OpenAPI UI, and the shared middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(routes::HEALTH, get(health_handler))
        .route(
            routes::PREFERENCES,
            get(get_preferences_handler).post(update_preferences_handler),
        )
        .route(
            routes::FAVORITES,
            get(list_favorites_handler).post(add_favorite_handler),
        )
        .route(routes::FAVORITE_ITEM, delete(delete_favorite_handler))
        .merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
