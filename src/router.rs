use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::auth::require_auth;
use crate::middleware::role::{require_admin, require_super_admin};
use crate::modules::admissions::{
    init_admissions_admin_router, init_admissions_public_router, init_admissions_router,
};
use crate::modules::auth::{
    init_auth_router, init_auth_session_router, init_auth_super_admin_router,
};
use crate::modules::contacts::{
    init_contacts_admin_router, init_contacts_public_router, init_contacts_router,
};
use crate::modules::content::{init_content_admin_router, init_content_public_router};
use crate::modules::fees::{init_fees_admin_router, init_fees_router};
use crate::modules::gallery::{init_gallery_admin_router, init_gallery_public_router};
use crate::modules::health::init_health_router;
use crate::modules::notices::{
    init_notices_admin_router, init_notices_public_router, init_notices_router,
};
use crate::modules::notifications::init_notifications_router;
use crate::modules::students::{init_students_admin_router, init_students_router};
use crate::modules::teachers::{init_teachers_admin_router, init_teachers_public_router};
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use scholaris_config::StorageBackend;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

fn authenticated(state: &AppState, router: Router<AppState>) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

fn admin_only(state: &AppState, router: Router<AppState>) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
}

pub fn init_router(state: AppState) -> Router {
    // Public, authenticated and admin-only routers of a module share one
    // prefix; each route layer only wraps the routes of its own router.
    let api = Router::new()
        .nest("/health", init_health_router())
        .nest(
            "/auth",
            init_auth_router()
                .merge(authenticated(&state, init_auth_session_router()))
                .merge(init_auth_super_admin_router().route_layer(
                    middleware::from_fn_with_state(state.clone(), require_super_admin),
                )),
        )
        .nest(
            "/students",
            authenticated(&state, init_students_router())
                .merge(admin_only(&state, init_students_admin_router())),
        )
        .nest(
            "/teachers",
            init_teachers_public_router().merge(admin_only(&state, init_teachers_admin_router())),
        )
        .nest(
            "/admissions",
            init_admissions_public_router()
                .merge(authenticated(&state, init_admissions_router()))
                .merge(admin_only(&state, init_admissions_admin_router())),
        )
        .nest(
            "/fees",
            authenticated(&state, init_fees_router())
                .merge(admin_only(&state, init_fees_admin_router())),
        )
        .nest(
            "/notices",
            init_notices_public_router()
                .merge(authenticated(&state, init_notices_router()))
                .merge(admin_only(&state, init_notices_admin_router())),
        )
        .nest(
            "/gallery",
            init_gallery_public_router().merge(admin_only(&state, init_gallery_admin_router())),
        )
        .nest(
            "/contacts",
            init_contacts_public_router()
                .merge(authenticated(&state, init_contacts_router()))
                .merge(admin_only(&state, init_contacts_admin_router())),
        )
        .nest(
            "/content",
            init_content_public_router().merge(admin_only(&state, init_content_admin_router())),
        )
        .nest(
            "/notifications",
            authenticated(&state, init_notifications_router()),
        );

    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", api);

    if state.storage_config.backend == StorageBackend::Local {
        router = router.nest_service(
            "/uploads",
            ServeDir::new(&state.storage_config.upload_dir),
        );
    }

    router
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
