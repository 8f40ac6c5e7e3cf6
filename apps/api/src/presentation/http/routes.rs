use super::{
    handlers::{health, upload},
    middleware::{request_id::request_id_middleware, session::require_session},
    state::AppState,
};
use crate::{
    domain::image::value_objects::ALLOWED_CONTENT_TYPES,
    infrastructure::storage::local_file_storage::UPLOADS_URL_PREFIX,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Response, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    services::{ServeDir, fs::ServeFileSystemResponseBody},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Non-image files are downloaded instead of rendered.
fn attachment_unless_image(res: &Response<ServeFileSystemResponseBody>) -> Option<HeaderValue> {
    let is_image = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ALLOWED_CONTENT_TYPES.contains(&ct));
    (!is_image).then(|| HeaderValue::from_static("attachment"))
}

pub fn create_router(state: AppState) -> Router {
    let upload_routes = Router::new()
        .route(
            "/api/upload-image",
            post(upload::upload_image).delete(upload::delete_image),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .merge(upload_routes);

    // Uploads are caller-controlled, so nothing served from here may run
    // script in this origin.
    if let Some(dir) = &state.public_uploads_dir {
        let uploads = ServiceBuilder::new()
            .layer(SetResponseHeaderLayer::overriding(
                header::CONTENT_SECURITY_POLICY,
                HeaderValue::from_static("sandbox"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::CONTENT_DISPOSITION,
                attachment_unless_image,
            ))
            .service(ServeDir::new(dir));
        router = router.nest_service(UPLOADS_URL_PREFIX, uploads);
    }

    let body_limit = state.config.max_request_body_bytes;
    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
