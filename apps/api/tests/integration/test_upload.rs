use super::helpers::{
    CDN, MemoryStorage, assert_status, count_files, read_bytes, read_json, send,
    session_cookie, spawn_app_with, spawn_local_app, upload_request,
};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::sync::Arc;

const KIB: usize = 1024;
const MIB: usize = 1024 * 1024;

#[tokio::test]
async fn unauthenticated_upload_is_rejected_before_any_write() {
    let app = spawn_local_app();
    let req = upload_request(None, "photo.jpg", "image/jpeg", &[0xFF, 0xD8, 0xFF, 0xE0]);

    let res = send(&app.app, req).await;
    assert_status(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = read_json(res).await;
    assert_eq!(body, json!({ "error": "please log in first" }));
    assert_eq!(count_files(&app.uploads_dir), 0);
}

#[tokio::test]
async fn unrelated_cookie_does_not_authenticate() {
    let app = spawn_local_app();
    let req = upload_request(Some("theme=dark"), "photo.jpg", "image/jpeg", &[1, 2, 3]);

    let res = send(&app.app, req).await;
    assert_status(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn oversized_png_is_rejected_without_provider_call() {
    let storage = Arc::new(MemoryStorage::default());
    let app = spawn_app_with(storage.clone());
    let cookie = session_cookie();
    let req = upload_request(Some(cookie.as_str()), "big.png", "image/png", &vec![0u8; 6 * MIB]);

    let res = send(&app, req).await;
    assert_status(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "image exceeds 5MB");
    assert_eq!(storage.upload_calls(), 0);
}

#[tokio::test]
async fn disallowed_type_is_rejected_without_provider_call() {
    let storage = Arc::new(MemoryStorage::default());
    let app = spawn_app_with(storage.clone());
    let cookie = session_cookie();

    for (name, ct) in [
        ("doc.pdf", "application/pdf"),
        ("vector.svg", "image/svg+xml"),
        ("page.html", "text/html"),
    ] {
        let res = send(&app, upload_request(Some(cookie.as_str()), name, ct, b"data")).await;
        assert_status(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = read_json(res).await;
        assert!(
            body["error"].as_str().unwrap().contains("jpg, jpeg, png, webp, gif"),
            "error should list allowed formats, got {body}"
        );
    }
    assert_eq!(storage.upload_calls(), 0);
}

#[tokio::test]
async fn request_without_file_field_is_a_bad_request() {
    let storage = Arc::new(MemoryStorage::default());
    let app = spawn_app_with(storage.clone());
    let boundary = "----upload-boundary-no-file";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"caption\"\r\n\r\nhello\r\n--{b}--\r\n",
        b = boundary
    );
    let req = Request::builder()
        .method("POST")
        .uri("/api/upload-image")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .header(header::COOKIE, session_cookie())
        .body(Body::from(body))
        .unwrap();

    let res = send(&app, req).await;
    assert_status(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_json(res).await;
    assert_eq!(body, json!({ "error": "file not found" }));
    assert_eq!(storage.upload_calls(), 0);
}

#[tokio::test]
async fn non_multipart_body_is_a_missing_file() {
    let app = spawn_local_app();
    let req = Request::builder()
        .method("POST")
        .uri("/api/upload-image")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, session_cookie())
        .body(Body::from("{}"))
        .unwrap();

    let res = send(&app.app, req).await;
    assert_status(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "file not found");
}

#[tokio::test]
async fn webp_upload_to_local_backend_is_written_and_served() {
    let app = spawn_local_app();
    let cookie = session_cookie();
    let data = vec![7u8; 100 * KIB];

    let res = send(
        &app.app,
        upload_request(Some(cookie.as_str()), "sunset.webp", "image/webp", &data),
    )
    .await;
    assert_status(res.status(), StatusCode::OK);
    let body: Value = read_json(res).await;

    assert_eq!(body["size"], 102400);
    let filename = body["filename"].as_str().unwrap();
    assert!(filename.ends_with(".webp"));
    assert_eq!(body["url"], format!("/uploads/{filename}"));
    assert!(body["uploadedAt"].as_str().is_some());

    let on_disk = std::fs::read(app.uploads_dir.join(filename)).unwrap();
    assert_eq!(on_disk.len(), 102400);

    let served = send(
        &app.app,
        Request::builder()
            .uri(format!("/uploads/{filename}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_status(served.status(), StatusCode::OK);
    assert_eq!(served.headers()[header::CONTENT_TYPE], "image/webp");
    assert!(served.headers().get(header::CONTENT_DISPOSITION).is_none());
    assert_eq!(served.headers()[header::CONTENT_SECURITY_POLICY], "sandbox");
    assert_eq!(read_bytes(served).await.len(), 102400);
}

#[tokio::test]
async fn html_disguised_as_image_is_served_as_download() {
    let app = spawn_local_app();
    let cookie = session_cookie();
    let page = b"<script>fetch('/api/upload-image')</script>";

    let res = send(
        &app.app,
        upload_request(Some(cookie.as_str()), "evil.html", "image/png", page),
    )
    .await;
    assert_status(res.status(), StatusCode::OK);
    let body: Value = read_json(res).await;
    let url = body["url"].as_str().unwrap();
    assert!(url.ends_with(".html"));

    let served = send(
        &app.app,
        Request::builder().uri(url).body(Body::empty()).unwrap(),
    )
    .await;
    assert_status(served.status(), StatusCode::OK);
    assert_eq!(served.headers()[header::CONTENT_DISPOSITION], "attachment");
    assert_eq!(served.headers()[header::CONTENT_SECURITY_POLICY], "sandbox");
    assert_eq!(served.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
}

#[tokio::test]
async fn truncated_multipart_body_is_a_missing_file() {
    let storage = Arc::new(MemoryStorage::default());
    let app = spawn_app_with(storage.clone());
    let body = "--cut\r\n\
                Content-Disposition: form-data; name=\"file\"; filename=\"a.png\"\r\n\
                Content-Type: image/png\r\n\r\n\
                \x00\x01\x02";
    let req = Request::builder()
        .method("POST")
        .uri("/api/upload-image")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=cut")
        .header(header::COOKIE, session_cookie())
        .body(Body::from(body))
        .unwrap();

    let res = send(&app, req).await;
    assert_status(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_json(res).await;
    assert_eq!(body, json!({ "error": "file not found" }));
    assert_eq!(storage.upload_calls(), 0);
}

#[tokio::test]
async fn webp_upload_to_remote_backend_returns_absolute_url() {
    let storage = Arc::new(MemoryStorage::default());
    let app = spawn_app_with(storage.clone());
    let cookie = session_cookie();

    let res = send(
        &app,
        upload_request(Some(cookie.as_str()), "sunset.webp", "image/webp", &vec![1u8; 100 * KIB]),
    )
    .await;
    assert_status(res.status(), StatusCode::OK);
    let body: Value = read_json(res).await;

    assert_eq!(body["size"], 102400);
    let filename = body["filename"].as_str().unwrap();
    assert!(filename.starts_with("images/"));
    assert_eq!(body["url"], format!("{CDN}/{filename}"));
    assert!(storage.contains(filename));
    assert_eq!(storage.content_type_of(filename).as_deref(), Some("image/webp"));
    assert_eq!(storage.upload_calls(), 1);
}

#[tokio::test]
async fn name_without_extension_is_stored_as_jpg() {
    let app = spawn_local_app();
    let res = send(
        &app.app,
        upload_request(Some(session_cookie().as_str()), "camera-roll", "image/jpeg", b"jpeg"),
    )
    .await;
    assert_status(res.status(), StatusCode::OK);
    let body: Value = read_json(res).await;
    assert!(body["filename"].as_str().unwrap().ends_with(".jpg"));
}

#[tokio::test]
async fn backend_failure_surfaces_generic_error() {
    let storage = Arc::new(MemoryStorage::failing());
    let app = spawn_app_with(storage.clone());

    let res = send(
        &app,
        upload_request(Some(session_cookie().as_str()), "a.gif", "image/gif", b"GIF89a"),
    )
    .await;
    assert_status(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = read_json(res).await;
    assert_eq!(body, json!({ "error": "upload failed, please retry" }));
    assert_eq!(storage.upload_calls(), 1);
}

#[tokio::test]
async fn health_reports_bound_backend() {
    let app = spawn_local_app();
    let res = send(
        &app.app,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_status(res.status(), StatusCode::OK);
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "local");
}
