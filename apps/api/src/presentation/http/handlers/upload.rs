use crate::{
    application::{
        delete_image::{
            dto::{DeleteImageQuery, DeleteImageResponse},
            use_case::DeleteImageUseCase,
        },
        upload_image::{
            dto::{UploadImageRequest, UploadImageResponse},
            use_case::UploadImageUseCase,
        },
    },
    domain::image::errors::ImageError,
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    Json,
    extract::{
        Multipart, Query, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};

const FILE_FIELD: &str = "file";

/// An unreadable body yields no file, so it reports as a missing file.
fn field_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ImageError::TooLarge(0).into()
    } else {
        tracing::warn!(multipart_error = %err, "Unreadable multipart body");
        ImageError::MissingFile.into()
    }
}

/// Read the first `file` field; other fields are skipped.
async fn read_file_field(
    multipart: &mut Multipart,
) -> Result<Option<UploadImageRequest>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(field_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let original_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.map_err(field_error)?;
        return Ok(Some(UploadImageRequest {
            data,
            content_type,
            original_name,
        }));
    }
    Ok(None)
}

pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadImageResponse>, AppError> {
    // A body that is not multipart at all carries no file either.
    let mut multipart = multipart.map_err(|_| ImageError::MissingFile)?;
    let request = read_file_field(&mut multipart)
        .await?
        .ok_or(ImageError::MissingFile)?;

    let response = UploadImageUseCase::new(state.storage.clone())
        .execute(request)
        .await?;

    Ok(Json(response))
}

pub async fn delete_image(
    State(state): State<AppState>,
    Query(query): Query<DeleteImageQuery>,
) -> Result<Json<DeleteImageResponse>, AppError> {
    let response = DeleteImageUseCase::new(state.storage.clone())
        .execute(query.url.as_deref())
        .await?;

    Ok(Json(response))
}
