use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::services::BodyError;
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use futures::TryStreamExt;
use std::sync::Arc;
use tubely_core::constants::VIDEO_FORM_FIELD;
use tubely_core::{AppError, VideoResponse};
use uuid::Uuid;

/// `POST /api/video_upload/{video_id}`
///
/// Ownership is checked before the multipart body is touched. Fields other than
/// `video` are skipped; the first `video` field is streamed into the ingest pipeline.
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video_id = Uuid::parse_str(&video_id)
        .map_err(|_| AppError::BadRequest("Invalid video ID".to_string()))?;

    tracing::info!(
        video_id = %video_id,
        user_id = %user.user_id,
        "Uploading video"
    );

    let video = state.ingest.authorize(video_id, user.user_id).await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::from(BodyError::from(e)))?
    {
        if field.name() != Some(VIDEO_FORM_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_owned);
        let updated = state
            .ingest
            .ingest(video, content_type.as_deref(), field.map_err(BodyError::from))
            .await?;

        return Ok(Json(VideoResponse::from(updated)));
    }

    Err(AppError::BadRequest(format!(
        "Couldn't find a '{}' file in the form",
        VIDEO_FORM_FIELD
    ))
    .into())
}
