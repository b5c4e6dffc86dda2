use tubely_core::constants::ACCEPTED_VIDEO_CONTENT_TYPE;

/// Validation errors for declared upload metadata
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing Content-Type for video upload")]
    MissingContentType,

    #[error("Invalid content type: {content_type} (allowed: {allowed})")]
    InvalidContentType {
        content_type: String,
        allowed: &'static str,
    },
}

/// Normalize a MIME type: drop parameters, trim, lowercase.
/// e.g. "video/MP4; codecs=avc1" -> "video/mp4"
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase()
}

/// Check that a declared content type is `video/mp4`.
pub fn validate_video_content_type(content_type: Option<&str>) -> Result<(), ValidationError> {
    let declared = content_type
        .map(normalize_mime_type)
        .filter(|ct| !ct.is_empty())
        .ok_or(ValidationError::MissingContentType)?;

    if declared != ACCEPTED_VIDEO_CONTENT_TYPE {
        return Err(ValidationError::InvalidContentType {
            content_type: declared,
            allowed: ACCEPTED_VIDEO_CONTENT_TYPE,
        });
    }

    Ok(())
}
