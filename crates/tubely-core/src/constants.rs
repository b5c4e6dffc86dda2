//! Application-wide constants.

/// The only media type accepted for video uploads.
pub const ACCEPTED_VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Canonical file extension for [`ACCEPTED_VIDEO_CONTENT_TYPE`].
pub const ACCEPTED_VIDEO_EXTENSION: &str = "mp4";

/// Multipart field carrying the video bytes.
pub const VIDEO_FORM_FIELD: &str = "video";

/// Suffix appended to a staged upload path to name its remuxed counterpart.
pub const PROCESSED_SUFFIX: &str = ".processed";

/// Prefix for staged upload temp files.
pub const STAGED_UPLOAD_PREFIX: &str = "tubely-upload-";

/// Issuer claim expected on access tokens.
pub const JWT_ISSUER: &str = "tubely-access";
