use bytes::Bytes;
use chrono::Utc;
use tubely_core::Video;
use uuid::Uuid;

/// A record owned by `user_id` with no video attached yet.
pub fn video_owned_by(user_id: Uuid) -> Video {
    let now = Utc::now();
    Video {
        id: Uuid::new_v4(),
        user_id,
        title: "Boots unboxing".to_string(),
        description: Some("First look".to_string()),
        thumbnail_url: None,
        video_url: None,
        created_at: now,
        updated_at: now,
    }
}

/// Stand-in upload body. The fake prober never parses it.
pub fn sample_mp4(len: usize) -> Bytes {
    let mut data = b"\x00\x00\x00\x18ftypmp42".to_vec();
    data.resize(len.max(data.len()), 0xAB);
    data.truncate(len);
    Bytes::from(data)
}
