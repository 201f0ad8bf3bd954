// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile edits and avatar uploads.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use nexa_core::{NexaError, User};

/// Largest accepted avatar upload.
pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

const AVATAR_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// A picked avatar image, not yet validated.
#[derive(Debug, Clone, Copy)]
pub struct AvatarUpload<'a> {
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

/// MIME type implied by a file extension. Unknown extensions map to
/// `application/octet-stream`, which the upload check refuses.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Accept only JPEG or PNG uploads of at most [`MAX_AVATAR_BYTES`].
pub fn validate_avatar_upload(content_type: &str, size: usize) -> Result<(), NexaError> {
    let content_type = content_type.trim().to_ascii_lowercase();
    if !AVATAR_TYPES.contains(&content_type.as_str()) {
        return Err(NexaError::Validation(format!(
            "unsupported avatar type `{content_type}`, use JPEG or PNG"
        )));
    }
    if size > MAX_AVATAR_BYTES {
        return Err(NexaError::Validation(format!(
            "avatar is {size} bytes, the limit is {MAX_AVATAR_BYTES}"
        )));
    }
    Ok(())
}

/// Validate an upload and inline it as a `data:` URL.
pub fn avatar_data_url(content_type: &str, bytes: &[u8]) -> Result<String, NexaError> {
    validate_avatar_upload(content_type, bytes.len())?;
    Ok(format!(
        "data:{};base64,{}",
        content_type.trim().to_ascii_lowercase(),
        STANDARD.encode(bytes)
    ))
}

/// `user` with a new display name and, optionally, a new avatar.
pub fn apply_profile(user: &User, name: &str, avatar: Option<String>) -> Result<User, NexaError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(NexaError::Validation("name is empty".to_string()));
    }
    Ok(User {
        name: name.to_string(),
        avatar: avatar.unwrap_or_else(|| user.avatar.clone()),
        ..user.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexa_core::Role;

    #[test]
    fn only_small_jpeg_or_png() {
        assert!(validate_avatar_upload("image/png", 10).is_ok());
        assert!(validate_avatar_upload("IMAGE/JPEG", MAX_AVATAR_BYTES).is_ok());
        assert!(validate_avatar_upload("image/gif", 10).is_err());
        assert!(validate_avatar_upload("image/png", MAX_AVATAR_BYTES + 1).is_err());
    }

    #[test]
    fn data_url_embeds_base64() {
        let url = avatar_data_url("image/png", b"abc").unwrap();
        assert_eq!(url, "data:image/png;base64,YWJj");
        assert!(avatar_data_url("text/plain", b"abc").is_err());
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for(Path::new("me.PNG")), "image/png");
        assert_eq!(content_type_for(Path::new("/tmp/me.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("me.gif")), "image/gif");
        assert_eq!(content_type_for(Path::new("me")), "application/octet-stream");
    }

    #[test]
    fn profile_update_keeps_identity() {
        let user = User {
            id: "u1".into(),
            name: "ALICE".into(),
            avatar: "old".into(),
            role: Role::User,
            email: "alice@nexa.id".into(),
        };
        let updated = apply_profile(&user, " Alice W ", None).unwrap();
        assert_eq!(updated.name, "Alice W");
        assert_eq!(updated.avatar, "old");
        assert_eq!(updated.id, "u1");

        let updated = apply_profile(&user, "A", Some("new".into())).unwrap();
        assert_eq!(updated.avatar, "new");
        assert!(apply_profile(&user, "   ", None).is_err());
    }
}
