//! # Attachment Metadata
//!
//! File metadata attached to a session: a convocation scan, a signed
//! replacement order, a roster sheet. The bytes themselves live in
//! external file storage; this record carries what the review workflow
//! needs — who uploaded what, and the secretariat's verification and
//! archival flags.

use hse_core::{AttachmentId, SessionId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Metadata for one file attached to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Unique identifier.
    pub id: AttachmentId,
    /// The session this file supports.
    pub session_id: SessionId,
    /// Original file name as uploaded.
    pub file_name: String,
    /// MIME type reported at upload.
    pub content_type: String,
    /// Size of the stored file.
    pub size_bytes: u64,
    /// Uploading user.
    pub uploaded_by: UserId,
    /// Upload instant.
    pub uploaded_at: Timestamp,
    /// Checked by the secretariat against the declaration.
    pub verified: bool,
    /// Moved to long-term archive after payment.
    pub archived: bool,
}

impl Attachment {
    /// Register a freshly uploaded file. Flags start cleared.
    pub fn new(
        session_id: SessionId,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        size_bytes: u64,
        uploaded_by: UserId,
    ) -> Self {
        Self {
            id: AttachmentId::new(),
            session_id,
            file_name: file_name.into(),
            content_type: content_type.into(),
            size_bytes,
            uploaded_by,
            uploaded_at: Timestamp::now(),
            verified: false,
            archived: false,
        }
    }
}
