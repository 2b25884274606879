//! # Notification Rendering
//!
//! The pure half of the notification pipeline: a status change becomes a
//! French `{title, message}` pair, or nothing at all. No I/O, no store,
//! no clock.
//!
//! The teachers this system serves work in French schools; the rendered
//! text is French by construction, not by locale lookup. A translation
//! layer would slot in here if one were ever needed.

use hse_state::SessionStatus;
use serde::{Deserialize, Serialize};

/// The rendered text of one notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    /// Short headline, shown in lists.
    pub title: String,
    /// Full body, including the reviewer's comment when one was given.
    pub message: String,
}

/// Render the notification for a status change, if that status notifies.
///
/// Covers the statuses a teacher is told about: document requests,
/// refusals, and every step of the approval-to-payment pipeline. A
/// status outside that set (only `PENDING_REVIEW`, which is never a
/// transition target anyway) produces no notification.
pub fn render(new_status: SessionStatus, comment: Option<&str>) -> Option<NotificationContent> {
    let (title, body) = match new_status {
        SessionStatus::PendingDocuments => (
            "Documents requis",
            "Des documents complémentaires sont demandés pour votre séance.",
        ),
        SessionStatus::Rejected => ("Séance refusée", "Votre séance a été refusée."),
        SessionStatus::PendingValidation => (
            "Séance transmise pour validation",
            "Votre séance a été vérifiée et transmise au chef d'établissement.",
        ),
        SessionStatus::Validated => (
            "Séance validée",
            "Votre séance a été validée par le chef d'établissement.",
        ),
        SessionStatus::ReadyForPayment => (
            "Séance en cours de paiement",
            "Votre séance a été transmise pour mise en paiement.",
        ),
        SessionStatus::Paid => ("Séance payée", "Votre séance a été mise en paiement."),
        SessionStatus::PendingReview => return None,
    };

    let message = match comment {
        Some(comment) if !comment.trim().is_empty() => format!("{body} Commentaire : {comment}"),
        _ => body.to_string(),
    };

    Some(NotificationContent {
        title: title.to_string(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_notifying_status_has_text() {
        for status in [
            SessionStatus::PendingDocuments,
            SessionStatus::Rejected,
            SessionStatus::PendingValidation,
            SessionStatus::Validated,
            SessionStatus::ReadyForPayment,
            SessionStatus::Paid,
        ] {
            let content = render(status, None)
                .unwrap_or_else(|| panic!("no rendering for {status}"));
            assert!(!content.title.is_empty());
            assert!(!content.message.is_empty());
        }
    }

    #[test]
    fn test_pending_review_is_silent() {
        assert_eq!(render(SessionStatus::PendingReview, None), None);
    }

    #[test]
    fn test_comment_appended_to_message() {
        let content = render(
            SessionStatus::PendingDocuments,
            Some("merci de joindre l'ordre de mission"),
        )
        .unwrap();
        assert_eq!(content.title, "Documents requis");
        assert!(content
            .message
            .ends_with("Commentaire : merci de joindre l'ordre de mission"));
    }

    #[test]
    fn test_blank_comment_ignored() {
        let with_blank = render(SessionStatus::Validated, Some("   ")).unwrap();
        let without = render(SessionStatus::Validated, None).unwrap();
        assert_eq!(with_blank, without);
    }

    #[test]
    fn test_rejection_text() {
        let content = render(SessionStatus::Rejected, Some("hors périmètre")).unwrap();
        assert_eq!(content.title, "Séance refusée");
        assert_eq!(
            content.message,
            "Votre séance a été refusée. Commentaire : hors périmètre"
        );
    }
}
