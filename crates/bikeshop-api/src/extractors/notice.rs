//! One-shot notices carried in the query string after a redirect.

use serde::Deserialize;

use crate::render::Flash;

/// Query flags set by redirects that report the outcome of a form post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoticeParams {
    pub error: Option<String>,
    pub registered: Option<String>,
    pub saved: Option<String>,
    pub created: Option<String>,
    pub cancelled: Option<String>,
    pub quote_created: Option<String>,
    pub quote_approved: Option<String>,
    pub survey: Option<String>,
}

impl NoticeParams {
    /// The banner to show, errors first.
    pub fn into_flash(self) -> Option<Flash> {
        if let Some(code) = self.error.as_deref() {
            return Some(Flash::error(error_message(code)));
        }
        let successes = [
            (self.registered, "Account created. You can sign in now."),
            (self.saved, "Changes saved."),
            (self.created, "Created successfully."),
            (self.cancelled, "Booking cancelled."),
            (self.quote_created, "Quote created."),
            (self.quote_approved, "Quote approved. We will start on your bicycle."),
            (self.survey, "Thanks for your feedback!"),
        ];
        successes
            .into_iter()
            .find(|(flag, _)| flag.as_deref().is_some_and(is_set))
            .map(|(_, message)| Flash::success(message))
    }
}

fn is_set(value: &str) -> bool {
    !matches!(value, "" | "0" | "false")
}

fn error_message(code: &str) -> &'static str {
    match code {
        "invalid_transition" => "That status change is not allowed from the ticket's current state.",
        "update_failed" => "The ticket could not be updated. Please try again.",
        "invalid_quote" => "A quote needs at least one item with a description.",
        _ => "The operation could not be completed.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::FlashKind;

    #[test]
    fn test_error_takes_precedence() {
        let params = NoticeParams {
            error: Some("invalid_transition".to_string()),
            saved: Some("1".to_string()),
            ..Default::default()
        };
        let flash = params.into_flash().unwrap();
        assert_eq!(flash.kind, FlashKind::Error);
        assert!(flash.message.contains("not allowed"));
    }

    #[test]
    fn test_false_flags_ignored() {
        let params = NoticeParams {
            registered: Some("0".to_string()),
            ..Default::default()
        };
        assert!(params.into_flash().is_none());
        assert!(NoticeParams::default().into_flash().is_none());
    }

    #[test]
    fn test_success_flag() {
        let params = NoticeParams {
            quote_approved: Some("true".to_string()),
            ..Default::default()
        };
        assert_eq!(params.into_flash().unwrap().kind, FlashKind::Success);
    }
}
