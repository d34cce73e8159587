//! Contact form submission without a page reload.

use std::cell::Cell;

use serde::Deserialize;

use crate::http::{HttpClient, HttpRequest, HttpResponse};

pub const SENDING_MESSAGE: &str = "Sending message...";
pub const SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Oops! There was a problem sending your message.";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Pending,
    Success,
    Error,
}

/// Text and styling of the status element under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormStatus {
    pub message: String,
    pub tone: StatusTone,
}

impl FormStatus {
    fn new(message: impl Into<String>, tone: StatusTone) -> Self {
        Self {
            message: message.into(),
            tone,
        }
    }

    pub fn sending() -> Self {
        Self::new(SENDING_MESSAGE, StatusTone::Pending)
    }

    /// Class attribute for the status element.
    pub fn css_class(&self) -> &'static str {
        match self.tone {
            StatusTone::Pending => "form-status",
            StatusTone::Success => "form-status success",
            StatusTone::Error => "form-status error",
        }
    }
}

/// How one submission attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    /// The endpoint answered with a non-2xx status.
    Rejected { status: u16, message: String },
    /// No response: network failure or timeout.
    Failed,
    /// Another submission was still in flight; nothing was sent.
    Busy,
}

impl SubmitOutcome {
    pub fn status(&self) -> Option<FormStatus> {
        match self {
            SubmitOutcome::Sent => Some(FormStatus::new(SUCCESS_MESSAGE, StatusTone::Success)),
            SubmitOutcome::Rejected { message, .. } => {
                Some(FormStatus::new(message.as_str(), StatusTone::Error))
            }
            SubmitOutcome::Failed => {
                Some(FormStatus::new(NETWORK_ERROR_MESSAGE, StatusTone::Error))
            }
            SubmitOutcome::Busy => None,
        }
    }
}

/// DOM side of the contact form.
pub trait FormSurface {
    fn show_status(&mut self, status: &FormStatus);
    /// Clear every field.
    fn reset_fields(&mut self);
    fn set_submit_enabled(&mut self, enabled: bool);
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    errors: Option<Vec<ErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    message: Option<String>,
}

/// Interpret the endpoint's answer.
///
/// A non-2xx body carrying `{"errors": [{"message": ...}]}` yields the
/// messages joined with `", "`, skipping entries without one; anything else
/// yields the generic failure.
pub fn interpret_response(response: &HttpResponse) -> SubmitOutcome {
    if response.is_success() {
        return SubmitOutcome::Sent;
    }
    let detail = serde_json::from_slice::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.errors)
        .map(|errors| {
            errors
                .into_iter()
                .filter_map(|e| e.message)
                .filter(|message| !message.trim().is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|messages| !messages.is_empty())
        .map(|messages| messages.join(", "));
    SubmitOutcome::Rejected {
        status: response.status,
        message: detail.unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
    }
}

/// Submits the contact form, one attempt at a time.
///
/// Takes `&self` so the browser can share it between event handlers
/// without holding a `RefCell` borrow across the request.
#[derive(Debug)]
pub struct ContactSubmitter {
    timeout_ms: u32,
    in_flight: Cell<bool>,
}

impl ContactSubmitter {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            in_flight: Cell::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    /// POST `fields` to `action` and report the outcome on `surface`.
    pub async fn submit<C, S>(
        &self,
        client: &C,
        surface: &mut S,
        action: &str,
        fields: Vec<(String, String)>,
    ) -> SubmitOutcome
    where
        C: HttpClient,
        S: FormSurface + ?Sized,
    {
        if self.in_flight.replace(true) {
            log::warn!("contact form submitted while a request is in flight, ignoring");
            return SubmitOutcome::Busy;
        }

        surface.set_submit_enabled(false);
        surface.show_status(&FormStatus::sending());

        let request = HttpRequest::post_form(action, fields)
            .header("Accept", "application/json")
            .timeout_ms(self.timeout_ms);
        let outcome = match client.send(request).await {
            Ok(response) => interpret_response(&response),
            Err(e) => {
                log::error!("contact form: {e}");
                SubmitOutcome::Failed
            }
        };

        match &outcome {
            SubmitOutcome::Sent => log::info!("contact form sent"),
            SubmitOutcome::Rejected { status, message } => {
                log::warn!("contact form rejected with HTTP {status}: {message}");
            }
            _ => {}
        }
        if let Some(status) = outcome.status() {
            surface.show_status(&status);
        }
        if outcome == SubmitOutcome::Sent {
            surface.reset_fields();
        }

        surface.set_submit_enabled(true);
        self.in_flight.set(false);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_statuses_send() {
        assert_eq!(
            interpret_response(&HttpResponse::new(200, "")),
            SubmitOutcome::Sent
        );
        assert_eq!(
            interpret_response(&HttpResponse::new(201, "{}")),
            SubmitOutcome::Sent
        );
    }

    #[test]
    fn joins_server_error_messages() {
        let body = br#"{"errors":[
            {"message":"Email is required"},
            {"message":"Message is too short","code":"x"}
        ]}"#;
        let outcome = interpret_response(&HttpResponse::new(422, body.to_vec()));
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                status: 422,
                message: "Email is required, Message is too short".into()
            }
        );
    }

    #[test]
    fn skips_error_entries_without_a_message() {
        let body = br#"{"errors":[{"message":"Email is required"},{"code":"TYPE_EMAIL"}]}"#;
        let outcome = interpret_response(&HttpResponse::new(422, body.to_vec()));
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                status: 422,
                message: "Email is required".into()
            }
        );
    }

    #[test]
    fn falls_back_to_generic_message() {
        for body in [
            "not json",
            "{}",
            r#"{"errors":[]}"#,
            r#"{"errors":[{"code":"TYPE_EMAIL"}]}"#,
            r#"{"errors":[{"message":null}]}"#,
            "",
        ] {
            let outcome = interpret_response(&HttpResponse::new(500, body));
            assert_eq!(
                outcome.status().map(|s| s.message),
                Some(GENERIC_FAILURE_MESSAGE.to_string())
            );
        }
    }

    #[test]
    fn tones_map_to_classes() {
        assert_eq!(FormStatus::sending().css_class(), "form-status");
        assert_eq!(
            SubmitOutcome::Sent.status().unwrap().css_class(),
            "form-status success"
        );
        assert_eq!(
            SubmitOutcome::Failed.status().unwrap().css_class(),
            "form-status error"
        );
        assert!(SubmitOutcome::Busy.status().is_none());
    }
}
