//! Submit button state and the duplicate-submission guard

use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::debug;

use super::forms::FormSpec;

/// State of one form's submit button
///
/// Disabled with the "submitting" label for the whole in-flight duration,
/// which is what keeps a form instance from submitting twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitControl {
    pub label: String,
    pub disabled: bool,
    #[serde(skip)]
    original_label: String,
    #[serde(skip)]
    submitting_label: String,
}

impl SubmitControl {
    pub fn new(spec: &FormSpec) -> Self {
        Self {
            label: spec.submit_label.to_string(),
            disabled: false,
            original_label: spec.submit_label.to_string(),
            submitting_label: spec.submitting_label.to_string(),
        }
    }

    /// Enter the in-flight state; `false` if a submission is already in flight
    pub fn begin(&mut self) -> bool {
        if self.disabled {
            return false;
        }
        self.disabled = true;
        self.label = self.submitting_label.clone();
        true
    }

    /// Re-enable the button with its original label
    pub fn restore(&mut self) {
        self.disabled = false;
        self.label = self.original_label.clone();
    }
}

/// Form instances with a submission currently in flight, keyed by form token
///
/// Two different forms may submit concurrently; the same form instance may not.
#[derive(Debug, Clone, Default)]
pub struct InFlightForms {
    tokens: Arc<Mutex<HashSet<String>>>,
}

impl InFlightForms {
    /// Claim `token`; `None` when that form instance is already submitting
    pub fn try_begin(&self, token: &str) -> Option<InFlightGuard> {
        let mut tokens = self.tokens.lock().unwrap_or_else(|e| e.into_inner());
        if !tokens.insert(token.to_string()) {
            debug!(form_token = %token, "Rejected duplicate in-flight submission");
            return None;
        }
        Some(InFlightGuard {
            tokens: Arc::clone(&self.tokens),
            token: token.to_string(),
        })
    }
}

/// Releases its form token when dropped
#[derive(Debug)]
pub struct InFlightGuard {
    tokens: Arc<Mutex<HashSet<String>>>,
    token: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.tokens
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.token);
    }
}
