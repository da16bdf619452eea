//! Declarative event-binding table
//!
//! Maps `(selector, event)` pairs to named page actions. Built once at
//! startup, embedded into every page as JSON, and consumed by the page script,
//! which owns one handler per [`Action`].

use serde::Serialize;

/// DOM event kinds the page script listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Click,
    Input,
    Change,
    Submit,
    /// Window scroll
    Scroll,
    /// Document mouse move
    MouseMove,
    /// Element enters the viewport
    Intersect,
}

/// Named page behaviours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Open the detail overlay for the clicked card's story
    OpenStory,
    /// Close the detail overlay, restoring page scroll
    CloseStory,
    /// Close an overlay when its backdrop (not content) is clicked
    CloseOnBackdrop,
    OpenStoryForm,
    CloseStoryForm,
    /// Disable the button, post the form, apply the JSON outcome
    SubmitForm,
    /// Remove the error highlight once a field has a value
    ClearFieldFlag,
    /// Smooth-scroll to an in-page anchor and mark the nav link active
    ScrollToSection,
    /// Track the section in view and the navbar's scrolled style
    UpdateNavigation,
    /// Reveal an element (and stagger its cards) when it enters the viewport
    Reveal,
    /// Count a statistic up to its target once visible
    AnimateCounter,
    /// Offset background shapes with the pointer
    Parallax,
}

/// One binding row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub selector: &'static str,
    pub event: EventKind,
    pub action: Action,
}

/// The site's full binding table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BindingTable {
    bindings: Vec<Binding>,
}

const fn bind(selector: &'static str, event: EventKind, action: Action) -> Binding {
    Binding {
        selector,
        event,
        action,
    }
}

impl BindingTable {
    /// Bindings for every page of the site
    pub fn site() -> Self {
        use Action::*;
        use EventKind::*;

        Self {
            bindings: vec![
                // Gallery
                bind(".story-card", Click, OpenStory),
                bind("#close-story-view", Click, CloseStory),
                bind("#story-view-modal", Click, CloseOnBackdrop),
                bind("#open-story-form", Click, OpenStoryForm),
                bind("#story-modal .modal-close", Click, CloseStoryForm),
                bind("#cancel-story", Click, CloseStoryForm),
                bind("#story-modal", Click, CloseOnBackdrop),
                // Forms
                bind("#application-form", Submit, SubmitForm),
                bind("#story-submission-form", Submit, SubmitForm),
                bind(".ccmp-form input, .ccmp-form select, .ccmp-form textarea", Input, ClearFieldFlag),
                bind(".ccmp-form input, .ccmp-form select, .ccmp-form textarea", Change, ClearFieldFlag),
                // Shell
                bind(".nav-menu a", Click, ScrollToSection),
                bind("window", Scroll, UpdateNavigation),
                bind(".reveal", Intersect, Reveal),
                bind(".stat-number", Intersect, AnimateCounter),
                bind("document", MouseMove, Parallax),
            ],
        }
    }

    #[cfg(test)]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Action bound to `(selector, event)`, if any
    #[cfg(test)]
    pub fn lookup(&self, selector: &str, event: EventKind) -> Option<Action> {
        self.bindings
            .iter()
            .find(|b| b.selector == selector && b.event == event)
            .map(|b| b.action)
    }

    /// JSON for a `<script type="application/json">` element
    pub fn to_script_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| "[]".to_string())
            .replace("</", "<\\/")
    }
}
