//! Wizard progress, busy flags and the message banner.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use listing::{FormPhase, ListingSession, Suggestion};

/// Steps of the new-listing wizard, in order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Step {
    #[default]
    Scan,
    Review,
    Edit,
    Create,
}

impl Step {
    pub const ALL: [Self; 4] = [Self::Scan, Self::Review, Self::Edit, Self::Create];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Scan => "Scan",
            Self::Review => "Review",
            Self::Edit => "Item Specifics",
            Self::Create => "Create",
        }
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Scan => Some(Self::Review),
            Self::Review => Some(Self::Edit),
            Self::Edit => Some(Self::Create),
            Self::Create => None,
        }
    }

    #[must_use]
    pub fn prev(self) -> Option<Self> {
        match self {
            Self::Scan => None,
            Self::Review => Some(Self::Scan),
            Self::Edit => Some(Self::Review),
            Self::Create => Some(Self::Edit),
        }
    }

    /// Whether the session has what this step needs before moving on.
    #[must_use]
    pub fn is_complete(self, session: &ListingSession) -> bool {
        let form = session.form();
        match self {
            Self::Scan => !form.title.trim().is_empty(),
            Self::Review => !form.category_id.is_empty(),
            Self::Edit => session.aspects().required.iter().all(|a| {
                form.aspects.get(&a.name).is_some_and(|v| !v.trim().is_empty())
            }),
            Self::Create => session.phase() == FormPhase::Succeeded,
        }
    }
}

/// Banner shown above the current step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Presentation state for the new-listing page.
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub step: Step,
    pub loading_aspects: bool,
    pub loading_suggestions: bool,
    pub bulk_editor_open: bool,
    pub notice: Option<Notice>,
}

impl UiState {
    /// Advance if the current step is complete. Returns whether it moved.
    pub fn advance(&mut self, session: &ListingSession) -> bool {
        match self.step.next() {
            Some(next) if self.step.is_complete(session) => {
                self.step = next;
                self.notice = None;
                true
            }
            _ => false,
        }
    }

    pub fn back(&mut self) {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::Error(message.into()));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::Info(message.into()));
    }
}

/// CSS modifier for a suggestion's confidence badge.
#[must_use]
pub fn confidence_class(suggestion: &Suggestion) -> &'static str {
    if suggestion.is_high_confidence() {
        "confidence confidence--high"
    } else if suggestion.confidence >= 0.4 {
        "confidence confidence--medium"
    } else {
        "confidence confidence--low"
    }
}

/// Character counter text such as `42/80`.
#[must_use]
pub fn char_counter(text: &str, max: usize) -> String {
    format!("{}/{max}", text.chars().count())
}
