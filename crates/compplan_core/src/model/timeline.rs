use serde::{Deserialize, Serialize};

/// One narrative step of a simulation timeline, used purely for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineStep {
    pub title: String,
    /// Headline figure or short description for the step
    pub value: String,
    /// Supporting hint shown under the value
    pub hint: String,
}

impl TimelineStep {
    pub fn new(
        title: impl Into<String>,
        value: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            hint: hint.into(),
        }
    }
}

/// One labelled, pre-formatted figure of a result summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
}

impl SummaryRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}
