use serde::{Deserialize, Serialize};

use crate::domain::common::{find_by_id, find_by_id_mut, new_id, Displayable, Identifiable};
use crate::domain::session::Session;

/// A recurring or one-off course with an hourly rate and the sessions it owns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Training {
    pub id: String,
    pub name: String,
    pub instructor: String,
    /// Declared session count; the session list is authoritative.
    #[serde(default)]
    pub total_sessions: u32,
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub color: String,
    pub hourly_rate: f64,
    /// Flat bonus paid on top of the hourly income.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_value: Option<f64>,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

impl Training {
    pub fn new(name: impl Into<String>, instructor: impl Into<String>, hourly_rate: f64) -> Self {
        Self {
            id: new_id("t"),
            name: name.into(),
            instructor: instructor.into(),
            total_sessions: 0,
            schedule: String::new(),
            color: String::new(),
            hourly_rate,
            extra_value: None,
            sessions: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_extra(mut self, extra: f64) -> Self {
        self.extra_value = Some(extra);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_sessions(mut self, sessions: Vec<Session>) -> Self {
        self.total_sessions = sessions.len() as u32;
        self.sessions = sessions;
        self
    }

    /// Extra amount that takes part in attribution; zero and absent extras are ignored.
    pub fn effective_extra(&self) -> Option<f64> {
        self.extra_value.filter(|value| *value != 0.0)
    }

    pub fn session(&self, session_id: &str) -> Option<&Session> {
        find_by_id(&self.sessions, session_id)
    }

    pub fn session_mut(&mut self, session_id: &str) -> Option<&mut Session> {
        find_by_id_mut(&mut self.sessions, session_id)
    }

    /// Next free `<training>-s<n>` identifier.
    pub fn next_session_id(&self) -> String {
        let mut index = self.sessions.len();
        loop {
            let candidate = format!("{}-s{}", self.id, index);
            if self.session(&candidate).is_none() {
                return candidate;
            }
            index += 1;
        }
    }

    /// Sorts sessions chronologically, keeping insertion order for same-day entries.
    pub fn sort_sessions(&mut self) {
        self.sessions.sort_by_key(|session| session.date);
    }
}

impl Identifiable for Training {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Training {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.instructor)
    }
}
