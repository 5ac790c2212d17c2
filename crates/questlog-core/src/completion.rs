// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task completion policy.
//!
//! Decides, from a task's prior completion stamp and the current instant,
//! what the new stamp should be and whether the owner earns experience.
//! Calendar dates are compared in UTC.
//!
//! - A repeating task completed earlier today is un-completed, without XP.
//! - Any other toggle stamps the task with `now`. XP is awarded if the task
//!   was not completed, or if it repeats and its stamp is from another day.
//!
//! A one-off task that is already completed is re-stamped with `now` on every
//! toggle and never earns XP again.

use chrono::{DateTime, Utc};

/// Result of evaluating the completion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionDecision {
    /// New value for the task's `completed_at`.
    pub completed_at: Option<DateTime<Utc>>,
    /// Whether the owning user is awarded experience for this toggle.
    pub award_xp: bool,
}

impl CompletionDecision {
    /// True when the toggle clears the completion stamp.
    pub fn is_uncomplete(&self) -> bool {
        self.completed_at.is_none()
    }
}

/// Evaluates the completion policy for one toggle.
pub fn decide(
    completed_at: Option<DateTime<Utc>>,
    repeat_days: &[String],
    now: DateTime<Utc>,
) -> CompletionDecision {
    let was_completed = completed_at.is_some();
    let is_repeating = !repeat_days.is_empty();
    let today = now.date_naive();
    let already_completed_today = completed_at.is_some_and(|ts| ts.date_naive() == today);

    let should_uncomplete = was_completed && is_repeating && already_completed_today;

    CompletionDecision {
        completed_at: if should_uncomplete { None } else { Some(now) },
        award_xp: !was_completed || (is_repeating && !already_completed_today),
    }
}
