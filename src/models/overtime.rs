//! Overtime request model and its status state machine.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Lifecycle state of an overtime request.
///
/// ```text
/// pending ──► approved
///    │ ├────► rejected
///    │ └────► cancelled
/// ```
///
/// Every state other than `pending` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Awaiting an admin decision.
    Pending,
    /// Approved by an admin.
    Approved,
    /// Rejected by an admin.
    Rejected,
    /// Withdrawn by the requesting user.
    Cancelled,
}

impl RequestStatus {
    /// True when no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    /// Returns whether the state machine allows moving to `next`.
    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (
                RequestStatus::Pending,
                RequestStatus::Approved | RequestStatus::Rejected | RequestStatus::Cancelled
            )
        )
    }

    /// Moves to `next`, or fails with [`EngineError::InvalidStatusTransition`].
    ///
    /// # Example
    ///
    /// ```
    /// use worktime_engine::models::RequestStatus;
    ///
    /// let approved = RequestStatus::Pending.transition(RequestStatus::Approved).unwrap();
    /// assert!(approved.transition(RequestStatus::Cancelled).is_err());
    /// ```
    pub fn transition(self, next: RequestStatus) -> EngineResult<RequestStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(EngineError::InvalidStatusTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Approved => write!(f, "approved"),
            RequestStatus::Rejected => write!(f, "rejected"),
            RequestStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Requested duration split into whole hours and remaining minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursBreakdown {
    /// Whole hours.
    pub hours: i64,
    /// Remaining minutes, `0..60`.
    pub minutes: i64,
}

impl HoursBreakdown {
    /// Splits a minute count.
    pub fn from_minutes(total: i64) -> Self {
        let total = total.max(0);
        Self {
            hours: total / 60,
            minutes: total % 60,
        }
    }

    /// Total minutes represented.
    pub fn total_minutes(&self) -> i64 {
        self.hours * 60 + self.minutes
    }
}

/// A stored overtime request. One non-cancelled request per user and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeRequest {
    /// Requesting user.
    pub user_id: String,
    /// Date the overtime is worked.
    pub date: NaiveDate,
    /// Start time string.
    pub start_time: String,
    /// End time string.
    pub end_time: String,
    /// Requested duration in decimal hours (e.g. `2.5`).
    pub hours: Decimal,
    /// Requested duration as hours and minutes.
    pub hours_breakdown: HoursBreakdown,
    /// Client the overtime is billed to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    /// Justification text.
    pub reason: String,
    /// Current status.
    pub status: RequestStatus,
}

impl OvertimeRequest {
    /// Builds a pending request from an accepted submission.
    ///
    /// `date` and `minutes` are the values the validator parsed from the
    /// submission; `hours` is rounded to two decimal places.
    pub fn from_submission(submission: &OvertimeSubmission, date: NaiveDate, minutes: i64) -> Self {
        let breakdown = HoursBreakdown::from_minutes(minutes);
        Self {
            user_id: submission.user_id.clone(),
            date,
            start_time: submission.start_time.clone(),
            end_time: submission.end_time.clone(),
            hours: (Decimal::from(breakdown.total_minutes()) / Decimal::from(60)).round_dp(2),
            hours_breakdown: breakdown,
            client: submission
                .client
                .as_ref()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            reason: submission.reason.trim().to_string(),
            status: RequestStatus::Pending,
        }
    }

    /// Requested duration in minutes.
    pub fn duration_minutes(&self) -> i64 {
        self.hours_breakdown.total_minutes()
    }

    /// True unless the request was cancelled; only active requests block a date.
    pub fn is_active(&self) -> bool {
        self.status != RequestStatus::Cancelled
    }

    /// Applies a status change through the state machine.
    pub fn set_status(&mut self, next: RequestStatus) -> EngineResult<()> {
        self.status = self.status.transition(next)?;
        Ok(())
    }
}

/// An overtime request as submitted by the user, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeSubmission {
    /// Requesting user.
    pub user_id: String,
    /// Requested date, `YYYY-MM-DD`.
    pub date: String,
    /// Start time string.
    pub start_time: String,
    /// End time string.
    pub end_time: String,
    /// Client the overtime is billed to, if any.
    #[serde(default)]
    pub client: Option<String>,
    /// Justification text.
    #[serde(default)]
    pub reason: String,
}
