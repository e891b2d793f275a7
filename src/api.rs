//! Public API surface for the shop backend.
//!
//! This file consolidates the identifier newtypes, status enums, and the
//! derived-view DTO types shared by the service layer and the HTTP API.
//! All types derive Serialize/Deserialize for JSON serialization.

use serde::{Deserialize, Serialize};

pub use crate::models::{TimeOfDay, TimeRange};

/// Barber identifier (database primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BarberId(pub i64);

/// Service type identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(pub i64);

/// Appointment identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppointmentId(pub i64);

/// Walk-in queue entry identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueEntryId(pub i64);

/// Working-hours row identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkingHoursId(pub i64);

/// Time-off row identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeOffId(pub i64);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            pub fn new(value: i64) -> Self {
                $name(value)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

impl_id!(BarberId);
impl_id!(ServiceId);
impl_id!(AppointmentId);
impl_id!(QueueEntryId);
impl_id!(WorkingHoursId);
impl_id!(TimeOffId);

/// Barber selection for an availability or queue request.
///
/// `Any` is an existential test across all eligible barbers; the result does
/// not commit to a specific barber until booking time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarberPreference {
    /// No preference; any eligible barber satisfies the request.
    Any,
    /// A specific barber was requested.
    Specific(BarberId),
}

impl BarberPreference {
    /// Build a preference from an optional barber id (the wire representation).
    pub fn from_option(barber_id: Option<BarberId>) -> Self {
        match barber_id {
            Some(id) => Self::Specific(id),
            None => Self::Any,
        }
    }

    /// The requested barber, if the preference names one.
    pub fn specific(&self) -> Option<BarberId> {
        match self {
            Self::Specific(id) => Some(*id),
            Self::Any => None,
        }
    }

    /// Whether a barber satisfies this preference.
    pub fn matches(&self, barber_id: BarberId) -> bool {
        match self {
            Self::Any => true,
            Self::Specific(id) => *id == barber_id,
        }
    }
}

/// Appointment lifecycle status.
///
/// The transition table lives here; mutation operations consult it before
/// writing. The read-side computations accept any valid value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    CheckedIn,
    InProgress,
    Completed,
    NoShow,
    Cancelled,
}

impl AppointmentStatus {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::NoShow | Self::Cancelled)
    }

    /// Whether an appointment in this status still occupies its time slot.
    pub fn blocks_slot(&self) -> bool {
        matches!(
            self,
            Self::Scheduled | Self::Confirmed | Self::CheckedIn | Self::InProgress
        )
    }

    /// Exhaustive transition table.
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        match (*self, next) {
            (Scheduled, Confirmed)
            | (Scheduled, CheckedIn)
            | (Confirmed, CheckedIn)
            | (CheckedIn, InProgress)
            | (InProgress, Completed) => true,
            // Any non-terminal appointment can be cancelled or marked no-show.
            (from, Cancelled) | (from, NoShow) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "confirmed" => Ok(Self::Confirmed),
            "checked_in" => Ok(Self::CheckedIn),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "no_show" => Ok(Self::NoShow),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("Unknown appointment status: {}", other)),
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked_in",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::NoShow => "no_show",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// Walk-in queue entry status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    Waiting,
    Called,
    InService,
    Done,
    Removed,
}

impl QueueStatus {
    /// Active entries are the ones still holding a place in line.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Waiting | Self::Called)
    }

    /// Exhaustive transition table.
    pub fn can_transition_to(&self, next: QueueStatus) -> bool {
        use QueueStatus::*;
        matches!(
            (*self, next),
            (Waiting, Called)
                | (Called, InService)
                | (InService, Done)
                | (Waiting, Removed)
                | (Called, Removed)
        )
    }
}

impl std::str::FromStr for QueueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(Self::Waiting),
            "called" => Ok(Self::Called),
            "in_service" => Ok(Self::InService),
            "done" => Ok(Self::Done),
            "removed" => Ok(Self::Removed),
            other => Err(format!("Unknown queue status: {}", other)),
        }
    }
}

impl std::fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Waiting => "waiting",
            Self::Called => "called",
            Self::InService => "in_service",
            Self::Done => "done",
            Self::Removed => "removed",
        };
        write!(f, "{}", s)
    }
}

/// A computed, non-persisted bookable time window.
///
/// Recomputed per request; `barber_id` is `None` when the request did not
/// name a barber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSlot {
    /// Slot start instant (UTC).
    pub start: chrono::DateTime<chrono::Utc>,
    /// Slot end implied by the requested service duration.
    pub end: chrono::DateTime<chrono::Utc>,
    /// Barber the slot applies to; `None` for an any-barber request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barber_id: Option<BarberId>,
    /// Whether the slot can still be booked.
    pub available: bool,
}

/// Per-entry projection produced by the queue estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntryView {
    pub id: QueueEntryId,
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_barber_id: Option<BarberId>,
    pub status: QueueStatus,
    /// 1-based rank among waiting/called entries, by check-in time.
    pub position: u32,
    /// Estimated minutes until service begins.
    pub estimated_wait_minutes: u32,
    pub checked_in_at: chrono::DateTime<chrono::Utc>,
    /// Minutes already spent in line.
    pub waited_minutes: u32,
}

/// Aggregate queue projection: per-entry views plus shop-level counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueView {
    pub entries: Vec<QueueEntryView>,
    pub waiting: usize,
    pub called: usize,
    pub in_service: usize,
    /// Estimate a new no-preference walk-in would receive right now.
    pub estimated_wait_new: u32,
}

impl QueueView {
    /// The all-zero view for an empty queue.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            waiting: 0,
            called: 0,
            in_service: 0,
            estimated_wait_new: 0,
        }
    }
}
