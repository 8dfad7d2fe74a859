//! Notification events returned alongside every new snapshot.
//!
//! RULE: The engine never renders or toasts anything. It reports what
//! happened and the host decides how to show it.

use crate::{
    achievement::AchievementId,
    growth::GrowthStage,
    interaction::InteractionKind,
    mood::Mood,
    snapshot::Activity,
    types::{PetId, Timestamp},
};
use serde::{Deserialize, Serialize};

/// Variants are only ever appended: persisted event logs depend on the tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PetEvent {
    // ── Time-driven ────────────────────────────────
    StageChanged {
        from:        GrowthStage,
        to:          GrowthStage,
        age_in_days: u64,
    },
    MoodChanged {
        from: Mood,
        to:   Mood,
    },
    ActivityEnded {
        activity: Activity,
        at:       Timestamp,
    },
    WokeUp {
        reason: WakeReason,
        at:     Timestamp,
    },
    HealthDepleted {
        at: Timestamp,
    },

    // ── User-driven ────────────────────────────────
    InteractionApplied {
        kind: InteractionKind,
        at:   Timestamp,
    },

    // ── Achievements ───────────────────────────────
    AchievementUnlocked {
        id: AchievementId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WakeReason {
    /// Energy reached 100.
    Rested,
    /// The user ended sleep.
    Toggled,
}

impl PetEvent {
    /// Stable name for the event_type column in event_log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::StageChanged { .. }        => "stage_changed",
            Self::MoodChanged { .. }         => "mood_changed",
            Self::ActivityEnded { .. }       => "activity_ended",
            Self::WokeUp { .. }              => "woke_up",
            Self::HealthDepleted { .. }      => "health_depleted",
            Self::InteractionApplied { .. }  => "interaction_applied",
            Self::AchievementUnlocked { .. } => "achievement_unlocked",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:          Option<i64>,
    pub pet_id:      PetId,
    pub recorded_at: Timestamp,
    pub event_type:  String,
    pub payload:     String, // JSON-serialized PetEvent
}
