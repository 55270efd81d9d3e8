//! Preset Routines
//!
//! Named sets of daily tasks that can be loaded in one step. Loading a preset
//! replaces whatever preset was loaded before; hand-made tasks are kept.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, TaskError};
use crate::store::{Task, TaskStore};

// == Preset ==
/// A built-in routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Training,
    Learning,
    Motivational,
    Productivity,
    Wellness,
}

/// One task of a routine, due daily at `hour:minute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetItem {
    pub hour: u32,
    pub minute: u32,
    pub name: &'static str,
}

const fn item(hour: u32, minute: u32, name: &'static str) -> PresetItem {
    PresetItem { hour, minute, name }
}

const TRAINING: &[PresetItem] = &[
    item(5, 0, "Wake up"),
    item(5, 15, "Drink 500ml water"),
    item(5, 30, "Dynamic stretching"),
    item(5, 45, "Cardio warm-up"),
    item(6, 0, "Main workout"),
    item(7, 0, "Cool down"),
    item(7, 15, "Protein shake"),
    item(7, 30, "Shower"),
    item(8, 0, "Healthy breakfast"),
];

const LEARNING: &[PresetItem] = &[
    item(9, 0, "Set daily learning goals"),
    item(9, 15, "Read technical material"),
    item(10, 15, "Take detailed notes"),
    item(10, 45, "Rest eyes - look at distance"),
    item(11, 0, "Practice exercises"),
    item(12, 0, "Lunch break"),
    item(13, 0, "Review morning materials"),
    item(14, 0, "Deep work session"),
    item(15, 30, "Take a walk - process information"),
];

const MOTIVATIONAL: &[PresetItem] = &[
    item(6, 30, "Good morning! You're up and making progress!"),
    item(8, 30, "Great start to the day - keep the momentum!"),
    item(10, 30, "Stay focused, you're doing fantastic work!"),
    item(12, 30, "Halfway through the day - you got this!"),
    item(14, 30, "Your dedication is inspiring!"),
    item(16, 30, "Push through - excellence takes persistence!"),
    item(18, 30, "Reflect on today's wins, big and small"),
    item(20, 30, "Wind down - you've earned your rest"),
];

const PRODUCTIVITY: &[PresetItem] = &[
    item(8, 30, "Plan your day and set priorities"),
    item(9, 0, "Focus on most important task"),
    item(10, 30, "Check and respond to urgent emails"),
    item(11, 0, "Second important task"),
    item(12, 30, "Reflect on morning progress"),
    item(13, 30, "Third important task"),
    item(15, 0, "Quick administrative work"),
    item(16, 0, "Plan for tomorrow"),
    item(17, 0, "Review day's accomplishments"),
];

const WELLNESS: &[PresetItem] = &[
    item(7, 0, "Morning meditation"),
    item(10, 0, "Hydration check"),
    item(12, 0, "Mindful eating lunch"),
    item(14, 0, "Quick breathing exercise"),
    item(15, 30, "Stretch break"),
    item(17, 0, "Evening walk"),
    item(19, 0, "Screen-free time"),
    item(21, 0, "Evening reflection"),
    item(22, 0, "Sleep preparation routine"),
];

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Training,
        Preset::Learning,
        Preset::Motivational,
        Preset::Productivity,
        Preset::Wellness,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Training => "training",
            Preset::Learning => "learning",
            Preset::Motivational => "motivational",
            Preset::Productivity => "productivity",
            Preset::Wellness => "wellness",
        }
    }

    /// The routine's tasks in time order.
    pub fn items(self) -> &'static [PresetItem] {
        match self {
            Preset::Training => TRAINING,
            Preset::Learning => LEARNING,
            Preset::Motivational => MOTIVATIONAL,
            Preset::Productivity => PRODUCTIVITY,
            Preset::Wellness => WELLNESS,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| TaskError::UnknownPreset(s.to_string()))
    }
}

impl PresetItem {
    pub fn time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
    }

    /// `HH:MM`
    pub fn time_label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

// == Applying ==
/// What loading a preset changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetApplied {
    /// Preset tasks deleted
    pub removed: usize,
    /// Tasks created for the new preset
    pub created: Vec<Task>,
}

/// Deletes every task created from a preset, then creates the tasks of
/// `preset` due on `today`. With `None` the previous preset is only cleared.
///
/// Tasks created by hand are never touched. A preset task deleted by someone
/// else in the meantime is ignored.
pub async fn apply_preset(
    store: &dyn TaskStore,
    preset: Option<Preset>,
    today: NaiveDate,
) -> Result<PresetApplied> {
    let previous: Vec<_> = store
        .find_all()
        .await?
        .into_iter()
        .filter(Task::is_preset)
        .filter_map(|task| task.id)
        .collect();

    let mut removed = 0;
    for id in previous {
        match store.delete(id).await {
            Ok(()) => removed += 1,
            Err(TaskError::NotFound(_)) => debug!(id, "preset task already deleted"),
            Err(err) => return Err(err),
        }
    }

    let mut created = Vec::new();
    if let Some(preset) = preset {
        for item in preset.items() {
            let time = item.time().ok_or_else(|| {
                TaskError::Internal(format!("bad preset time {}", item.time_label()))
            })?;
            let task = Task::new(item.name, today.and_time(time)).with_preset(preset);
            created.push(store.save(task).await?);
        }
    }

    match preset {
        Some(preset) => info!(
            "Loaded preset {} ({} tasks, {} previous preset tasks removed)",
            preset,
            created.len(),
            removed
        ),
        None => info!("Cleared presets ({} tasks removed)", removed),
    }

    Ok(PresetApplied { removed, created })
}
