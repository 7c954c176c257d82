//! Fixed reference data: the stages of the path and the daily efforts.
//!
//! Nothing here is mutable. Listings hand out the same `'static` slices on
//! every call, so their order is stable for the lifetime of the process.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CatalogError;

/// Identifier of one of the three ordered stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageId {
    Sharia,
    Tariqa,
    Haqiqa,
}

/// One phase of the path. Declaration order defines unlock order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub id: StageId,
    pub name: &'static str,
    pub description: &'static str,
}

/// Kind of effort a task asks for. Carried on journal entries, never used
/// in leveling math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Remembrance,
    EgoWork,
    SelflessAction,
    ReframingSuffering,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Remembrance => "remembrance",
            TaskCategory::EgoWork => "ego_work",
            TaskCategory::SelflessAction => "selfless_action",
            TaskCategory::ReframingSuffering => "reframing_suffering",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskCategory {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remembrance" => Ok(TaskCategory::Remembrance),
            "ego_work" => Ok(TaskCategory::EgoWork),
            "selfless_action" => Ok(TaskCategory::SelflessAction),
            "reframing_suffering" => Ok(TaskCategory::ReframingSuffering),
            other => Err(CatalogError::UnknownCategory(other.to_string())),
        }
    }
}

/// A performable daily effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: u32,
    pub text: &'static str,
    /// Reward for completing the effort. Always positive.
    pub points: u32,
    pub category: TaskCategory,
}

static STAGES: [Stage; 3] = [
    Stage {
        id: StageId::Sharia,
        name: "The Shell (Sharia)",
        description: "The protection of rituals and of the law.",
    },
    Stage {
        id: StageId::Tariqa,
        name: "The Kernel (Tariqa)",
        description: "The inner journey and the struggle with the Nafs.",
    },
    Stage {
        id: StageId::Haqiqa,
        name: "The Oil (Haqiqa)",
        description: "The ultimate Truth and extinction in God.",
    },
];

static TASKS: [Task; 4] = [
    Task {
        id: 1,
        text: "Dhikr: 5 minutes of silent remembrance",
        points: 10,
        category: TaskCategory::Remembrance,
    },
    Task {
        id: 2,
        text: "Mastery of the Nafs: turn anger into patience",
        points: 25,
        category: TaskCategory::EgoWork,
    },
    Task {
        id: 3,
        text: "Sobriety: a selfless act without expecting thanks",
        points: 20,
        category: TaskCategory::SelflessAction,
    },
    Task {
        id: 4,
        text: "Contemplation: see the light in a wound",
        points: 15,
        category: TaskCategory::ReframingSuffering,
    },
];

/// Read-only access to the built-in stages and tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog;

impl Catalog {
    pub fn new() -> Self {
        Catalog
    }

    /// The three stages in unlock order.
    pub fn list_stages(&self) -> &'static [Stage] {
        &STAGES
    }

    /// The four daily efforts in display order.
    pub fn list_tasks(&self) -> &'static [Task] {
        &TASKS
    }

    /// Look up a task by id.
    ///
    /// # Errors
    /// Returns `CatalogError::NotFound` if no task has this id.
    pub fn get_task(&self, id: u32) -> Result<&'static Task, CatalogError> {
        TASKS
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Look up a task from user input (a textual id such as `"2"`).
    ///
    /// # Errors
    /// Returns `CatalogError::NotFound` if the key does not parse or names
    /// no task.
    pub fn find_task(&self, key: &str) -> Result<&'static Task, CatalogError> {
        let id = key
            .trim()
            .parse::<u32>()
            .map_err(|_| CatalogError::NotFound(key.to_string()))?;
        self.get_task(id)
    }
}
