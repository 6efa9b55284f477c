use serde::Serialize;

use crate::model::todo::{StepState, TodoItem, TodoStep};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ItemJson {
    pub id: u32,
    pub order: u32,
    pub title: String,
    pub priority: &'static str,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepJson>,
}

#[derive(Serialize)]
pub struct StepJson {
    pub order: u32,
    pub text: String,
    pub state: &'static str,
}

pub fn step_to_json(step: &TodoStep) -> StepJson {
    StepJson {
        order: step.order,
        text: step.text.clone(),
        state: match step.state() {
            StepState::Inactive => "open",
            StepState::Active => "active",
            StepState::Completed => "completed",
        },
    }
}

pub fn item_to_json(item: &TodoItem) -> ItemJson {
    ItemJson {
        id: item.id,
        order: item.order,
        title: item.title.clone(),
        priority: item.priority.label(),
        description: item.description.clone(),
        steps: item.sorted_steps().into_iter().map(step_to_json).collect(),
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// `  3  Urgent    Pay taxes`
pub fn format_item_line(item: &TodoItem) -> String {
    format!("{:>3}  {:<8}  {}", item.id, item.priority.label(), item.title)
}
