use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How pressing an item is. Urgent items are listed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    #[default]
    Whenever,
    Urgent,
}

impl Priority {
    pub fn as_u8(self) -> u8 {
        match self {
            Priority::Whenever => 0,
            Priority::Urgent => 1,
        }
    }

    pub fn from_u8(value: u8) -> Option<Priority> {
        match value {
            0 => Some(Priority::Whenever),
            1 => Some(Priority::Urgent),
            _ => None,
        }
    }

    pub fn toggled(self) -> Priority {
        match self {
            Priority::Whenever => Priority::Urgent,
            Priority::Urgent => Priority::Whenever,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Whenever => "Whenever",
            Priority::Urgent => "Urgent",
        }
    }
}

// Stored as its numeric value in the data file
impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        Priority::from_u8(value)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown priority {}", value)))
    }
}

/// Progress of a single step. A step is never both active and completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepState {
    #[default]
    Inactive,
    Active,
    Completed,
}

impl StepState {
    /// The char written between the brackets in `- [ ] step`
    pub fn marker(self) -> char {
        match self {
            StepState::Inactive => ' ',
            StepState::Active => 'o',
            StepState::Completed => 'x',
        }
    }

    /// Parse bracket content: empty, `o` or `x` (case-insensitive)
    pub fn from_marker(content: &str) -> Option<StepState> {
        match content.trim().to_ascii_lowercase().as_str() {
            "" => Some(StepState::Inactive),
            "o" => Some(StepState::Active),
            "x" => Some(StepState::Completed),
            _ => None,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One checklist entry of an item
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TodoStep {
    #[serde(default)]
    pub order: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    active: bool,
}

impl TodoStep {
    pub fn new(order: u32, text: impl Into<String>) -> Self {
        TodoStep {
            order,
            text: text.into(),
            completed: false,
            active: false,
        }
    }

    pub fn with_state(mut self, state: StepState) -> Self {
        self.set_state(state);
        self
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> StepState {
        if self.completed {
            StepState::Completed
        } else if self.active {
            StepState::Active
        } else {
            StepState::Inactive
        }
    }

    pub fn set_state(&mut self, state: StepState) {
        self.completed = state == StepState::Completed;
        self.active = state == StepState::Active;
    }

    /// Setting completed clears active.
    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
        if completed {
            self.active = false;
        }
    }

    /// Setting active clears completed.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if active {
            self.completed = false;
        }
    }
}

/// A todo item
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TodoItem {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub order: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<TodoStep>,
}

impl TodoItem {
    pub fn new(title: impl Into<String>, description: impl Into<String>, priority: Priority) -> Self {
        TodoItem {
            title: title.into(),
            description: description.into(),
            priority,
            ..Default::default()
        }
    }

    /// Steps in `Order` order.
    pub fn sorted_steps(&self) -> Vec<&TodoStep> {
        let mut steps: Vec<&TodoStep> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.order);
        steps
    }

    pub fn step(&self, order: u32) -> Option<&TodoStep> {
        self.steps.iter().find(|s| s.order == order)
    }

    pub fn step_mut(&mut self, order: u32) -> Option<&mut TodoStep> {
        self.steps.iter_mut().find(|s| s.order == order)
    }
}

/// On-disk shape of the data file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TodoDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<TodoItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
}

/// The in-memory item collection, keyed by item id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoList {
    items: IndexMap<u32, TodoItem>,
    pub categories: Vec<String>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a loaded document. Items with a missing (0) or duplicate
    /// id get a fresh one.
    pub fn from_document(doc: TodoDocument) -> Self {
        let mut list = TodoList {
            items: IndexMap::with_capacity(doc.items.len()),
            categories: doc.categories,
        };
        let mut orphans = Vec::new();
        for item in doc.items {
            if item.id == 0 || list.items.contains_key(&item.id) {
                orphans.push(item);
            } else {
                list.items.insert(item.id, item);
            }
        }
        for mut item in orphans {
            item.id = list.next_id();
            list.items.insert(item.id, item);
        }
        list
    }

    pub fn to_document(&self) -> TodoDocument {
        TodoDocument {
            items: self.items.values().cloned().collect(),
            categories: self.categories.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &TodoItem> {
        self.items.values()
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut TodoItem> {
        self.items.values_mut()
    }

    pub fn get(&self, id: u32) -> Option<&TodoItem> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut TodoItem> {
        self.items.get_mut(&id)
    }

    /// One past the highest id in use.
    pub fn next_id(&self) -> u32 {
        self.items.keys().max().map_or(1, |id| id + 1)
    }

    /// One past the highest order among items of `priority`.
    pub fn next_order(&self, priority: Priority) -> u32 {
        self.items
            .values()
            .filter(|i| i.priority == priority)
            .map(|i| i.order)
            .max()
            .map_or(1, |o| o + 1)
    }

    /// Store `item` under its id, replacing any item with the same id.
    pub fn put(&mut self, item: TodoItem) {
        self.items.insert(item.id, item);
    }

    pub fn remove(&mut self, id: u32) -> Option<TodoItem> {
        self.items.shift_remove(&id)
    }

    /// Display order: urgent first, then by `Order`.
    pub fn sorted(&self) -> Vec<&TodoItem> {
        let mut items: Vec<&TodoItem> = self.items.values().collect();
        items.sort_by(|a, b| display_order(a, b));
        items
    }
}

/// Comparator for display order: urgent first, then by `Order`, then id.
pub fn display_order(a: &TodoItem, b: &TodoItem) -> std::cmp::Ordering {
    b.priority
        .cmp(&a.priority)
        .then(a.order.cmp(&b.order))
        .then(a.id.cmp(&b.id))
}
