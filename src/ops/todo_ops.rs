use crate::model::todo::{Priority, TodoItem, TodoList, TodoStep};

/// Error type for collection operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoError {
    #[error("item not found: {0}")]
    ItemNotFound(u32),
    #[error("item {item} has no step {order}")]
    StepNotFound { item: u32, order: u32 },
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error("step text cannot be empty")]
    EmptyStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// A search match, in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub item_id: u32,
    /// Step order when the match is in a step
    pub step: Option<u32>,
    /// The matching title or step text
    pub text: String,
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Rank `(key, order)` pairs densely from 1, keeping their relative order.
/// Returns the new order for each key.
fn dense_ranks<K: Copy>(mut entries: Vec<(K, u32)>) -> Vec<(K, u32)> {
    entries.sort_by_key(|(_, order)| *order);
    entries
        .into_iter()
        .enumerate()
        .map(|(i, (key, _))| (key, i as u32 + 1))
        .collect()
}

/// Re-rank the steps of one item densely from 1.
pub fn normalize_steps(item: &mut TodoItem) {
    item.steps.sort_by_key(|s| s.order);
    for (i, step) in item.steps.iter_mut().enumerate() {
        step.order = i as u32 + 1;
    }
}

/// Re-rank the items of one priority densely from 1.
pub fn normalize_priority(list: &mut TodoList, priority: Priority) {
    let entries: Vec<(u32, u32)> = list
        .sorted()
        .into_iter()
        .filter(|i| i.priority == priority)
        .map(|i| (i.id, i.order))
        .collect();
    for (id, order) in dense_ranks(entries) {
        if let Some(item) = list.get_mut(id) {
            item.order = order;
        }
    }
}

/// Make every sibling group dense and drop impossible step states. Run once
/// after loading.
pub fn normalize(list: &mut TodoList) {
    normalize_priority(list, Priority::Urgent);
    normalize_priority(list, Priority::Whenever);
    for item in list.items_mut() {
        normalize_steps(item);
        for step in &mut item.steps {
            if step.completed() && step.active() {
                step.set_completed(true);
            }
        }
    }
}

/// The neighbour of `order` among `orders` in `direction`: the closest
/// smaller (Up) or larger (Down) order.
fn neighbour<K: Copy>(
    orders: impl Iterator<Item = (K, u32)>,
    order: u32,
    direction: Direction,
) -> Option<(K, u32)> {
    let candidates = orders.filter(|(_, o)| match direction {
        Direction::Up => *o < order,
        Direction::Down => *o > order,
    });
    match direction {
        Direction::Up => candidates.max_by_key(|(_, o)| *o),
        Direction::Down => candidates.min_by_key(|(_, o)| *o),
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Add a new item at the end of its priority group. Returns its id.
pub fn insert_item(
    list: &mut TodoList,
    title: &str,
    description: &str,
    priority: Priority,
) -> Result<u32, TodoError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TodoError::EmptyTitle);
    }
    let mut item = TodoItem::new(title, description, priority);
    item.id = list.next_id();
    item.order = list.next_order(priority);
    let id = item.id;
    list.put(item);
    Ok(id)
}

pub fn delete_item(list: &mut TodoList, id: u32) -> Result<TodoItem, TodoError> {
    let item = list.remove(id).ok_or(TodoError::ItemNotFound(id))?;
    normalize_priority(list, item.priority);
    Ok(item)
}

/// Swap an item with its neighbour in the same priority group. Returns
/// whether anything moved.
pub fn move_item(list: &mut TodoList, id: u32, direction: Direction) -> Result<bool, TodoError> {
    let item = list.get(id).ok_or(TodoError::ItemNotFound(id))?;
    let (priority, order) = (item.priority, item.order);

    let siblings = list
        .items()
        .filter(|i| i.priority == priority && i.id != id)
        .map(|i| (i.id, i.order));
    let Some((other_id, other_order)) = neighbour(siblings, order, direction) else {
        return Ok(false);
    };

    if let Some(other) = list.get_mut(other_id) {
        other.order = order;
    }
    if let Some(item) = list.get_mut(id) {
        item.order = other_order;
    }
    Ok(true)
}

/// Change priority. The item goes to the end of its new group.
pub fn set_priority(list: &mut TodoList, id: u32, priority: Priority) -> Result<(), TodoError> {
    let old = list.get(id).ok_or(TodoError::ItemNotFound(id))?.priority;
    if old == priority {
        return Ok(());
    }
    let order = list.next_order(priority);
    if let Some(item) = list.get_mut(id) {
        item.priority = priority;
        item.order = order;
    }
    normalize_priority(list, old);
    Ok(())
}

/// Replace the editable parts of an item, keeping id and order.
pub fn replace_content(list: &mut TodoList, id: u32, edited: TodoItem) -> Result<(), TodoError> {
    if edited.title.trim().is_empty() {
        return Err(TodoError::EmptyTitle);
    }
    let priority = edited.priority;
    {
        let item = list.get_mut(id).ok_or(TodoError::ItemNotFound(id))?;
        item.title = edited.title.trim().to_string();
        item.description = edited.description;
        item.steps = edited.steps;
        normalize_steps(item);
    }
    set_priority(list, id, priority)
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

fn item_mut(list: &mut TodoList, id: u32) -> Result<&mut TodoItem, TodoError> {
    list.get_mut(id).ok_or(TodoError::ItemNotFound(id))
}

fn step_mut(list: &mut TodoList, id: u32, order: u32) -> Result<&mut TodoStep, TodoError> {
    item_mut(list, id)?
        .step_mut(order)
        .ok_or(TodoError::StepNotFound { item: id, order })
}

/// Append a step. Returns its order.
pub fn add_step(list: &mut TodoList, id: u32, text: &str) -> Result<u32, TodoError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TodoError::EmptyStep);
    }
    let item = item_mut(list, id)?;
    let order = item.steps.iter().map(|s| s.order).max().unwrap_or(0) + 1;
    item.steps.push(TodoStep::new(order, text));
    Ok(order)
}

pub fn remove_step(list: &mut TodoList, id: u32, order: u32) -> Result<TodoStep, TodoError> {
    let item = item_mut(list, id)?;
    let index = item
        .steps
        .iter()
        .position(|s| s.order == order)
        .ok_or(TodoError::StepNotFound { item: id, order })?;
    let step = item.steps.remove(index);
    normalize_steps(item);
    Ok(step)
}

/// Swap a step with its neighbour. Returns the step's new order, or `None`
/// when it was already at the edge.
pub fn move_step(
    list: &mut TodoList,
    id: u32,
    order: u32,
    direction: Direction,
) -> Result<Option<u32>, TodoError> {
    let item = item_mut(list, id)?;
    let index = item
        .steps
        .iter()
        .position(|s| s.order == order)
        .ok_or(TodoError::StepNotFound { item: id, order })?;

    let siblings = item.steps.iter().enumerate().map(|(i, s)| (i, s.order));
    let Some((other, other_order)) = neighbour(siblings, order, direction) else {
        return Ok(None);
    };
    item.steps[other].order = order;
    item.steps[index].order = other_order;
    Ok(Some(other_order))
}

pub fn set_step_text(list: &mut TodoList, id: u32, order: u32, text: &str) -> Result<(), TodoError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TodoError::EmptyStep);
    }
    step_mut(list, id, order)?.text = text.to_string();
    Ok(())
}

/// Flip completed. Completing a step clears active.
pub fn toggle_completed(list: &mut TodoList, id: u32, order: u32) -> Result<(), TodoError> {
    let step = step_mut(list, id, order)?;
    let completed = !step.completed();
    step.set_completed(completed);
    Ok(())
}

/// Flip active. Completed steps cannot be made active.
pub fn toggle_active(list: &mut TodoList, id: u32, order: u32) -> Result<bool, TodoError> {
    let step = step_mut(list, id, order)?;
    if step.completed() {
        return Ok(false);
    }
    let active = !step.active();
    step.set_active(active);
    Ok(true)
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Case-insensitive substring search over titles and step texts.
pub fn find(list: &TodoList, query: &str) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let mut hits = Vec::new();
    for item in list.sorted() {
        if item.title.to_lowercase().contains(&needle) {
            hits.push(SearchHit {
                item_id: item.id,
                step: None,
                text: item.title.clone(),
            });
        }
        for step in item.sorted_steps() {
            if step.text.to_lowercase().contains(&needle) {
                hits.push(SearchHit {
                    item_id: item.id,
                    step: Some(step.order),
                    text: step.text.clone(),
                });
            }
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::todo::StepState;
    use pretty_assertions::assert_eq;

    fn sample() -> TodoList {
        let mut list = TodoList::new();
        insert_item(&mut list, "Water plants", "", Priority::Whenever).unwrap();
        insert_item(&mut list, "Pay rent", "due friday", Priority::Urgent).unwrap();
        insert_item(&mut list, "Call mom", "", Priority::Whenever).unwrap();
        insert_item(&mut list, "Fix bike", "", Priority::Whenever).unwrap();
        list
    }

    fn titles(list: &TodoList) -> Vec<&str> {
        list.sorted().iter().map(|i| i.title.as_str()).collect()
    }

    fn orders(list: &TodoList, priority: Priority) -> Vec<u32> {
        list.sorted()
            .iter()
            .filter(|i| i.priority == priority)
            .map(|i| i.order)
            .collect()
    }

    #[test]
    fn insert_assigns_id_and_group_order() {
        let list = sample();
        assert_eq!(titles(&list), vec!["Pay rent", "Water plants", "Call mom", "Fix bike"]);
        assert_eq!(list.get(2).unwrap().order, 1);
        assert_eq!(list.get(4).unwrap().order, 3);
    }

    #[test]
    fn insert_rejects_blank_title() {
        let mut list = TodoList::new();
        assert_eq!(
            insert_item(&mut list, "   ", "", Priority::Urgent),
            Err(TodoError::EmptyTitle)
        );
    }

    #[test]
    fn delete_keeps_orders_dense() {
        let mut list = sample();
        delete_item(&mut list, 1).unwrap();
        assert_eq!(orders(&list, Priority::Whenever), vec![1, 2]);
        assert_eq!(delete_item(&mut list, 99), Err(TodoError::ItemNotFound(99)));
    }

    #[test]
    fn move_swaps_within_priority() {
        let mut list = sample();
        assert!(move_item(&mut list, 3, Direction::Up).unwrap());
        assert_eq!(titles(&list), vec!["Pay rent", "Call mom", "Water plants", "Fix bike"]);
        // Top of its group: urgent items are not siblings
        assert!(!move_item(&mut list, 3, Direction::Up).unwrap());
        assert!(!move_item(&mut list, 4, Direction::Down).unwrap());
        assert_eq!(orders(&list, Priority::Whenever), vec![1, 2, 3]);
    }

    #[test]
    fn priority_change_moves_to_end_of_group() {
        let mut list = sample();
        set_priority(&mut list, 1, Priority::Urgent).unwrap();
        assert_eq!(titles(&list), vec!["Pay rent", "Water plants", "Call mom", "Fix bike"]);
        assert_eq!(orders(&list, Priority::Urgent), vec![1, 2]);
        assert_eq!(orders(&list, Priority::Whenever), vec![1, 2]);
    }

    #[test]
    fn normalize_makes_groups_dense() {
        let mut list = TodoList::new();
        for (id, order, priority) in [
            (1, 7, Priority::Whenever),
            (2, 3, Priority::Whenever),
            (3, 10, Priority::Urgent),
        ] {
            let mut item = TodoItem {
                id,
                order,
                priority,
                ..Default::default()
            };
            item.steps = vec![TodoStep::new(9, "b"), TodoStep::new(4, "a")];
            list.put(item);
        }
        normalize(&mut list);
        assert_eq!(list.get(2).unwrap().order, 1);
        assert_eq!(list.get(1).unwrap().order, 2);
        assert_eq!(list.get(3).unwrap().order, 1);
        let steps: Vec<(u32, &str)> = list
            .get(1)
            .unwrap()
            .steps
            .iter()
            .map(|s| (s.order, s.text.as_str()))
            .collect();
        assert_eq!(steps, vec![(1, "a"), (2, "b")]);
    }

    #[test]
    fn normalize_resolves_conflicting_step_state() {
        let mut list = TodoList::new();
        let json = r#"{ "Id": 1, "Title": "t", "Steps": [ { "Order": 1, "Text": "s", "Completed": true, "Active": true } ] }"#;
        list.put(serde_json::from_str(json).unwrap());
        normalize(&mut list);
        let step = &list.get(1).unwrap().steps[0];
        assert_eq!(step.state(), StepState::Completed);
        assert!(!step.active());
    }

    #[test]
    fn steps_add_move_remove() {
        let mut list = sample();
        assert_eq!(add_step(&mut list, 1, "buy soil").unwrap(), 1);
        assert_eq!(add_step(&mut list, 1, "repot").unwrap(), 2);
        assert_eq!(add_step(&mut list, 1, "water").unwrap(), 3);
        assert_eq!(add_step(&mut list, 1, " "), Err(TodoError::EmptyStep));

        assert_eq!(move_step(&mut list, 1, 3, Direction::Up).unwrap(), Some(2));
        assert_eq!(move_step(&mut list, 1, 1, Direction::Up).unwrap(), None);
        let texts: Vec<&str> = list
            .get(1)
            .unwrap()
            .sorted_steps()
            .iter()
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(texts, vec!["buy soil", "water", "repot"]);

        let removed = remove_step(&mut list, 1, 1).unwrap();
        assert_eq!(removed.text, "buy soil");
        let orders: Vec<u32> = list.get(1).unwrap().steps.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2]);
        assert_eq!(
            remove_step(&mut list, 1, 9),
            Err(TodoError::StepNotFound { item: 1, order: 9 })
        );
    }

    #[test]
    fn toggles_never_leave_both_flags_set() {
        let mut list = sample();
        add_step(&mut list, 1, "s").unwrap();

        assert!(toggle_active(&mut list, 1, 1).unwrap());
        toggle_completed(&mut list, 1, 1).unwrap();
        let step = list.get(1).unwrap().step(1).unwrap();
        assert!(step.completed());
        assert!(!step.active());

        // Completed steps cannot become active
        assert!(!toggle_active(&mut list, 1, 1).unwrap());
        assert_eq!(list.get(1).unwrap().step(1).unwrap().state(), StepState::Completed);

        toggle_completed(&mut list, 1, 1).unwrap();
        assert_eq!(list.get(1).unwrap().step(1).unwrap().state(), StepState::Inactive);
    }

    #[test]
    fn set_step_text_trims() {
        let mut list = sample();
        add_step(&mut list, 2, "old").unwrap();
        set_step_text(&mut list, 2, 1, "  new  ").unwrap();
        assert_eq!(list.get(2).unwrap().step(1).unwrap().text, "new");
    }

    #[test]
    fn replace_content_keeps_identity() {
        let mut list = sample();
        let mut edited = TodoItem::new("Water all plants", "weekly", Priority::Urgent);
        edited.steps = vec![TodoStep::new(5, "kitchen"), TodoStep::new(2, "balcony")];
        replace_content(&mut list, 1, edited).unwrap();

        let item = list.get(1).unwrap();
        assert_eq!(item.id, 1);
        assert_eq!(item.title, "Water all plants");
        assert_eq!(item.priority, Priority::Urgent);
        assert_eq!(item.order, 2);
        assert_eq!(item.sorted_steps()[0].text, "balcony");
        assert_eq!(item.sorted_steps()[1].order, 2);
    }

    #[test]
    fn find_matches_titles_and_steps() {
        let mut list = sample();
        add_step(&mut list, 4, "order new chain").unwrap();
        add_step(&mut list, 3, "ask about the bike").unwrap();

        let hits = find(&list, "BIKE");
        assert_eq!(
            hits,
            vec![
                SearchHit {
                    item_id: 3,
                    step: Some(1),
                    text: "ask about the bike".into()
                },
                SearchHit {
                    item_id: 4,
                    step: None,
                    text: "Fix bike".into()
                },
            ]
        );
        assert!(find(&list, "  ").is_empty());
    }
}
