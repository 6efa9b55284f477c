use std::error::Error;
use std::path::Path;

use crate::cli::commands::Cli;
use crate::cli::output::*;
use crate::io::{settings_io, todo_io};
use crate::model::todo::{TodoItem, TodoList};
use crate::parse::serialize_item;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    let path = todo_io::resolve_data_path(cli.file.as_deref(), cli.dir.as_deref())?;

    if cli.list {
        return cmd_list(&path, cli.json);
    }
    if let Some(text) = cli.single.as_deref() {
        return cmd_single(&path, text, cli.json);
    }

    let (settings, settings_error) = settings_io::load_or_default();
    crate::tui::run(&path, settings, settings_error)
}

// ---------------------------------------------------------------------------
// Print commands
// ---------------------------------------------------------------------------

fn load_list(path: &Path) -> Result<TodoList, Box<dyn Error>> {
    let loaded = todo_io::load(path)?;
    if let Some(warning) = loaded.warning {
        eprintln!("warning: {}", warning);
    }
    Ok(loaded.list)
}

fn cmd_list(path: &Path, json: bool) -> Result<(), Box<dyn Error>> {
    let list = load_list(path)?;
    let items = list.sorted();
    if json {
        let output: Vec<ItemJson> = items.into_iter().map(item_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for item in items {
            println!("{}", format_item_line(item));
        }
    }
    Ok(())
}

/// First item in display order whose title contains `text`, ignoring case.
pub fn find_single<'a>(list: &'a TodoList, text: &str) -> Option<&'a TodoItem> {
    let needle = text.trim().to_lowercase();
    list.sorted()
        .into_iter()
        .find(|item| item.title.to_lowercase().contains(&needle))
}

fn cmd_single(path: &Path, text: &str, json: bool) -> Result<(), Box<dyn Error>> {
    if text.trim().is_empty() {
        return Err("--single needs a non-empty title".into());
    }
    let list = load_list(path)?;
    let item = find_single(&list, text).ok_or_else(|| format!("no item matches '{}'", text))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&item_to_json(item))?);
    } else {
        print!("{}", serialize_item(item));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::todo::Priority;
    use crate::ops::todo_ops::insert_item;

    #[test]
    fn single_prefers_display_order() {
        let mut list = TodoList::new();
        insert_item(&mut list, "Buy milk", "", Priority::Whenever).unwrap();
        insert_item(&mut list, "Milk the cow", "", Priority::Urgent).unwrap();

        assert_eq!(find_single(&list, "MILK").unwrap().title, "Milk the cow");
        assert_eq!(find_single(&list, "buy").unwrap().title, "Buy milk");
        assert!(find_single(&list, "bread").is_none());
    }
}
