use pretty_assertions::assert_eq;
use todohd::model::todo::{Priority, StepState, TodoItem, TodoStep};
use todohd::parse::{SyntaxError, deserialize_item, serialize_item};

fn sample_item() -> TodoItem {
    let mut item = TodoItem::new(
        "hello title world",
        "this is some cool description\nfor sure",
        Priority::Urgent,
    );
    item.steps = vec![
        TodoStep::new(2, "step 1 active").with_state(StepState::Active),
        TodoStep::new(4, "step 3 inactive"),
        TodoStep::new(1, "step 2 completed").with_state(StepState::Completed),
    ];
    item
}

#[test]
fn serializes_steps_in_order() {
    let expected = "\
== hello title world ==
this is some cool description
for sure
== Steps ==
- [x] step 2 completed
- [o] step 1 active
- [ ] step 3 inactive
";
    assert_eq!(serialize_item(&sample_item()), expected);
}

#[test]
fn serialized_text_reads_back() {
    let item = sample_item();
    let parsed = deserialize_item(&serialize_item(&item)).unwrap();

    assert_eq!(parsed.title, item.title);
    assert_eq!(parsed.description, "this is some cool description\nfor sure\n");
    let steps: Vec<(&str, StepState)> = parsed
        .sorted_steps()
        .into_iter()
        .map(|s| (s.text.as_str(), s.state()))
        .collect();
    assert_eq!(
        steps,
        vec![
            ("step 2 completed", StepState::Completed),
            ("step 1 active", StepState::Active),
            ("step 3 inactive", StepState::Inactive),
        ]
    );
    // Priority is not part of the text form
    assert_eq!(parsed.priority, Priority::Whenever);
}

#[test]
fn multi_line_steps_survive() {
    let mut item = TodoItem::new("lists", "", Priority::Whenever);
    item.steps = vec![TodoStep::new(1, "first line\n  - [ ] not a step\nlast line")];

    let text = serialize_item(&item);
    assert!(text.contains("\n  \\- [ ] not a step\n"));

    let parsed = deserialize_item(&text).unwrap();
    assert_eq!(parsed.steps.len(), 1);
    assert_eq!(parsed.steps[0].text, "first line\n  - [ ] not a step\nlast line");
}

#[test]
fn accepts_hand_written_item() {
    let text = "\
== HeaderHere == true ==
Description here
 and here
== Steps ==
- [ ] Item1
- [ ] Item2
- [ ] Item3
- [o] ItemActive
- [x] ItemComplete
";
    let item = deserialize_item(text).unwrap();
    assert_eq!(item.title, "HeaderHere == true");
    assert_eq!(item.description, "Description here\n and here\n");
    assert_eq!(item.steps.len(), 5);

    let active = item.step(4).unwrap();
    assert_eq!(active.text, "ItemActive");
    assert!(active.active());
    assert!(!active.completed());

    let complete = item.step(5).unwrap();
    assert_eq!(complete.text, "ItemComplete");
    assert!(complete.completed());
    assert!(!complete.active());
}

#[test]
fn rejects_unclosed_title() {
    let err = deserialize_item("== Broken\nbody\n").unwrap_err();
    assert!(matches!(err, SyntaxError::InvalidTitle { .. }));
    assert_eq!(err.line(), 1);
}

#[test]
fn rejects_unknown_step_state() {
    let text = "== Title ==\n== Steps ==\n- [ ] fine\n- [z] text\n";
    let err = deserialize_item(text).unwrap_err();
    assert!(matches!(err, SyntaxError::UnknownState { ref state, .. } if state == "z"));
    assert_eq!(err.line(), 4);
    assert!(err.to_string().starts_with("line 4:"));
}
