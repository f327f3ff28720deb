//! Property tests for editor invariants.

use proptest::prelude::*;
use scribe_buffer::BufferPos;
use scribe_core::{Editor, EditorConfig, Movement};

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z ]{0,12}", 1..6).prop_map(|lines| lines.join("\n"))
}

fn movement_strategy() -> impl Strategy<Value = Movement> {
    prop_oneof![
        Just(Movement::Left),
        Just(Movement::Right),
        Just(Movement::Up),
        Just(Movement::Down),
        Just(Movement::WordLeft),
        Just(Movement::WordRight),
        Just(Movement::LineStart),
        Just(Movement::LineEnd),
        Just(Movement::DocumentStart),
        Just(Movement::DocumentEnd),
    ]
}

#[derive(Debug, Clone)]
enum Action {
    Move(Movement, bool),
    Insert(String),
    Backspace,
    DeleteForward,
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (movement_strategy(), any::<bool>()).prop_map(|(m, extend)| Action::Move(m, extend)),
        "[a-z \n]{1,4}".prop_map(Action::Insert),
        Just(Action::Backspace),
        Just(Action::DeleteForward),
    ]
}

fn apply(editor: &mut Editor, action: &Action) {
    match action {
        Action::Move(movement, extend) => editor.move_cursor(*movement, *extend).unwrap(),
        Action::Insert(text) => editor.insert_text(text).unwrap(),
        Action::Backspace => editor.delete_text().unwrap(),
        Action::DeleteForward => editor.delete_forward().unwrap(),
    }
}

fn in_bounds(editor: &Editor, pos: BufferPos) -> bool {
    editor
        .get_line_length(pos.line)
        .is_some_and(|len| pos.col <= len)
}

proptest! {
    #[test]
    fn cursor_stays_in_bounds(
        text in text_strategy(),
        actions in prop::collection::vec(action_strategy(), 0..40),
    ) {
        let mut editor = Editor::from_text(EditorConfig::default(), &text);
        for action in &actions {
            apply(&mut editor, action);
            prop_assert!(in_bounds(&editor, editor.buffer_pos()));
            if let Some(sel) = editor.selection() {
                prop_assert!(in_bounds(&editor, sel.start));
                prop_assert!(in_bounds(&editor, sel.end));
            }
        }
    }

    #[test]
    fn visible_cursor_round_trips(
        text in text_strategy(),
        moves in prop::collection::vec(movement_strategy(), 0..20),
    ) {
        let mut editor = Editor::from_text(EditorConfig::default(), &text);
        for movement in moves {
            editor.move_cursor(movement, false).unwrap();
            let pos = editor.buffer_pos();
            let screen = editor.get_screen_pos().unwrap();
            prop_assert_eq!(editor.viewport().screen_to_buffer(screen), pos);
        }
    }

    #[test]
    fn undo_redo_restore_text_and_cursor(
        text in text_strategy(),
        actions in prop::collection::vec(action_strategy(), 1..30),
    ) {
        let mut editor = Editor::from_text(EditorConfig::default(), &text);
        let mut first_before = None;
        let mut last_after = None;

        for action in &actions {
            let before = (editor.get_text(), editor.buffer_pos());
            let recorded = editor.history().undo_len();
            apply(&mut editor, action);
            // One undo step per action
            editor.commit_history_group();
            if editor.history().undo_len() == recorded {
                continue;
            }
            let after = (editor.get_text(), editor.buffer_pos());

            prop_assert!(editor.undo().unwrap());
            prop_assert_eq!(&(editor.get_text(), editor.buffer_pos()), &before);
            prop_assert!(editor.redo().unwrap());
            prop_assert_eq!(&(editor.get_text(), editor.buffer_pos()), &after);

            first_before.get_or_insert(before);
            last_after = Some(after);
        }
        let (Some(first_before), Some(last_after)) = (first_before, last_after) else {
            return Ok(());
        };

        while editor.undo().unwrap() {}
        prop_assert_eq!(editor.get_text(), text);
        prop_assert_eq!((editor.get_text(), editor.buffer_pos()), first_before);

        while editor.redo().unwrap() {}
        prop_assert_eq!((editor.get_text(), editor.buffer_pos()), last_after);
    }
}
