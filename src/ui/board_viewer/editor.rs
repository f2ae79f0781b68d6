use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::board::{ListId, Task};

use super::model;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    NewTask,
    EditTask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorFieldId {
    Text,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSubmit {
    pub text: String,
    pub list: ListId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    Cancel,
    Submit,
}

/// Modal text entry for adding or editing a task.
///
/// New tasks get a list selector below the text field; edits only change
/// the text. Blank text is submitted as-is and rejected downstream.
#[derive(Debug, Clone)]
pub struct EditorState {
    kind: EditorKind,
    text: String,
    list: ListId,
    active: EditorFieldId,
    task_id: Option<String>,
}

impl EditorState {
    pub fn new_task(list: ListId) -> Self {
        Self {
            kind: EditorKind::NewTask,
            text: String::new(),
            list,
            active: EditorFieldId::Text,
            task_id: None,
        }
    }

    pub fn edit_task(task: &Task, list: ListId) -> Self {
        Self {
            kind: EditorKind::EditTask,
            text: task.text.clone(),
            list,
            active: EditorFieldId::Text,
            task_id: Some(task.id.clone()),
        }
    }

    pub fn kind(&self) -> EditorKind {
        self.kind
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn list(&self) -> ListId {
        self.list
    }

    pub fn active(&self) -> EditorFieldId {
        self.active
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            EditorKind::NewTask => "New Task",
            EditorKind::EditTask => "Edit Task",
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('u') {
            self.text.clear();
            return EditorAction::None;
        }

        match key.code {
            KeyCode::Esc => return EditorAction::Cancel,
            KeyCode::Enter => return EditorAction::Submit,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => self.toggle_field(),
            _ if self.active == EditorFieldId::List => self.handle_list_key(key),
            KeyCode::Backspace => {
                self.text.pop();
            }
            KeyCode::Char(ch) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return EditorAction::None;
                }
                if !ch.is_control() {
                    self.text.push(ch);
                }
            }
            _ => {}
        }
        EditorAction::None
    }

    pub fn build_submit(&self) -> EditorSubmit {
        EditorSubmit {
            text: self.text.clone(),
            list: self.list,
        }
    }

    fn toggle_field(&mut self) {
        if self.kind == EditorKind::EditTask {
            return;
        }
        self.active = match self.active {
            EditorFieldId::Text => EditorFieldId::List,
            EditorFieldId::List => EditorFieldId::Text,
        };
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.list = model::step_list(self.list, -1),
            KeyCode::Right | KeyCode::Char('l') => self.list = model::step_list(self.list, 1),
            KeyCode::Char(ch @ '1'..='3') => {
                if let Some(list) = ListId::from_index(ch as usize - '1' as usize) {
                    self.list = list;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(editor: &mut EditorState, text: &str) {
        for ch in text.chars() {
            assert_eq!(editor.handle_key(key(KeyCode::Char(ch))), EditorAction::None);
        }
    }

    #[test]
    fn typing_fills_text_including_nav_letters() {
        let mut editor = EditorState::new_task(ListId::Todo);
        type_text(&mut editor, "hjkl");
        editor.handle_key(key(KeyCode::Backspace));
        assert_eq!(editor.text(), "hjk");
    }

    #[test]
    fn list_selector_cycles_on_new_task() {
        let mut editor = EditorState::new_task(ListId::Todo);
        type_text(&mut editor, "Ship");
        editor.handle_key(key(KeyCode::Tab));
        assert_eq!(editor.active(), EditorFieldId::List);

        editor.handle_key(key(KeyCode::Char('l')));
        assert_eq!(editor.list(), ListId::InProgress);
        editor.handle_key(key(KeyCode::Char('3')));
        assert_eq!(editor.list(), ListId::Done);
        editor.handle_key(key(KeyCode::Left));
        assert_eq!(editor.list(), ListId::InProgress);

        assert_eq!(editor.handle_key(key(KeyCode::Enter)), EditorAction::Submit);
        assert_eq!(
            editor.build_submit(),
            EditorSubmit {
                text: "Ship".to_string(),
                list: ListId::InProgress,
            }
        );
    }

    #[test]
    fn edit_has_no_list_field() {
        let task = Task::new("list1-card-1", "Buy milk");
        let mut editor = EditorState::edit_task(&task, ListId::Todo);
        editor.handle_key(key(KeyCode::Tab));
        assert_eq!(editor.active(), EditorFieldId::Text);
        assert_eq!(editor.task_id(), Some("list1-card-1"));

        editor.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        type_text(&mut editor, "Buy oat milk");
        assert_eq!(editor.build_submit().text, "Buy oat milk");
    }

    #[test]
    fn esc_cancels() {
        let mut editor = EditorState::new_task(ListId::Done);
        assert_eq!(editor.handle_key(key(KeyCode::Esc)), EditorAction::Cancel);
    }
}
