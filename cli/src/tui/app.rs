use ratatui::widgets::TableState;
use tasklist_core::{
    parse_human_date, FileRepository, FilterCriteria, FilterStatus, PreferenceRepository, Task,
    TaskStore,
};
use tracing::warn;
use uuid::Uuid;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Adding,
    Editing,
    Searching,
    SettingDue,
}

pub struct App {
    pub store: TaskStore<FileRepository>,
    prefs: FileRepository,
    pub state: TableState,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub criteria: FilterCriteria,
    pub show_stats: bool,
    pub dark_mode: bool,
    pub message: Option<String>,
}

impl App {
    pub fn new(repo: FileRepository) -> App {
        let prefs = repo.clone();
        let dark_mode = prefs.load_dark_mode().unwrap_or(false);
        let store = TaskStore::new(repo);

        let mut state = TableState::default();
        if !store.tasks().is_empty() {
            state.select(Some(0));
        }

        App {
            store,
            prefs,
            state,
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            criteria: FilterCriteria::default(),
            show_stats: false,
            dark_mode,
            message: None,
        }
    }

    /// Tasks passing the current filter, in list order.
    pub fn visible(&self) -> Vec<&Task> {
        self.store.filter(&self.criteria).collect()
    }

    fn visible_ids(&self) -> Vec<Uuid> {
        self.store.filter(&self.criteria).map(|t| t.id).collect()
    }

    fn selected_id(&self) -> Option<Uuid> {
        self.state
            .selected()
            .and_then(|i| self.visible_ids().get(i).copied())
    }

    /// Keeps the selection inside the visible list after mutations.
    fn clamp_selection(&mut self) {
        let len = self.visible_ids().len();
        if len == 0 {
            self.state.select(None);
        } else {
            let i = self.state.selected().unwrap_or(0).min(len - 1);
            self.state.select(Some(i));
        }
    }

    pub fn next(&mut self) {
        let len = self.visible_ids().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible_ids().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.toggle_complete(id);
            self.clamp_selection();
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.delete(id);
            self.clamp_selection();
        }
    }

    pub fn cycle_priority_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.cycle_priority(id);
        }
    }

    pub fn move_selected_up(&mut self) {
        self.move_selected(-1);
    }

    pub fn move_selected_down(&mut self) {
        self.move_selected(1);
    }

    /// Reorders within the underlying list (the drag-and-drop
    /// analogue), then re-selects the moved task in the filtered view.
    fn move_selected(&mut self, delta: i64) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some(from) = self.store.tasks().iter().position(|t| t.id == id) else {
            return;
        };
        let to = from as i64 + delta;
        if to < 0 || to as usize >= self.store.tasks().len() {
            return;
        }
        self.store.reorder(from, to as usize);

        if let Some(i) = self.visible_ids().iter().position(|&v| v == id) {
            self.state.select(Some(i));
        }
    }

    pub fn cycle_filter(&mut self) {
        self.criteria.status = match self.criteria.status {
            FilterStatus::All => FilterStatus::Active,
            FilterStatus::Active => FilterStatus::Completed,
            FilterStatus::Completed => FilterStatus::All,
        };
        self.clamp_selection();
    }

    pub fn complete_all(&mut self) {
        self.store.bulk_complete();
        self.clamp_selection();
    }

    pub fn clear_completed(&mut self) {
        self.store.bulk_delete_completed();
        self.clamp_selection();
    }

    pub fn toggle_stats(&mut self) {
        self.show_stats = !self.show_stats;
    }

    pub fn toggle_theme(&mut self) {
        self.dark_mode = !self.dark_mode;
        if let Err(e) = self.prefs.save_dark_mode(self.dark_mode) {
            warn!(error = %e, "could not persist theme preference");
        }
    }

    pub fn enter_add_mode(&mut self) {
        self.start_input(InputMode::Adding, String::new());
    }

    pub fn enter_edit_mode(&mut self) {
        if let Some(id) = self.selected_id() {
            let text = self
                .store
                .find(id)
                .map(|t| t.text.clone())
                .unwrap_or_default();
            self.start_input(InputMode::Editing, text);
        }
    }

    pub fn enter_search_mode(&mut self) {
        self.start_input(InputMode::Searching, self.criteria.query.clone());
    }

    pub fn enter_due_mode(&mut self) {
        if self.selected_id().is_some() {
            self.start_input(InputMode::SettingDue, String::new());
        }
    }

    fn start_input(&mut self, mode: InputMode, initial: String) {
        self.cursor_position = initial.chars().count();
        self.input = initial;
        self.input_mode = mode;
        self.message = None;
    }

    pub fn cancel_input(&mut self) {
        if self.input_mode == InputMode::Searching {
            self.criteria.query.clear();
            self.clamp_selection();
        }
        self.input.clear();
        self.cursor_position = 0;
        self.input_mode = InputMode::Normal;
    }

    pub fn submit_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => {
                self.store.add(&self.input);
                self.clamp_selection();
            }
            InputMode::Editing => {
                if let Some(id) = self.selected_id() {
                    self.store.edit(id, &self.input);
                }
            }
            InputMode::Searching => {
                // Query already applied live while typing.
            }
            InputMode::SettingDue => {
                if let Some(id) = self.selected_id() {
                    if self.input.trim().is_empty() {
                        self.store.set_due_date(id, None);
                    } else {
                        match parse_human_date(&self.input) {
                            Ok(due) => self.store.set_due_date(id, Some(due)),
                            Err(e) => self.message = Some(e.to_string()),
                        }
                    }
                }
            }
            InputMode::Normal => {}
        }

        self.input.clear();
        self.cursor_position = 0;
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self
            .input
            .chars()
            .take(self.cursor_position)
            .map(|c| c.len_utf8())
            .sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
        self.sync_live_search();
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self
                .input
                .chars()
                .take(self.cursor_position - 1)
                .map(|c| c.len_utf8())
                .sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
            self.sync_live_search();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    // The search box filters as you type, like the original search
    // input; other modes only apply on Enter.
    fn sync_live_search(&mut self) {
        if self.input_mode == InputMode::Searching {
            self.criteria.query = self.input.clone();
            self.clamp_selection();
        }
    }
}
