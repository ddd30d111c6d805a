use super::autocomplete::Autocompleter;
use super::form::{Field, ItemForm};
use super::ui;
use cartlist::client::{Action, ListController};
use cartlist::core::Item;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    style::Style,
    widgets::{Block, Borders, TableState},
};
use std::{error::Error, io};
use tui_textarea::TextArea;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Form,
    Search,
    List,
}

/// Blocking dialogs drawn over the main screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Alert(String),
    ConfirmDelete { id: String, name: String },
}

pub struct App<'a> {
    pub controller: ListController,
    pub form: ItemForm<'a>,
    pub edit_form: Option<ItemForm<'a>>,
    pub search: TextArea<'a>,
    pub pane: Pane,
    pub modal: Option<Modal>,
    pub table_state: TableState,
    pub exit: bool,

    // Autocomplete State
    pub autocompleter: Autocompleter,
    pub suggestions: Vec<String>,
    pub suggestion_index: usize,
    pub popup_open: bool,
}

impl<'a> App<'a> {
    pub fn new(controller: ListController) -> Self {
        Self {
            controller,
            form: ItemForm::create(),
            edit_form: None,
            search: Self::new_search(),
            pane: Pane::List,
            modal: None,
            table_state: TableState::default(),
            exit: false,
            autocompleter: Autocompleter::new(),
            suggestions: Vec::new(),
            suggestion_index: 0,
            popup_open: false,
        }
    }

    fn new_search() -> TextArea<'static> {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text("Search...");
        textarea.set_cursor_line_style(Style::default());
        textarea.set_block(Block::default().borders(Borders::ALL).title(" Search "));
        textarea
    }

    pub fn visible_items(&self) -> Vec<&Item> {
        self.controller.state().filtered()
    }

    fn selected_item(&self) -> Option<Item> {
        let index = self.table_state.selected()?;
        self.visible_items().get(index).map(|item| (*item).clone())
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_items().len();
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            Some(index) if index >= len => self.table_state.select(Some(len - 1)),
            None => self.table_state.select(Some(0)),
            Some(_) => {}
        }
    }

    fn alert(&mut self, message: impl Into<String>) {
        self.modal = Some(Modal::Alert(message.into()));
    }

    /// Form currently receiving keys: the edit overlay when open, otherwise
    /// the create form.
    fn active_form(&mut self) -> &mut ItemForm<'a> {
        match self.edit_form.as_mut() {
            Some(form) => form,
            None => &mut self.form,
        }
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn Error>> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        if let Err(err) = res {
            println!("{:?}", err);
        }

        Ok(())
    }

    async fn run_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        // show the loading state while the initial fetch is in flight
        terminal.draw(|f| ui::draw(f, self))?;
        self.controller.load().await;
        self.clamp_selection();

        loop {
            terminal.draw(|f| ui::draw(f, self))?;

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key).await;
                }
            }
            if self.exit {
                return Ok(());
            }
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.exit = true;
            return;
        }

        if let Some(modal) = self.modal.clone() {
            self.handle_modal_key(modal, key).await;
            return;
        }

        if self.edit_form.is_some() {
            self.handle_form_key(key).await;
            return;
        }

        match self.pane {
            Pane::List => self.handle_list_key(key).await,
            Pane::Form => self.handle_form_key(key).await,
            Pane::Search => self.handle_search_key(key),
        }
    }

    async fn handle_modal_key(&mut self, modal: Modal, key: KeyEvent) {
        match modal {
            Modal::Alert(_) => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                    self.modal = None;
                }
            }
            Modal::ConfirmDelete { id, .. } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.modal = None;
                    if let Err(err) = self.controller.delete(&id).await {
                        self.alert(err.to_string());
                    }
                    self.clamp_selection();
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.modal = None,
                _ => {}
            },
        }
    }

    async fn handle_list_key(&mut self, key: KeyEvent) {
        let len = self.visible_items().len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.exit = true,
            KeyCode::Down | KeyCode::Char('j') if len > 0 => {
                let next = self.table_state.selected().map_or(0, |i| (i + 1) % len);
                self.table_state.select(Some(next));
            }
            KeyCode::Up | KeyCode::Char('k') if len > 0 => {
                let prev = self
                    .table_state
                    .selected()
                    .map_or(0, |i| (i + len - 1) % len);
                self.table_state.select(Some(prev));
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(item) = self.selected_item() {
                    self.edit_form = Some(ItemForm::edit(&item));
                    self.controller.dispatch(Action::StartEdit(item));
                }
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                if let Some(item) = self.selected_item() {
                    self.modal = Some(Modal::ConfirmDelete {
                        id: item.id,
                        name: item.name,
                    });
                }
            }
            KeyCode::Char('a') | KeyCode::Char('n') => {
                self.form.set_focus(Field::Name);
                self.pane = Pane::Form;
            }
            KeyCode::Char('/') => self.pane = Pane::Search,
            KeyCode::Char('c') => self.cycle_category(),
            KeyCode::Char('r') => {
                self.search = Self::new_search();
                self.controller.dispatch(Action::ResetFilters);
                self.clamp_selection();
            }
            KeyCode::F(5) | KeyCode::Char('R') => {
                self.controller.load().await;
                self.clamp_selection();
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Tab => self.pane = Pane::List,
            _ => {
                self.search.input(key);
                let query = self.search.lines().join("");
                self.controller.dispatch(Action::SetQuery(query));
                self.clamp_selection();
            }
        }
    }

    fn cycle_category(&mut self) {
        let categories = self.controller.state().categories();
        let current = &self.controller.state().filters.category;
        let next = categories
            .iter()
            .position(|c| c == current)
            .map_or(0, |i| (i + 1) % categories.len());
        self.controller
            .dispatch(Action::SetCategory(categories[next].clone()));
        self.clamp_selection();
    }

    async fn handle_form_key(&mut self, key: KeyEvent) {
        // Navigation inside Popup
        if self.popup_open {
            match key.code {
                KeyCode::Down => {
                    let len = self.suggestions.len();
                    if len > 0 {
                        self.suggestion_index = (self.suggestion_index + 1) % len;
                    }
                    return;
                }
                KeyCode::Up => {
                    let len = self.suggestions.len();
                    if len > 0 {
                        self.suggestion_index = (self.suggestion_index + len - 1) % len;
                    }
                    return;
                }
                KeyCode::Enter | KeyCode::Tab => {
                    self.accept_suggestion();
                    return;
                }
                KeyCode::Esc => {
                    self.popup_open = false;
                    return;
                }
                _ => {
                    // typing continues in the field
                    self.popup_open = false;
                }
            }
        }

        match key.code {
            KeyCode::Esc => self.close_form(),
            KeyCode::Tab | KeyCode::Down => self.active_form().focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.active_form().focus_prev(),
            KeyCode::Enter => self.submit_form().await,
            _ => {
                self.active_form().input(key);
                if self.active_form().focus() == Field::Category {
                    self.update_suggestions();
                }
            }
        }
    }

    fn close_form(&mut self) {
        self.popup_open = false;
        if self.edit_form.take().is_some() {
            self.controller.dispatch(Action::CancelEdit);
        } else {
            self.pane = Pane::List;
        }
    }

    async fn submit_form(&mut self) {
        let draft = match self.active_form().submit() {
            Ok(draft) => draft,
            Err(err) => {
                self.alert(err.to_string());
                return;
            }
        };

        let editing_id = self
            .edit_form
            .as_ref()
            .and_then(|form| form.editing_id().map(str::to_string));

        match editing_id {
            Some(id) => match self.controller.update(&id, &draft).await {
                Ok(_) => self.edit_form = None,
                Err(err) => self.alert(err.to_string()),
            },
            None => match self.controller.add(&draft).await {
                Ok(_) => {
                    self.form.reset();
                    self.table_state.select(Some(0));
                }
                Err(err) => self.alert(err.to_string()),
            },
        }
        self.clamp_selection();
    }

    fn update_suggestions(&mut self) {
        let word = self.active_form().value(Field::Category);
        let categories = self.controller.state().categories();
        self.suggestions = self.autocompleter.get_suggestions(&word, &categories);
        self.suggestion_index = 0;
        self.popup_open = !self.suggestions.is_empty();
    }

    fn accept_suggestion(&mut self) {
        self.popup_open = false;
        let Some(suggestion) = self.suggestions.get(self.suggestion_index).cloned() else {
            return;
        };
        let form = self.active_form();
        form.set_value(Field::Category, &suggestion);
    }
}
