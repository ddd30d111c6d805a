use cartlist::core::{DEFAULT_CATEGORY, Item, ItemDraft, Quantity};
use ratatui::{
    style::{Color, Style},
    widgets::{Block, Borders},
};
use std::fmt;
use tui_textarea::{CursorMove, Input, Key, TextArea};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Quantity,
    Category,
    Note,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Quantity, Field::Category, Field::Note];

    fn index(self) -> usize {
        match self {
            Field::Name => 0,
            Field::Quantity => 1,
            Field::Category => 2,
            Field::Note => 3,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn label(self) -> &'static str {
        match self {
            Field::Name => " Name ",
            Field::Quantity => " Quantity ",
            Field::Category => " Category ",
            Field::Note => " Note ",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            Field::Name => "e.g. Apples",
            Field::Quantity => "1",
            Field::Category => "e.g. Produce",
            Field::Note => "Optional",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    NameRequired,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::NameRequired => write!(f, "Please enter a name"),
        }
    }
}

/// Create/edit form. A form built with [`ItemForm::edit`] is bound to an
/// existing item; otherwise it creates new ones and can be cleared after a
/// successful submit.
pub struct ItemForm<'a> {
    fields: [TextArea<'a>; 4],
    focus: Field,
    initial: Option<Item>,
}

impl<'a> ItemForm<'a> {
    pub fn create() -> Self {
        let mut form = Self {
            fields: Field::ALL.map(|field| new_field(field, "")),
            focus: Field::Name,
            initial: None,
        };
        form.reset();
        form
    }

    pub fn edit(item: &Item) -> Self {
        let mut form = Self {
            fields: Field::ALL.map(|field| new_field(field, "")),
            focus: Field::Name,
            initial: Some(item.clone()),
        };
        form.set_value(Field::Name, &item.name);
        form.set_value(Field::Quantity, &item.quantity.to_string());
        form.set_value(Field::Category, item.display_category());
        form.set_value(Field::Note, &item.note);
        form.refresh_styles();
        form
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.initial.as_ref().map(|item| item.id.as_str())
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn set_focus(&mut self, field: Field) {
        self.focus = field;
        self.refresh_styles();
    }

    pub fn focus_next(&mut self) {
        self.set_focus(self.focus.next());
    }

    pub fn focus_prev(&mut self) {
        self.set_focus(self.focus.prev());
    }

    pub fn textarea(&self, field: Field) -> &TextArea<'a> {
        &self.fields[field.index()]
    }

    pub fn value(&self, field: Field) -> String {
        self.fields[field.index()].lines().join("")
    }

    pub fn set_value(&mut self, field: Field, value: &str) {
        let mut textarea = new_field(field, value);
        style_field(&mut textarea, field, field == self.focus);
        self.fields[field.index()] = textarea;
    }

    /// Feeds a key to the focused field. Line breaks are swallowed; every
    /// field is a single line.
    pub fn input(&mut self, input: impl Into<Input>) -> bool {
        let input = input.into();
        if matches!(input.key, Key::Enter) || (input.ctrl && input.key == Key::Char('m')) {
            return false;
        }
        self.fields[self.focus.index()].input(input)
    }

    /// Builds the payload from the trimmed inputs.
    pub fn submit(&self) -> Result<ItemDraft, FormError> {
        let name = self.value(Field::Name).trim().to_string();
        if name.is_empty() {
            return Err(FormError::NameRequired);
        }

        let quantity = self.quantity();

        let category = match self.value(Field::Category).trim() {
            "" => DEFAULT_CATEGORY.to_string(),
            category => category.to_string(),
        };

        Ok(ItemDraft {
            name,
            quantity,
            category,
            note: self.value(Field::Note).trim().to_string(),
        })
    }

    /// Entered quantity; anything that is not a number `>= 1` becomes 1.
    /// An edit form left at the stored value keeps it even when it is below
    /// that minimum.
    fn quantity(&self) -> Quantity {
        let raw = self.value(Field::Quantity);
        let raw = raw.trim();
        if let Some(item) = &self.initial {
            if raw == item.quantity.to_string() {
                return item.quantity;
            }
        }

        raw.parse::<f64>()
            .ok()
            .filter(|value| *value >= 1.0)
            .and_then(Quantity::new)
            .unwrap_or_default()
    }

    /// Clears a create form back to its defaults. Edit forms are left alone.
    pub fn reset(&mut self) {
        if self.initial.is_some() {
            return;
        }
        self.focus = Field::Name;
        self.set_value(Field::Name, "");
        self.set_value(Field::Quantity, "1");
        self.set_value(Field::Category, DEFAULT_CATEGORY);
        self.set_value(Field::Note, "");
        self.refresh_styles();
    }

    fn refresh_styles(&mut self) {
        for field in Field::ALL {
            let focused = field == self.focus;
            style_field(&mut self.fields[field.index()], field, focused);
        }
    }
}

fn new_field<'a>(field: Field, value: &str) -> TextArea<'a> {
    let mut textarea = TextArea::new(vec![value.to_string()]);
    textarea.move_cursor(CursorMove::End);
    textarea.set_placeholder_text(field.placeholder());
    textarea.set_cursor_line_style(Style::default());
    textarea
}

fn style_field(textarea: &mut TextArea<'_>, field: Field, focused: bool) {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(field.label()),
    );
    let cursor = if focused {
        Style::default().bg(Color::White)
    } else {
        Style::default()
    };
    textarea.set_cursor_style(cursor);
}
