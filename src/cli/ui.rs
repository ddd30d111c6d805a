use super::app::{App, Modal, Pane};
use super::form::{Field, ItemForm};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),  // Title
                Constraint::Length(11), // Create form: three rows of inputs
                Constraint::Length(3),  // Filters
                Constraint::Min(5),     // Item list grows
                Constraint::Length(1),  // Key help
            ]
            .as_ref(),
        )
        .split(f.area());

    let title = Paragraph::new(Line::from(vec![Span::styled(
        "Shopping Cart List",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let form_active = app.pane == Pane::Form && app.edit_form.is_none();
    let mut category_rect = draw_form(f, &app.form, chunks[1], " Add New Item ", form_active);

    draw_filters(f, app, chunks[2]);
    draw_items(f, app, chunks[3]);

    f.render_widget(
        Paragraph::new(help_text(app)).style(Style::default().fg(Color::DarkGray)),
        chunks[4],
    );

    // Edit overlay
    if let Some(form) = app.edit_form.as_ref() {
        let area = centered_rect(70, 13, f.area());
        f.render_widget(Clear, area);
        category_rect = draw_form(f, form, area, " Edit Item ", true);
    }

    // Autocomplete Popup
    if app.popup_open && !app.suggestions.is_empty() {
        draw_suggestions(f, app, category_rect);
    }

    if let Some(modal) = &app.modal {
        draw_modal(f, modal);
    }
}

/// Renders the four inputs and returns the category field's area.
fn draw_form(f: &mut Frame, form: &ItemForm, area: Rect, title: &str, active: bool) -> Rect {
    let border = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title.to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(inner);
    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[1]);

    f.render_widget(form.textarea(Field::Name), rows[0]);
    f.render_widget(form.textarea(Field::Quantity), middle[0]);
    f.render_widget(form.textarea(Field::Category), middle[1]);
    f.render_widget(form.textarea(Field::Note), rows[2]);

    middle[1]
}

fn draw_filters(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(30)])
        .split(area);

    f.render_widget(&app.search, columns[0]);

    let category = Paragraph::new(app.controller.state().filters.category.clone()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Category [c] "),
    );
    f.render_widget(category, columns[1]);
}

fn draw_items(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Items ");
    let state = app.controller.state();

    if state.loading {
        let loading = Paragraph::new("Loading items...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(loading, area);
        return;
    }

    if !state.error.is_empty() {
        let banner = Paragraph::new(state.error.clone())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red))
            .block(block);
        f.render_widget(banner, area);
        return;
    }

    let items = state.filtered();
    if items.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from("No items yet."),
            Line::from("Add your first item above!"),
        ])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = items
        .iter()
        .map(|item| {
            let note = if item.note.is_empty() {
                "-".to_string()
            } else {
                item.note.clone()
            };
            Row::new(vec![
                Cell::from(item.name.clone()),
                Cell::from(item.category.clone()),
                Cell::from(item.quantity.to_string()),
                Cell::from(note),
            ])
        })
        .collect();

    let header = Row::new(vec!["Name", "Category", "Qty", "Note"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(20),
            Constraint::Length(6),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn draw_suggestions(f: &mut Frame, app: &App, field: Rect) {
    let screen = f.area();
    let col = app
        .edit_form
        .as_ref()
        .unwrap_or(&app.form)
        .textarea(Field::Category)
        .cursor()
        .1;

    // below the single input line, inside the field's border
    let popup_x = field.x + (col as u16) + 1;
    let popup_y = field.y + 2;

    // Clamp to screen bounds
    let width = 30.min(screen.width);
    let height = 6.min(app.suggestions.len() as u16 + 2).min(screen.height);

    let area = Rect::new(
        popup_x.min(screen.width.saturating_sub(width)),
        popup_y.min(screen.height.saturating_sub(height)),
        width,
        height,
    );

    f.render_widget(Clear, area);

    let items: Vec<ListItem> = app
        .suggestions
        .iter()
        .map(|s| ListItem::new(s.as_str()))
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.suggestion_index));

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Categories"))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(">> ");

    f.render_stateful_widget(list, area, &mut state);
}

fn draw_modal(f: &mut Frame, modal: &Modal) {
    let (title, color, lines) = match modal {
        Modal::Alert(message) => (
            " Alert ",
            Color::Red,
            vec![
                Line::from(message.clone()),
                Line::from(""),
                Line::from(Span::styled("[Enter] OK", Style::default().fg(Color::DarkGray))),
            ],
        ),
        Modal::ConfirmDelete { name, .. } => (
            " Confirm ",
            Color::Yellow,
            vec![
                Line::from("Delete this item?"),
                Line::from(Span::styled(
                    name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "[y] Yes   [n] No",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
        ),
    };

    let area = centered_rect(44, lines.len() as u16 + 2, f.area());
    f.render_widget(Clear, area);
    let dialog = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title),
        );
    f.render_widget(dialog, area);
}

fn help_text(app: &App) -> &'static str {
    if app.modal.is_some() {
        return "";
    }
    if app.edit_form.is_some() {
        return " Tab next field | Enter save changes | Esc cancel";
    }
    match app.pane {
        Pane::List => {
            " ↑/↓ select | e edit | d delete | a add | / search | c category | r reset | R reload | q quit"
        }
        Pane::Form => " Tab next field | Enter add item | Esc back to list",
        Pane::Search => " type to filter | Enter/Esc back to list",
    }
}

fn centered_rect(width_percent: u16, height: u16, area: Rect) -> Rect {
    let scaled = u32::from(area.width) * u32::from(width_percent) / 100;
    let width = u16::try_from(scaled)
        .unwrap_or(area.width)
        .max(20)
        .min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
