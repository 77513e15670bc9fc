pub(crate) mod budgets;
pub(crate) mod dashboard;
pub(crate) mod expenses;

use ratatui::{style::Style, text::Span};

use super::app::App;
use super::theme::Palette;
use crate::ledger::count_label;

fn row_style(p: &Palette, row: usize, cursor: usize) -> Style {
    if row == cursor {
        p.selected_style()
    } else if row % 2 == 0 {
        p.alt_row_style()
    } else {
        p.normal_style()
    }
}

fn checkbox(p: &Palette, checked: bool) -> Span<'static> {
    if checked {
        Span::styled("[x] ", Style::default().fg(p.accent))
    } else {
        Span::styled("[ ] ", p.dim_style())
    }
}

/// ` Monthly Budgets (3 items, 2 selected) `
fn list_title(name: &str, visible: usize, app: &App) -> String {
    let mut extra = count_label(visible);
    if app.ledger.bulk_mode {
        extra.push_str(&format!(", {} selected", app.ledger.selection.len()));
    }
    format!(" {name} ({extra}) ")
}
