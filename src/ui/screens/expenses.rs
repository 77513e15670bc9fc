use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::{checkbox, list_title, row_style};
use crate::ledger::Kind;
use crate::ui::app::App;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let expenses = app.visible_expenses();
    let title = list_title("Daily Expenses", app.ledger.visible.expenses, app);

    if expenses.is_empty() {
        let hint = if app.ledger.expenses.is_empty() {
            "Use :expense <description> <amount> [@category] [YYYY-MM-DD] to add one"
        } else {
            "No expenses match the current filter (:clear-filters)"
        };
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No expenses to show", p.dim_style())),
            Line::from(""),
            Line::from(Span::styled(hint, p.dim_style())),
        ])
        .centered()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.overlay))
                .title(Span::styled(title, p.title_style())),
        );
        f.render_widget(msg, area);
        return;
    }

    let desc_width = (area.width as usize).saturating_sub(50).clamp(10, 48);
    let items: Vec<ListItem> = expenses
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, expense)| {
            let style = row_style(p, i, app.expense_index);
            let mut spans = Vec::new();
            if app.ledger.bulk_mode {
                spans.push(checkbox(
                    p,
                    app.ledger.is_selected(Kind::Expense, &expense.id),
                ));
            }
            spans.push(Span::styled(
                format!(
                    "{:<width$} ",
                    truncate(&expense.description, desc_width),
                    width = desc_width
                ),
                style.add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!("{:<14} {:<11}", truncate(expense.category_label(), 14), expense.date),
                p.dim_style(),
            ));
            spans.push(Span::styled(
                format!(" {:>14} ", format_amount(expense.amount)),
                Style::default().fg(p.header_bg).bg(p.red),
            ));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(p.overlay))
            .title(Span::styled(title, p.title_style())),
    );
    f.render_widget(list, area);
}
