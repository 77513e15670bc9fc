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
    let budgets = app.visible_budgets();
    let title = list_title("Monthly Budgets", app.ledger.visible.budgets, app);

    if budgets.is_empty() {
        render_empty(f, area, app, title);
        return;
    }

    let name_width = (area.width as usize).saturating_sub(36).clamp(10, 40);
    let items: Vec<ListItem> = budgets
        .iter()
        .enumerate()
        .skip(app.budget_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, budget)| {
            let style = row_style(p, i, app.budget_index);
            let mut spans = Vec::new();
            if app.ledger.bulk_mode {
                spans.push(checkbox(
                    p,
                    app.ledger.is_selected(Kind::Budget, &budget.id),
                ));
            }
            spans.push(Span::styled(
                format!(
                    "{:<width$} ",
                    truncate(&budget.category, name_width),
                    width = name_width
                ),
                style.add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(format!("{:<9}", budget.month), p.dim_style()));
            spans.push(Span::styled(
                format!(" {:>14} ", format_amount(budget.amount)),
                Style::default().fg(p.header_bg).bg(p.accent),
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

fn render_empty(f: &mut Frame, area: Rect, app: &App, title: String) {
    let p = app.palette();
    let hint = if app.ledger.budgets.is_empty() {
        "Use :budget <category> <amount> [YYYY-MM] to add one"
    } else {
        "No budgets match the current filter (:clear-filters)"
    };
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("No budgets to show", p.dim_style())),
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
}
