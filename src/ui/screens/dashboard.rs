use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ledger::count_label;
use crate::ui::app::App;
use crate::ui::theme::Palette;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Min(10),   // Category chart
            Constraint::Length(8), // Month-to-date progress
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_category_chart(f, chunks[1], app);
    render_budget_progress(f, chunks[2], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let summary = &app.ledger.summary;
    let visible = app.ledger.visible;

    render_card(
        f,
        p,
        cards[0],
        "Total Budget",
        format_amount(summary.total_budget),
        p.accent,
        count_label(visible.budgets),
    );
    render_card(
        f,
        p,
        cards[1],
        "Total Expenses",
        format_amount(summary.total_expenses),
        p.red,
        count_label(visible.expenses),
    );
    render_card(
        f,
        p,
        cards[2],
        "Remaining",
        format_amount(summary.remaining),
        p.level_color(summary.tone),
        if app.ledger.filter.is_empty() {
            "all rows".into()
        } else {
            "filtered".into()
        },
    );
    let (rate, rate_color) = match &app.analytics {
        Some(a) if a.savings_rate < Decimal::ZERO => (format!("{}%", a.savings_rate), p.red),
        Some(a) => (format!("{}%", a.savings_rate), p.green),
        None => ("n/a".to_string(), p.text_dim),
    };
    render_card(
        f,
        p,
        cards[3],
        "Savings Rate",
        rate,
        rate_color,
        "this month".into(),
    );
}

fn render_card(
    f: &mut Frame,
    p: &Palette,
    area: Rect,
    title: &str,
    display: String,
    color: Color,
    subtitle: String,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.overlay))
        .title(Span::styled(format!(" {title} "), p.title_style()));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            display,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, p.dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_category_chart(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let chart = &app.ledger.chart;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.overlay))
        .title(Span::styled(
            format!(" Expenses by Category ({}) ", format_amount(chart.total())),
            p.title_style(),
        ));

    if chart.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No expenses yet. Add one with :expense <description> <amount>",
            p.dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = chart
        .slices()
        .take(12)
        .map(|(label, amount)| {
            Bar::default()
                .value(amount.round().to_u64().unwrap_or(0))
                .text_value(format_amount(amount))
                .label(Line::from(truncate(label, 12)))
                .style(Style::default().fg(p.accent))
                .value_style(Style::default().fg(p.header_bg).bg(p.accent))
        })
        .collect();

    let widget = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(12)
        .bar_gap(1)
        .bar_style(Style::default().fg(p.accent))
        .value_style(Style::default().fg(p.text));

    f.render_widget(widget, area);
}

fn render_budget_progress(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.overlay))
        .title(Span::styled(" This Month ", p.title_style()));

    let Some(analytics) = app.analytics.as_ref().filter(|a| !a.budget_progress.is_empty()) else {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No budgets for the current month",
            p.dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    };

    let items: Vec<ListItem> = analytics
        .budget_progress
        .iter()
        .take(area.height.saturating_sub(2) as usize)
        .map(|progress| {
            let ratio = if progress.budgeted > Decimal::ZERO {
                (progress.spent / progress.budgeted)
                    .to_f64()
                    .unwrap_or(0.0)
                    .min(1.0)
            } else {
                0.0
            };
            let color = if ratio > 0.9 {
                p.red
            } else if ratio > 0.7 {
                p.yellow
            } else {
                p.green
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<18}", truncate(&progress.category, 17)),
                    p.normal_style(),
                ),
                Span::styled(
                    format!(
                        "{}/{} ",
                        format_amount(progress.spent),
                        format_amount(progress.budgeted)
                    ),
                    Style::default().fg(color),
                ),
                Span::styled(progress_bar(ratio, 20), Style::default().fg(color)),
                Span::styled(
                    format!(" {:.0}%", ratio * 100.0),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = (ratio * width as f64) as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
