use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{BarChart, Block, BorderType, Borders, Clear, List, ListItem, Paragraph},
};

use crate::time_format::{format_hms, format_short, truncate_label};

use super::{App, view_style};

impl App {
    pub(super) fn render_report_modal(&self, f: &mut Frame, terminal_size: Rect) {
        let Some(summary) = self.report.as_ref() else {
            return;
        };
        let modal_rect = self.modal_rect_ratio(terminal_size, 2, 3);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(
                Line::from(Span::styled("reports", Style::default().fg(Color::White)))
                    .alignment(Alignment::Center),
            )
            .title_bottom(
                Line::from(Span::styled(
                    "R refresh · esc close",
                    Style::default().fg(Color::Gray),
                ))
                .alignment(Alignment::Center),
            )
            .border_style(Style::default().fg(Color::White));

        let inner = block.inner(modal_rect);
        f.render_widget(Clear, modal_rect);
        f.render_widget(block, modal_rect);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(6),
                Constraint::Length(1),
                Constraint::Length(summary.by_category.len().clamp(1, 6) as u16),
            ])
            .split(inner);

        let totals = Paragraph::new(vec![
            Line::from(vec![
                Span::raw("today ").fg(Color::Gray),
                Span::raw(format_hms(summary.today_focus_sec)).bold(),
                Span::raw("  ·  all time ").fg(Color::Gray),
                Span::raw(format_hms(summary.all_time_focus_sec)).bold(),
            ]),
            Line::from(vec![
                Span::raw(format!(
                    "{} sessions · {} completed · {} distractions",
                    summary.session_count, summary.completed_count, summary.all_time_distractions
                ))
                .fg(Color::Gray),
            ]),
        ])
        .alignment(Alignment::Center);
        f.render_widget(totals, rows[0]);

        let bars: Vec<(&str, u64)> = summary
            .last_seven_days
            .iter()
            .map(|day| (day.label.as_str(), day.focus_sec / 60))
            .collect();
        let bar_width = (rows[1].width.saturating_sub(8) / 7).clamp(3, 9);
        let chart = BarChart::default()
            .block(Block::default().title(Line::from(Span::styled(
                "minutes, last 7 days",
                Style::default().fg(Color::Gray),
            ))))
            .data(bars.as_slice())
            .bar_width(bar_width)
            .bar_gap(1)
            .bar_style(Style::default().fg(view_style::color_for_index(0)))
            .value_style(Style::default().fg(Color::Black).bg(view_style::color_for_index(0)))
            .label_style(Style::default().fg(Color::White));
        f.render_widget(chart, rows[1]);

        let heading = Paragraph::new(Line::from(Span::styled(
            "by category",
            Style::default().fg(Color::Gray),
        )));
        f.render_widget(heading, rows[2]);

        let items: Vec<ListItem> = if summary.by_category.is_empty() {
            vec![ListItem::new(Line::from(
                Span::raw("no sessions yet").fg(Color::DarkGray),
            ))]
        } else {
            summary
                .by_category
                .iter()
                .enumerate()
                .map(|(i, share)| {
                    ListItem::new(Line::from(vec![
                        Span::raw("● ").fg(view_style::color_for_index(i)),
                        Span::raw(format!("{:<20}", truncate_label(&share.name, 20)))
                            .fg(Color::White),
                        Span::raw(format!("{:>8}", format_short(share.focus_sec))).fg(Color::Gray),
                        Span::raw(format!("{:>5}%", share.percent)).fg(Color::White),
                    ]))
                })
                .collect()
        };
        f.render_widget(List::new(items), rows[3]);
    }
}
