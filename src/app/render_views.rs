use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph},
};

use crate::{
    timer::TimerPhase,
    time_format::{format_countdown, format_hms},
};

use super::{App, ui_helpers, view_style};

const MAIN_HELP: &str = "space start · p save · r reset · d duration · c category · k reports · q quit";

impl App {
    pub(super) fn draw_frame(&self, f: &mut Frame) {
        let size = f.size();
        let machine = self.timer.machine();
        let phase = machine.phase();
        let border_color = view_style::phase_color(phase);

        let category_name = machine.category().unwrap_or("no category").to_string();
        let phase_label = match (phase, machine.staged_minutes()) {
            (TimerPhase::Idle, Some(minutes)) => format!("ready · next {} min", minutes),
            _ => view_style::phase_label(phase).to_string(),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(
                Line::from(Span::styled(
                    category_name,
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Left),
            )
            .title(
                Line::from(Span::styled(phase_label, Style::default().fg(border_color)))
                    .alignment(Alignment::Center),
            )
            .title(
                Line::from(Span::styled(
                    format!("today {}", format_hms(self.today_focus_sec)),
                    Style::default().fg(Color::White),
                ))
                .alignment(Alignment::Right),
            )
            .title_bottom(
                Line::from(Span::styled(MAIN_HELP, Style::default().fg(Color::Gray)))
                    .alignment(Alignment::Center),
            )
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(size);
        f.render_widget(block, size);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let countdown = Paragraph::new(Line::from(Span::styled(
            format_countdown(machine.display_secs()),
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        f.render_widget(countdown, rows[1]);

        let ratio = ui_helpers::progress_ratio(machine.configured_secs(), machine.remaining_secs());
        let gauge_area = centered_width(rows[3], 40);
        let gauge = Gauge::default()
            .ratio(ratio)
            .label(format!("{:.0}%", ratio * 100.0))
            .gauge_style(Style::default().fg(border_color).bg(Color::DarkGray));
        f.render_widget(gauge, gauge_area);

        let details = Paragraph::new(Line::from(vec![
            Span::styled(
                format!(
                    "{} min",
                    machine
                        .staged_minutes()
                        .unwrap_or(machine.configured_secs() / 60)
                ),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(" · ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("distractions {}", machine.distractions()),
                Style::default().fg(if machine.distractions() > 0 {
                    Color::Yellow
                } else {
                    Color::Gray
                }),
            ),
        ]))
        .alignment(Alignment::Center);
        f.render_widget(details, rows[4]);

        if let Some(status) = &self.status {
            let color = if status.is_error { Color::Red } else { Color::Green };
            let status_line = Paragraph::new(Line::from(Span::styled(
                status.text.as_str(),
                Style::default().fg(color),
            )))
            .alignment(Alignment::Center);
            f.render_widget(status_line, rows[6]);
        }

        if self.in_category_modal() {
            self.render_modal(f, size);
        } else if self.in_report_modal() {
            self.render_report_modal(f, size);
        } else if self.in_duration_prompt() {
            self.render_duration_prompt(f, size);
        }
    }

    fn render_duration_prompt(&self, f: &mut Frame, terminal_size: Rect) {
        let width = 32u16.min(terminal_size.width.saturating_sub(2)).max(1);
        let height = 3u16.min(terminal_size.height).max(1);
        let area = Rect::new(
            terminal_size.width.saturating_sub(width) / 2,
            terminal_size.height.saturating_sub(height) / 2,
            width,
            height,
        );

        let text = if self.duration_input.is_empty() {
            Span::styled("minutes…", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(
                self.duration_input.as_str(),
                Style::default().fg(Color::White),
            )
        };

        let prompt = Paragraph::new(Line::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(Line::from("duration").alignment(Alignment::Center))
                .border_style(Style::default().fg(Color::White)),
        );
        f.render_widget(Clear, area);
        f.render_widget(prompt, area);
    }
}

fn centered_width(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y,
        width,
        area.height,
    )
}
