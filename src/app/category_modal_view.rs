use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState},
};

use super::{App, view_style};

impl App {
    pub(super) fn render_modal(&self, f: &mut Frame, terminal_size: Rect) {
        let modal_rect = self.modal_rect_ratio(terminal_size, 1, 3);
        let active = self.timer.machine().category();

        let items: Vec<ListItem> = self
            .categories
            .iter()
            .enumerate()
            .map(|(i, cat)| {
                let color = view_style::color_for_index(i);
                let label = if self.rename_target.as_deref() == Some(cat.id.as_str()) {
                    format!("{}_", self.new_category_name)
                } else {
                    cat.name.clone()
                };
                let dot = if active == Some(cat.name.as_str()) {
                    "● "
                } else {
                    "○ "
                };

                if i == self.selected_index {
                    let text_color = view_style::text_color_for_bg(color);
                    ListItem::new(Line::from(vec![
                        Span::raw(dot).fg(text_color),
                        Span::raw(label).fg(text_color),
                    ]))
                    .style(Style::default().fg(text_color).bg(color))
                } else {
                    ListItem::new(Line::from(vec![
                        Span::raw(dot).fg(color),
                        Span::raw(label).fg(Color::White),
                    ]))
                }
            })
            .chain(std::iter::once({
                let label = if self.new_category_name.is_empty() {
                    "+ Add new..."
                } else {
                    self.new_category_name.as_str()
                };

                if self.is_on_insert_space() {
                    ListItem::new(Line::from(vec![Span::raw(label)]))
                        .style(Style::default().fg(Color::Black).bg(Color::White))
                } else {
                    ListItem::new(Line::from(vec![Span::raw(label).fg(Color::White)]))
                }
            }))
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(self.selected_index));

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(Line::from(Span::styled(
                        "categories",
                        Style::default().fg(Color::White),
                    )))
                    .title_alignment(Alignment::Center)
                    .title_bottom(
                        Line::from(Span::styled(
                            "enter select · e rename · x delete · esc close",
                            Style::default().fg(Color::Gray),
                        ))
                        .alignment(Alignment::Center),
                    )
                    .border_style(Style::default().fg(Color::White)),
            )
            .highlight_style(Style::default());

        f.render_widget(Clear, modal_rect);
        f.render_stateful_widget(list, modal_rect, &mut list_state);
    }
}
