use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::timer::TimerEvent;

use super::{App, ui_helpers};

impl App {
    pub(super) fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        if self.in_category_modal() {
            self.handle_modal_key(key);
            false
        } else if self.in_report_modal() {
            self.handle_report_modal_key(key);
            false
        } else if self.in_duration_prompt() {
            self.handle_duration_key(key);
            false
        } else {
            self.handle_normal_key(key)
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        if self.rename_target.is_some() {
            self.handle_rename_key(key);
            self.render_needed = true;
            return;
        }

        match key.code {
            KeyCode::Esc => self.close_modal(),
            KeyCode::Up => {
                let total_rows = self.categories.len() + 1;
                self.selected_index = ui_helpers::wrap_prev_index(self.selected_index, total_rows);
            }
            KeyCode::Down => {
                let total_rows = self.categories.len() + 1;
                self.selected_index = ui_helpers::wrap_next_index(self.selected_index, total_rows);
            }
            KeyCode::Enter => {
                if self.is_on_insert_space() {
                    if !self.new_category_name.is_empty() {
                        self.add_category();
                        self.close_modal();
                    }
                } else {
                    self.choose_selected_category();
                    self.close_modal();
                }
            }
            KeyCode::Char('x') if !self.is_on_insert_space() => self.delete_category(),
            KeyCode::Char('e') if !self.is_on_insert_space() => self.begin_rename(),
            KeyCode::Char(c) if self.is_on_insert_space() => self.new_category_name.push(c),
            KeyCode::Backspace if self.is_on_insert_space() => {
                self.new_category_name.pop();
            }
            _ => {}
        }
        self.render_needed = true;
    }

    fn handle_rename_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.rename_target = None;
                self.new_category_name.clear();
            }
            KeyCode::Enter => self.rename_category(),
            KeyCode::Char(c) => self.new_category_name.push(c),
            KeyCode::Backspace => {
                self.new_category_name.pop();
            }
            _ => {}
        }
    }

    fn handle_report_modal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('k') | KeyCode::Char('q') => self.close_report_modal(),
            KeyCode::Char('R') => self.open_report_modal(),
            _ => {}
        }
    }

    fn handle_duration_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.close_duration_prompt(),
            KeyCode::Enter => {
                self.timer
                    .post(TimerEvent::StageDuration(self.duration_input.clone()));
                self.close_duration_prompt();
            }
            KeyCode::Char(c) if c.is_ascii_digit() && self.duration_input.len() < 4 => {
                self.duration_input.push(c);
            }
            KeyCode::Backspace => {
                self.duration_input.pop();
            }
            _ => {}
        }
        self.render_needed = true;
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char(' ') | KeyCode::Char('s') => self.timer.post(TimerEvent::Start),
            KeyCode::Char('p') => self.timer.post(TimerEvent::Pause),
            KeyCode::Char('r') => self.timer.post(TimerEvent::Reset),
            KeyCode::Char('d') => self.open_duration_prompt(),
            KeyCode::Char('c') | KeyCode::Enter => self.open_modal(),
            KeyCode::Char('k') => self.open_report_modal(),
            _ => {}
        }
        false
    }
}
