use chrono::Local;

use crate::stats::summarize;

use super::{App, UiMode};

impl App {
    pub(super) fn open_report_modal(&mut self) {
        let sessions = self.sessions.list_all();
        let summary = summarize(&sessions, Local::now().date_naive());
        self.today_focus_sec = summary.today_focus_sec;
        self.report = Some(summary);
        self.ui_mode = UiMode::ReportModal;
        self.render_needed = true;
    }

    pub(super) fn close_report_modal(&mut self) {
        self.ui_mode = UiMode::Main;
        self.report = None;
        self.render_needed = true;
    }
}
