use chrono::Local;

use crate::{
    stats::summarize,
    timer::{TimerEvent, TimerPhase},
};

use super::App;

impl App {
    pub(super) fn refresh_categories(&mut self) {
        self.categories = self.registry.list();
        if self.selected_index > self.categories.len() {
            self.selected_index = self.categories.len();
        }
        self.render_needed = true;
    }

    pub(super) fn refresh_today(&mut self) {
        let sessions = self.sessions.list_all();
        self.today_focus_sec = summarize(&sessions, Local::now().date_naive()).today_focus_sec;
    }

    pub(super) fn is_on_insert_space(&self) -> bool {
        self.selected_index == self.categories.len()
    }

    pub(super) fn add_category(&mut self) {
        match self.registry.add(&self.new_category_name) {
            Ok(category) => {
                self.timer.post(TimerEvent::SelectCategory(category.name.clone()));
                self.set_info(format!("Added {}", category.name));
                self.refresh_categories();
            }
            Err(e) => self.set_error(e.to_string()),
        }
        self.new_category_name.clear();
    }

    pub(super) fn delete_category(&mut self) {
        let Some(category) = self.categories.get(self.selected_index).cloned() else {
            return;
        };

        if let Err(e) = self.registry.delete(&category.id) {
            self.set_error(format!("Could not delete {}: {}", category.name, e));
            return;
        }

        let machine = self.timer.machine();
        let was_selected = machine.category() == Some(category.name.as_str());
        if was_selected && machine.phase() == TimerPhase::Idle {
            self.timer.post(TimerEvent::ClearCategory);
        }
        self.set_info(format!("Deleted {}", category.name));
        self.refresh_categories();
        if self.selected_index > 0 && self.selected_index >= self.categories.len() {
            self.selected_index = self.categories.len().saturating_sub(1);
        }
    }

    pub(super) fn begin_rename(&mut self) {
        if let Some(category) = self.categories.get(self.selected_index) {
            self.rename_target = Some(category.id.clone());
            self.new_category_name = category.name.clone();
        }
    }

    pub(super) fn rename_category(&mut self) {
        let Some(id) = self.rename_target.take() else {
            return;
        };
        let old_name = self
            .categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone());

        match self.registry.update(&id, &self.new_category_name) {
            Ok(true) => {
                let new_name = self.new_category_name.trim().to_string();
                let machine = self.timer.machine();
                let was_selected = old_name.is_some() && machine.category() == old_name.as_deref();
                if was_selected && machine.phase() == TimerPhase::Idle {
                    self.timer.post(TimerEvent::SelectCategory(new_name.clone()));
                }
                self.set_info(format!("Renamed to {}", new_name));
                self.refresh_categories();
            }
            Ok(false) => self.set_error("Category no longer exists"),
            Err(e) => self.set_error(e.to_string()),
        }
        self.new_category_name.clear();
    }

    pub(super) fn choose_selected_category(&mut self) {
        if let Some(category) = self.categories.get(self.selected_index) {
            self.timer
                .post(TimerEvent::SelectCategory(category.name.clone()));
        }
    }
}
