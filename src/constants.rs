use ratatui::style::Color;

pub const STORAGE_KEYS: StorageKeys = StorageKeys {
    sessions: "focus_sessions_v1",
    categories: "focus_categories_v1",
    duration_minutes: "focus_duration_minutes_v1",
};

pub const DEFAULT_CATEGORIES: [&str; 5] = ["Study", "Coding", "Project", "Reading", "Other"];

pub const DEFAULT_DURATION_MINUTES: u32 = 25;

pub const TIME_SETTINGS: TimeSettings = TimeSettings {
    tick_ms: 1000,
    poll_ms: 50,
    target_fps: 12,
};

pub const BACKUP_SETTINGS: BackupSettings = BackupSettings {
    dir_name: "backups",
    keep: 10,
};

pub const COLORS: [Color; 8] = [
    Color::Rgb(56, 161, 105),
    Color::Rgb(43, 108, 176),
    Color::Rgb(255, 204, 0),
    Color::Rgb(255, 153, 0),
    Color::Rgb(153, 0, 255),
    Color::Rgb(0, 153, 255),
    Color::Rgb(255, 51, 0),
    Color::Rgb(0, 176, 80),
];

pub struct StorageKeys {
    pub sessions: &'static str,
    pub categories: &'static str,
    pub duration_minutes: &'static str,
}

pub struct TimeSettings {
    pub tick_ms: u64,
    pub poll_ms: u64,
    pub target_fps: u64,
}

pub struct BackupSettings {
    pub dir_name: &'static str,
    pub keep: usize,
}
