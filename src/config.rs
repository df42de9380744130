use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;

use crate::constants::{STORAGE_KEYS, TIME_SETTINGS};

pub const DATA_DIR_ENV: &str = "FOCUSLINE_DATA_DIR";

#[derive(Clone, Debug)]
pub struct Config {
    pub data_dir: PathBuf,
    pub state_dir: PathBuf,
    pub tick: Duration,
}

impl Config {
    pub fn resolve(data_dir_flag: Option<PathBuf>) -> Self {
        let env_dir = env::var_os(DATA_DIR_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let data_dir = data_dir_flag.or(env_dir).unwrap_or_else(get_data_dir);

        Self {
            state_dir: get_state_dir(),
            data_dir,
            tick: Duration::from_millis(TIME_SETTINGS.tick_ms),
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.state_dir.join("logs")
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "focusline", "focusline")
}

pub fn get_data_dir() -> PathBuf {
    let local_sessions = Path::new(".").join(format!("{}.json", STORAGE_KEYS.sessions));
    if local_sessions.exists() {
        return PathBuf::from(".");
    }

    if let Some(proj_dirs) = project_dirs() {
        let data_dir = proj_dirs.data_dir().to_path_buf();
        fs::create_dir_all(&data_dir).ok();
        data_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_state_dir() -> PathBuf {
    if let Some(proj_dirs) = project_dirs() {
        let dir = proj_dirs
            .state_dir()
            .unwrap_or_else(|| proj_dirs.cache_dir())
            .to_path_buf();
        fs::create_dir_all(&dir).ok();
        return dir;
    }
    PathBuf::from(".")
}
