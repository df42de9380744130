use crate::{
    domain::{SessionDraft, minutes_to_secs, parse_minutes},
    error::{TimerError, ValidationError},
};

pub mod controller;

pub use controller::{TimerController, TimerEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Started { committed_minutes: Option<u32> },
    Resumed,
    Ticked { remaining_secs: u32 },
    Interrupted { distractions: u32 },
    Finalize(SessionDraft),
    Reset,
    CategorySelected,
    CategoryCleared,
    DurationStaged { minutes: u32 },
    Ignored,
}

#[derive(Clone, Debug)]
pub struct TimerMachine {
    configured_secs: u32,
    remaining_secs: u32,
    staged_minutes: Option<u32>,
    distractions: u32,
    phase: TimerPhase,
    category: Option<String>,
}

impl TimerMachine {
    pub fn new(configured_minutes: u32) -> Self {
        let configured_secs = minutes_to_secs(configured_minutes);
        Self {
            configured_secs,
            remaining_secs: configured_secs,
            staged_minutes: None,
            distractions: 0,
            phase: TimerPhase::Idle,
            category: None,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn configured_secs(&self) -> u32 {
        self.configured_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.configured_secs.saturating_sub(self.remaining_secs)
    }

    pub fn distractions(&self) -> u32 {
        self.distractions
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn staged_minutes(&self) -> Option<u32> {
        self.staged_minutes
    }

    pub fn display_secs(&self) -> u32 {
        match (self.phase, self.staged_minutes) {
            (TimerPhase::Idle, Some(minutes)) => minutes_to_secs(minutes),
            _ => self.remaining_secs,
        }
    }

    pub fn select_category(&mut self, name: &str) -> Result<Step, TimerError> {
        if self.phase != TimerPhase::Idle {
            return Err(TimerError::Busy("change category"));
        }
        self.category = Some(name.to_string());
        Ok(Step::CategorySelected)
    }

    pub fn clear_category(&mut self) -> Result<Step, TimerError> {
        if self.phase != TimerPhase::Idle {
            return Err(TimerError::Busy("change category"));
        }
        self.category = None;
        Ok(Step::CategoryCleared)
    }

    pub fn stage_duration(&mut self, input: &str) -> Result<Step, TimerError> {
        if self.phase != TimerPhase::Idle {
            return Err(TimerError::Busy("change the duration"));
        }
        let minutes = parse_minutes(input)?;
        self.staged_minutes = Some(minutes);
        Ok(Step::DurationStaged { minutes })
    }

    pub fn start(&mut self) -> Result<Step, TimerError> {
        match self.phase {
            TimerPhase::Running => Ok(Step::Ignored),
            TimerPhase::Paused if self.remaining_secs == 0 => Ok(self.pause()),
            TimerPhase::Paused => {
                self.phase = TimerPhase::Running;
                Ok(Step::Resumed)
            }
            TimerPhase::Idle => {
                if self.category.is_none() {
                    return Err(TimerError::NoCategory);
                }
                let committed_minutes = self.staged_minutes.take();
                if let Some(minutes) = committed_minutes {
                    self.configured_secs = minutes_to_secs(minutes);
                }
                if self.configured_secs == 0 {
                    return Err(ValidationError::InvalidDuration("0".to_string()).into());
                }
                self.remaining_secs = self.configured_secs;
                self.phase = TimerPhase::Running;
                Ok(Step::Started { committed_minutes })
            }
        }
    }

    pub fn tick(&mut self) -> Step {
        if self.phase != TimerPhase::Running {
            return Step::Ignored;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.phase = TimerPhase::Paused;
            return Step::Finalize(self.draft());
        }
        Step::Ticked {
            remaining_secs: self.remaining_secs,
        }
    }

    pub fn pause(&mut self) -> Step {
        match self.phase {
            TimerPhase::Idle => Step::Ignored,
            TimerPhase::Running | TimerPhase::Paused => {
                self.phase = TimerPhase::Paused;
                Step::Finalize(self.draft())
            }
        }
    }

    pub fn background(&mut self) -> Step {
        if self.phase != TimerPhase::Running {
            return Step::Ignored;
        }
        self.distractions += 1;
        self.phase = TimerPhase::Paused;
        Step::Interrupted {
            distractions: self.distractions,
        }
    }

    pub fn reset(&mut self) -> Step {
        self.phase = TimerPhase::Idle;
        self.staged_minutes = None;
        self.remaining_secs = self.configured_secs;
        self.distractions = 0;
        Step::Reset
    }

    pub fn finish(&mut self) {
        self.reset();
    }

    fn draft(&self) -> SessionDraft {
        SessionDraft {
            category: self.category.clone().unwrap_or_default(),
            duration_sec: u64::from(self.elapsed_secs()),
            distractions: self.distractions,
            completed: self.remaining_secs == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(minutes: u32) -> TimerMachine {
        let mut machine = TimerMachine::new(minutes);
        machine.select_category("Coding").unwrap();
        machine.start().unwrap();
        machine
    }

    #[test]
    fn test_new_machine_is_idle_at_full_duration() {
        let machine = TimerMachine::new(25);
        assert_eq!(machine.phase(), TimerPhase::Idle);
        assert_eq!(machine.remaining_secs(), 1500);
        assert_eq!(machine.elapsed_secs(), 0);
    }

    #[test]
    fn test_start_requires_category() {
        let mut machine = TimerMachine::new(25);
        assert!(matches!(machine.start(), Err(TimerError::NoCategory)));
        assert_eq!(machine.phase(), TimerPhase::Idle);
    }

    #[test]
    fn test_ticks_run_down_to_completion() {
        let mut machine = running(1);
        for expected in (1..60).rev() {
            assert_eq!(
                machine.tick(),
                Step::Ticked {
                    remaining_secs: expected
                }
            );
        }
        let Step::Finalize(draft) = machine.tick() else {
            panic!("expected finalize at zero");
        };
        assert!(draft.completed);
        assert_eq!(draft.duration_sec, 60);
        assert_eq!(draft.category, "Coding");
        assert_eq!(machine.tick(), Step::Ignored);

        machine.finish();
        assert_eq!(machine.phase(), TimerPhase::Idle);
        assert_eq!(machine.remaining_secs(), 60);
    }

    #[test]
    fn test_pause_finalizes_elapsed_time() {
        let mut machine = running(2);
        for _ in 0..45 {
            machine.tick();
        }
        let Step::Finalize(draft) = machine.pause() else {
            panic!("expected finalize on pause");
        };
        assert!(!draft.completed);
        assert_eq!(draft.duration_sec, 45);
    }

    #[test]
    fn test_pause_while_idle_is_ignored() {
        let mut machine = TimerMachine::new(5);
        assert_eq!(machine.pause(), Step::Ignored);
    }

    #[test]
    fn test_background_pauses_and_counts() {
        let mut machine = running(5);
        machine.tick();
        assert_eq!(
            machine.background(),
            Step::Interrupted { distractions: 1 }
        );
        assert_eq!(machine.phase(), TimerPhase::Paused);
        assert_eq!(machine.tick(), Step::Ignored);
        assert_eq!(machine.remaining_secs(), 299);

        assert_eq!(machine.background(), Step::Ignored);
        assert_eq!(machine.start().unwrap(), Step::Resumed);
        machine.background();
        assert_eq!(machine.distractions(), 2);
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut machine = running(5);
        machine.tick();
        machine.background();
        assert_eq!(machine.reset(), Step::Reset);

        assert_eq!(machine.phase(), TimerPhase::Idle);
        assert_eq!(machine.remaining_secs(), 300);
        assert_eq!(machine.distractions(), 0);
        assert_eq!(machine.category(), Some("Coding"));
    }

    #[test]
    fn test_clear_category_only_while_idle() {
        let mut machine = running(5);
        assert!(machine.clear_category().is_err());
        machine.reset();
        assert_eq!(machine.clear_category().unwrap(), Step::CategoryCleared);
        assert_eq!(machine.category(), None);
    }

    #[test]
    fn test_staged_duration_commits_on_start() {
        let mut machine = TimerMachine::new(25);
        machine.select_category("Study").unwrap();
        assert_eq!(
            machine.stage_duration("10").unwrap(),
            Step::DurationStaged { minutes: 10 }
        );
        assert_eq!(machine.display_secs(), 600);
        assert_eq!(machine.remaining_secs(), 1500);
        assert_eq!(machine.configured_secs(), 1500);

        assert_eq!(
            machine.start().unwrap(),
            Step::Started {
                committed_minutes: Some(10)
            }
        );
        assert_eq!(machine.configured_secs(), 600);
        assert_eq!(machine.remaining_secs(), 600);
        machine.reset();
        assert_eq!(
            machine.start().unwrap(),
            Step::Started {
                committed_minutes: None
            }
        );
    }

    #[test]
    fn test_staging_keeps_idle_run_unspent() {
        let mut machine = TimerMachine::new(25);
        machine.stage_duration("10").unwrap();
        assert_eq!(machine.phase(), TimerPhase::Idle);
        assert_eq!(machine.elapsed_secs(), 0);
        assert_eq!(machine.remaining_secs(), machine.configured_secs());

        machine.stage_duration("40").unwrap();
        assert_eq!(machine.elapsed_secs(), 0);
        assert_eq!(machine.display_secs(), 2400);
    }

    #[test]
    fn test_reset_drops_staged_duration() {
        let mut machine = TimerMachine::new(25);
        machine.stage_duration("10").unwrap();
        machine.reset();
        assert_eq!(machine.staged_minutes(), None);
        assert_eq!(machine.remaining_secs(), 1500);
    }

    #[test]
    fn test_invalid_duration_changes_nothing() {
        let mut machine = TimerMachine::new(25);
        let err = machine.stage_duration("0").unwrap_err();
        assert!(matches!(
            err,
            TimerError::Invalid(ValidationError::InvalidDuration(_))
        ));
        assert_eq!(machine.remaining_secs(), 1500);
        assert_eq!(machine.staged_minutes(), None);
    }

    #[test]
    fn test_edits_rejected_while_running() {
        let mut machine = running(5);
        assert!(matches!(
            machine.stage_duration("3"),
            Err(TimerError::Busy(_))
        ));
        assert!(matches!(
            machine.select_category("Other"),
            Err(TimerError::Busy(_))
        ));
    }

    #[test]
    fn test_start_at_zero_finalizes_as_completed() {
        let mut machine = running(1);
        for _ in 0..60 {
            machine.tick();
        }
        let Step::Finalize(draft) = machine.start().unwrap() else {
            panic!("expected finalize");
        };
        assert!(draft.completed);
    }
}
