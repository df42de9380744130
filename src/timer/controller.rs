use std::{
    sync::mpsc::{self, Receiver, Sender},
    time::{Duration, Instant},
};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::{
    domain::Session,
    error::TimerError,
    storage::{DurationPreference, SessionStore, SharedStore},
};

use super::{Step, TimerMachine, TimerPhase};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    Tick,
    Backgrounded,
    Foregrounded,
    Start,
    Pause,
    Reset,
    SelectCategory(String),
    ClearCategory,
    StageDuration(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Started { committed_minutes: Option<u32> },
    Resumed,
    Ticked { remaining_secs: u32 },
    Interrupted { distractions: u32 },
    Recorded(Session),
    Reset,
    CategorySelected,
    CategoryCleared,
    DurationStaged { minutes: u32 },
    Foregrounded,
    Ignored,
}

#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    pub fn due(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next_due else {
            return 0;
        };
        let mut count = 0;
        while next <= now {
            count += 1;
            next += self.interval;
        }
        self.next_due = Some(next);
        count
    }
}

/// Owns the timer for the lifetime of the timer screen.
///
/// Ticks, focus changes and user commands all arrive through one mailbox and
/// are applied strictly in order. A finalize, including its storage write,
/// completes before the next event is taken.
pub struct TimerController {
    machine: TimerMachine,
    sessions: SessionStore,
    preference: DurationPreference,
    ticker: Ticker,
    sender: Sender<TimerEvent>,
    mailbox: Receiver<TimerEvent>,
}

impl TimerController {
    pub fn new(store: SharedStore, tick_interval: Duration) -> Self {
        let preference = DurationPreference::new(store.clone());
        let minutes = preference.load_minutes();
        let (sender, mailbox) = mpsc::channel();
        info!(minutes, "timer ready");

        Self {
            machine: TimerMachine::new(minutes),
            sessions: SessionStore::new(store),
            preference,
            ticker: Ticker::new(tick_interval),
            sender,
            mailbox,
        }
    }

    pub fn machine(&self) -> &TimerMachine {
        &self.machine
    }

    pub fn sender(&self) -> Sender<TimerEvent> {
        self.sender.clone()
    }

    pub fn post(&self, event: TimerEvent) {
        // The receiver lives in `self`, so this cannot fail.
        let _ = self.sender.send(event);
    }

    pub fn poll_ticker(&mut self, now: Instant) -> u32 {
        let due = self.ticker.due(now);
        for _ in 0..due {
            self.post(TimerEvent::Tick);
        }
        due
    }

    pub fn drain(&mut self) -> Vec<Result<Outcome, TimerError>> {
        let mut results = Vec::new();
        while let Ok(event) = self.mailbox.try_recv() {
            results.push(self.handle(event));
        }
        results
    }

    fn handle(&mut self, event: TimerEvent) -> Result<Outcome, TimerError> {
        debug!(?event, phase = ?self.machine.phase(), "timer event");
        let step = match event {
            TimerEvent::Tick => self.machine.tick(),
            TimerEvent::Backgrounded => self.machine.background(),
            TimerEvent::Foregrounded => {
                debug!("host returned to foreground");
                return Ok(Outcome::Foregrounded);
            }
            TimerEvent::Start => self.machine.start()?,
            TimerEvent::Pause => self.machine.pause(),
            TimerEvent::Reset => self.machine.reset(),
            TimerEvent::SelectCategory(name) => self.machine.select_category(&name)?,
            TimerEvent::ClearCategory => self.machine.clear_category()?,
            TimerEvent::StageDuration(input) => self.machine.stage_duration(&input)?,
        };

        let outcome = self.apply(step);
        self.sync_ticker();
        outcome
    }

    fn apply(&mut self, step: Step) -> Result<Outcome, TimerError> {
        let outcome = match step {
            Step::Started { committed_minutes } => {
                if let Some(minutes) = committed_minutes {
                    if let Err(e) = self.preference.save_minutes(minutes) {
                        warn!(minutes, error = %e, "could not persist duration");
                    }
                }
                info!(
                    category = self.machine.category().unwrap_or_default(),
                    seconds = self.machine.configured_secs(),
                    "timer started"
                );
                Outcome::Started { committed_minutes }
            }
            Step::Resumed => {
                info!(remaining = self.machine.remaining_secs(), "timer resumed");
                Outcome::Resumed
            }
            Step::Ticked { remaining_secs } => Outcome::Ticked { remaining_secs },
            Step::Interrupted { distractions } => {
                info!(distractions, "focus lost, timer paused");
                Outcome::Interrupted { distractions }
            }
            Step::Finalize(draft) => {
                // Left paused on failure so a later pause retries the write.
                let session = self.sessions.record(draft, Local::now())?;
                self.machine.finish();
                Outcome::Recorded(session)
            }
            Step::Reset => {
                info!("timer reset");
                Outcome::Reset
            }
            Step::CategorySelected => Outcome::CategorySelected,
            Step::CategoryCleared => Outcome::CategoryCleared,
            Step::DurationStaged { minutes } => Outcome::DurationStaged { minutes },
            Step::Ignored => Outcome::Ignored,
        };
        Ok(outcome)
    }

    fn sync_ticker(&mut self) {
        match (self.machine.phase(), self.ticker.is_armed()) {
            (TimerPhase::Running, false) => self.ticker.arm(Instant::now()),
            (TimerPhase::Idle | TimerPhase::Paused, true) => self.ticker.disarm(),
            _ => {}
        }
    }

    pub fn shutdown(mut self) {
        if self.machine.phase() != TimerPhase::Idle {
            info!(
                elapsed = self.machine.elapsed_secs(),
                "discarding unfinished run on exit"
            );
        }
        self.machine.reset();
    }
}
