//! Host-facing driver for a round
//!
//! The input layer queues [`Command`]s; the frame scheduler takes a
//! [`TickTicket`] when it books the next frame and hands it back when the
//! frame fires. A reset in between bumps the round generation, so a ticket
//! booked before the reset can no longer move the new round.

use std::collections::VecDeque;
use std::sync::Arc;

use glam::Vec2;

use crate::sim::{GameEvent, Round, RoundSnapshot, tick};

/// Receiver for completion times
pub trait ScoreSink {
    fn record(&self, time: f64, player_name: &str);
}

impl<S: ScoreSink + ?Sized> ScoreSink for Arc<S> {
    fn record(&self, time: f64, player_name: &str) {
        (**self).record(time, player_name);
    }
}

impl<S: ScoreSink + ?Sized> ScoreSink for &S {
    fn record(&self, time: f64, player_name: &str) {
        (**self).record(time, player_name);
    }
}

/// Input from the player, already in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    BeginStroke(Vec2),
    ExtendStroke(Vec2),
    EndStroke,
    Reset,
    TogglePause,
}

/// Permission to run one tick against a specific round generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTicket {
    generation: u64,
}

/// A round plus its pending input and score destination
pub struct Session<S: ScoreSink> {
    round: Round,
    commands: VecDeque<Command>,
    sink: S,
    player_name: String,
}

impl<S: ScoreSink> Session<S> {
    pub fn new(round: Round, sink: S, player_name: impl Into<String>) -> Self {
        Self {
            round,
            commands: VecDeque::new(),
            sink,
            player_name: player_name.into(),
        }
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        self.round.snapshot()
    }

    /// Queue a command for the next frame
    pub fn push(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    pub fn pending(&self) -> usize {
        self.commands.len()
    }

    /// Book a tick against the current round
    pub fn schedule_tick(&self) -> TickTicket {
        TickTicket {
            generation: self.round.generation(),
        }
    }

    /// Apply every queued command in arrival order
    pub fn apply_commands(&mut self, now: f64) {
        while let Some(command) = self.commands.pop_front() {
            match command {
                Command::BeginStroke(p) => self.round.begin_stroke(p),
                Command::ExtendStroke(p) => self.round.extend_stroke(p),
                Command::EndStroke => self.round.end_stroke(),
                Command::Reset => self.round.reset(now),
                Command::TogglePause => self.round.toggle_pause(now),
            }
        }
    }

    /// Run one booked tick; stale tickets do nothing
    pub fn run_tick(&mut self, ticket: TickTicket, now: f64) -> Option<GameEvent> {
        if ticket.generation != self.round.generation() {
            log::debug!(
                "Dropping tick for generation {} (current {})",
                ticket.generation,
                self.round.generation()
            );
            return None;
        }

        let event = tick(&mut self.round, now);
        if let Some(GameEvent::Won { elapsed_secs }) = event {
            self.sink.record(elapsed_secs, &self.player_name);
        }
        event
    }

    /// One host frame: drain input, then run the booked tick
    pub fn frame(&mut self, ticket: TickTicket, now: f64) -> Option<GameEvent> {
        self.apply_commands(now);
        self.run_tick(ticket, now)
    }
}
