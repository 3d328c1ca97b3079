//! Cities, salesmen, and recorded moves.
//!
//! A [`City`] is visitable exactly once; a [`Salesman`] accumulates an
//! append-only, time-ordered history of [`MoveRecord`]s as the solver commits
//! it to travel. The move history is the sole source of truth for the
//! position-at-time queries.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::traits::Position;

/// Sentinel returned by [`City::time_visited`] while the city is unvisited.
pub const UNVISITED: f64 = f64::NEG_INFINITY;

/// A visitable target point.
///
/// State machine: unvisited -> visited (terminal). The transition happens at
/// most once, driven by a salesman committing to travel here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City<P> {
    position: P,
    name: Option<String>,
    visit_time: Option<f64>,
}

impl<P: Position> City<P> {
    pub fn new(position: P) -> Self {
        Self {
            position,
            name: None,
            visit_time: None,
        }
    }

    pub fn named(position: P, name: impl Into<String>) -> Self {
        Self {
            position,
            name: Some(name.into()),
            visit_time: None,
        }
    }

    pub fn position(&self) -> &P {
        &self.position
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn visited(&self) -> bool {
        self.visit_time.is_some()
    }

    /// Time at which this city was visited, if it has been.
    pub fn visit_time(&self) -> Option<f64> {
        self.visit_time
    }

    /// Visit time with the legacy sentinel: [`UNVISITED`] while unvisited.
    pub fn time_visited(&self) -> f64 {
        self.visit_time.unwrap_or(UNVISITED)
    }

    /// Mark this city visited at `time`. Returns false (and changes nothing)
    /// if it was already visited.
    pub(crate) fn visit(&mut self, time: f64) -> bool {
        if self.visit_time.is_some() {
            warn!(name = ?self.name, "city already visited");
            return false;
        }
        self.visit_time = Some(time);
        true
    }
}

/// One completed leg of a salesman's tour.
///
/// Spans `[start_time, end_time]` where
/// `end_time = start_time + distance / speed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRecord<P> {
    pub start_time: f64,
    pub end_time: f64,
    pub start_pos: P,
    pub end_pos: P,
}

impl<P: Position> MoveRecord<P> {
    /// Pose along this move at `time`, with the interpolation fraction
    /// clamped to `[0, 1]` so queries outside the span pin to an endpoint.
    ///
    /// The heading is the move's overall heading (zero for a degenerate move
    /// whose endpoints coincide).
    pub fn pose_at(&self, time: f64) -> Pose<P> {
        let span = self.end_time - self.start_time;
        let fraction = if span > 0.0 {
            ((time - self.start_time) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };

        Pose {
            position: self.start_pos.lerp(&self.end_pos, fraction),
            direction: self.start_pos.direction_to(&self.end_pos),
        }
    }
}

/// Interpolated position and unit heading of a salesman at some query time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pose<P> {
    pub position: P,
    pub direction: P,
}

/// A moving agent with a base position and a scalar speed (> 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Salesman<P> {
    base: P,
    speed: f64,
    records: Vec<MoveRecord<P>>,
}

impl<P: Position> Salesman<P> {
    pub fn new(base: P, speed: f64) -> Self {
        Self {
            base,
            speed,
            records: Vec::new(),
        }
    }

    pub fn base(&self) -> &P {
        &self.base
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Position this salesman would travel from next: the end of its last
    /// move, or its base if it has not moved.
    pub fn position(&self) -> &P {
        self.records
            .last()
            .map(|record| &record.end_pos)
            .unwrap_or(&self.base)
    }

    /// Simulation time at which this salesman becomes idle.
    pub fn idle_time(&self) -> f64 {
        self.records.last().map(|record| record.end_time).unwrap_or(0.0)
    }

    /// Completed moves, oldest first.
    pub fn records(&self) -> &[MoveRecord<P>] {
        &self.records
    }

    /// Commit this salesman to travel from its current position to `city`.
    ///
    /// Appends a move record ending at `city`'s position and marks the city
    /// visited at the move's end time. Returns false (no state change) if the
    /// city was already visited.
    pub fn travel_to(&mut self, city: &mut City<P>) -> bool {
        if city.visited() {
            return false;
        }

        let start_time = self.idle_time();
        let start_pos = self.position().clone();
        let end_pos = city.position().clone();
        let end_time = start_time + start_pos.distance(&end_pos) / self.speed;

        self.records.push(MoveRecord {
            start_time,
            end_time,
            start_pos,
            end_pos,
        });

        city.visit(end_time)
    }

    /// The move containing `time`: the latest move whose `start_time <= time`.
    ///
    /// `None` if the salesman has no moves or `time` precedes the first one,
    /// in which case it is stationary at base.
    pub fn move_at_time(&self, time: f64) -> Option<&MoveRecord<P>> {
        self.records
            .iter()
            .rev()
            .find(|record| record.start_time <= time)
    }

    /// Pose at `time`: stationary at base (zero heading) before the first
    /// move, interpolated along the containing move otherwise, pinned to the
    /// last move's end position once the tour is over.
    pub fn pose_at(&self, time: f64) -> Pose<P> {
        match self.move_at_time(time) {
            Some(record) => record.pose_at(time),
            None => Pose {
                position: self.base.clone(),
                direction: self.base.direction_to(&self.base),
            },
        }
    }
}
