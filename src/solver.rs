//! Greedy multi-salesman assignment engine.
//!
//! Repeatedly matches the salesman that can reach an unvisited city soonest
//! with that city, commits the travel, and re-derives all travel times from
//! the salesmen's new positions. Travel times are `distance / speed`, so a
//! faster salesman is preferred over an equally distant slower one.
//!
//! The full travel-time matrix is rebuilt before every selection, which is
//! O(salesmen x cities) per assignment and O(salesmen x cities^2) overall.
//! Fine for small fleets; a priority structure with per-salesman incremental
//! nearest-city tracking would be the drop-in replacement for larger inputs
//! without changing the observable assignment order.

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::error::SolverError;
use crate::model::{City, MoveRecord, Pose, Salesman};
use crate::traits::Position;

/// One proposed assignment: salesman index and city index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub salesman: usize,
    pub city: usize,
}

/// Greedy multiple-traveling-salesmen solver.
///
/// Owns the salesmen and cities for the duration of [`MultiTsp::compute`];
/// afterwards only read-only views are exposed, and the query methods are
/// pure functions of the accumulated move history.
pub struct MultiTsp<P: Position> {
    salesmen: Vec<Salesman<P>>,
    cities: Vec<City<P>>,
    /// `travel_times[s][c]` = time for salesman `s` to reach city `c` from
    /// its current position. Rebuilt in full before each selection.
    travel_times: Vec<Vec<f64>>,
}

impl<P: Position> MultiTsp<P> {
    pub fn new(salesmen: Vec<Salesman<P>>, cities: Vec<City<P>>) -> Self {
        Self {
            salesmen,
            cities,
            travel_times: Vec::new(),
        }
    }

    /// Run the greedy loop to completion.
    ///
    /// Terminates when every city is visited or no candidate pair remains
    /// (zero salesmen or zero cities). Each iteration visits exactly one
    /// previously-unvisited city, so the loop runs at most `cities` times.
    pub fn compute(&mut self) {
        while !self.all_cities_visited() {
            let Some(assignment) = self.next() else {
                break;
            };

            // next() only proposes in-range, unvisited pairs, so a rejected
            // or failed visit means the loop can no longer make progress.
            match self.visit(assignment.salesman, assignment.city) {
                Ok(true) => {}
                Ok(false) => {
                    warn!(
                        salesman = assignment.salesman,
                        city = assignment.city,
                        "selected city already visited; halting"
                    );
                    break;
                }
                Err(err) => {
                    warn!(%err, "selection produced an invalid pair; halting");
                    break;
                }
            }
        }
    }

    /// Pick the next (salesman, city) pair: each salesman's nearest unvisited
    /// city, then the global minimum travel time across salesmen.
    ///
    /// The nearest-city scans only read shared state and run in parallel; the
    /// final reduction is sequential in salesman order so the tie-break stays
    /// deterministic. Both it and [`MultiTsp::closest_city`] compare with
    /// `<=`, so on an exact tie the later-scanned index wins.
    fn next(&mut self) -> Option<Assignment> {
        if self.salesmen.is_empty() || self.cities.is_empty() {
            return None;
        }

        self.update_travel_times();

        let this = &*self;
        let nearest: Vec<Option<usize>> = (0..this.salesmen.len())
            .into_par_iter()
            .map(|s| this.closest_city(s))
            .collect();

        let mut min_time = f64::INFINITY;
        let mut best = None;
        for (salesman, closest) in nearest.iter().enumerate() {
            let Some(city) = *closest else {
                continue;
            };
            let time = self.travel_times[salesman][city];
            if time <= min_time {
                min_time = time;
                best = Some(Assignment { salesman, city });
            }
        }

        if let Some(assignment) = best {
            debug!(
                salesman = assignment.salesman,
                city = assignment.city,
                travel_time = min_time,
                "next assignment"
            );
        }
        best
    }

    /// Rebuild the full travel-time matrix from every salesman's current
    /// position. Rows are independent and filled in parallel.
    fn update_travel_times(&mut self) {
        let cities = &self.cities;
        self.travel_times = self
            .salesmen
            .par_iter()
            .map(|salesman| {
                let from = salesman.position();
                cities
                    .iter()
                    .map(|city| from.distance(city.position()) / salesman.speed())
                    .collect()
            })
            .collect();
        trace!(
            salesmen = self.salesmen.len(),
            cities = self.cities.len(),
            "travel-time matrix rebuilt"
        );
    }

    /// Nearest unvisited city for `salesman`, or `None` when every city is
    /// visited. Uses `<=`, so equidistant later cities shadow earlier ones.
    fn closest_city(&self, salesman: usize) -> Option<usize> {
        let mut min_time = f64::INFINITY;
        let mut closest = None;
        for (city, state) in self.cities.iter().enumerate() {
            if state.visited() {
                continue;
            }
            let time = self.travel_times[salesman][city];
            if time <= min_time {
                min_time = time;
                closest = Some(city);
            }
        }
        closest
    }

    /// Commit `salesman` to travel to `city`.
    ///
    /// Returns `Ok(false)` when the city is already visited (no state
    /// change), and `Err` when either index is out of range.
    pub fn visit(&mut self, salesman: usize, city: usize) -> Result<bool, SolverError> {
        let (n_salesmen, n_cities) = (self.salesmen.len(), self.cities.len());
        let salesman = self
            .salesmen
            .get_mut(salesman)
            .ok_or(SolverError::SalesmanIndex {
                index: salesman,
                len: n_salesmen,
            })?;
        let city = self.cities.get_mut(city).ok_or(SolverError::CityIndex {
            index: city,
            len: n_cities,
        })?;

        Ok(salesman.travel_to(city))
    }

    pub fn all_cities_visited(&self) -> bool {
        self.cities.iter().all(City::visited)
    }

    /// Interpolated pose of every salesman at `time`, in salesman order.
    pub fn poses_at(&self, time: f64) -> Vec<Pose<P>> {
        self.salesmen
            .iter()
            .map(|salesman| salesman.pose_at(time))
            .collect()
    }

    /// Visit time of every city, in city order; negative infinity while a
    /// city is unvisited.
    pub fn visit_times(&self) -> Vec<f64> {
        self.cities.iter().map(City::time_visited).collect()
    }

    /// Each salesman's completed moves, oldest first, for replay.
    pub fn all_move_records(&self) -> Vec<&[MoveRecord<P>]> {
        self.salesmen.iter().map(Salesman::records).collect()
    }

    pub fn cities(&self) -> &[City<P>] {
        &self.cities
    }

    pub fn salesmen(&self) -> &[Salesman<P>] {
        &self.salesmen
    }
}
