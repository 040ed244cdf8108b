use std::collections::{HashSet, VecDeque};

use glam::DVec3;

use crate::aircraft::{Aircraft, FlightStatus, Priority};
use crate::analysis::TrajectoryPair;
use crate::runway::Runway;

/// Airborne aircraft closer than this (position units) trigger a warning.
pub const COLLISION_THRESHOLD: f64 = 5.0;
/// Tower event log capacity; the console surfaces the most recent entries.
const MAX_LOG_SIZE: usize = 100;
/// How many log lines the queries hand out by default.
pub const RECENT_LOG_LINES: usize = 10;

/// The control tower: owns the runways, the registered aircraft, and the
/// event log, and advances the whole simulation one tick at a time.
///
/// Strictly single-threaded: a tick runs to completion before returning and
/// the tower is the sole mutator of runway and aircraft state, so there is
/// no internal locking. If calls can arrive concurrently (e.g. a network
/// service wrapping this), serialize them behind a single mutex or a
/// single-writer task.
pub struct ControlTower {
    runways: Vec<Runway>,
    aircraft: Vec<Aircraft>,
    log: VecDeque<String>,
    /// Aircraft index pairs already warned about, so each close pair alerts
    /// exactly once per session.
    collision_warned: HashSet<(usize, usize)>,
}

impl ControlTower {
    /// Build a tower with a fixed set of runways (ids 1..=count). Runways
    /// are never added or destroyed during a session; a full reset is
    /// dropping the tower and constructing a fresh one.
    pub fn new(runway_count: u32) -> Self {
        Self {
            runways: (1..=runway_count).map(Runway::new).collect(),
            aircraft: Vec::new(),
            log: VecDeque::new(),
            collision_warned: HashSet::new(),
        }
    }

    /// Register a new aircraft in the waiting queue. The console boundary
    /// always passes the origin as initial position; tests and the demo
    /// fleet may place aircraft elsewhere.
    pub fn register(
        &mut self,
        name: &str,
        initial_position: DVec3,
        velocity: DVec3,
        priority: Priority,
    ) {
        self.aircraft
            .push(Aircraft::new(name, initial_position, velocity, priority));
        self.push_log(format!("aircraft {name} registered"));
    }

    /// One synchronous orchestration step, run to completion:
    /// clear waiting aircraft onto free runways in priority order, advance
    /// every aircraft's lifecycle, then scan airborne pairs for proximity.
    pub fn tick(&mut self) {
        // Waiting aircraft in priority order; the sort is stable, so ties
        // keep registration order.
        let mut queue: Vec<usize> = (0..self.aircraft.len())
            .filter(|&i| self.aircraft[i].status() == FlightStatus::Waiting)
            .collect();
        queue.sort_by_key(|&i| self.aircraft[i].priority.rank());

        // Each runway satisfies at most one clearance per tick. Clearance
        // takes effect on the next tick, so newly cleared aircraft are
        // skipped by the advancement pass below.
        let mut assigned: HashSet<u32> = HashSet::new();
        let mut cleared_now: HashSet<usize> = HashSet::new();
        for i in queue {
            let free = self
                .runways
                .iter()
                .find(|r| r.is_free() && !assigned.contains(&r.id));
            let Some(runway_id) = free.map(|r| r.id) else {
                break;
            };
            assigned.insert(runway_id);
            cleared_now.insert(i);
            self.aircraft[i].clear_for_takeoff(runway_id);
            let name = self.aircraft[i].name.clone();
            self.push_log(format!("{name} cleared for takeoff on runway {runway_id}"));
        }

        // Advance everything else. A busy runway is logged and retried on a
        // later tick; it never aborts the tick for other aircraft.
        let mut failures: Vec<String> = Vec::new();
        for (i, craft) in self.aircraft.iter_mut().enumerate() {
            if cleared_now.contains(&i) {
                continue;
            }
            if let Err(err) = craft.advance(&mut self.runways) {
                log::warn!("{}: {}", craft.name, err);
                failures.push(format!("{}: {}", craft.name, err));
            }
        }
        for line in failures {
            self.push_log(line);
        }

        self.detect_collisions();
    }

    /// Pairwise proximity scan over the airborne set. O(n²), fine for a
    /// handful of aircraft.
    fn detect_collisions(&mut self) {
        let airborne: Vec<usize> = (0..self.aircraft.len())
            .filter(|&i| self.aircraft[i].status() == FlightStatus::Airborne)
            .collect();

        let mut warnings: Vec<String> = Vec::new();
        for (n, &i) in airborne.iter().enumerate() {
            for &j in &airborne[n + 1..] {
                let dist = (self.aircraft[i].position() - self.aircraft[j].position()).length();
                if dist < COLLISION_THRESHOLD && self.collision_warned.insert((i, j)) {
                    warnings.push(format!(
                        "collision risk between {} and {}",
                        self.aircraft[i].name, self.aircraft[j].name
                    ));
                }
            }
        }
        for line in warnings {
            log::warn!("{line}");
            self.push_log(line);
        }
    }

    // --- Read-only queries ---

    pub fn aircraft(&self) -> &[Aircraft] {
        &self.aircraft
    }

    pub fn runways(&self) -> &[Runway] {
        &self.runways
    }

    /// All aircraft still in the session (status != Done).
    pub fn active_aircraft(&self) -> Vec<&Aircraft> {
        self.aircraft
            .iter()
            .filter(|a| a.status() != FlightStatus::Done)
            .collect()
    }

    /// Waiting aircraft in service order: by priority rank, ties in
    /// registration order.
    pub fn waiting_queue(&self) -> Vec<&Aircraft> {
        let mut queue: Vec<&Aircraft> = self
            .aircraft
            .iter()
            .filter(|a| a.status() == FlightStatus::Waiting)
            .collect();
        queue.sort_by_key(|a| a.priority.rank());
        queue
    }

    /// Last `n` log entries in chronological order.
    pub fn recent_log(&self, n: usize) -> Vec<&str> {
        let skip = self.log.len().saturating_sub(n);
        self.log.iter().skip(skip).map(String::as_str).collect()
    }

    /// Recorded histories of the first two active aircraft, for the
    /// analysis page. None until at least two aircraft are active.
    pub fn trajectory_snapshot(&self) -> Option<TrajectoryPair> {
        let active = self.active_aircraft();
        if active.len() < 2 {
            return None;
        }
        Some(TrajectoryPair {
            positions_a: active[0].trajectory(),
            velocity_a: active[0].velocity,
            positions_b: active[1].trajectory(),
            velocity_b: active[1].velocity,
        })
    }

    fn push_log(&mut self, line: String) {
        self.log.push_back(line);
        while self.log.len() > MAX_LOG_SIZE {
            self.log.pop_front();
        }
    }
}
