use glam::DVec3;

use crate::errors::Result;
use crate::runway::Runway;

/// Elapsed ticks after takeoff at which the runway is handed back.
const RUNWAY_RELEASE_TICK: u32 = 2;
/// Elapsed ticks after takeoff at which the flight leaves controlled airspace.
const FLIGHT_COMPLETE_TICK: u32 = 6;

/// Scheduling class for the departure queue. Lower rank is served first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Priority {
    Emergency,
    LowFuel,
    Normal,
}

impl Priority {
    /// Total ordering key for the waiting queue.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Emergency => 1,
            Priority::LowFuel => 2,
            Priority::Normal => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Emergency => "emergency",
            Priority::LowFuel => "low_fuel",
            Priority::Normal => "normal",
        }
    }
}

/// Flight lifecycle: Waiting → Cleared → Airborne → Done.
/// The chain is linear with no cycles and no skipping; `successor` is the
/// only transition table, so a status can never regress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlightStatus {
    Waiting,
    Cleared,
    Airborne,
    Done,
}

impl FlightStatus {
    /// Next state in the lifecycle, None once Done.
    pub fn successor(self) -> Option<FlightStatus> {
        match self {
            FlightStatus::Waiting => Some(FlightStatus::Cleared),
            FlightStatus::Cleared => Some(FlightStatus::Airborne),
            FlightStatus::Airborne => Some(FlightStatus::Done),
            FlightStatus::Done => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FlightStatus::Waiting => "waiting",
            FlightStatus::Cleared => "cleared",
            FlightStatus::Airborne => "airborne",
            FlightStatus::Done => "done",
        }
    }
}

/// A departing aircraft with linear kinematics: position at tick t is
/// `initial_position + velocity * t`, no acceleration.
#[derive(Clone, Debug)]
pub struct Aircraft {
    pub name: String,
    pub initial_position: DVec3,
    pub velocity: DVec3,
    pub priority: Priority,
    status: FlightStatus,
    elapsed_ticks: u32,
    /// Assigned runway id, set at clearance and kept for the flight record
    /// even after the runway itself is handed back.
    runway: Option<u32>,
    events: Vec<String>,
}

impl Aircraft {
    pub fn new(name: &str, initial_position: DVec3, velocity: DVec3, priority: Priority) -> Self {
        Self {
            name: name.to_string(),
            initial_position,
            velocity,
            priority,
            status: FlightStatus::Waiting,
            elapsed_ticks: 0,
            runway: None,
            events: Vec::new(),
        }
    }

    pub fn status(&self) -> FlightStatus {
        self.status
    }

    pub fn elapsed_ticks(&self) -> u32 {
        self.elapsed_ticks
    }

    pub fn runway(&self) -> Option<u32> {
        self.runway
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    /// Position at an arbitrary tick. Pure, always defined.
    pub fn position_at(&self, tick: u32) -> DVec3 {
        self.initial_position + self.velocity * tick as f64
    }

    /// Current position.
    pub fn position(&self) -> DVec3 {
        self.position_at(self.elapsed_ticks)
    }

    /// Recorded position history, one sample per tick since registration.
    pub fn trajectory(&self) -> Vec<DVec3> {
        (0..=self.elapsed_ticks).map(|t| self.position_at(t)).collect()
    }

    /// Grant takeoff clearance on the given runway (Waiting → Cleared).
    /// Called by the tower once a runway is free and this aircraft is next
    /// in priority order. Occupancy happens on the following tick.
    pub fn clear_for_takeoff(&mut self, runway_id: u32) {
        debug_assert_eq!(self.status, FlightStatus::Waiting);
        self.runway = Some(runway_id);
        self.step_status();
        self.push_event(format!("cleared for takeoff on runway {runway_id}"));
    }

    /// One tick of lifecycle advancement. A `RunwayBusy` on the
    /// Cleared → Airborne transition propagates to the tower, which logs it
    /// and retries on a later tick; the aircraft stays Cleared.
    pub fn advance(&mut self, runways: &mut [Runway]) -> Result<()> {
        match self.status {
            FlightStatus::Cleared => {
                if let Some(id) = self.runway {
                    occupy_runway(runways, id)?;
                    self.step_status();
                    self.push_event(format!("departed on runway {id}"));
                }
            }
            FlightStatus::Airborne => self.elapsed_ticks += 1,
            FlightStatus::Waiting | FlightStatus::Done => {}
        }

        // Runway is handed back early in the climb, regardless of status.
        if self.elapsed_ticks == RUNWAY_RELEASE_TICK {
            self.release_runway(runways);
            self.push_event("runway released".to_string());
        }

        if self.elapsed_ticks >= FLIGHT_COMPLETE_TICK && self.status == FlightStatus::Airborne {
            self.step_status();
            self.release_runway(runways); // no-op if already released
            self.push_event("left controlled airspace".to_string());
            self.push_event("flight complete".to_string());
        }

        Ok(())
    }

    fn step_status(&mut self) {
        if let Some(next) = self.status.successor() {
            self.status = next;
        }
    }

    fn release_runway(&self, runways: &mut [Runway]) {
        if let Some(id) = self.runway {
            if let Some(rw) = runways.iter_mut().find(|r| r.id == id) {
                rw.release();
            }
        }
    }

    fn push_event(&mut self, event: String) {
        log::debug!("{}: {}", self.name, event);
        self.events.push(event);
    }
}

/// Occupy the runway with the given id. The tower guarantees assigned ids
/// exist, so a missing runway is a no-op rather than a panic.
fn occupy_runway(runways: &mut [Runway], id: u32) -> Result<()> {
    match runways.iter_mut().find(|r| r.id == id) {
        Some(rw) => rw.occupy(),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airborne_craft(velocity: DVec3) -> (Aircraft, Vec<Runway>) {
        let mut runways = vec![Runway::new(1)];
        let mut craft = Aircraft::new("TEST", DVec3::ZERO, velocity, Priority::Normal);
        craft.clear_for_takeoff(1);
        craft.advance(&mut runways).unwrap(); // Cleared → Airborne
        (craft, runways)
    }

    #[test]
    fn position_is_linear_in_ticks() {
        let craft = Aircraft::new(
            "LIN",
            DVec3::new(1.0, -2.0, 0.5),
            DVec3::new(1.0, 2.0, 0.5),
            Priority::Normal,
        );
        for t in 0..20 {
            let expected = craft.initial_position + craft.velocity * t as f64;
            assert_eq!(craft.position_at(t), expected, "tick {t}");
        }
    }

    #[test]
    fn priority_rank_ordering() {
        assert!(Priority::Emergency.rank() < Priority::LowFuel.rank());
        assert!(Priority::LowFuel.rank() < Priority::Normal.rank());
    }

    #[test]
    fn status_chain_is_linear() {
        assert_eq!(FlightStatus::Waiting.successor(), Some(FlightStatus::Cleared));
        assert_eq!(FlightStatus::Cleared.successor(), Some(FlightStatus::Airborne));
        assert_eq!(FlightStatus::Airborne.successor(), Some(FlightStatus::Done));
        assert_eq!(FlightStatus::Done.successor(), None);
    }

    #[test]
    fn runway_released_at_tick_two() {
        let (mut craft, mut runways) = airborne_craft(DVec3::X);
        assert!(!runways[0].is_free(), "runway occupied after departure");

        craft.advance(&mut runways).unwrap(); // t = 1
        assert!(!runways[0].is_free());
        craft.advance(&mut runways).unwrap(); // t = 2
        assert!(runways[0].is_free(), "runway should be free at t = 2");
        assert!(craft.events().iter().any(|e| e.as_str() == "runway released"));
    }

    #[test]
    fn flight_completes_at_tick_six() {
        let (mut craft, mut runways) = airborne_craft(DVec3::X);
        let mut seen = vec![craft.status()];
        for _ in 0..10 {
            craft.advance(&mut runways).unwrap();
            seen.push(craft.status());
        }

        assert_eq!(craft.status(), FlightStatus::Done);
        assert_eq!(craft.elapsed_ticks(), 6, "ticks stop advancing once done");

        // No regression anywhere in the observed sequence
        for pair in seen.windows(2) {
            assert!(
                lifecycle_order(pair[1]) >= lifecycle_order(pair[0]),
                "status regressed: {:?} -> {:?}",
                pair[0],
                pair[1]
            );
        }

        // Terminal events logged exactly once each
        let completions = craft.events().iter().filter(|e| e.as_str() == "flight complete").count();
        assert_eq!(completions, 1, "terminal events must not repeat");
    }

    fn lifecycle_order(status: FlightStatus) -> u8 {
        match status {
            FlightStatus::Waiting => 0,
            FlightStatus::Cleared => 1,
            FlightStatus::Airborne => 2,
            FlightStatus::Done => 3,
        }
    }

    #[test]
    fn busy_runway_keeps_aircraft_cleared() {
        let mut runways = vec![Runway::new(1)];
        runways[0].occupy().unwrap();

        let mut craft = Aircraft::new("HELD", DVec3::ZERO, DVec3::X, Priority::Normal);
        craft.clear_for_takeoff(1);
        let err = craft.advance(&mut runways).unwrap_err();
        assert_eq!(err, crate::errors::SimError::RunwayBusy(1));
        assert_eq!(craft.status(), FlightStatus::Cleared);

        // Once the runway frees up the departure goes through
        runways[0].release();
        craft.advance(&mut runways).unwrap();
        assert_eq!(craft.status(), FlightStatus::Airborne);
    }
}
