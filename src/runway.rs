use crate::errors::{Result, SimError};

/// A takeoff runway with exclusive-occupancy semantics: at most one aircraft
/// holds it at a time. The tower is the sole mutator.
#[derive(Clone, Debug)]
pub struct Runway {
    pub id: u32,
    occupied: bool,
}

impl Runway {
    pub fn new(id: u32) -> Self {
        Self { id, occupied: false }
    }

    /// Claim the runway for a departure.
    pub fn occupy(&mut self) -> Result<()> {
        if self.occupied {
            return Err(SimError::RunwayBusy(self.id));
        }
        self.occupied = true;
        Ok(())
    }

    /// Free the runway. Idempotent.
    pub fn release(&mut self) {
        self.occupied = false;
    }

    pub fn is_free(&self) -> bool {
        !self.occupied
    }
}
