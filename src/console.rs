//! Boundary layer between the interactive console and the simulation core:
//! input parsing and plain-text rendering of tower state.

use glam::DVec3;

use crate::aircraft::{Aircraft, Priority};
use crate::analysis::{ApproachSample, MinimumDistance};
use crate::errors::{Result, SimError};

/// Parse "1,2,0.5" into a velocity vector. Exactly three comma-separated
/// numbers; anything else is rejected before registration proceeds.
pub fn parse_velocity(input: &str) -> Result<DVec3> {
    let parts: Vec<&str> = input.split(',').collect();
    if parts.len() != 3 {
        return Err(SimError::InvalidVelocity(input.to_string()));
    }
    let mut components = [0.0_f64; 3];
    for (slot, raw) in components.iter_mut().zip(&parts) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|_| SimError::InvalidVelocity(input.to_string()))?;
    }
    Ok(DVec3::from_array(components))
}

/// Parse a priority class. Unrecognized classes rank as normal.
pub fn parse_priority(input: &str) -> Priority {
    match input {
        "emergency" => Priority::Emergency,
        "low_fuel" => Priority::LowFuel,
        _ => Priority::Normal,
    }
}

/// Fixed-width status table over the full aircraft list.
pub fn status_table(aircraft: &[Aircraft]) -> String {
    let mut out = format!(
        "{:<10} {:<9} {:>5}  {:<10} {:<7} {}\n",
        "NAME", "STATUS", "TICKS", "PRIORITY", "RUNWAY", "POSITION"
    );
    for craft in aircraft {
        let runway = craft
            .runway()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<10} {:<9} {:>5}  {:<10} {:<7} {}\n",
            craft.name,
            craft.status().label(),
            craft.elapsed_ticks(),
            craft.priority.label(),
            runway,
            format_vec(craft.position()),
        ));
    }
    out
}

/// Closing profile plus minimum-distance result, one line per sample.
pub fn analysis_report(profile: &[ApproachSample], minimum: &MinimumDistance) -> String {
    let mut out = format!("{:>5}  {:>10} {:>10}  {}\n", "TICK", "DISTANCE", "RADIAL V", "ALERT");
    for sample in profile {
        let r = sample.reading;
        out.push_str(&format!(
            "{:>5}  {:>10.3} {:>10.3}  {}\n",
            sample.tick,
            r.distance,
            r.radial_velocity,
            if r.alert { "CLOSING" } else { "" }
        ));
    }
    out.push_str(&format!(
        "\nminimum separation {:.3} at t = {:.2}\n  A at {}\n  B at {}\n",
        minimum.distance,
        minimum.time,
        format_vec(minimum.position_a),
        format_vec(minimum.position_b),
    ));
    out
}

pub fn format_vec(v: DVec3) -> String {
    format!("[{:.2}, {:.2}, {:.2}]", v.x, v.y, v.z)
}
