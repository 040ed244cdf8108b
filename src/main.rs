mod aircraft;
mod analysis;
mod cli;
mod console;
mod errors;
mod runway;
mod tower;

use std::io::{self, BufRead, Write};

use clap::Parser;
use glam::DVec3;
use rand::prelude::*;
use rand::rngs::StdRng;

use aircraft::Priority;
use tower::ControlTower;

fn main() {
    env_logger::init();
    let args = cli::Args::parse();

    let mut tower = ControlTower::new(args.runways);
    if args.demo > 0 {
        spawn_demo_fleet(&mut tower, args.demo, args.seed);
    }

    println!("towersim — {} runways. Type 'help' for commands.", args.runways);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => break, // EOF or read error
        };
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let rest: Vec<&str> = words.collect();

        match command {
            "register" => cmd_register(&mut tower, &rest),
            "tick" => cmd_tick(&mut tower, &rest),
            "status" => print!("{}", console::status_table(tower.aircraft())),
            "queue" => cmd_queue(&tower),
            "log" => {
                for entry in tower.recent_log(tower::RECENT_LOG_LINES) {
                    println!("{entry}");
                }
            }
            "events" => cmd_events(&tower, &rest),
            "analyze" => cmd_analyze(&tower),
            "reset" => {
                tower = ControlTower::new(args.runways);
                println!("session reset");
            }
            "help" => print_help(),
            "quit" | "exit" => break,
            other => println!("unknown command {other:?} — try 'help'"),
        }
    }
}

fn cmd_register(tower: &mut ControlTower, rest: &[&str]) {
    let (name, velocity_text) = match rest {
        [name, velocity, ..] => (*name, *velocity),
        _ => {
            println!("usage: register <name> <vx,vy,vz> [priority]");
            return;
        }
    };
    let velocity = match console::parse_velocity(velocity_text) {
        Ok(v) => v,
        Err(err) => {
            println!("{err}");
            return;
        }
    };
    let priority = console::parse_priority(rest.get(2).copied().unwrap_or("normal"));
    // Departures always start from the origin pad
    tower.register(name, DVec3::ZERO, velocity, priority);
    println!("registered {name} ({})", priority.label());
}

fn cmd_tick(tower: &mut ControlTower, rest: &[&str]) {
    let count: u32 = rest.first().and_then(|w| w.parse().ok()).unwrap_or(1);
    for _ in 0..count {
        tower.tick();
    }
    println!("advanced {count} tick(s)");
    for entry in tower.recent_log(tower::RECENT_LOG_LINES) {
        println!("  {entry}");
    }
}

fn cmd_queue(tower: &ControlTower) {
    let queue = tower.waiting_queue();
    if queue.is_empty() {
        println!("waiting queue empty");
        return;
    }
    for (slot, craft) in queue.iter().enumerate() {
        println!("{}. {} ({})", slot + 1, craft.name, craft.priority.label());
    }
}

fn cmd_events(tower: &ControlTower, rest: &[&str]) {
    let Some(name) = rest.first() else {
        println!("usage: events <name>");
        return;
    };
    match tower.aircraft().iter().find(|a| a.name == *name) {
        Some(craft) => {
            for event in craft.events() {
                println!("{event}");
            }
        }
        None => println!("no aircraft named {name:?}"),
    }
}

fn cmd_analyze(tower: &ControlTower) {
    let Some(pair) = tower.trajectory_snapshot() else {
        println!("need at least two active aircraft — register more or reset");
        return;
    };

    let profile = analysis::closing_profile(&pair);

    // Console registrations all depart from the origin pad, so the first
    // samples coincide and have no line of sight; base the root-find on the
    // second recorded point in that case.
    let base = if pair.positions_a[0] == pair.positions_b[0] { 1 } else { 0 };
    if pair.positions_a.len() <= base || pair.positions_b.len() <= base {
        println!("trajectories too short — advance the simulation further");
        return;
    }
    let minimum = analysis::find_minimum_distance_time(
        pair.positions_a[base],
        pair.velocity_a,
        pair.positions_b[base],
        pair.velocity_b,
    );

    print!("{}", console::analysis_report(&profile, &minimum));
    if minimum.distance < analysis::ALERT_THRESHOLD {
        println!("WARNING: projected separation below {}", analysis::ALERT_THRESHOLD);
    }

    // Live check on the latest recorded instant
    let n = pair.positions_a.len().min(pair.positions_b.len());
    if analysis::closing_alert(
        pair.positions_a[n - 1],
        pair.velocity_a,
        pair.positions_b[n - 1],
        pair.velocity_b,
        analysis::ALERT_THRESHOLD,
    ) {
        println!("ALERT: aircraft are currently inside the threshold and closing");
    }
}

/// Pre-register a fleet with seeded-random flight plans, for demos and
/// quick manual testing.
fn spawn_demo_fleet(tower: &mut ControlTower, count: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for i in 0..count {
        let name = format!("DEMO{:02}", i + 1);
        let start = DVec3::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0), 0.0);
        let velocity = DVec3::new(
            rng.gen_range(-2.0..2.0),
            rng.gen_range(-2.0..2.0),
            rng.gen_range(0.0..1.0),
        );
        let priority = match rng.gen_range(0u8..10) {
            0 => Priority::Emergency,
            1 | 2 => Priority::LowFuel,
            _ => Priority::Normal,
        };
        tower.register(&name, start, velocity, priority);
    }
    log::info!("registered {count} demo aircraft (seed {seed})");
}

fn print_help() {
    println!(
        "commands:
  register <name> <vx,vy,vz> [priority]   add an aircraft (priority: emergency, low_fuel, normal)
  tick [n]                                advance the simulation n steps (default 1)
  status                                  aircraft table
  queue                                   waiting queue in service order
  log                                     last {} tower events
  events <name>                           per-aircraft event history
  analyze                                 closing profile + minimum-distance estimate
  reset                                   discard all state and start empty
  quit                                    exit",
        tower::RECENT_LOG_LINES
    );
}
