//! pursuit: small demo for the steer crowd framework.
//!
//! A leader walks a circle.  A pack of seekers chases it with lead
//! prediction and a stand-off distance, while a second group starts packed
//! into a tight cluster and spreads out under separation.
//!
//! ```text
//! cargo run -p pursuit                  # built-in scenario
//! cargo run -p pursuit -- pursuit.json  # scenario from JSON
//! RUST_LOG=debug cargo run -p pursuit   # framework logging
//! ```

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;

use steer_agent::{AgentBuffer, AgentParams};
use steer_behavior::{SeekBehavior, SeparationBehavior, SteeringBehavior};
use steer_core::{AgentId, BehaviorId, CrowdConfig, SimRng, Tick, Vec3};
use steer_crowd::{Crowd, CrowdBuilder, CrowdObserver};

// ── Scenario ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
struct Scenario {
    crowd:                  CrowdConfig,
    agent:                  AgentParams,
    seekers:                usize,
    crowders:               usize,
    /// Leader walking speed along its circle.
    leader_speed:           f32,
    neighbor_refresh_ticks: u64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            crowd: CrowdConfig {
                max_agents:              64,
                total_ticks:             300,
                snapshot_interval_ticks: 50,
                ..CrowdConfig::default()
            },
            agent:                  AgentParams::default(),
            seekers:                8,
            crowders:               12,
            leader_speed:           1.5,
            neighbor_refresh_ticks: 5,
        }
    }
}

fn load_scenario(path: Option<&Path>) -> Result<Scenario> {
    let Some(path) = path else {
        return Ok(Scenario::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

const LEADER_ORBIT: f32 = 12.0;

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs how close the seekers are to the leader at each snapshot.
struct PursuitReport {
    leader:   AgentId,
    seekers:  Vec<AgentId>,
    /// (tick, mean seeker distance)
    history:  Vec<(Tick, f32)>,
}

impl CrowdObserver for PursuitReport {
    fn on_snapshot(&mut self, tick: Tick, agents: &AgentBuffer) {
        let Some(leader) = agents.get(self.leader) else { return };
        let total: f32 = self
            .seekers
            .iter()
            .filter_map(|&id| agents.get(id))
            .map(|a| a.pos.distance(leader.pos))
            .sum();
        let mean = total / self.seekers.len().max(1) as f32;
        log::info!("{tick}: mean seeker distance {mean:.2}");
        self.history.push((tick, mean));
    }

    fn on_run_end(&mut self, final_tick: Tick) {
        log::info!("run finished at {final_tick}");
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

struct Groups {
    seek:     BehaviorId,
    sep:      BehaviorId,
    leader:   AgentId,
    seekers:  Vec<AgentId>,
    crowders: Vec<AgentId>,
}

fn populate(crowd: &mut Crowd, scenario: &Scenario, rng: &mut SimRng) -> Result<Groups> {
    let seek = crowd.register_behavior::<SeekBehavior>()?;
    let sep = crowd.register_behavior::<SeparationBehavior>()?;

    let leader = crowd.add_agent(&scenario.agent, Vec3::new(LEADER_ORBIT, 0.0, 0.0))?;

    let mut seekers = Vec::with_capacity(scenario.seekers);
    for _ in 0..scenario.seekers {
        let spawn = rng.point_in_box(Vec3::new(-30.0, 0.0, -30.0), Vec3::new(-20.0, 0.0, 30.0));
        let id = crowd.add_agent(&scenario.agent, spawn)?;
        crowd.attach(id, seek)?;
        let behavior = crowd.behavior_mut::<SeekBehavior>(seek)?;
        behavior.set_target(id, Some(leader));
        behavior.set_prediction_factor(id, rng.gen_range(0.0..1.0));
        behavior.set_distance(id, rng.gen_range(1.0..3.0));
        seekers.push(id);
    }

    let mut crowders = Vec::with_capacity(scenario.crowders);
    for _ in 0..scenario.crowders {
        let spawn = rng.point_in_box(Vec3::new(28.0, 0.0, -2.0), Vec3::new(32.0, 0.0, 2.0));
        let id = crowd.add_agent(&scenario.agent, spawn)?;
        crowd.attach(id, sep)?;
        crowd.behavior_mut::<SeparationBehavior>(sep)?.set_weight(id, 2.0);
        crowders.push(id);
    }

    crowd.refresh_neighbors::<SeparationBehavior>(sep)?;
    Ok(Groups { seek, sep, leader, seekers, crowders })
}

/// Keep the leader on its circle: velocity tangent to the orbit.
fn steer_leader(crowd: &mut Crowd, leader: AgentId, speed: f32) -> Result<()> {
    crowd.edit_agent(leader, |a| {
        let tangent = Vec3::new(-a.pos.z, 0.0, a.pos.x).normalize_or_zero();
        a.vel = tangent * speed;
    })?;
    Ok(())
}

/// Smallest center distance between any two agents of `ids`.
fn min_spacing(agents: &AgentBuffer, ids: &[AgentId]) -> f32 {
    let mut best = f32::INFINITY;
    for (i, &a) in ids.iter().enumerate() {
        for &b in &ids[i + 1..] {
            if let (Some(a), Some(b)) = (agents.get(a), agents.get(b)) {
                best = best.min(a.pos.distance(b.pos));
            }
        }
    }
    best
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args().nth(1);
    let scenario = load_scenario(path.as_deref().map(Path::new))?;

    if let Some(n) = scenario.crowd.num_threads {
        rayon::ThreadPoolBuilder::new().num_threads(n).build_global()?;
    }

    println!("=== pursuit — steer crowd framework ===");
    println!(
        "Seekers: {}  |  Crowders: {}  |  Ticks: {} × {} s  |  Seed: {}",
        scenario.seekers,
        scenario.crowders,
        scenario.crowd.total_ticks,
        scenario.crowd.tick_dt,
        scenario.crowd.seed
    );
    println!();

    // 1. Crowd and population.
    let mut crowd = CrowdBuilder::new(scenario.crowd.clone()).build()?;
    let mut rng = SimRng::new(scenario.crowd.seed);
    let groups = populate(&mut crowd, &scenario, &mut rng)?;
    let spacing_before = min_spacing(crowd.agents(), &groups.crowders);

    // 2. Run, refreshing neighbor lists and the leader's heading between ticks.
    let mut report = PursuitReport {
        leader:  groups.leader,
        seekers: groups.seekers.clone(),
        history: Vec::new(),
    };
    let t0 = Instant::now();
    let refresh = scenario.neighbor_refresh_ticks.max(1);
    while crowd.current_tick() < crowd.config.end_tick() {
        if crowd.current_tick().0.is_multiple_of(refresh) {
            crowd.refresh_neighbors::<SeparationBehavior>(groups.sep)?;
        }
        steer_leader(&mut crowd, groups.leader, scenario.leader_speed)?;
        crowd.step(&mut report);
    }
    report.on_run_end(crowd.current_tick());
    let elapsed = t0.elapsed();

    // 3. Summary.
    println!(
        "Simulation complete at {} in {:.3} s wall time",
        crowd.clock,
        elapsed.as_secs_f64()
    );
    if let (Some(first), Some(last)) = (report.history.first(), report.history.last()) {
        println!(
            "  mean seeker distance : {:.2} at {} → {:.2} at {}",
            first.1, first.0, last.1, last.0
        );
    }
    println!(
        "  crowder min spacing  : {:.2} → {:.2}",
        spacing_before,
        min_spacing(crowd.agents(), &groups.crowders)
    );
    println!();

    // 4. Final seeker table.
    let seek = crowd.behavior::<SeekBehavior>(groups.seek)?;
    let leader_pos = crowd.agents().get(groups.leader).map(|a| a.pos).unwrap_or(Vec3::ZERO);
    println!("{:<8} {:>10} {:>10} {:>8}", "Agent", "Distance", "Stand-off", "Speed");
    println!("{}", "-".repeat(40));
    for &id in &groups.seekers {
        let Some(agent) = crowd.agents().get(id) else { continue };
        println!(
            "{:<8} {:>10.2} {:>10.2} {:>8.2}",
            id.0,
            agent.pos.distance(leader_pos),
            seek.params(id).distance,
            agent.speed(),
        );
    }

    let arena = crowd.shutdown();
    log::debug!("arena released: {} B permanent still in use", arena.perm_used());
    Ok(())
}
