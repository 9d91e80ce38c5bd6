//! Unit tests for steer-behavior.

use steer_agent::{AgentBuffer, AgentParams, CrowdAgent};
use steer_core::{AgentId, Arena, Vec3};

use crate::{SteeringBehavior, SteeringContext};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn params(radius: f32, max_speed: f32, max_acceleration: f32) -> AgentParams {
    AgentParams {
        radius,
        max_speed,
        max_acceleration,
        collision_query_range: 4.0,
    }
}

fn spawn(buf: &mut AgentBuffer, p: &AgentParams, pos: Vec3) -> AgentId {
    buf.add_agent(p, pos).unwrap()
}

fn set_vel(buf: &mut AgentBuffer, id: AgentId, vel: Vec3) {
    buf.get_mut(id).unwrap().vel = vel;
}

/// Run one update for `id` and return the written next-tick record.
fn step<B: SteeringBehavior>(
    behavior: &B,
    buf: &AgentBuffer,
    arena: &Arena,
    id: AgentId,
    dt: f32,
) -> CrowdAgent {
    let ctx = SteeringContext::new(buf, arena);
    let old = buf.get(id).unwrap().clone();
    let mut new = old.clone();
    behavior.update(&ctx, &old, &mut new, dt);
    new
}

fn assert_vec_near(a: Vec3, b: Vec3) {
    assert!(a.abs_diff_eq(b, 1e-5), "{a} != {b}");
}

// ── ParamStore ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod param_store {
    use steer_core::{AgentId, Arena};

    use crate::{ParamStore, SeekParams};

    #[test]
    fn slots_default_and_reset() {
        let arena = Arena::unbounded();
        let mut store = ParamStore::<SeekParams>::allocate(4, 0, &arena).unwrap();
        assert_eq!(store.capacity(), 4);
        assert_eq!(store.get(AgentId(3)), &SeekParams::default());

        store.get_mut(AgentId(2)).distance = 1.5;
        assert_eq!(store.get(AgentId(2)).distance, 1.5);
        assert_eq!(store.get(AgentId(1)).distance, 0.0, "neighbors untouched");

        store.reset(AgentId(2));
        assert_eq!(store.get(AgentId(2)), &SeekParams::default());
    }

    #[test]
    fn reserves_and_returns_budget() {
        let arena = Arena::new(1 << 16, 0);
        let store = ParamStore::<SeekParams>::allocate(8, 24, &arena).unwrap();
        let expected = 8 * size_of::<SeekParams>() + 24;
        assert_eq!(store.reserved_bytes(), expected);
        assert_eq!(arena.perm_used(), expected);

        store.release(&arena);
        assert_eq!(arena.perm_used(), 0);
    }

    #[test]
    fn over_budget_is_none() {
        let arena = Arena::new(16, 0);
        assert!(ParamStore::<SeekParams>::allocate(100, 0, &arena).is_none());
        assert_eq!(arena.perm_used(), 0);
    }

    #[test]
    #[should_panic]
    fn out_of_range_lookup_panics() {
        let arena = Arena::unbounded();
        let store = ParamStore::<SeekParams>::allocate(2, 0, &arena).unwrap();
        let _ = store.get(AgentId(2));
    }
}

// ── SteeringContext ───────────────────────────────────────────────────────────

#[cfg(test)]
mod context {
    use steer_agent::{AgentBuffer, AgentParams};
    use steer_core::{AgentId, Arena, Vec3};

    use crate::SteeringContext;

    #[test]
    fn active_agent_filters_inactive_and_out_of_range() {
        let mut buf = AgentBuffer::new(3);
        let a = buf.add_agent(&AgentParams::default(), Vec3::ZERO).unwrap();
        let arena = Arena::unbounded();
        let ctx = SteeringContext::new(&buf, &arena);

        assert_eq!(ctx.active_agent(a).map(|r| r.id), Some(a));
        assert!(ctx.active_agent(AgentId(1)).is_none(), "inactive slot");
        assert!(ctx.active_agent(AgentId(99)).is_none(), "out of range");
    }

    #[test]
    fn resolve_charges_scratch_until_drop() {
        let mut buf = AgentBuffer::new(4);
        let a = buf.add_agent(&AgentParams::default(), Vec3::ZERO).unwrap();
        let b = buf.add_agent(&AgentParams::default(), Vec3::X).unwrap();
        let arena = Arena::new(0, 1024);
        let ctx = SteeringContext::new(&buf, &arena);

        {
            let resolved = ctx.resolve(&[a, AgentId(77), b]).unwrap();
            assert_eq!(resolved.all().len(), 2, "out-of-range id skipped");
            assert_eq!(resolved.active_others(a).count(), 1);
            assert!(arena.temp_used() > 0);
        }
        assert_eq!(arena.temp_used(), 0);
    }

    #[test]
    fn resolve_empty_or_refused_is_none() {
        let mut buf = AgentBuffer::new(2);
        let a = buf.add_agent(&AgentParams::default(), Vec3::ZERO).unwrap();

        let arena = Arena::unbounded();
        assert!(SteeringContext::new(&buf, &arena).resolve(&[]).is_none());
        assert!(SteeringContext::new(&buf, &arena).resolve(&[AgentId(9)]).is_none());

        let starved = Arena::new(0, 0);
        assert!(SteeringContext::new(&buf, &starved).resolve(&[a]).is_none());
    }
}

// ── Kinematics ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod kinematics {
    use steer_agent::CrowdAgent;
    use steer_core::{AgentId, Vec3};

    use super::{assert_vec_near, params};
    use crate::{SteeringOutput, arrive, braking_distance, integrate};

    fn moving(vel: Vec3) -> CrowdAgent {
        let mut a = CrowdAgent::new(AgentId(0), &params(0.0, 3.0, 2.0), Vec3::ZERO);
        a.vel = vel;
        a
    }

    #[test]
    fn braking_distance_formula() {
        assert_eq!(braking_distance(0.0, 5.0), 0.0);
        assert_eq!(braking_distance(2.0, 2.0), 2.0);
    }

    #[test]
    fn integrate_zero_force_keeps_velocity() {
        let agent = moving(Vec3::new(1.0, 2.0, 0.0));
        let out = integrate(&agent, Vec3::ZERO, 1.0);
        assert_eq!(out.velocity, agent.vel);
        assert_eq!(out.desired_speed, agent.vel.length());
    }

    #[test]
    fn integrate_clamps_to_max_speed() {
        let agent = moving(Vec3::new(2.5, 0.0, 0.0));
        let out = integrate(&agent, Vec3::new(10.0, 0.0, 0.0), 1.0);
        assert_vec_near(out.velocity, Vec3::new(3.0, 0.0, 0.0));
        assert!((out.desired_speed - 3.0).abs() < 1e-5);
    }

    #[test]
    fn arrive_zero_force_far_from_goal_keeps_velocity() {
        let agent = moving(Vec3::new(1.0, 0.0, 0.0));
        let out = arrive(&agent, Vec3::new(50.0, 0.0, 0.0), 0.0, 0.0, Vec3::ZERO, 1.0);
        assert_eq!(out.velocity, agent.vel);
        assert_eq!(out.desired_speed, 3.0, "full-speed branch reports max speed");
    }

    #[test]
    fn arrive_brakes_inside_stopping_distance() {
        // speed 2, max accel 2 → stopping distance 2; 1.1 remaining.
        let agent = moving(Vec3::new(2.0, 0.0, 0.0));
        let out = arrive(&agent, Vec3::new(1.1, 0.0, 0.0), 0.0, 0.0, Vec3::ZERO, 0.0);
        assert_vec_near(out.velocity, Vec3::new(1.1, 0.0, 0.0));
        assert!((out.desired_speed - 1.1).abs() < 1e-5);
    }

    #[test]
    fn arrive_stops_at_goal() {
        let agent = moving(Vec3::new(2.0, 0.0, 0.0));
        let out = arrive(&agent, Vec3::new(0.05, 0.0, 0.0), 0.0, 0.0, Vec3::X, 1.0);
        assert_eq!(out, SteeringOutput::STOP);
    }

    #[test]
    fn arrive_offset_counts_against_remaining() {
        let agent = moving(Vec3::ZERO);
        let out = arrive(&agent, Vec3::new(2.0, 0.0, 0.0), 0.0, 1.95, Vec3::X, 1.0);
        assert_eq!(out, SteeringOutput::STOP);
    }

    #[test]
    fn write_to_touches_only_output_fields() {
        let mut agent = moving(Vec3::X);
        let before = agent.clone();
        SteeringOutput { velocity: Vec3::Y, desired_speed: 1.0 }.write_to(&mut agent);
        assert_eq!(agent.dvel, Vec3::Y);
        assert_eq!(agent.desired_speed, 1.0);
        assert_eq!(agent.pos, before.pos);
        assert_eq!(agent.vel, before.vel);
    }
}

// ── Seek ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod seek {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use steer_agent::AgentBuffer;
    use steer_core::{AgentId, Arena, Vec3};

    use super::{assert_vec_near, params, set_vel, spawn, step};
    use crate::{SeekBehavior, SteeringBehavior, SteeringContext};

    /// Seeker at the origin, target at `target_pos`, seeker targeting it.
    fn setup(target_pos: Vec3) -> (AgentBuffer, Arena, SeekBehavior, AgentId, AgentId) {
        let mut buf = AgentBuffer::new(4);
        let seeker = spawn(&mut buf, &params(0.0, 3.0, 5.0), Vec3::ZERO);
        let target = spawn(&mut buf, &params(0.0, 3.0, 5.0), target_pos);
        let arena = Arena::unbounded();
        let mut seek = SeekBehavior::allocate(buf.capacity(), &arena).unwrap();
        seek.set_target(seeker, Some(target));
        (buf, arena, seek, seeker, target)
    }

    #[test]
    fn full_speed_toward_distant_target() {
        let (buf, arena, seek, seeker, _) = setup(Vec3::new(10.0, 0.0, 0.0));
        let ctx = SteeringContext::new(&buf, &arena);
        let old = buf.get(seeker).unwrap();
        assert_vec_near(seek.compute_force(&ctx, old), Vec3::new(5.0, 0.0, 0.0));

        let next = step(&seek, &buf, &arena, seeker, 1.0);
        assert_vec_near(next.dvel, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(next.desired_speed, 3.0);
    }

    #[test]
    fn arrives_within_epsilon() {
        let (buf, arena, seek, seeker, _) = setup(Vec3::new(0.05, 0.0, 0.0));
        let next = step(&seek, &buf, &arena, seeker, 1.0);
        assert_eq!(next.dvel, Vec3::ZERO);
        assert_eq!(next.desired_speed, 0.0);
    }

    #[test]
    fn prediction_leads_moving_target() {
        let (mut buf, arena, mut seek, seeker, target) = setup(Vec3::new(10.0, 0.0, 0.0));
        set_vel(&mut buf, target, Vec3::new(0.0, 5.0, 0.0));
        seek.set_prediction_factor(seeker, 1.0);

        let next = step(&seek, &buf, &arena, seeker, 1.0);
        assert_vec_near(next.dvel.normalize(), Vec3::new(10.0, 5.0, 0.0).normalize());
        assert!((next.dvel.length() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn stand_off_distance_stops_early() {
        let (buf, arena, mut seek, seeker, _) = setup(Vec3::new(2.0, 0.0, 0.0));
        seek.set_distance(seeker, 1.95);
        let next = step(&seek, &buf, &arena, seeker, 1.0);
        assert_eq!(next.dvel, Vec3::ZERO);
    }

    #[test]
    fn absent_target_leaves_record_untouched() {
        let (buf, arena, mut seek, seeker, _) = setup(Vec3::new(10.0, 0.0, 0.0));
        seek.set_target(seeker, None);

        let ctx = SteeringContext::new(&buf, &arena);
        let old = buf.get(seeker).unwrap().clone();
        let mut new = old.clone();
        new.dvel = Vec3::splat(9.0);
        new.desired_speed = 42.0;
        seek.update(&ctx, &old, &mut new, 1.0);
        assert_eq!(new.dvel, Vec3::splat(9.0));
        assert_eq!(new.desired_speed, 42.0);
    }

    #[test]
    fn inactive_or_dangling_target_leaves_record_untouched() {
        let (mut buf, arena, mut seek, seeker, target) = setup(Vec3::new(10.0, 0.0, 0.0));
        buf.remove_agent(target).unwrap();
        let next = step(&seek, &buf, &arena, seeker, 1.0);
        assert_eq!(next.dvel, Vec3::ZERO);
        assert_eq!(next.desired_speed, 0.0);

        seek.set_target(seeker, Some(AgentId(1000)));
        let next = step(&seek, &buf, &arena, seeker, 1.0);
        assert_eq!(next.dvel, Vec3::ZERO);
    }

    #[test]
    fn split_halves_match_update() {
        let (mut buf, arena, seek, seeker, _) = setup(Vec3::new(4.0, 3.0, 0.0));
        set_vel(&mut buf, seeker, Vec3::new(0.0, 1.0, 0.0));

        let ctx = SteeringContext::new(&buf, &arena);
        let old = buf.get(seeker).unwrap();
        let mut split = old.clone();
        let force = seek.compute_force(&ctx, old);
        seek.apply_force(&ctx, old, &mut split, force, 0.5);

        let whole = step(&seek, &buf, &arena, seeker, 0.5);
        assert_eq!(split.dvel, whole.dvel);
        assert_eq!(split.desired_speed, whole.desired_speed);
    }

    #[test]
    fn never_exceeds_max_speed() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            let target_pos = Vec3::new(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-5.0..5.0),
            );
            let (mut buf, arena, mut seek, seeker, target) = setup(target_pos);
            set_vel(&mut buf, seeker, Vec3::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0), 0.0));
            set_vel(&mut buf, target, Vec3::new(rng.gen_range(-9.0..9.0), 0.0, 0.0));
            seek.set_prediction_factor(seeker, rng.gen_range(0.0..2.0));
            seek.set_distance(seeker, rng.gen_range(-1.0..1.0));

            let next = step(&seek, &buf, &arena, seeker, rng.gen_range(0.0..2.0));
            assert!(next.dvel.length() <= 3.0 + 1e-4, "speed {}", next.dvel.length());
        }
    }
}

// ── Separation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod separation {
    use steer_agent::AgentBuffer;
    use steer_core::{AgentId, Arena, EPSILON, SimRng, Vec3};

    use super::{assert_vec_near, params, spawn, step};
    use crate::{MAX_NEIGHBOR_TARGETS, SeparationBehavior, SteeringBehavior, SteeringContext};

    /// Agent 0 at the origin plus one neighbor per entry of `others`.
    fn setup(others: &[Vec3]) -> (AgentBuffer, Arena, SeparationBehavior) {
        let mut buf = AgentBuffer::new(others.len() + 2);
        spawn(&mut buf, &params(0.0, 3.0, 5.0), Vec3::ZERO);
        for &pos in others {
            spawn(&mut buf, &params(0.0, 3.0, 5.0), pos);
        }
        let arena = Arena::new(1 << 20, 1 << 12);
        let mut sep = SeparationBehavior::allocate(buf.capacity(), &arena).unwrap();
        let ids: Vec<AgentId> = (1..=others.len() as u32).map(AgentId).collect();
        sep.set_targets(AgentId(0), &ids);
        sep.set_distance(AgentId(0), 4.0);
        (buf, arena, sep)
    }

    fn force(sep: &SeparationBehavior, buf: &AgentBuffer, arena: &Arena) -> Vec3 {
        let ctx = SteeringContext::new(buf, arena);
        sep.compute_force(&ctx, buf.get(AgentId(0)).unwrap())
    }

    #[test]
    fn no_neighbors_is_zero() {
        let (buf, arena, sep) = setup(&[]);
        assert_eq!(force(&sep, &buf, &arena), Vec3::ZERO);
    }

    #[test]
    fn single_neighbor_magnitude() {
        let (buf, arena, sep) = setup(&[Vec3::new(1.0, 0.0, 0.0)]);
        // w = 1 × (1 − (1/4)²) = 0.9375, divided by gap 1.
        assert_vec_near(force(&sep, &buf, &arena), Vec3::new(-0.9375, 0.0, 0.0));
    }

    #[test]
    fn neighbor_at_range_contributes_nothing() {
        let (buf, arena, sep) = setup(&[Vec3::new(4.0, 0.0, 0.0)]);
        assert_vec_near(force(&sep, &buf, &arena), Vec3::ZERO);
    }

    #[test]
    fn neighbors_beyond_range_or_inside_epsilon_skipped() {
        let (buf, arena, sep) = setup(&[Vec3::new(4.5, 0.0, 0.0), Vec3::new(0.0, 0.05, 0.0)]);
        assert_eq!(force(&sep, &buf, &arena), Vec3::ZERO);
    }

    #[test]
    fn touching_neighbor_falloff_approaches_weight() {
        // Just past EPSILON the falloff term w = weight × (1 − (gap/r)²) is
        // essentially the full weight; the force itself is w / gap.
        let gap = EPSILON + 1e-4;
        let (buf, arena, sep) = setup(&[Vec3::new(gap, 0.0, 0.0)]);
        let f = force(&sep, &buf, &arena);
        assert!(f.x < 0.0 && f.y == 0.0 && f.z == 0.0, "{f}");

        let falloff = f.length() * gap;
        let expected = 1.0 - (gap / 4.0) * (gap / 4.0);
        assert!((falloff - expected).abs() < 1e-4, "{falloff} vs {expected}");
        assert!((falloff - 1.0).abs() < 1e-3);
    }

    #[test]
    fn neighbor_just_inside_epsilon_skipped() {
        let (buf, arena, sep) = setup(&[Vec3::new(EPSILON - 1e-4, 0.0, 0.0)]);
        assert_eq!(force(&sep, &buf, &arena), Vec3::ZERO);
    }

    #[test]
    fn footprints_shrink_the_gap() {
        let mut buf = AgentBuffer::new(2);
        spawn(&mut buf, &params(0.5, 3.0, 5.0), Vec3::ZERO);
        spawn(&mut buf, &params(0.5, 3.0, 5.0), Vec3::new(2.0, 0.0, 0.0));
        let arena = Arena::unbounded();
        let mut sep = SeparationBehavior::allocate(2, &arena).unwrap();
        sep.set_targets(AgentId(0), &[AgentId(1)]);
        sep.set_distance(AgentId(0), 2.0);
        // gap = 2 − 0.5 − 0.5 = 1; w = 1 − 0.25.
        assert_vec_near(force(&sep, &buf, &arena), Vec3::new(-0.75, 0.0, 0.0));
    }

    #[test]
    fn weight_scales_force() {
        let (buf, arena, mut sep) = setup(&[Vec3::new(1.0, 0.0, 0.0)]);
        sep.set_weight(AgentId(0), 2.0);
        assert_vec_near(force(&sep, &buf, &arena), Vec3::new(-1.875, 0.0, 0.0));
    }

    #[test]
    fn averaged_over_counted_neighbors() {
        let (buf, arena, sep) = setup(&[Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::new(9.0, 0.0, 0.0)]);
        assert_vec_near(force(&sep, &buf, &arena), Vec3::ZERO);

        let (buf, arena, sep) = setup(&[Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)]);
        assert_vec_near(force(&sep, &buf, &arena), Vec3::new(-0.9375, -0.9375, 0.0) / 2.0);
    }

    #[test]
    fn inactive_neighbors_and_self_ignored() {
        let (mut buf, arena, mut sep) = setup(&[Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)]);
        buf.remove_agent(AgentId(2)).unwrap();
        sep.set_targets(AgentId(0), &[AgentId(0), AgentId(1), AgentId(2)]);
        assert_vec_near(force(&sep, &buf, &arena), Vec3::new(-0.9375, 0.0, 0.0));
    }

    #[test]
    fn order_of_targets_does_not_matter() {
        let others = [
            Vec3::new(1.0, 0.5, 0.0),
            Vec3::new(-2.0, 0.3, 1.0),
            Vec3::new(0.2, -1.5, 0.0),
            Vec3::new(3.0, 1.0, -1.0),
            Vec3::new(-0.4, 0.4, 0.4),
        ];
        let (buf, arena, mut sep) = setup(&others);
        let reference = force(&sep, &buf, &arena);
        assert_ne!(reference, Vec3::ZERO);

        let mut ids: Vec<AgentId> = (1..=others.len() as u32).map(AgentId).collect();
        let mut rng = SimRng::new(3);
        for _ in 0..10 {
            rng.shuffle(&mut ids);
            sep.set_targets(AgentId(0), &ids);
            assert_vec_near(force(&sep, &buf, &arena), reference);
        }
    }

    #[test]
    fn default_distance_uses_query_range() {
        let (buf, arena, mut sep) = setup(&[Vec3::new(1.0, 0.0, 0.0)]);
        sep.set_distance(AgentId(0), -1.0);
        let me = buf.get(AgentId(0)).unwrap();
        assert_eq!(sep.params(AgentId(0)).effective_distance(me), 4.0);
        assert_vec_near(force(&sep, &buf, &arena), Vec3::new(-0.9375, 0.0, 0.0));
    }

    #[test]
    fn zero_effective_range_is_zero() {
        let mut buf = AgentBuffer::new(2);
        let mut p = params(0.0, 3.0, 5.0);
        p.collision_query_range = 0.0;
        spawn(&mut buf, &p, Vec3::ZERO);
        spawn(&mut buf, &p, Vec3::X);
        let arena = Arena::unbounded();
        let mut sep = SeparationBehavior::allocate(2, &arena).unwrap();
        sep.set_targets(AgentId(0), &[AgentId(1)]);
        assert_eq!(force(&sep, &buf, &arena), Vec3::ZERO);
    }

    #[test]
    fn starved_scratch_is_zero_and_released() {
        let (buf, _, sep) = setup(&[Vec3::new(1.0, 0.0, 0.0)]);
        assert_eq!(force(&sep, &buf, &Arena::new(usize::MAX, 0)), Vec3::ZERO);

        let arena = Arena::new(0, 1024);
        force(&sep, &buf, &arena);
        assert_eq!(arena.temp_used(), 0);
    }

    #[test]
    fn set_targets_truncates() {
        let (_, _, mut sep) = setup(&[]);
        let ids: Vec<AgentId> = (0..40).map(AgentId).collect();
        sep.set_targets(AgentId(0), &ids);
        assert_eq!(sep.params(AgentId(0)).targets.len(), MAX_NEIGHBOR_TARGETS);
        assert_eq!(sep.params(AgentId(0)).targets[15], AgentId(15));
    }

    #[test]
    fn update_integrates_without_arrival() {
        let (buf, arena, sep) = setup(&[Vec3::new(1.0, 0.0, 0.0)]);
        let next = step(&sep, &buf, &arena, AgentId(0), 1.0);
        assert_vec_near(next.dvel, Vec3::new(-0.9375, 0.0, 0.0));
        assert!((next.desired_speed - 0.9375).abs() < 1e-5);
    }
}

// ── Alignment & cohesion ──────────────────────────────────────────────────────

#[cfg(test)]
mod flocking {
    use steer_agent::AgentBuffer;
    use steer_core::{AgentId, Arena, Vec3};

    use super::{assert_vec_near, params, set_vel, spawn};
    use crate::{AlignmentBehavior, CohesionBehavior, SteeringBehavior, SteeringContext};

    fn trio() -> AgentBuffer {
        let mut buf = AgentBuffer::new(3);
        let p = params(0.0, 3.0, 8.0);
        spawn(&mut buf, &p, Vec3::ZERO);
        let a = spawn(&mut buf, &p, Vec3::new(2.0, 0.0, 0.0));
        let b = spawn(&mut buf, &p, Vec3::new(0.0, 2.0, 0.0));
        set_vel(&mut buf, a, Vec3::new(2.0, 0.0, 0.0));
        set_vel(&mut buf, b, Vec3::new(0.0, 2.0, 0.0));
        buf
    }

    #[test]
    fn alignment_matches_mean_velocity() {
        let buf = trio();
        let arena = Arena::unbounded();
        let mut align = AlignmentBehavior::allocate(3, &arena).unwrap();
        align.set_targets(AgentId(0), &[AgentId(1), AgentId(2)]);

        let ctx = SteeringContext::new(&buf, &arena);
        let me = buf.get(AgentId(0)).unwrap();
        assert_vec_near(align.compute_force(&ctx, me), Vec3::new(1.0, 1.0, 0.0));

        align.set_weight(AgentId(0), 0.5);
        assert_vec_near(align.compute_force(&ctx, me), Vec3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn cohesion_pulls_toward_center() {
        let buf = trio();
        let arena = Arena::unbounded();
        let mut coh = CohesionBehavior::allocate(3, &arena).unwrap();
        coh.set_targets(AgentId(0), &[AgentId(1), AgentId(2)]);

        let ctx = SteeringContext::new(&buf, &arena);
        let me = buf.get(AgentId(0)).unwrap();
        assert_vec_near(coh.compute_force(&ctx, me), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn neighbor_trait_fills_any_list() {
        use crate::NeighborBehavior;

        let arena = Arena::unbounded();
        let mut coh = CohesionBehavior::allocate(3, &arena).unwrap();
        let ids: Vec<AgentId> = (0..20).map(AgentId).collect();
        coh.set_neighbors(AgentId(2), &ids);
        assert_eq!(coh.params(AgentId(2)).targets.len(), crate::MAX_NEIGHBOR_TARGETS);

        coh.targets_mut(AgentId(2)).clear();
        assert!(coh.params(AgentId(2)).targets.is_empty());
    }

    #[test]
    fn no_targets_is_zero() {
        let buf = trio();
        let arena = Arena::unbounded();
        let align = AlignmentBehavior::allocate(3, &arena).unwrap();
        let coh = CohesionBehavior::allocate(3, &arena).unwrap();
        let ctx = SteeringContext::new(&buf, &arena);
        let me = buf.get(AgentId(0)).unwrap();
        assert_eq!(align.compute_force(&ctx, me), Vec3::ZERO);
        assert_eq!(coh.compute_force(&ctx, me), Vec3::ZERO);
    }
}

// ── Lifecycle & type erasure ──────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use steer_core::{AgentId, Arena};

    use crate::{DynBehavior, SeekBehavior, SeparationBehavior, SeparationParams, SteeringBehavior};

    #[test]
    fn allocate_fails_soft_on_small_arena() {
        let arena = Arena::new(8, 0);
        assert!(SeekBehavior::allocate(100, &arena).is_none());
        assert!(SeparationBehavior::allocate(100, &arena).is_none());
        assert_eq!(arena.perm_used(), 0);
    }

    #[test]
    fn free_returns_budget() {
        let arena = Arena::new(1 << 20, 0);
        let seek = SeekBehavior::allocate(32, &arena).unwrap();
        assert!(arena.perm_used() >= 32 * size_of::<crate::SeekParams>());
        SeekBehavior::free(Some(seek), &arena);
        assert_eq!(arena.perm_used(), 0);
    }

    #[test]
    fn free_none_is_noop() {
        let arena = Arena::new(1 << 10, 0);
        SeparationBehavior::free(None, &arena);
        assert_eq!(arena.perm_used(), 0);
    }

    #[test]
    fn dyn_behavior_downcast_and_reset() {
        let arena = Arena::unbounded();
        let mut boxed: Box<dyn DynBehavior> =
            Box::new(SeparationBehavior::allocate(4, &arena).unwrap());
        assert_eq!(boxed.behavior_name(), "separation");
        assert_eq!(boxed.slot_count(), 4);
        assert!(boxed.as_any().downcast_ref::<SeekBehavior>().is_none());

        let sep = boxed.as_any_mut().downcast_mut::<SeparationBehavior>().unwrap();
        sep.set_weight(AgentId(1), 3.0);
        assert_eq!(sep.params(AgentId(1)).weight, 3.0);

        boxed.reset_agent(AgentId(1));
        let sep = boxed.as_any().downcast_ref::<SeparationBehavior>().unwrap();
        assert_eq!(sep.params(AgentId(1)), &SeparationParams::default());
    }

    #[test]
    fn dyn_release_returns_budget() {
        let arena = Arena::new(1 << 20, 0);
        let boxed: Box<dyn DynBehavior> = Box::new(SeekBehavior::allocate(8, &arena).unwrap());
        assert!(arena.perm_used() > 0);
        boxed.release(&arena);
        assert_eq!(arena.perm_used(), 0);
    }
}
