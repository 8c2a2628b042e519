//! Integration tests for the light-marker trail
//!
//! The world must never hold more than one marker per trail slot, and no
//! marker may survive death, removal, or a dimension change.

use deepkin::behavior::GoalSelector;
use deepkin::core::types::BlockPos;
use deepkin::entity::FamiliarAgent;
use deepkin::sim::{run_simulation_tick, AgentSlot, Simulation};
use glam::Vec3;

/// Familiar with the illumination upgrade and no goals, so tests control
/// its movement exactly
fn controlled_sim(seed: u64, position: Vec3) -> (Simulation, deepkin::core::types::EntityId) {
    let mut sim = Simulation::new(seed);
    let mut agent = FamiliarAgent::new(position);
    agent.unlock_light_upgrade();
    let id = agent.id;
    sim.slots.push(AgentSlot {
        agent,
        goals: GoalSelector::new(),
    });
    (sim, id)
}

/// Check the marker invariants for one agent at a tick boundary
fn assert_marker_invariants(sim: &Simulation, id: deepkin::core::types::EntityId) {
    let agent = sim.agent(id).unwrap();
    let markers = sim.world.light_marker_positions();
    assert!(
        markers.len() <= 2,
        "trail can never hold more than two markers, found {:?}",
        markers
    );
    // At most one marker differs from the agent's own cell
    let stale = markers
        .iter()
        .filter(|&&pos| pos != agent.block_pos())
        .count();
    assert!(stale <= 1, "more than one stale marker: {:?}", markers);
}

#[test]
fn test_stationary_agent_keeps_exactly_one_marker() {
    let (mut sim, id) = controlled_sim(1, Vec3::new(0.5, 0.5, 0.5));
    for _ in 0..50 {
        run_simulation_tick(&mut sim);
        assert_marker_invariants(&sim, id);
    }
    let markers = sim.world.light_marker_positions();
    assert_eq!(markers, vec![BlockPos::new(0, 0, 0)]);
}

#[test]
fn test_moving_agent_trails_and_cleans_up() {
    let (mut sim, id) = controlled_sim(2, Vec3::new(0.5, 0.5, 0.5));
    let mut visited = Vec::new();

    for step in 0..12 {
        // Hop one cell per light update
        sim.agent_mut(id).unwrap().position = Vec3::new(step as f32 * 2.0 + 0.5, 0.5, 0.5);
        visited.push(BlockPos::new(step * 2, 0, 0));
        for _ in 0..11 {
            run_simulation_tick(&mut sim);
            assert_marker_invariants(&sim, id);
        }
    }

    // Let the trail settle, then only the latest cell stays lit
    sim.agent_mut(id).unwrap().position = Vec3::new(22.5, 0.5, 0.5);
    for _ in 0..25 {
        run_simulation_tick(&mut sim);
    }
    assert_eq!(
        sim.world.light_marker_positions(),
        vec![BlockPos::new(22, 0, 0)]
    );
    for pos in &visited[..visited.len() - 1] {
        assert!(
            !sim.world.light_marker_positions().contains(pos),
            "old marker leaked at {:?}",
            pos
        );
    }
}

#[test]
fn test_no_markers_without_upgrade() {
    let mut sim = Simulation::new(3);
    let agent = FamiliarAgent::new(Vec3::new(0.5, 0.5, 0.5));
    sim.slots.push(AgentSlot {
        agent,
        goals: GoalSelector::new(),
    });
    for _ in 0..30 {
        run_simulation_tick(&mut sim);
    }
    assert!(sim.world.light_marker_positions().is_empty());
}

#[test]
fn test_death_clears_every_marker() {
    let (mut sim, id) = controlled_sim(4, Vec3::new(0.5, 0.5, 0.5));
    // Build up a two-marker trail mid-shift
    run_simulation_tick(&mut sim);
    sim.agent_mut(id).unwrap().position = Vec3::new(4.5, 0.5, 0.5);
    for _ in 0..11 {
        run_simulation_tick(&mut sim);
    }
    assert!(!sim.world.light_marker_positions().is_empty());

    sim.kill_familiar(id).unwrap();
    run_simulation_tick(&mut sim);
    assert!(
        sim.world.light_marker_positions().is_empty(),
        "death leaked a marker"
    );
}

#[test]
fn test_dimension_change_clears_every_marker() {
    let (mut sim, id) = controlled_sim(5, Vec3::new(0.5, 0.5, 0.5));
    run_simulation_tick(&mut sim);
    sim.agent_mut(id).unwrap().position = Vec3::new(4.5, 0.5, 0.5);
    for _ in 0..11 {
        run_simulation_tick(&mut sim);
    }

    sim.change_dimension(id).unwrap();
    assert!(
        sim.world.light_marker_positions().is_empty(),
        "dimension change leaked a marker"
    );
}

#[test]
fn test_removal_clears_every_marker() {
    let (mut sim, id) = controlled_sim(6, Vec3::new(0.5, 0.5, 0.5));
    for _ in 0..15 {
        run_simulation_tick(&mut sim);
    }
    assert!(!sim.world.light_marker_positions().is_empty());

    sim.remove_familiar(id).unwrap();
    assert!(sim.agent(id).is_none());
    assert!(sim.world.light_marker_positions().is_empty());
}
