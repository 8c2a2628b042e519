//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. Values can be overridden from a
//! TOML file; absent keys keep their defaults.

use crate::core::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the simulation systems
///
/// These values have been tuned together; changing one affects pacing and
/// behavior arbitration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === MOVEMENT ===
    /// Upward velocity impulse applied every tick while submerged
    ///
    /// Keeps the familiar gently buoyant so idle agents drift toward the
    /// surface instead of sinking.
    pub buoyancy_impulse: f32,

    /// Blend factor for the per-tick swim speed correction
    ///
    /// Current speed moves toward the target speed by this fraction each
    /// tick (exponential approach, never an instantaneous snap).
    pub speed_blend: f32,

    /// Multiplier applied to the movement-speed attribute while swimming
    pub swim_speed_multiplier: f32,

    /// True distance below which a move-to target counts as reached
    ///
    /// Uses actual distance, not the squared form, because the vertical
    /// correction below needs the real magnitude anyway.
    pub arrive_threshold: f32,

    /// Displacement magnitude treated as zero on any single axis
    pub displacement_epsilon: f32,

    /// Scale on the vertical velocity correction toward the target
    pub vertical_correction: f32,

    /// Maximum yaw change per tick while swimming toward a target (degrees)
    pub turn_step_degrees: f32,

    /// Fraction of forward speed converted into motion each tick
    pub forward_scale: f32,

    /// Per-tick velocity retention in water
    pub water_drag: f32,

    /// Per-tick velocity retention on land
    pub ground_drag: f32,

    // === LIGHT MARKERS ===
    /// Ticks between light-marker trail updates
    ///
    /// The marker trail only needs to keep up with a swimming agent, so a
    /// coarse cadence is enough and keeps block churn low.
    pub light_update_interval: i32,

    // === GIFT BEHAVIOR ===
    /// Ticks between flower gifts (5 minutes at 20 ticks/second)
    ///
    /// The counter only runs down while a gift target is nearby, and is
    /// clamped at -1 once elapsed.
    pub gift_cooldown_ticks: i32,

    /// Bounding-box inflation used to search for gift targets (world units)
    pub gift_search_radius: f32,

    /// Squared distance to the target below which the gift goal won't start
    ///
    /// Starting while already adjacent would finish instantly and look
    /// wrong; the agent should visibly swim over.
    pub gift_min_start_dist_sq: f32,

    /// Squared distance at which the gift is considered delivered
    pub gift_complete_dist_sq: f32,

    /// Speed modifier while carrying a flower to the target
    pub gift_speed_modifier: f32,

    // === LOOK BEHAVIOR ===
    /// Range within which players attract the familiar's gaze (world units)
    pub look_range: f32,

    /// Per-tick chance to start looking at a nearby player
    pub look_chance: f64,

    /// Minimum duration of a look, in ticks
    pub look_min_ticks: u32,

    /// Random extra look duration, in ticks
    pub look_extra_ticks: u32,

    /// Maximum yaw change per tick while turning toward a player (degrees)
    pub look_turn_step_degrees: f32,

    // === FOLLOW BEHAVIOR ===
    /// Speed modifier while following the owner
    pub follow_speed: f32,

    /// Distance to the owner above which following starts
    pub follow_start_dist: f32,

    /// Distance to the owner below which following stops
    pub follow_stop_dist: f32,

    // === WANDER BEHAVIOR ===
    /// Average ticks between idle strolls (1-in-N chance per tick)
    pub wander_interval: u32,

    /// Horizontal half-range of random stroll targets (world units)
    pub wander_range_xz: f32,

    /// Vertical half-range of random stroll targets (world units)
    pub wander_range_y: f32,

    /// Speed modifier while strolling
    pub wander_speed: f32,

    // === TEMPERAMENT ===
    /// Per-tick chance for an angry familiar to calm down on its own
    pub anger_fade_chance: f64,

    /// Horizontal half-range of the panic hop after being hurt (world units)
    pub panic_range_xz: f32,

    /// Vertical half-range of the panic hop after being hurt (world units)
    pub panic_range_y: f32,

    // === OWNER AURA ===
    /// Ticks between aura re-grants to the owner
    pub aura_interval: u64,

    /// Duration stamped on each granted aura, in ticks
    pub aura_duration: u64,

    // === SPATIAL SYSTEM ===
    /// Size of each cell in the spatial hash grid (world units)
    ///
    /// Should be on the order of the largest query radius so neighbor
    /// scans stay within a small cell neighborhood.
    pub grid_cell_size: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            // Movement
            buoyancy_impulse: 0.005,
            speed_blend: 0.125,
            swim_speed_multiplier: 3.0,
            arrive_threshold: 0.1,
            displacement_epsilon: 1e-4,
            vertical_correction: 0.1,
            turn_step_degrees: 8.0,
            forward_scale: 0.1,
            water_drag: 0.8,
            ground_drag: 0.91,

            // Light markers
            light_update_interval: 10,

            // Gift behavior (20 ticks/s * 60 s * 5 min)
            gift_cooldown_ticks: 20 * 60 * 5,
            gift_search_radius: 4.0,
            gift_min_start_dist_sq: 3.0,
            gift_complete_dist_sq: 2.0,
            gift_speed_modifier: 0.3,

            // Look behavior
            look_range: 8.0,
            look_chance: 0.02,
            look_min_ticks: 40,
            look_extra_ticks: 40,
            look_turn_step_degrees: 10.0,

            // Follow behavior
            follow_speed: 1.0,
            follow_start_dist: 3.0,
            follow_stop_dist: 1.0,

            // Wander behavior
            wander_interval: 120,
            wander_range_xz: 10.0,
            wander_range_y: 3.5,
            wander_speed: 1.0,

            // Temperament
            anger_fade_chance: 0.0007,
            panic_range_xz: 8.0,
            panic_range_y: 4.0,

            // Owner aura
            aura_interval: 10,
            aura_duration: 300,

            // Spatial
            grid_cell_size: 4.0,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text (absent keys keep defaults)
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.speed_blend <= 0.0 || self.speed_blend > 1.0 {
            return Err(format!(
                "speed_blend ({}) must be in (0, 1]",
                self.speed_blend
            ));
        }

        if self.arrive_threshold <= 0.0 {
            return Err("arrive_threshold must be positive".into());
        }

        if self.gift_complete_dist_sq >= self.gift_min_start_dist_sq {
            return Err(format!(
                "gift_complete_dist_sq ({}) should be < gift_min_start_dist_sq ({})",
                self.gift_complete_dist_sq, self.gift_min_start_dist_sq
            ));
        }

        if self.follow_stop_dist >= self.follow_start_dist {
            return Err(format!(
                "follow_stop_dist ({}) should be < follow_start_dist ({})",
                self.follow_stop_dist, self.follow_start_dist
            ));
        }

        if self.light_update_interval < 1 {
            return Err("light_update_interval must be at least 1".into());
        }

        if !(0.0..=1.0).contains(&self.water_drag) || !(0.0..=1.0).contains(&self.ground_drag) {
            return Err("drag factors must be in [0, 1]".into());
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<SimulationConfig> = OnceLock::new();

/// Get the global simulation config (initializes with defaults if not set)
pub fn config() -> &'static SimulationConfig {
    CONFIG.get_or_init(SimulationConfig::default)
}

/// Set the global simulation config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: SimulationConfig) -> std::result::Result<(), SimulationConfig> {
    CONFIG.set(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_gift_thresholds_ordered() {
        let mut config = SimulationConfig::default();
        config.gift_complete_dist_sq = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_follow_thresholds_ordered() {
        let mut config = SimulationConfig::default();
        config.follow_stop_dist = 4.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_toml_partial_override() {
        let config = SimulationConfig::parse_toml(
            r#"
            gift_cooldown_ticks = 100
            look_range = 12.0
            "#,
        )
        .expect("Failed to parse TOML");

        assert_eq!(config.gift_cooldown_ticks, 100);
        assert_eq!(config.look_range, 12.0);
        // Untouched keys keep defaults
        assert_eq!(config.light_update_interval, 10);
    }

    #[test]
    fn test_parse_toml_rejects_garbage() {
        assert!(SimulationConfig::parse_toml("gift_cooldown_ticks = \"soon\"").is_err());
    }
}
