//! Simulation configuration — every tunable the engine reads, defaulting
//! to the balance the simulation was tuned around.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("day_length must be positive, got {0}")]
    NonPositiveDay(f32),
    #[error("daytime ({daytime}) must fit inside day_length ({day_length})")]
    DaytimeTooLong { daytime: f32, day_length: f32 },
    #[error("working window [{start}, {end}) is not inside the day")]
    BadWorkWindow { start: f32, end: f32 },
    #[error("{name} must be a fraction in (0, 1], got {value}")]
    BadFraction { name: &'static str, value: f32 },
}

/// Initial villager head-count per role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StartingPopulation {
    pub lumberjacks: u32,
    pub anglers: u32,
    pub arborists: u32,
    pub farmers: u32,
    pub explorers: u32,
    pub builders: u32,
}

impl Default for StartingPopulation {
    fn default() -> Self {
        Self {
            lumberjacks: 2,
            anglers: 1,
            arborists: 1,
            farmers: 1,
            explorers: 1,
            builders: 1,
        }
    }
}

impl StartingPopulation {
    pub fn total(&self) -> u32 {
        self.lumberjacks + self.anglers + self.arborists + self.farmers + self.explorers
            + self.builders
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Length of one simulated day, in seconds.
    pub day_length: f32,
    /// Daylight portion of the day, in seconds.
    pub daytime: f32,
    /// Clock value at which the workday opens.
    pub workday_start: f32,
    /// Clock value past which agents head to rest.
    pub workday_end: f32,
    /// Below this food level an agent refills when feeding.
    pub feeding_threshold: f32,
    /// Food every agent loses at each day boundary.
    pub daily_food_consumption: f32,
    /// Stock/capacity fraction that triggers a construction decision.
    pub utilization_threshold: f32,
    /// Field tiles one farmer can keep in rotation.
    pub tiles_per_farmer: u32,
    /// Chance an angler returns to a known fishing spot instead of roaming.
    pub angler_return_probability: f32,
    /// Bounded retries when rolling a random wander destination.
    pub wander_retry_cap: u32,
    /// Ticks per unit of work progress (one swing, cast, or dig).
    pub work_beat_ticks: u32,
    /// Average food per head required before a new villager is born.
    pub spawn_food_per_head: f32,
    /// Crop and fish debited for each birth.
    pub spawn_cost_crop: u32,
    pub spawn_cost_fish: u32,
    pub starting_wood: u32,
    pub starting_stone: u32,
    pub starting_fish: u32,
    pub starting_crop: u32,
    pub wood_capacity: u32,
    pub stone_capacity: u32,
    pub fish_capacity: u32,
    pub crop_capacity: u32,
    pub population_capacity: u32,
    pub starting_population: StartingPopulation,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            day_length: 60.0,
            daytime: 38.0,
            workday_start: 0.0,
            workday_end: 30.0,
            feeding_threshold: 75.0,
            daily_food_consumption: 20.0,
            utilization_threshold: 0.9,
            tiles_per_farmer: 20,
            angler_return_probability: 0.75,
            wander_retry_cap: 6,
            work_beat_ticks: 30,
            spawn_food_per_head: 100.0,
            spawn_cost_crop: 100,
            spawn_cost_fish: 100,
            starting_wood: 100,
            starting_stone: 700,
            starting_fish: 100,
            starting_crop: 500,
            wood_capacity: 500,
            stone_capacity: 500,
            fish_capacity: 500,
            crop_capacity: 500,
            population_capacity: 8,
            starting_population: StartingPopulation::default(),
        }
    }
}

impl SimConfig {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.day_length <= 0.0 {
            return Err(ConfigError::NonPositiveDay(self.day_length));
        }
        if self.daytime <= 0.0 || self.daytime > self.day_length {
            return Err(ConfigError::DaytimeTooLong {
                daytime: self.daytime,
                day_length: self.day_length,
            });
        }
        if self.workday_start < 0.0
            || self.workday_end <= self.workday_start
            || self.workday_end > self.day_length
        {
            return Err(ConfigError::BadWorkWindow {
                start: self.workday_start,
                end: self.workday_end,
            });
        }
        for (name, value) in [
            ("utilization_threshold", self.utilization_threshold),
            ("angler_return_probability", self.angler_return_probability),
        ] {
            if !(0.0..=1.0).contains(&value) || value == 0.0 {
                return Err(ConfigError::BadFraction { name, value });
            }
        }
        Ok(())
    }

    /// Clock value inside the working window?
    pub fn is_working_hours(&self, clock: f32) -> bool {
        clock >= self.workday_start && clock < self.workday_end
    }
}
