//! Continuously moving hazards checked against the player's current grid cell

use crate::game_logic::grid::{Footprint, GridCoord};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shape and timing of one lane of traffic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneSpec {
    /// Grid row the cars drive along
    pub row: i32,
    /// World units per second; the sign gives the direction along x
    pub speed: f32,
    /// Car extent along the lane (world units)
    pub car_length: f32,
    /// Car extent across the lane (world units)
    pub car_width: f32,
    pub car_count: usize,
    /// Lane extent along x in world units; cars wrap around at the ends
    pub min_x: f32,
    pub max_x: f32,
}

impl LaneSpec {
    /// Whether a car could ever overlap `cell`, wherever it is along the lane
    pub fn covers_cell(&self, cell: GridCoord, cell_size: f32) -> bool {
        if cell.z != self.row {
            return false;
        }
        let cell_rect = Footprint::of_cell(cell, cell_size);
        let reach = self.car_length / 2.0;
        cell_rect.min().x < self.max_x + reach && self.min_x - reach < cell_rect.max().x
    }
}

/// One lane of cars moving along x with wrap-around
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficLane {
    pub spec: LaneSpec,
    /// Car centers along x
    cars: Vec<f32>,
}

impl TrafficLane {
    /// Spread cars evenly over the lane, each nudged by up to a quarter of the spacing
    pub fn new(spec: LaneSpec, rng: &mut impl Rng) -> Self {
        let span = spec.max_x - spec.min_x;
        let spacing = if spec.car_count > 0 {
            span / spec.car_count as f32
        } else {
            0.0
        };
        let jitter = spacing * 0.25;

        let cars = (0..spec.car_count)
            .map(|i| {
                let nudge = if jitter > 0.0 {
                    rng.gen_range(-jitter..jitter)
                } else {
                    0.0
                };
                spec.min_x + spacing * (i as f32 + 0.5) + nudge
            })
            .collect();

        Self { spec, cars }
    }

    pub fn cars(&self) -> &[f32] {
        &self.cars
    }

    pub fn advance(&mut self, dt: f32) {
        let span = self.spec.max_x - self.spec.min_x;
        if span <= 0.0 {
            return;
        }
        for x in &mut self.cars {
            let offset = (*x + self.spec.speed * dt - self.spec.min_x).rem_euclid(span);
            // rem_euclid can round up to exactly `span` for tiny negative inputs
            *x = self.spec.min_x + if offset >= span { 0.0 } else { offset };
        }
    }

    /// World-space rectangle of every car in the lane
    pub fn car_footprints(&self, cell_size: f32) -> impl Iterator<Item = Footprint> + '_ {
        let z = self.spec.row as f32 * cell_size;
        self.cars
            .iter()
            .map(move |&x| Footprint::new(x, z, self.spec.car_length, self.spec.car_width))
    }

    /// Whether any car currently overlaps `cell`
    pub fn hits(&self, cell: GridCoord, cell_size: f32) -> bool {
        if cell.z != self.spec.row {
            return false;
        }
        let cell_rect = Footprint::of_cell(cell, cell_size);
        self.car_footprints(cell_size)
            .any(|car| car.overlaps(&cell_rect))
    }
}

/// True if any lane's traffic overlaps `cell`
pub fn any_lane_hits(lanes: &[TrafficLane], cell: GridCoord, cell_size: f32) -> bool {
    lanes.iter().any(|lane| lane.hits(cell, cell_size))
}
