//! Static arena geometry: obstacles and the corner points derived from them

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// 2D point / vector in world-space pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians)
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Obstacle {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Inclusive containment test (points on the border count as inside)
    pub fn contains(&self, p: Vec2) -> bool {
        self.x <= p.x && p.x <= self.x + self.w && self.y <= p.y && p.y <= self.y + self.h
    }

    /// Corners in order: top-left, top-right, bottom-left, bottom-right
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x, self.y),
            Vec2::new(self.x + self.w, self.y),
            Vec2::new(self.x, self.y + self.h),
            Vec2::new(self.x + self.w, self.y + self.h),
        ]
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let finite = [self.x, self.y, self.w, self.h].iter().all(|v| v.is_finite());
        if !finite || self.w <= 0.0 || self.h <= 0.0 {
            return Err(ConfigError::InvalidObstacle {
                index,
                reason: format!(
                    "obstacle ({}, {}, {}, {}) must be finite with positive size",
                    self.x, self.y, self.w, self.h
                ),
            });
        }
        Ok(())
    }
}

/// Default arena: four border walls plus five interior blocks
pub fn default_obstacles(width: f32, height: f32) -> Vec<Obstacle> {
    vec![
        Obstacle::new(0.0, 0.0, width, 10.0),
        Obstacle::new(0.0, height - 10.0, width, 10.0),
        Obstacle::new(0.0, 0.0, 10.0, height),
        Obstacle::new(width - 10.0, 0.0, 10.0, height),
        Obstacle::new(100.0, 100.0, 50.0, 50.0),
        Obstacle::new(300.0, 200.0, 60.0, 60.0),
        Obstacle::new(150.0, 300.0, 40.0, 40.0),
        Obstacle::new(500.0, 150.0, 70.0, 70.0),
        Obstacle::new(600.0, 300.0, 40.0, 40.0),
    ]
}

/// Immutable world: obstacle list plus derived corner points.
///
/// Corners are not deduplicated; adjacent obstacles may contribute the same
/// point more than once.
#[derive(Debug, Clone)]
pub struct World {
    obstacles: Vec<Obstacle>,
    corners: Vec<Vec2>,
}

impl World {
    /// Build the world, rejecting degenerate obstacles
    pub fn new(obstacles: Vec<Obstacle>) -> Result<Self, ConfigError> {
        for (index, obstacle) in obstacles.iter().enumerate() {
            obstacle.validate(index)?;
        }

        let corners = obstacles.iter().flat_map(Obstacle::corners).collect();
        Ok(Self { obstacles, corners })
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn corners(&self) -> &[Vec2] {
        &self.corners
    }

    /// True if any corner lies strictly closer than `radius` to `p`
    pub fn near_corner(&self, p: Vec2, radius: f32) -> bool {
        self.corners.iter().any(|c| c.distance(p) < radius)
    }

    /// True if `p` is inside any obstacle
    pub fn inside_obstacle(&self, p: Vec2) -> bool {
        self.obstacles.iter().any(|o| o.contains(p))
    }
}
