//! Pseudo-3D projection of a ray fan onto a 2D drawing surface, plus HUD

use crate::config::GameConfig;
use crate::util::color::Rgb;
use crate::util::time::elapsed_since;

use super::player::PlayerState;
use super::raycast::{HitKind, RayCaster, RayHit};

/// Highlight for rays that graze an obstacle corner
pub const EDGE_COLOR: Rgb = Rgb::YELLOW;
/// Override for a player struck within the hit-flash window
pub const FLASH_COLOR: Rgb = Rgb::PURPLE;
pub const BACKGROUND_COLOR: Rgb = Rgb::BLACK;

const HUD_FONT_PX: f32 = 24.0;
const HUD_LEFT: f32 = 10.0;
const HUD_TOP: f32 = 30.0;
const HUD_LINE_SPACING: f32 = 30.0;

/// Drawing surface established by the host. Only rectangles and text.
pub trait Surface {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb);
    fn fill_text(&mut self, text: &str, x: f32, y: f32, size_px: f32, color: Rgb);
}

/// Projection renderer
#[derive(Debug, Clone)]
pub struct Renderer {
    view_width: f32,
    view_height: f32,
    num_rays: u32,
    fov: f32,
    max_distance: f32,
    hit_flash_ms: u64,
}

impl Renderer {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            view_width: config.view_width,
            view_height: config.view_height,
            num_rays: config.num_rays,
            fov: config.fov,
            max_distance: config.max_distance,
            hit_flash_ms: config.hit_flash_ms,
        }
    }

    /// Fill the whole surface with the background color
    pub fn clear(&self, surface: &mut impl Surface) {
        surface.fill_rect(0.0, 0.0, self.view_width, self.view_height, BACKGROUND_COLOR);
    }

    /// Strip height: `h * (1 - sqrt(d / max))`, a stylized falloff rather
    /// than a perspective divide
    pub fn strip_height(&self, distance: f32) -> f32 {
        let ratio = (distance / self.max_distance).clamp(0.0, 1.0);
        self.view_height * (1.0 - ratio.sqrt())
    }

    /// Linear grayscale: 255 at distance 0, 0 at max distance
    pub fn shade(&self, distance: f32) -> u8 {
        let falloff = (distance * 255.0 / self.max_distance).floor();
        (255.0 - falloff).clamp(0.0, 255.0) as u8
    }

    /// Angle of sample `ray` within the field of view, left to right
    pub fn ray_angle(&self, facing: f32, ray: u32) -> f32 {
        facing - self.fov / 2.0 + self.fov * ray as f32 / self.num_rays as f32
    }

    /// Color for a cast result
    pub fn strip_color(&self, hit: &RayHit, players: &[PlayerState], now: u64) -> Rgb {
        match &hit.kind {
            HitKind::Edge => EDGE_COLOR,
            HitKind::Wall => Rgb::gray(self.shade(hit.distance)),
            HitKind::Player(color) => {
                let flashing = players
                    .iter()
                    .find(|p| &p.color == color)
                    .is_some_and(|p| elapsed_since(now, p.last_hit_at) < self.hit_flash_ms);
                if flashing {
                    FLASH_COLOR
                } else {
                    color.rgb()
                }
            }
        }
    }

    /// Cast the ray fan from `players[viewer_index]` and draw one strip per ray
    pub fn draw_view(
        &self,
        surface: &mut impl Surface,
        caster: &RayCaster<'_>,
        players: &[PlayerState],
        viewer_index: usize,
        now: u64,
    ) {
        let Some(viewer) = players.get(viewer_index) else {
            return;
        };

        let strip_width = self.view_width / self.num_rays as f32;
        for ray in 0..self.num_rays {
            let angle = self.ray_angle(viewer.angle, ray);
            let hit = caster.cast(viewer.pos, angle, players, viewer_index);

            let height = self.strip_height(hit.distance);
            let color = self.strip_color(&hit, players, now);
            surface.fill_rect(
                ray as f32 * strip_width,
                self.view_height / 2.0 - height / 2.0,
                strip_width,
                height,
                color,
            );
        }
    }

    /// One health line per known player, in that player's color
    pub fn draw_hud(&self, surface: &mut impl Surface, players: &[PlayerState]) {
        for (line, player) in players.iter().enumerate() {
            surface.fill_text(
                &hud_text(player),
                HUD_LEFT,
                HUD_TOP + line as f32 * HUD_LINE_SPACING,
                HUD_FONT_PX,
                player.color.rgb(),
            );
        }
    }
}

fn hud_text(player: &PlayerState) -> String {
    if player.is_defeated() {
        format!("{} health: 0 (defeated)", player.color)
    } else {
        format!("{} health: {}", player.color, player.health)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::world::{Obstacle, Vec2, World};

    /// Recorded draw call
    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawOp {
        Rect { x: f32, y: f32, w: f32, h: f32, color: Rgb },
        Text { text: String, x: f32, y: f32, color: Rgb },
    }

    /// Surface that records every call
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub ops: Vec<DrawOp>,
    }

    impl RecordingSurface {
        pub fn rects(&self) -> Vec<&DrawOp> {
            self.ops.iter().filter(|op| matches!(op, DrawOp::Rect { .. })).collect()
        }

        pub fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Surface for RecordingSurface {
        fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
            self.ops.push(DrawOp::Rect { x, y, w, h, color });
        }

        fn fill_text(&mut self, text: &str, x: f32, y: f32, _size_px: f32, color: Rgb) {
            self.ops.push(DrawOp::Text {
                text: text.to_string(),
                x,
                y,
                color,
            });
        }
    }

    fn player(x: f32, y: f32, color: &str) -> PlayerState {
        PlayerState::new(Vec2::new(x, y), 2.0, 3, color.into())
    }

    #[test]
    fn height_and_shade_curves() {
        let renderer = Renderer::new(&GameConfig::default());
        assert_eq!(renderer.strip_height(0.0), 600.0);
        assert_eq!(renderer.strip_height(300.0), 0.0);
        assert!((renderer.strip_height(75.0) - 300.0).abs() < 1e-3);

        assert_eq!(renderer.shade(0.0), 255);
        assert_eq!(renderer.shade(150.0), 128);
        assert_eq!(renderer.shade(300.0), 0);
    }

    #[test]
    fn fan_spans_field_of_view_left_to_right() {
        let config = GameConfig::default();
        let renderer = Renderer::new(&config);
        assert!((renderer.ray_angle(1.0, 0) - (1.0 - config.fov / 2.0)).abs() < 1e-6);
        assert!(renderer.ray_angle(1.0, 119) < 1.0 + config.fov / 2.0);
        assert!(renderer.ray_angle(1.0, 10) < renderer.ray_angle(1.0, 11));
    }

    #[test]
    fn empty_view_draws_one_dark_strip_per_ray() {
        let config = GameConfig::default();
        let world = World::new(vec![]).unwrap();
        let caster = RayCaster::new(&world, &config);
        let renderer = Renderer::new(&config);
        let mut surface = RecordingSurface::default();

        renderer.draw_view(&mut surface, &caster, &[player(400.0, 300.0, "red")], 0, 0);

        let rects = surface.rects();
        assert_eq!(rects.len(), 120);
        match rects[119] {
            DrawOp::Rect { x, w, h, color, .. } => {
                assert!((x - 119.0 * 800.0 / 120.0).abs() < 1e-3);
                assert!((w - 800.0 / 120.0).abs() < 1e-3);
                assert_eq!(*h, 0.0);
                assert_eq!(*color, Rgb::BLACK);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn player_strip_uses_identity_color_then_flash() {
        let config = GameConfig::default();
        let renderer = Renderer::new(&config);
        let mut players = vec![player(100.0, 300.0, "red"), player(150.0, 300.0, "blue")];
        let hit = RayHit {
            distance: 45.0,
            kind: HitKind::Player("blue".into()),
        };

        let now = 1_000_000;
        assert_eq!(renderer.strip_color(&hit, &players, now), Rgb::BLUE);

        players[1].last_hit_at = now - 999;
        assert_eq!(renderer.strip_color(&hit, &players, now), FLASH_COLOR);

        players[1].last_hit_at = now - 1000;
        assert_eq!(renderer.strip_color(&hit, &players, now), Rgb::BLUE);
    }

    #[test]
    fn edge_strips_are_highlighted() {
        let config = GameConfig::default();
        let world = World::new(vec![Obstacle::new(150.0, 300.0, 40.0, 40.0)]).unwrap();
        let caster = RayCaster::new(&world, &config);
        let renderer = Renderer::new(&config);
        let mut surface = RecordingSurface::default();

        renderer.draw_view(&mut surface, &caster, &[player(100.0, 300.0, "red")], 0, 0);

        // The centre ray runs straight into the block's top-left corner
        match surface.rects()[60] {
            DrawOp::Rect { color, .. } => assert_eq!(*color, EDGE_COLOR),
            _ => unreachable!(),
        }
    }

    #[test]
    fn hud_lists_each_player_and_marks_defeat() {
        let renderer = Renderer::new(&GameConfig::default());
        let mut players = vec![player(0.0, 0.0, "red"), player(0.0, 0.0, "blue")];
        players[1].health = 0;
        let mut surface = RecordingSurface::default();

        renderer.draw_hud(&mut surface, &players);

        assert_eq!(
            surface.texts(),
            vec!["red health: 3", "blue health: 0 (defeated)"]
        );
    }
}
