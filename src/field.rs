//! The animated background: a fixed number of drifting particles, with lines drawn between the ones
//! that are close together.

use log::debug;
use rand::Rng;

use crate::particle::Particle;
use crate::settings::Settings;
use crate::surface::with_alpha;
use crate::surface::Surface;

/// How opaque the line between two particles `distance` apart should be.
///
/// Fades linearly from fully opaque when they overlap to invisible at `threshold`.
pub fn link_opacity(distance: f64, threshold: f64) -> f64 {
    (1.0 - distance / threshold).clamp(0.0, 1.0)
}

pub struct Field {
    pub settings: Settings,
    pub width: f64,
    pub height: f64,
    pub particles: Vec<Particle>,
}

impl Field {
    /// Creates an empty field; call [`Field::initialize`] (or [`Field::resize`]) to populate it.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            width: 0.0,
            height: 0.0,
            particles: Vec::new(),
        }
    }

    /// Throws away every particle and scatters `count` new ones over `width` x `height`.
    pub fn initialize<R: Rng>(&mut self, count: usize, width: f64, height: f64, rng: &mut R) {
        self.width = width;
        self.height = height;

        let vel_dist = self.settings.velocity_distr();
        let radius_dist = self.settings.radius_distr();
        self.particles = (0..count)
            .map(|_| Particle::generate(width, height, &vel_dist, &radius_dist, rng))
            .collect();

        debug!(
            "seeded {} particles over {}x{}",
            self.particles.len(),
            width,
            height
        );
    }

    /// Nothing carries over a resize; the field is reseeded at the new size.
    pub fn resize<R: Rng>(&mut self, width: f64, height: f64, rng: &mut R) {
        self.initialize(self.settings.particle_count, width, height, rng);
    }

    pub fn advance(&mut self) {
        for p in self.particles.iter_mut() {
            p.update(self.width, self.height);
        }
    }

    /// Draws the field as it currently stands, without moving anything.
    pub fn render<S: Surface>(&self, surface: &mut S) {
        self.paint_trails(surface);
        self.draw_links(surface);
        for p in self.particles.iter() {
            self.draw_particle(p, surface);
        }
    }

    /// One animation frame.
    ///
    /// Links are drawn from where the particles were at the start of the frame, and then each
    /// particle in turn is moved and drawn at its new position.
    pub fn frame<S: Surface>(&mut self, surface: &mut S) {
        self.paint_trails(surface);
        self.draw_links(surface);

        let (width, height) = (self.width, self.height);
        for i in 0..self.particles.len() {
            self.particles[i].update(width, height);
            self.draw_particle(&self.particles[i], surface);
        }
    }

    /// Instead of clearing, paint over the last frame with a translucent background so moving
    /// particles leave a fading trail.
    fn paint_trails<S: Surface>(&self, surface: &mut S) {
        surface.set_fill_color(with_alpha(
            self.settings.background,
            self.settings.trail_alpha,
        ));
        surface.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn draw_links<S: Surface>(&self, surface: &mut S) {
        let threshold = self.settings.link_distance;

        for i in 0..self.particles.len() {
            // Pairing a particle with itself would just draw a dot, so start from i + 1.
            for j in i + 1..self.particles.len() {
                let p = &self.particles[i];
                let q = &self.particles[j];

                let distance = p.distance_to(q);
                if distance >= threshold {
                    continue;
                }

                let opacity = link_opacity(distance, threshold) as f32;
                surface.set_stroke_color(with_alpha(self.settings.link_color, opacity));
                surface.set_line_width(self.settings.link_width);
                surface.stroke_line((p.x, p.y), (q.x, q.y));
            }
        }
    }

    fn draw_particle<S: Surface>(&self, p: &Particle, surface: &mut S) {
        let color = self.settings.palette[p.kind % self.settings.palette.len()];
        surface.set_fill_color(with_alpha(color, 1.0));
        surface.fill_circle(p.x, p.y, p.radius);
    }
}
