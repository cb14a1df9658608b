use rand::Rng;
use rand_distr::Distribution;
use rand_distr::Uniform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    /// Index into the two-colour palette from the settings.
    pub kind: usize,
}

impl Particle {
    /// Places a particle somewhere in `width` x `height`, with velocity and radius drawn from the
    /// given distributions.
    pub fn generate<R: Rng>(
        width: f64,
        height: f64,
        vel_dist: &Uniform<f64>,
        radius_dist: &Uniform<f64>,
        rng: &mut R,
    ) -> Self {
        Self {
            x: sample_extent(width, rng),
            y: sample_extent(height, rng),
            vx: vel_dist.sample(rng),
            vy: vel_dist.sample(rng),
            radius: radius_dist.sample(rng),
            kind: if rng.gen_bool(0.5) { 0 } else { 1 },
        }
    }

    /// Move by one frame's worth of velocity, wrapping around the edges.
    pub fn update(&mut self, width: f64, height: f64) {
        self.x = wrap(self.x + self.vx, width);
        self.y = wrap(self.y + self.vy, height);
    }

    pub fn distance_to(&self, other: &Particle) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        f64::sqrt(dx * dx + dy * dy)
    }
}

fn usable(extent: f64) -> bool {
    extent > 0.0 && extent.is_finite()
}

fn sample_extent<R: Rng>(extent: f64, rng: &mut R) -> f64 {
    if usable(extent) {
        Uniform::new(0.0, extent).sample(rng)
    } else {
        0.0
    }
}

/// Brings a coordinate which has left `[0, extent)` back in from the opposite edge.
///
/// Anything that can't be placed on a usable axis ends up at 0.
pub fn wrap(value: f64, extent: f64) -> f64 {
    if !usable(extent) || !value.is_finite() {
        return 0.0;
    }

    if (0.0..extent).contains(&value) {
        return value;
    }

    // `rem_euclid` can round up to exactly `extent` for tiny negative values.
    let wrapped = value.rem_euclid(extent);
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}
