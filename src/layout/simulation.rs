//! Fixed-step force simulation.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::f64::consts::PI;

use super::forces::Force;
use super::types::{Body, Link};

const INITIAL_RADIUS: f64 = 10.0;

pub struct Simulation {
    bodies: Vec<Body>,
    links: Vec<Link>,
    forces: Vec<Box<dyn Force>>,
    alpha: f64,
    alpha_min: f64,
    alpha_decay: f64,
    alpha_target: f64,
    velocity_decay: f64,
    rng: StdRng,
}

impl Simulation {
    /// Bodies are placed on a phyllotaxis spiral around `(cx, cy)`, which
    /// gives a deterministic, well spread start without randomness.
    pub fn new(mut bodies: Vec<Body>, links: Vec<Link>, center: (f64, f64), seed: u64) -> Self {
        let angle_step = PI * (3.0 - 5f64.sqrt());
        for (i, body) in bodies.iter_mut().enumerate() {
            let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
            let angle = i as f64 * angle_step;
            body.x = center.0 + radius * angle.cos();
            body.y = center.1 + radius * angle.sin();
            body.vx = 0.0;
            body.vy = 0.0;
        }

        let alpha_min = 0.001;
        Self {
            bodies,
            links,
            forces: Vec::new(),
            alpha: 1.0,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            alpha_target: 0.0,
            velocity_decay: 0.4,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Spread the cooling schedule so alpha reaches `alpha_min` after `ticks` steps.
    pub fn with_cooling(mut self, alpha_min: f64, ticks: usize) -> Self {
        self.alpha_min = alpha_min;
        self.alpha_decay = 1.0 - alpha_min.powf(1.0 / ticks.max(1) as f64);
        self
    }

    /// Fraction of velocity removed per tick.
    pub fn with_velocity_decay(mut self, decay: f64) -> Self {
        self.velocity_decay = decay.clamp(0.0, 1.0);
        self
    }

    pub fn add_force(&mut self, mut force: Box<dyn Force>) {
        force.initialize(&self.bodies, &self.links);
        self.forces.push(force);
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn alpha_min(&self) -> f64 {
        self.alpha_min
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        for force in &mut self.forces {
            force.apply(&mut self.bodies, self.alpha, &mut self.rng);
        }

        let keep = 1.0 - self.velocity_decay;
        for body in &mut self.bodies {
            body.vx *= keep;
            body.vy *= keep;
            body.x += body.vx;
            body.y += body.vy;
        }
    }

    /// Advance exactly `ticks` steps; there is no convergence check.
    pub fn run(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    pub fn into_bodies(self) -> Vec<Body> {
        self.bodies
    }
}
