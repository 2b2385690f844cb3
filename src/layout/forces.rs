//! Force contributions for the layout simulation.
//!
//! Each force adjusts body velocities (or positions, for centering) once per
//! tick. Forces are scaled by the simulation's `alpha`, which decays toward
//! zero, except collision, which must keep resolving overlap to the end.

use rand::Rng;
use rand::rngs::StdRng;

use super::types::{Body, Link};

pub trait Force {
    /// Called once before the first tick with the final body and link sets.
    fn initialize(&mut self, _bodies: &[Body], _links: &[Link]) {}

    fn apply(&mut self, bodies: &mut [Body], alpha: f64, rng: &mut StdRng);
}

/// Tiny random offset used to separate exactly coincident bodies.
fn jiggle(rng: &mut StdRng) -> f64 {
    (rng.random::<f64>() - 0.5) * 1e-6
}

/// Spring pulling linked bodies toward `distance`. Bodies with many links
/// get weaker per-link springs so hubs are not dragged around.
pub struct LinkForce {
    distance: f64,
    links: Vec<Link>,
    strengths: Vec<f64>,
    biases: Vec<f64>,
}

impl LinkForce {
    pub fn new(distance: f64) -> Self {
        Self {
            distance,
            links: Vec::new(),
            strengths: Vec::new(),
            biases: Vec::new(),
        }
    }
}

impl Force for LinkForce {
    fn initialize(&mut self, bodies: &[Body], links: &[Link]) {
        let mut degree = vec![0usize; bodies.len()];
        for link in links {
            degree[link.source] += 1;
            degree[link.target] += 1;
        }

        self.links = links.to_vec();
        self.strengths = links
            .iter()
            .map(|l| 1.0 / degree[l.source].min(degree[l.target]) as f64)
            .collect();
        self.biases = links
            .iter()
            .map(|l| {
                let s = degree[l.source] as f64;
                s / (s + degree[l.target] as f64)
            })
            .collect();
    }

    fn apply(&mut self, bodies: &mut [Body], alpha: f64, rng: &mut StdRng) {
        for (i, link) in self.links.iter().enumerate() {
            let (s, t) = (&bodies[link.source], &bodies[link.target]);
            let mut x = t.x + t.vx - s.x - s.vx;
            let mut y = t.y + t.vy - s.y - s.vy;
            if x == 0.0 {
                x = jiggle(rng);
            }
            if y == 0.0 {
                y = jiggle(rng);
            }

            let len = (x * x + y * y).sqrt();
            let k = (len - self.distance) / len * alpha * self.strengths[i];
            x *= k;
            y *= k;

            let bias = self.biases[i];
            bodies[link.target].vx -= x * bias;
            bodies[link.target].vy -= y * bias;
            bodies[link.source].vx += x * (1.0 - bias);
            bodies[link.source].vy += y * (1.0 - bias);
        }
    }
}

/// Pairwise inverse-distance force between all bodies; negative strength repels.
pub struct ManyBodyForce {
    strength: f64,
    distance_min: f64,
}

impl ManyBodyForce {
    pub fn new(strength: f64) -> Self {
        Self {
            strength,
            distance_min: 1.0,
        }
    }
}

impl Force for ManyBodyForce {
    fn apply(&mut self, bodies: &mut [Body], alpha: f64, rng: &mut StdRng) {
        let min2 = self.distance_min * self.distance_min;
        let n = bodies.len();

        for i in 0..n {
            let (mut dvx, mut dvy) = (0.0, 0.0);
            for j in 0..n {
                if i == j {
                    continue;
                }
                let mut x = bodies[j].x - bodies[i].x;
                let mut y = bodies[j].y - bodies[i].y;
                if x == 0.0 {
                    x = jiggle(rng);
                }
                if y == 0.0 {
                    y = jiggle(rng);
                }

                let mut l = x * x + y * y;
                if l < min2 {
                    l = (min2 * l).sqrt();
                }
                let w = self.strength * alpha / l;
                dvx += x * w;
                dvy += y * w;
            }
            bodies[i].vx += dvx;
            bodies[i].vy += dvy;
        }
    }
}

/// Translates all bodies so their centroid sits on a fixed point.
pub struct CenterForce {
    x: f64,
    y: f64,
    strength: f64,
}

impl CenterForce {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            strength: 1.0,
        }
    }
}

impl Force for CenterForce {
    fn apply(&mut self, bodies: &mut [Body], _alpha: f64, _rng: &mut StdRng) {
        if bodies.is_empty() {
            return;
        }
        let n = bodies.len() as f64;
        let sx = bodies.iter().map(|b| b.x).sum::<f64>() / n - self.x;
        let sy = bodies.iter().map(|b| b.y).sum::<f64>() / n - self.y;

        for b in bodies.iter_mut() {
            b.x -= sx * self.strength;
            b.y -= sy * self.strength;
        }
    }
}

/// Keeps bodies from overlapping, treating each as a circle of radius
/// `max(width, height) / 2 + padding`.
pub struct CollideForce {
    padding: f64,
    strength: f64,
    iterations: usize,
    radii: Vec<f64>,
}

impl CollideForce {
    pub fn new(padding: f64, strength: f64, iterations: usize) -> Self {
        Self {
            padding,
            strength,
            iterations: iterations.max(1),
            radii: Vec::new(),
        }
    }

    pub fn radius(&self, body: &Body) -> f64 {
        body.width.max(body.height) / 2.0 + self.padding
    }
}

impl Force for CollideForce {
    fn initialize(&mut self, bodies: &[Body], _links: &[Link]) {
        self.radii = bodies.iter().map(|b| self.radius(b)).collect();
    }

    fn apply(&mut self, bodies: &mut [Body], _alpha: f64, rng: &mut StdRng) {
        let n = bodies.len();

        for _ in 0..self.iterations {
            for i in 0..n {
                let ri = self.radii[i];
                let ri2 = ri * ri;
                let xi = bodies[i].x + bodies[i].vx;
                let yi = bodies[i].y + bodies[i].vy;

                for j in (i + 1)..n {
                    let rj = self.radii[j];
                    let r = ri + rj;
                    let mut x = xi - bodies[j].x - bodies[j].vx;
                    let mut y = yi - bodies[j].y - bodies[j].vy;
                    let mut l = x * x + y * y;
                    if l >= r * r {
                        continue;
                    }

                    if x == 0.0 {
                        x = jiggle(rng);
                        l += x * x;
                    }
                    if y == 0.0 {
                        y = jiggle(rng);
                        l += y * y;
                    }
                    let len = l.sqrt();
                    let k = (r - len) / len * self.strength;
                    x *= k;
                    y *= k;

                    let share = rj * rj / (ri2 + rj * rj);
                    bodies[i].vx += x * share;
                    bodies[i].vy += y * share;
                    bodies[j].vx -= x * (1.0 - share);
                    bodies[j].vy -= y * (1.0 - share);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn body_at(id: &str, x: f64, y: f64) -> Body {
        let mut b = Body::new(id, 100.0, 60.0);
        b.x = x;
        b.y = y;
        b
    }

    #[test]
    fn test_center_moves_centroid() {
        let mut bodies = vec![body_at("a", 0.0, 0.0), body_at("b", 100.0, 50.0)];
        let mut rng = StdRng::seed_from_u64(1);
        CenterForce::new(500.0, 300.0).apply(&mut bodies, 1.0, &mut rng);

        let cx = (bodies[0].x + bodies[1].x) / 2.0;
        let cy = (bodies[0].y + bodies[1].y) / 2.0;
        assert!((cx - 500.0).abs() < 1e-9);
        assert!((cy - 300.0).abs() < 1e-9);
        assert!((bodies[1].x - bodies[0].x - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_many_body_repels() {
        let mut bodies = vec![body_at("a", 0.0, 0.0), body_at("b", 10.0, 0.0)];
        let mut rng = StdRng::seed_from_u64(1);
        ManyBodyForce::new(-100.0).apply(&mut bodies, 1.0, &mut rng);

        assert!(bodies[0].vx < 0.0);
        assert!(bodies[1].vx > 0.0);
    }

    #[test]
    fn test_link_pulls_distant_bodies_together() {
        let mut bodies = vec![body_at("a", 0.0, 0.0), body_at("b", 1000.0, 0.0)];
        let links = [Link {
            source: 0,
            target: 1,
        }];
        let mut force = LinkForce::new(100.0);
        force.initialize(&bodies, &links);
        let mut rng = StdRng::seed_from_u64(1);
        force.apply(&mut bodies, 1.0, &mut rng);

        assert!(bodies[0].vx > 0.0);
        assert!(bodies[1].vx < 0.0);
    }

    #[test]
    fn test_collide_pushes_overlapping_apart() {
        let mut bodies = vec![body_at("a", 0.0, 0.0), body_at("b", 20.0, 0.0)];
        let mut force = CollideForce::new(10.0, 1.0, 1);
        force.initialize(&bodies, &[]);
        let mut rng = StdRng::seed_from_u64(1);
        force.apply(&mut bodies, 1.0, &mut rng);

        assert!(bodies[0].vx < 0.0);
        assert!(bodies[1].vx > 0.0);
    }

    #[test]
    fn test_collide_ignores_separated_bodies() {
        let mut bodies = vec![body_at("a", 0.0, 0.0), body_at("b", 500.0, 0.0)];
        let mut force = CollideForce::new(10.0, 1.0, 1);
        force.initialize(&bodies, &[]);
        let mut rng = StdRng::seed_from_u64(1);
        force.apply(&mut bodies, 1.0, &mut rng);

        assert_eq!(bodies[0].vx, 0.0);
        assert_eq!(bodies[1].vx, 0.0);
    }

    #[test]
    fn test_collide_radius() {
        let force = CollideForce::new(25.0, 1.0, 1);
        assert_eq!(force.radius(&Body::new("t", 250.0, 96.0)), 150.0);
        assert_eq!(force.radius(&Body::new("t", 250.0, 400.0)), 225.0);
    }
}
