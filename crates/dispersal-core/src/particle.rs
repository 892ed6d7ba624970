use serde::{Deserialize, Serialize};

/// Geographic position of a particle: degrees east, degrees north, metres depth.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
    pub depth: f64,
}

impl Position {
    pub fn new(lon: f64, lat: f64, depth: f64) -> Self {
        Self { lon, lat, depth }
    }
}

/// A simulated larva. Owned by the driver; mortality models only flip `alive`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Particle {
    pub id: u64,
    pub position: Position,
    /// Elapsed simulated time since release, in milliseconds.
    pub age_ms: i64,
    pub alive: bool,
}

impl Particle {
    pub fn new(id: u64, position: Position) -> Self {
        Self {
            id,
            position,
            age_ms: 0,
            alive: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Advance the particle's age by `interval_ms`. Dead particles do not age.
    pub fn advance_age(&mut self, interval_ms: i64) {
        if self.alive {
            self.age_ms = self.age_ms.saturating_add(interval_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_particle_is_alive_and_newborn() {
        let p = Particle::new(3, Position::new(150.0, -30.0, 5.0));
        assert!(p.is_alive());
        assert_eq!(p.age_ms, 0);
    }

    #[test]
    fn dead_particles_stop_ageing() {
        let mut p = Particle::new(0, Position::default());
        p.advance_age(1_000);
        p.kill();
        p.advance_age(1_000);
        assert_eq!(p.age_ms, 1_000);
        assert!(!p.is_alive());
    }
}
