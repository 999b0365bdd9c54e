use glam::DVec2;
use rand::Rng;

/// A single decorative background star.
#[derive(Clone, Copy, Debug)]
pub struct Star {
    pub pos: DVec2,
    /// Relative brightness in `0.5..=1.0`.
    pub brightness: f32,
}

/// A fixed set of background stars, generated once at startup.
#[derive(Debug)]
pub struct Starfield {
    pub stars: Vec<Star>,
}

impl Starfield {
    /// Scatters `count` stars uniformly over the axis-aligned rectangle
    /// spanned by `min` and `max`.
    pub fn random_in_rect(count: usize, min: DVec2, max: DVec2, rng: &mut impl Rng) -> Self {
        let stars = (0..count)
            .map(|_| {
                let x = rng.random_range(min.x..=max.x);
                let y = rng.random_range(min.y..=max.y);
                Star {
                    pos: DVec2::new(x, y),
                    brightness: rng.random_range(0.5..=1.0),
                }
            })
            .collect();

        Self { stars }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_in_rect_stays_inside_bounds() {
        let mut rng = rand::rng();
        let min = DVec2::new(-100.0, -50.0);
        let max = DVec2::new(100.0, 50.0);

        let field = Starfield::random_in_rect(200, min, max, &mut rng);

        assert_eq!(field.stars.len(), 200);
        for star in &field.stars {
            assert!(star.pos.x >= min.x && star.pos.x <= max.x);
            assert!(star.pos.y >= min.y && star.pos.y <= max.y);
            assert!(star.brightness >= 0.5 && star.brightness <= 1.0);
        }
    }
}
