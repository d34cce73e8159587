use rand::Rng;

use nightsky_protocol::{Color, Pos2, RenderCommand};

const STREAK_WIDTH: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Point,
    Streak,
}

/// A distant background star drifting left and slightly down.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub radius: f64,
    pub opacity: f64,
}

impl Point {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: f64, height: f64) -> Self {
        Self {
            x: rng.gen_range(0.0..width.max(f64::EPSILON)),
            y: rng.gen_range(0.0..height.max(f64::EPSILON)),
            speed: rng.gen_range(0.1..0.6),
            radius: rng.gen_range(0.5..2.0),
            opacity: rng.gen_range(0.5..1.0),
        }
    }

    /// Past the left edge the point re-enters at the right edge at a new height.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R, width: f64, height: f64) {
        self.x -= self.speed;
        self.y += self.speed / 4.0;
        if self.x < -self.radius {
            self.x = width + self.radius;
            self.y = rng.gen_range(0.0..height.max(f64::EPSILON));
        }
    }

    pub fn draw(&self, out: &mut Vec<RenderCommand>) {
        out.push(RenderCommand::FillCircle {
            center: Pos2::new(self.x, self.y),
            radius: self.radius,
            color: Color::white(self.opacity),
        });
    }
}

/// A shooting star: moves along a fixed angle and fades out.
#[derive(Debug, Clone, PartialEq)]
pub struct Streak {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub len: f64,
    /// Radians below the horizontal, travelling left.
    pub angle: f64,
    pub opacity: f64,
}

impl Streak {
    /// Spawns in the upper half, from the middle of the viewport to half a
    /// width past its right edge.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: f64, height: f64, angle: f64) -> Self {
        Self {
            x: rng.gen_range(0.0..width.max(f64::EPSILON)) + width / 2.0,
            y: rng.gen_range(0.0..(height / 2.0).max(f64::EPSILON)),
            speed: rng.gen_range(15.0..25.0),
            len: rng.gen_range(100.0..300.0),
            angle,
            opacity: 1.0,
        }
    }

    pub fn update(&mut self, decay: f64) {
        self.x -= self.speed * self.angle.cos();
        self.y += self.speed * self.angle.sin();
        self.opacity -= decay;
    }

    pub fn tail(&self) -> Pos2 {
        Pos2::new(
            self.x - self.len * self.angle.cos(),
            self.y + self.len * self.angle.sin(),
        )
    }

    pub fn draw(&self, out: &mut Vec<RenderCommand>) {
        out.push(RenderCommand::StrokeGradientLine {
            from: Pos2::new(self.x, self.y),
            to: self.tail(),
            from_color: Color::white(self.opacity),
            to_color: Color::white(0.0),
            width: STREAK_WIDTH,
        });
    }

    pub fn is_faded(&self) -> bool {
        self.opacity <= 0.0
    }
}

/// Member of the active set.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Point(Point),
    Streak(Streak),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Point(_) => EntityKind::Point,
            Entity::Streak(_) => EntityKind::Streak,
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R, width: f64, height: f64, decay: f64) {
        match self {
            Entity::Point(point) => point.update(rng, width, height),
            Entity::Streak(streak) => streak.update(decay),
        }
    }

    pub fn draw(&self, out: &mut Vec<RenderCommand>) {
        match self {
            Entity::Point(point) => point.draw(out),
            Entity::Streak(streak) => streak.draw(out),
        }
    }

    /// Only streaks expire; points are recycled in place.
    pub fn is_expired(&self) -> bool {
        match self {
            Entity::Point(_) => false,
            Entity::Streak(streak) => streak.is_faded(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn point_wraps_to_right_edge() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut point = Point {
            x: -0.9,
            y: 10.0,
            speed: 0.2,
            radius: 1.0,
            opacity: 0.8,
        };
        point.update(&mut rng, 800.0, 600.0);
        assert_eq!(point.x, 801.0);
        assert!((0.0..600.0).contains(&point.y));
    }

    #[test]
    fn point_drifts_left_and_down() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut point = Point {
            x: 100.0,
            y: 50.0,
            speed: 0.4,
            radius: 1.0,
            opacity: 0.8,
        };
        point.update(&mut rng, 800.0, 600.0);
        assert_eq!(point.x, 99.6);
        assert_eq!(point.y, 50.1);
    }

    #[test]
    fn random_values_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let p = Point::random(&mut rng, 1024.0, 768.0);
            assert!((0.0..1024.0).contains(&p.x));
            assert!((0.1..0.6).contains(&p.speed));
            assert!((0.5..2.0).contains(&p.radius));
            assert!((0.5..1.0).contains(&p.opacity));

            let s = Streak::random(&mut rng, 1024.0, 768.0, 0.5);
            assert!((512.0..1536.0).contains(&s.x));
            assert!((0.0..384.0).contains(&s.y));
            assert!((15.0..25.0).contains(&s.speed));
            assert!((100.0..300.0).contains(&s.len));
            assert_eq!(s.opacity, 1.0);
        }
    }

    #[test]
    fn streak_moves_down_left_at_thirty_degrees() {
        let angle = 30f64.to_radians();
        let mut streak = Streak {
            x: 500.0,
            y: 100.0,
            speed: 20.0,
            len: 100.0,
            angle,
            opacity: 1.0,
        };
        streak.update(0.02);
        assert!((streak.x - (500.0 - 20.0 * angle.cos())).abs() < 1e-9);
        assert!((streak.y - 110.0).abs() < 1e-9);
        assert!((streak.opacity - 0.98).abs() < 1e-12);

        let tail = streak.tail();
        assert!(tail.x < streak.x);
        assert!(tail.y > streak.y);
    }

    #[test]
    fn streak_draws_fading_gradient() {
        let streak = Streak {
            x: 10.0,
            y: 10.0,
            speed: 20.0,
            len: 100.0,
            angle: 0.5,
            opacity: 0.5,
        };
        let mut out = Vec::new();
        Entity::Streak(streak).draw(&mut out);
        match &out[..] {
            [RenderCommand::StrokeGradientLine {
                from_color,
                to_color,
                width,
                ..
            }] => {
                assert_eq!(from_color.a, 0.5);
                assert_eq!(to_color.a, 0.0);
                assert_eq!(*width, 2.0);
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn kinds_are_tagged() {
        let mut rng = StdRng::seed_from_u64(3);
        let point = Entity::Point(Point::random(&mut rng, 10.0, 10.0));
        let streak = Entity::Streak(Streak::random(&mut rng, 10.0, 10.0, 0.5));
        assert_eq!(point.kind(), EntityKind::Point);
        assert_eq!(streak.kind(), EntityKind::Streak);
        assert!(!point.is_expired());
        assert!(!streak.is_expired());
    }
}
