use crate::interpolate::{lerp_f32, lerp_point};

/// Layout size of a hosting container, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A container can be drawn into once it has a finite, positive width.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.width > 0.0 && self.height.is_finite()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb` -> opaque color. Invalid input yields transparent.
    pub fn hex(s: &str) -> Self {
        let s = s.trim_start_matches('#');
        if s.len() != 6 || !s.is_ascii() {
            return Self::TRANSPARENT;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).map(|v| v as f32 / 255.0);
        match (channel(0), channel(2), channel(4)) {
            (Ok(r), Ok(g), Ok(b)) => Self::rgba(r, g, b, 1.0),
            _ => Self::TRANSPARENT,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn lerp(self, other: Color, t: f32) -> Self {
        Self::rgba(
            lerp_f32(self.r, other.r, t),
            lerp_f32(self.g, other.g, t),
            lerp_f32(self.b, other.b, t),
            lerp_f32(self.a, other.a, t),
        )
    }
}

/// Shape of one drawn element.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Rect {
        rect: Rect,
        corner_radius: f32,
    },
    /// Annular sector; angles in radians, clockwise from 12 o'clock.
    Arc {
        center: Point,
        inner_radius: f32,
        outer_radius: f32,
        start_angle: f32,
        end_angle: f32,
    },
    /// Closed polygon (upper edge left to right, lower edge right to left).
    Area { points: Vec<Point> },
}

impl Geometry {
    /// Geometry at progress `t` between `self` and `to`.
    ///
    /// Shapes of different kinds (or areas with different point counts) do
    /// not interpolate and jump to `to`.
    pub fn lerp(&self, to: &Geometry, t: f32) -> Geometry {
        match (self, to) {
            (
                Geometry::Rect {
                    rect: a,
                    corner_radius: ra,
                },
                Geometry::Rect {
                    rect: b,
                    corner_radius: rb,
                },
            ) => Geometry::Rect {
                rect: Rect::new(
                    lerp_f32(a.x, b.x, t),
                    lerp_f32(a.y, b.y, t),
                    lerp_f32(a.width, b.width, t),
                    lerp_f32(a.height, b.height, t),
                ),
                corner_radius: lerp_f32(*ra, *rb, t),
            },
            (
                Geometry::Arc {
                    center: ca,
                    inner_radius: ia,
                    outer_radius: oa,
                    start_angle: sa,
                    end_angle: ea,
                },
                Geometry::Arc {
                    center: cb,
                    inner_radius: ib,
                    outer_radius: ob,
                    start_angle: sb,
                    end_angle: eb,
                },
            ) => Geometry::Arc {
                center: lerp_point(*ca, *cb, t),
                inner_radius: lerp_f32(*ia, *ib, t),
                outer_radius: lerp_f32(*oa, *ob, t),
                start_angle: lerp_f32(*sa, *sb, t),
                end_angle: lerp_f32(*ea, *eb, t),
            },
            (Geometry::Area { points: a }, Geometry::Area { points: b }) if a.len() == b.len() => {
                Geometry::Area {
                    points: a
                        .iter()
                        .zip(b.iter())
                        .map(|(p, q)| lerp_point(*p, *q, t))
                        .collect(),
                }
            }
            _ => to.clone(),
        }
    }

    /// Point used to anchor labels.
    pub fn centroid(&self) -> Point {
        match self {
            Geometry::Rect { rect, .. } => {
                Point::new(rect.x + rect.width * 0.5, rect.y + rect.height * 0.5)
            }
            Geometry::Arc {
                center,
                inner_radius,
                outer_radius,
                start_angle,
                end_angle,
            } => {
                let r = (inner_radius + outer_radius) * 0.5;
                let a = (start_angle + end_angle) * 0.5;
                Point::new(center.x + r * a.sin(), center.y - r * a.cos())
            }
            Geometry::Area { points } => {
                if points.is_empty() {
                    return Point::default();
                }
                let n = points.len() as f32;
                let (sx, sy) = points
                    .iter()
                    .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
                Point::new(sx / n, sy / n)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_width_is_not_drawable() {
        assert!(!Size::new(0.0, 300.0).is_drawable());
        assert!(!Size::new(f32::NAN, 300.0).is_drawable());
        assert!(Size::new(1.0, 0.0).is_drawable());
    }

    #[test]
    fn rect_lerp_is_componentwise() {
        let a = Geometry::Rect {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            corner_radius: 0.0,
        };
        let b = Geometry::Rect {
            rect: Rect::new(10.0, 0.0, 30.0, 10.0),
            corner_radius: 4.0,
        };
        match a.lerp(&b, 0.5) {
            Geometry::Rect {
                rect,
                corner_radius,
            } => {
                assert_eq!(rect, Rect::new(5.0, 0.0, 20.0, 10.0));
                assert_eq!(corner_radius, 2.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn mismatched_shapes_jump_to_target() {
        let a = Geometry::Area { points: vec![] };
        let b = Geometry::Area {
            points: vec![Point::new(1.0, 1.0)],
        };
        assert_eq!(a.lerp(&b, 0.1), b);
    }

    #[test]
    fn hex_colors_parse() {
        let c = Color::hex("#2563eb");
        assert!((c.r - 37.0 / 255.0).abs() < 1e-6);
        assert_eq!(Color::hex("nope"), Color::TRANSPARENT);
    }

    #[test]
    fn non_ascii_hex_is_transparent() {
        assert_eq!("a€bc".len(), 6);
        assert_eq!(Color::hex("a€bc"), Color::TRANSPARENT);
        assert_eq!(Color::hex("#ééé"), Color::TRANSPARENT);
    }
}
