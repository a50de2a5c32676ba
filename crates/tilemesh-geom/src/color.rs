/// RGBA color with float components, used both as a plain color and as an
/// accumulator. Components are not clamped while accumulating.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
    pub premultiplied: bool,
}

impl Default for Color {
    fn default() -> Self {
        Color::TRANSPARENT
    }
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0, true);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0, true);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32, premultiplied: bool) -> Self {
        Self {
            r,
            g,
            b,
            a,
            premultiplied,
        }
    }

    /// Opaque straight color.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color::new(r, g, b, 1.0, false)
    }

    /// Parses `#rrggbb` or `#rrggbbaa` (the `#` is optional) into a straight color.
    pub fn from_hex(s: &str) -> Option<Color> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Some(Color::new(
            byte(0)? as f32 / 255.0,
            byte(2)? as f32 / 255.0,
            byte(4)? as f32 / 255.0,
            a as f32 / 255.0,
            false,
        ))
    }

    #[inline]
    pub fn set(&mut self, other: Color) -> &mut Self {
        *self = other;
        self
    }

    /// Converts to premultiplied alpha in place.
    pub fn premultiplied(&mut self) -> &mut Self {
        if !self.premultiplied {
            self.r *= self.a;
            self.g *= self.a;
            self.b *= self.a;
            self.premultiplied = true;
        }
        self
    }

    /// Converts to straight alpha in place. Fully transparent colors keep their
    /// (zero) components.
    pub fn straight(&mut self) -> &mut Self {
        if self.premultiplied {
            if self.a > 0.0 {
                let m = 1.0 / self.a;
                self.r *= m;
                self.g *= m;
                self.b *= m;
            }
            self.premultiplied = false;
        }
        self
    }

    /// Component-wise accumulation in premultiplied space.
    pub fn add(&mut self, other: &Color) -> &mut Self {
        let mut o = *other;
        o.premultiplied();
        self.premultiplied();
        self.r += o.r;
        self.g += o.g;
        self.b += o.b;
        self.a += o.a;
        self
    }

    /// Component-wise product. `self` is first brought into the same alpha
    /// representation as `other`.
    pub fn multiply(&mut self, other: &Color) -> &mut Self {
        if other.premultiplied {
            self.premultiplied();
        } else {
            self.straight();
        }
        self.r *= other.r;
        self.g *= other.g;
        self.b *= other.b;
        self.a *= other.a;
        self
    }

    /// Normalizes an accumulated sum into an opaque average color.
    pub fn flatten(&mut self) -> &mut Self {
        if self.a == 1.0 || self.a <= 0.0 {
            return self;
        }
        if self.premultiplied {
            let m = 1.0 / self.a;
            self.r *= m;
            self.g *= m;
            self.b *= m;
        }
        self.r = self.r.clamp(0.0, 1.0);
        self.g = self.g.clamp(0.0, 1.0);
        self.b = self.b.clamp(0.0, 1.0);
        self.a = 1.0;
        self
    }

    /// Source-over compositing of `top` onto `self`.
    pub fn overlay(&mut self, top: &Color) -> &mut Self {
        let mut t = *top;
        t.premultiplied();
        self.premultiplied();
        let inv = 1.0 - t.a;
        self.r = t.r + self.r * inv;
        self.g = t.g + self.g * inv;
        self.b = t.b + self.b * inv;
        self.a = t.a + self.a * inv;
        self
    }

    /// Returns a premultiplied copy.
    #[inline]
    pub fn to_premultiplied(self) -> Color {
        let mut c = self;
        c.premultiplied();
        c
    }

    /// Packs the color into straight 8-bit RGBA.
    pub fn to_rgba8(self) -> [u8; 4] {
        let mut c = self;
        c.straight();
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(c.r), q(c.g), q(c.b), q(c.a)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        let c = Color::from_hex("#ff8000").unwrap();
        assert_eq!(c.to_rgba8(), [255, 128, 0, 255]);
        assert!(Color::from_hex("#ff80").is_none());
        assert!(Color::from_hex("zzzzzz").is_none());
    }

    #[test]
    fn add_then_flatten_averages() {
        let mut acc = Color::TRANSPARENT;
        acc.add(&Color::rgb(1.0, 0.0, 0.0));
        acc.add(&Color::rgb(0.0, 0.0, 1.0));
        acc.flatten();
        assert_eq!((acc.r, acc.g, acc.b, acc.a), (0.5, 0.0, 0.5, 1.0));
    }

    #[test]
    fn overlay_opaque_replaces() {
        let mut base = Color::rgb(0.2, 0.2, 0.2);
        base.overlay(&Color::rgb(0.9, 0.1, 0.3));
        assert_eq!((base.r, base.g, base.b, base.a), (0.9, 0.1, 0.3, 1.0));
    }
}
