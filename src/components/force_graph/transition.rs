use std::fmt;

pub fn ease_cubic_in_out(t: f64) -> f64 {
	let t = t * 2.0;
	if t <= 1.0 {
		t * t * t / 2.0
	} else {
		let t = t - 2.0;
		(t * t * t + 2.0) / 2.0
	}
}

/// Values that can be interpolated by a [`Tween`].
pub trait Lerp: Copy + PartialEq {
	fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
	fn lerp(self, to: Self, t: f64) -> Self {
		self + (to - self) * t
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: f64,
	pub g: f64,
	pub b: f64,
	pub a: f64,
}

impl Color {
	pub const WHITE: Color = Color::rgb(255.0, 255.0, 255.0);

	pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Parses `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
	pub fn from_hex(hex: &str) -> Option<Self> {
		let digits = hex.strip_prefix('#')?;
		if !digits.is_ascii() {
			return None;
		}
		let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(f64::from);
		let short = |i: usize| channel(digits[i..=i].repeat(2).as_str());
		let long = |i: usize| channel(&digits[i * 2..i * 2 + 2]);
		let (r, g, b, a) = match digits.len() {
			3 => (short(0)?, short(1)?, short(2)?, 255.0),
			4 => (short(0)?, short(1)?, short(2)?, short(3)?),
			6 => (long(0)?, long(1)?, long(2)?, 255.0),
			8 => (long(0)?, long(1)?, long(2)?, long(3)?),
			_ => return None,
		};
		Some(Self {
			r,
			g,
			b,
			a: a / 255.0,
		})
	}

	/// Like [`Color::from_hex`], logging and falling back to white.
	pub fn parse_or_white(hex: &str) -> Self {
		Self::from_hex(hex).unwrap_or_else(|| {
			log::warn!("unrecognized color {hex:?}, using white");
			Self::WHITE
		})
	}
}

impl Lerp for Color {
	fn lerp(self, to: Self, t: f64) -> Self {
		Self {
			r: self.r.lerp(to.r, t),
			g: self.g.lerp(to.g, t),
			b: self.b.lerp(to.b, t),
			a: self.a.lerp(to.a, t),
		}
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
		if self.a >= 1.0 {
			write!(f, "rgb({}, {}, {})", channel(self.r), channel(self.g), channel(self.b))
		} else {
			write!(
				f,
				"rgba({}, {}, {}, {})",
				channel(self.r),
				channel(self.g),
				channel(self.b),
				(self.a.max(0.0) * 1000.0).round() / 1000.0
			)
		}
	}
}

/// A value animated from its in-flight state toward a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween<T: Lerp> {
	from: T,
	to: T,
	start: f64,
	duration: f64,
}

impl<T: Lerp> Tween<T> {
	pub fn fixed(value: T) -> Self {
		Self {
			from: value,
			to: value,
			start: 0.0,
			duration: 0.0,
		}
	}

	pub fn value_at(&self, now: f64) -> T {
		if self.duration <= 0.0 || now >= self.start + self.duration {
			return self.to;
		}
		let t = ((now - self.start) / self.duration).max(0.0);
		self.from.lerp(self.to, ease_cubic_in_out(t))
	}

	/// Interrupts any running animation and heads for `to`.
	pub fn animate_to(&mut self, to: T, now: f64, duration: f64) {
		self.from = self.value_at(now);
		self.to = to;
		self.start = now;
		self.duration = duration;
	}

	pub fn is_settled(&self, now: f64) -> bool {
		self.from == self.to || now >= self.start + self.duration
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn easing_endpoints_and_midpoint() {
		assert_eq!(ease_cubic_in_out(0.0), 0.0);
		assert_eq!(ease_cubic_in_out(0.5), 0.5);
		assert_eq!(ease_cubic_in_out(1.0), 1.0);
		assert!(ease_cubic_in_out(0.25) < 0.25);
		assert!(ease_cubic_in_out(0.75) > 0.75);
	}

	#[test]
	fn parses_hex_forms() {
		assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
		assert_eq!(Color::from_hex("#FF3030"), Some(Color::rgb(255.0, 48.0, 48.0)));
		let translucent = Color::from_hex("#c2c2c280").unwrap();
		assert_eq!((translucent.r, translucent.a), (194.0, 128.0 / 255.0));
		assert_eq!(Color::from_hex("c2c2c2"), None);
		assert_eq!(Color::from_hex("#12345"), None);
		assert_eq!(Color::from_hex("#zzz"), None);
	}

	#[test]
	fn formats_as_css() {
		assert_eq!(Color::rgb(136.0, 136.0, 136.0).to_string(), "rgb(136, 136, 136)");
		assert_eq!(
			Color::from_hex("#c2c2c280").unwrap().to_string(),
			"rgba(194, 194, 194, 0.502)"
		);
	}

	#[test]
	fn tween_reaches_target_at_duration() {
		let mut opacity = Tween::fixed(1.0);
		opacity.animate_to(0.2, 1_000.0, 200.0);
		assert_eq!(opacity.value_at(1_000.0), 1.0);
		assert!((opacity.value_at(1_100.0) - 0.6).abs() < 1e-9);
		assert_eq!(opacity.value_at(1_200.0), 0.2);
		assert!(!opacity.is_settled(1_100.0));
		assert!(opacity.is_settled(1_200.0));
	}

	#[test]
	fn interrupted_tween_starts_from_in_flight_value() {
		let mut opacity = Tween::fixed(1.0);
		opacity.animate_to(0.2, 0.0, 200.0);
		let midway = opacity.value_at(100.0);
		opacity.animate_to(1.0, 100.0, 200.0);
		assert_eq!(opacity.value_at(100.0), midway);
		assert_eq!(opacity.value_at(300.0), 1.0);
	}

	#[test]
	fn colors_interpolate_per_channel() {
		let mut stroke = Tween::fixed(Color::WHITE);
		stroke.animate_to(Color::rgb(136.0, 136.0, 136.0), 0.0, 200.0);
		let mid = stroke.value_at(100.0);
		assert!((mid.r - 195.5).abs() < 1e-9);
		assert_eq!(stroke.value_at(200.0), Color::rgb(136.0, 136.0, 136.0));
	}
}
