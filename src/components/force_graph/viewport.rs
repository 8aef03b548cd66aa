/// Canvas size used before the container can be measured.
pub const DEFAULT_VIEWPORT: Viewport = Viewport {
	width: 800.0,
	height: 600.0,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		DEFAULT_VIEWPORT
	}
}

/// Latest measured container size.
#[derive(Clone, Debug, Default)]
pub struct ViewportTracker {
	current: Viewport,
}

impl ViewportTracker {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn current(&self) -> Viewport {
		self.current
	}

	/// Records a measurement; `None` or a degenerate size falls back to the default.
	/// Returns whether the current size changed.
	pub fn measure(&mut self, measured: Option<(f64, f64)>) -> bool {
		let usable = |v: f64| v.is_finite() && v >= 1.0;
		let next = match measured {
			Some((width, height)) if usable(width) && usable(height) => Viewport { width, height },
			_ => DEFAULT_VIEWPORT,
		};
		let changed = next != self.current;
		self.current = next;
		changed
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn starts_at_default() {
		assert_eq!(ViewportTracker::new().current(), DEFAULT_VIEWPORT);
	}

	#[test]
	fn tracks_latest_measurement() {
		let mut tracker = ViewportTracker::new();
		assert!(tracker.measure(Some((1024.0, 600.0))));
		assert!(!tracker.measure(Some((1024.0, 600.0))));
		assert!(tracker.measure(Some((300.0, 200.0))));
		assert_eq!(
			tracker.current(),
			Viewport {
				width: 300.0,
				height: 200.0
			}
		);
	}

	#[test]
	fn unmounted_container_falls_back_to_default() {
		let mut tracker = ViewportTracker::new();
		tracker.measure(Some((500.0, 400.0)));
		assert!(tracker.measure(None));
		assert_eq!(tracker.current(), DEFAULT_VIEWPORT);
		tracker.measure(Some((0.0, 0.0)));
		assert_eq!(tracker.current(), DEFAULT_VIEWPORT);
		tracker.measure(Some((f64::NAN, 10.0)));
		assert_eq!(tracker.current(), DEFAULT_VIEWPORT);
	}
}
