use std::f64::consts::PI;

/// Radius of the circular gauge arc
pub const GAUGE_RADIUS: f64 = 110.0;

/// Geometry of a circular stroke gauge whose fill is driven by a dash offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeGeometry {
    pub radius: f64,
    pub max_speed: f64,
}

impl GaugeGeometry {
    pub fn new(max_speed: f64) -> Self {
        Self { radius: GAUGE_RADIUS, max_speed }
    }

    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.radius
    }

    /// Fraction of full scale, clamped to `[0, 1]`
    pub fn fraction(&self, speed: f64) -> f64 {
        if self.max_speed <= 0.0 {
            return 0.0;
        }
        (speed / self.max_speed).clamp(0.0, 1.0)
    }

    /// Stroke offset: full circumference when empty, zero when full
    pub fn dash_offset(&self, speed: f64) -> f64 {
        self.circumference() * (1.0 - self.fraction(speed))
    }
}

/// Renders a one-line text gauge, e.g. `[#########...........]   42 Mbps`
pub fn render_gauge(speed: f64, geometry: &GaugeGeometry, width: usize) -> String {
    let filled = (geometry.fraction(speed) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!(
        "[{}{}] {:>4} Mbps",
        "#".repeat(filled),
        ".".repeat(width - filled),
        speed.round() as i64
    )
}
