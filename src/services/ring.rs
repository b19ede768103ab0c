//! Circular progress ring rendering

use std::f64::consts::PI;

const TRACK_COLOR: &str = "#e6e7e8";
const PROGRESS_COLOR: &str = "#3498db";

/// Size of the ring and thickness of its stroke, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    pub size: f64,
    pub stroke_width: f64,
}

impl RingGeometry {
    pub fn new(size: f64, stroke_width: f64) -> Self {
        Self { size, stroke_width }
    }

    pub fn radius(&self) -> f64 {
        ((self.size - self.stroke_width) / 2.0).max(0.0)
    }

    pub fn circumference(&self) -> f64 {
        self.radius() * 2.0 * PI
    }

    pub fn center(&self) -> f64 {
        self.size / 2.0
    }

    /// Dash offset that leaves exactly `progress` of the ring drawn
    pub fn dash_offset(&self, progress: f64) -> f64 {
        self.circumference() * (1.0 - progress.clamp(0.0, 1.0))
    }
}

impl Default for RingGeometry {
    fn default() -> Self {
        Self::new(240.0, 12.0)
    }
}

/// One frame of the timer widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingFrame {
    pub progress: f64,
    pub remaining_seconds: u64,
}

/// Draws a partial circular arc for a progress fraction
pub trait RingRenderer {
    type Output;

    fn draw(&mut self, frame: &RingFrame) -> Self::Output;
}

/// Renders frames as standalone SVG documents
#[derive(Debug, Clone)]
pub struct SvgRingRenderer {
    geometry: RingGeometry,
}

impl SvgRingRenderer {
    pub fn new(geometry: RingGeometry) -> Self {
        Self { geometry }
    }
}

impl RingRenderer for SvgRingRenderer {
    type Output = String;

    fn draw(&mut self, frame: &RingFrame) -> String {
        let g = &self.geometry;
        let size = g.size;
        let c = g.center();
        let r = g.radius();
        let stroke = g.stroke_width;
        let circumference = g.circumference();
        let offset = g.dash_offset(frame.progress);
        let font_size = size / 4.0;

        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#,
                r#"<circle stroke="{track}" fill="none" cx="{c}" cy="{c}" r="{r:.3}" stroke-width="{stroke}"/>"#,
                r#"<circle stroke="{color}" fill="none" cx="{c}" cy="{c}" r="{r:.3}" stroke-width="{stroke}" "#,
                r#"stroke-dasharray="{circ:.3} {circ:.3}" stroke-dashoffset="{offset:.3}" transform="rotate(-90 {c} {c})"/>"#,
                r#"<text x="{c}" y="{c}" font-size="{font}" text-anchor="middle" dominant-baseline="central">{remaining}</text>"#,
                "</svg>"
            ),
            size = size,
            track = TRACK_COLOR,
            color = PROGRESS_COLOR,
            c = c,
            r = r,
            stroke = stroke,
            circ = circumference,
            offset = offset,
            font = font_size,
            remaining = frame.remaining_seconds,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_matches_stroke_inset() {
        let g = RingGeometry::new(200.0, 20.0);
        assert_eq!(g.radius(), 90.0);
        assert!((g.circumference() - 180.0 * PI).abs() < 1e-9);
        assert_eq!(g.center(), 100.0);
    }

    #[test]
    fn dash_offset_tracks_progress() {
        let g = RingGeometry::new(200.0, 20.0);
        assert_eq!(g.dash_offset(1.0), 0.0);
        assert!((g.dash_offset(0.0) - g.circumference()).abs() < 1e-9);
        assert!((g.dash_offset(0.25) - g.circumference() * 0.75).abs() < 1e-9);
        assert_eq!(g.dash_offset(1.5), 0.0);
        assert!((g.dash_offset(-1.0) - g.circumference()).abs() < 1e-9);
    }

    #[test]
    fn svg_contains_arc_and_digits() {
        let mut renderer = SvgRingRenderer::new(RingGeometry::new(100.0, 10.0));
        let svg = renderer.draw(&RingFrame { progress: 0.5, remaining_seconds: 42 });
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(">42</text>"));
        assert!(svg.contains("rotate(-90 50 50)"));
        let half = format!("stroke-dashoffset=\"{:.3}\"", RingGeometry::new(100.0, 10.0).dash_offset(0.5));
        assert!(svg.contains(&half));
    }
}
