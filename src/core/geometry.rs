use crate::domain::model::{Bounds, FitOptions, LngLat};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Pixel size of the whole world at zoom 0.
pub const TILE_SIZE: f64 = 512.0;

const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorShape {
    /// Quadratic Bézier sampled into `segments` pieces.
    #[default]
    Bezier,
    /// start, raised midpoint, end.
    Straight3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveOptions {
    pub factor: f64,
    pub shape: ConnectorShape,
    pub segments: usize,
}

impl Default for CurveOptions {
    fn default() -> Self {
        Self {
            factor: 0.2,
            shape: ConnectorShape::Bezier,
            segments: 50,
        }
    }
}

pub fn distance(a: LngLat, b: LngLat) -> f64 {
    ((b.lon - a.lon).powi(2) + (b.lat - a.lat).powi(2)).sqrt()
}

/// Midpoint of `start`..`end` lifted north by `distance * factor`.
pub fn raised_midpoint(start: LngLat, end: LngLat, factor: f64) -> LngLat {
    let height = distance(start, end) * factor;
    LngLat::new(
        (start.lon + end.lon) / 2.0,
        (start.lat + end.lat) / 2.0 + height,
    )
}

/// Path of the connector drawn from `start` to `end`. Every shape passes
/// through the raised midpoint.
pub fn curved_connector(start: LngLat, end: LngLat, options: &CurveOptions) -> Vec<LngLat> {
    let peak = raised_midpoint(start, end, options.factor);

    match options.shape {
        ConnectorShape::Straight3 => vec![start, peak, end],
        ConnectorShape::Bezier => {
            // B(0.5) = (start + 2c + end) / 4, so solve for c with B(0.5) = peak
            let control = LngLat::new(
                2.0 * peak.lon - (start.lon + end.lon) / 2.0,
                2.0 * peak.lat - (start.lat + end.lat) / 2.0,
            );
            let segments = options.segments.max(2);

            (0..=segments)
                .map(|i| {
                    let t = i as f64 / segments as f64;
                    let u = 1.0 - t;
                    LngLat::new(
                        u * u * start.lon + 2.0 * u * t * control.lon + t * t * end.lon,
                        u * u * start.lat + 2.0 * u * t * control.lat + t * t * end.lat,
                    )
                })
                .collect()
        }
    }
}

/// Web Mercator position in world units (0..1 on both axes, y grows south).
pub fn project(point: LngLat) -> (f64, f64) {
    let lat = point.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = (point.lon + 180.0) / 360.0;
    let y = (1.0 - (PI / 4.0 + lat / 2.0).tan().ln() / PI) / 2.0;
    (x, y)
}

pub fn unproject(x: f64, y: f64) -> LngLat {
    let lon = x * 360.0 - 180.0;
    let lat = (2.0 * (PI * (1.0 - 2.0 * y)).exp().atan() - PI / 2.0).to_degrees();
    LngLat::new(lon, lat)
}

/// Camera over a fixed-size canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: LngLat,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Pixel position of `point`, origin at the top-left corner.
    pub fn to_pixel(&self, point: LngLat) -> (f64, f64) {
        let scale = TILE_SIZE * self.zoom.exp2();
        let (cx, cy) = project(self.center);
        let (px, py) = project(point);
        (
            self.width / 2.0 + (px - cx) * scale,
            self.height / 2.0 + (py - cy) * scale,
        )
    }
}

/// Largest zoom (capped at `options.max_zoom`) that shows `bounds` inside the
/// canvas minus `options.padding` on every side.
pub fn fit_viewport(bounds: &Bounds, width: f64, height: f64, options: &FitOptions) -> Viewport {
    let (x0, y0) = project(bounds.south_west);
    let (x1, y1) = project(bounds.north_east);

    let usable_w = (width - 2.0 * options.padding).max(1.0);
    let usable_h = (height - 2.0 * options.padding).max(1.0);

    let zoom_for = |span: f64, usable: f64| {
        if span > 0.0 {
            (usable / (span * TILE_SIZE)).log2()
        } else {
            f64::INFINITY
        }
    };

    let zoom = zoom_for((x1 - x0).abs(), usable_w)
        .min(zoom_for((y1 - y0).abs(), usable_h))
        .min(options.max_zoom)
        .max(0.0);

    Viewport {
        center: unproject((x0 + x1) / 2.0, (y0 + y1) / 2.0),
        zoom,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_raised_midpoint_of_diagonal() {
        let peak = raised_midpoint(LngLat::new(0.0, 0.0), LngLat::new(2.0, 2.0), 0.2);
        assert!((peak.lon - 1.0).abs() < EPS);
        assert!((peak.lat - (1.0 + 8f64.sqrt() * 0.2)).abs() < EPS);
    }

    #[test]
    fn test_straight3_connector() {
        let options = CurveOptions {
            shape: ConnectorShape::Straight3,
            ..CurveOptions::default()
        };
        let path = curved_connector(LngLat::new(0.0, 0.0), LngLat::new(2.0, 2.0), &options);
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], LngLat::new(0.0, 0.0));
        assert_eq!(path[2], LngLat::new(2.0, 2.0));
        assert!((path[1].lat - (1.0 + 8f64.sqrt() * 0.2)).abs() < EPS);
    }

    #[test]
    fn test_bezier_connector_passes_through_peak() {
        let start = LngLat::new(-122.4, 37.7);
        let end = LngLat::new(-74.0, 40.7);
        let path = curved_connector(start, end, &CurveOptions::default());

        assert_eq!(path.len(), 51);
        assert!((path[0].lon - start.lon).abs() < EPS && (path[0].lat - start.lat).abs() < EPS);
        assert!((path[50].lon - end.lon).abs() < EPS && (path[50].lat - end.lat).abs() < EPS);

        let peak = raised_midpoint(start, end, 0.2);
        assert!((path[25].lon - peak.lon).abs() < EPS);
        assert!((path[25].lat - peak.lat).abs() < EPS);
    }

    #[test]
    fn test_bezier_bulges_north() {
        let path = curved_connector(
            LngLat::new(0.0, 0.0),
            LngLat::new(10.0, 0.0),
            &CurveOptions::default(),
        );
        assert!(path[1..path.len() - 1].iter().all(|p| p.lat > 0.0));
    }

    #[test]
    fn test_project_roundtrip_center() {
        let (x, y) = project(LngLat::new(0.0, 0.0));
        assert!((x - 0.5).abs() < EPS && (y - 0.5).abs() < EPS);
        let back = unproject(0.25, 0.4);
        let (x, y) = project(back);
        assert!((x - 0.25).abs() < EPS && (y - 0.4).abs() < EPS);
    }

    #[test]
    fn test_fit_viewport_keeps_points_inside_padding() {
        let bounds =
            Bounds::from_points([LngLat::new(0.0, 0.0), LngLat::new(10.0, 10.0)]).unwrap();
        let options = FitOptions::default();
        let viewport = fit_viewport(&bounds, 1024.0, 768.0, &options);

        assert!(viewport.zoom <= options.max_zoom);
        assert!(viewport.zoom > 0.0);
        for point in [LngLat::new(0.0, 0.0), LngLat::new(10.0, 10.0)] {
            let (x, y) = viewport.to_pixel(point);
            assert!(x >= options.padding - 1e-6 && x <= 1024.0 - options.padding + 1e-6);
            assert!(y >= options.padding - 1e-6 && y <= 768.0 - options.padding + 1e-6);
        }
    }

    #[test]
    fn test_fit_viewport_single_point_caps_zoom() {
        let bounds = Bounds::from_point(LngLat::new(2.35, 48.85));
        let viewport = fit_viewport(&bounds, 800.0, 600.0, &FitOptions::default());
        assert_eq!(viewport.zoom, 15.0);
        assert!((viewport.center.lon - 2.35).abs() < 1e-6);
        assert!((viewport.center.lat - 48.85).abs() < 1e-6);
    }
}
