//! Reporting sinks for the surface temperature trajectory.
//!
//! [`SvgChart`] draws the line chart directly as SVG. [`CsvTrajectory`]
//! writes the raw samples for any other plotting backend.

use crate::errors::GraySlabResult;
use crate::integrator::Trajectory;
use crate::timeseries::{FloatValue, Time};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Layout of the trajectory chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Fixed temperature axis range (K)
    pub y_range: (FloatValue, FloatValue),
    pub grid: bool,
    pub width: u32,
    pub height: u32,
    pub line_color: String,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            title: "Earth Temperature Model (Single-Slab Atmo.)".to_string(),
            x_label: "Time [s]".to_string(),
            y_label: "Earth Temperature [K]".to_string(),
            y_range: (50.0, 300.0),
            grid: true,
            // 6.5 x 4 inch figure at 100 dpi
            width: 650,
            height: 400,
            line_color: "blue".to_string(),
        }
    }
}

/// Consumer of a completed trajectory
pub trait ReportSink {
    fn render(&mut self, chart: &ChartSpec, trajectory: &Trajectory) -> GraySlabResult<()>;
}

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;
const X_TICKS: usize = 6;
const Y_TICKS: usize = 5;
// Keeps diverged samples from producing unreadable coordinates; they are
// clipped to the plot area anyway.
const COORDINATE_LIMIT: f64 = 1.0e6;

/// Line chart written as a standalone SVG document
pub struct SvgChart<W: Write> {
    writer: W,
}

impl<W: Write> SvgChart<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    x_range: (Time, Time),
    y_range: (FloatValue, FloatValue),
}

impl PlotArea {
    fn new(chart: &ChartSpec, x_range: (Time, Time)) -> Self {
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: (chart.width as f64 - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (chart.height as f64 - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
            x_range,
            y_range: chart.y_range,
        }
    }

    fn x_of(&self, t: Time) -> f64 {
        let (lo, hi) = self.x_range;
        let frac = if hi > lo { (t - lo) / (hi - lo) } else { 0.5 };
        self.left + frac * self.width
    }

    fn y_of(&self, v: FloatValue) -> f64 {
        let (lo, hi) = self.y_range;
        let frac = if hi > lo { (v - lo) / (hi - lo) } else { 0.5 };
        let y = self.top + (1.0 - frac) * self.height;
        y.clamp(-COORDINATE_LIMIT, COORDINATE_LIMIT)
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }
}

fn x_range(trajectory: &Trajectory) -> (Time, Time) {
    let time = trajectory.time_axis();
    match (time.first(), time.last()) {
        (Some(&first), Some(&last)) if last > first => (first, last),
        (Some(&first), _) => (first, first + 1.0),
        _ => (0.0, 1.0),
    }
}

/// Split the trajectory into runs of finite samples
fn segments(trajectory: &Trajectory) -> Vec<Vec<(Time, FloatValue)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (t, v) in trajectory.points() {
        if v.is_finite() {
            current.push((t, v));
        } else if !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
}

impl<W: Write> ReportSink for SvgChart<W> {
    fn render(&mut self, chart: &ChartSpec, trajectory: &Trajectory) -> GraySlabResult<()> {
        let area = PlotArea::new(chart, x_range(trajectory));
        let (width, height) = (chart.width, chart.height);
        let f = &mut self.writer;

        writeln!(
            f,
            "<svg xmlns='http://www.w3.org/2000/svg' width='{width}' height='{height}' viewBox='0 0 {width} {height}'>"
        )?;
        writeln!(
            f,
            "<rect x='0' y='0' width='{width}' height='{height}' fill='white'/>"
        )?;
        writeln!(
            f,
            "<defs><clipPath id='plot-area'><rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}'/></clipPath></defs>",
            area.left, area.top, area.width, area.height
        )?;

        // Grid and tick labels
        for i in 0..=X_TICKS {
            let t = area.x_range.0 + (area.x_range.1 - area.x_range.0) * (i as f64 / X_TICKS as f64);
            let x = area.x_of(t);
            if chart.grid {
                writeln!(
                    f,
                    "<line x1='{x:.2}' y1='{:.2}' x2='{x:.2}' y2='{:.2}' stroke='#d1d5db' stroke-width='1'/>",
                    area.top,
                    area.bottom()
                )?;
            }
            writeln!(
                f,
                "<text x='{x:.2}' y='{:.2}' text-anchor='middle' font-family='sans-serif' font-size='11'>{t:.0}</text>",
                area.bottom() + 16.0
            )?;
        }
        for i in 0..=Y_TICKS {
            let v = area.y_range.0 + (area.y_range.1 - area.y_range.0) * (i as f64 / Y_TICKS as f64);
            let y = area.y_of(v);
            if chart.grid {
                writeln!(
                    f,
                    "<line x1='{:.2}' y1='{y:.2}' x2='{:.2}' y2='{y:.2}' stroke='#d1d5db' stroke-width='1'/>",
                    area.left,
                    area.right()
                )?;
            }
            writeln!(
                f,
                "<text x='{:.2}' y='{:.2}' text-anchor='end' font-family='sans-serif' font-size='11'>{v:.0}</text>",
                area.left - 6.0,
                y + 4.0
            )?;
        }

        writeln!(
            f,
            "<rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' fill='none' stroke='black' stroke-width='1'/>",
            area.left, area.top, area.width, area.height
        )?;

        for segment in segments(trajectory) {
            let points: Vec<String> = segment
                .iter()
                .map(|&(t, v)| format!("{:.2},{:.2}", area.x_of(t), area.y_of(v)))
                .collect();
            writeln!(
                f,
                "<polyline clip-path='url(#plot-area)' fill='none' stroke='{}' stroke-width='1.5' points='{}'/>",
                xml_escape(&chart.line_color),
                points.join(" ")
            )?;
        }

        writeln!(
            f,
            "<text x='{:.2}' y='24' text-anchor='middle' font-family='sans-serif' font-size='14'>{}</text>",
            area.left + area.width / 2.0,
            xml_escape(&chart.title)
        )?;
        writeln!(
            f,
            "<text x='{:.2}' y='{:.2}' text-anchor='middle' font-family='sans-serif' font-size='12'>{}</text>",
            area.left + area.width / 2.0,
            height as f64 - 10.0,
            xml_escape(&chart.x_label)
        )?;
        writeln!(
            f,
            "<text x='16' y='{:.2}' text-anchor='middle' font-family='sans-serif' font-size='12' transform='rotate(-90 16 {:.2})'>{}</text>",
            area.top + area.height / 2.0,
            area.top + area.height / 2.0,
            xml_escape(&chart.y_label)
        )?;

        writeln!(f, "</svg>")?;
        f.flush()?;
        Ok(())
    }
}

/// Writes `time,surface_temperature,atmosphere_temperature` rows
pub struct CsvTrajectory<W: Write> {
    writer: W,
}

impl<W: Write> CsvTrajectory<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for CsvTrajectory<W> {
    fn render(&mut self, _chart: &ChartSpec, trajectory: &Trajectory) -> GraySlabResult<()> {
        writeln!(
            self.writer,
            "time,surface_temperature,atmosphere_temperature"
        )?;
        for ((t, surface), (_, atmosphere)) in
            trajectory.points().zip(trajectory.atmosphere().iter())
        {
            writeln!(self.writer, "{},{},{}", t, surface, atmosphere)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrator::run;
    use crate::parameters::SimulationParameters;

    fn trajectory(n_steps: usize) -> Trajectory {
        let params = SimulationParameters {
            duration: 60.0 * n_steps as f64,
            ..Default::default()
        };
        run(&params).unwrap().trajectory
    }

    fn render_svg(trajectory: &Trajectory) -> String {
        let mut sink = SvgChart::new(Vec::new());
        sink.render(&ChartSpec::default(), trajectory).unwrap();
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn svg_contains_labels() {
        let svg = render_svg(&trajectory(60));
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Earth Temperature Model (Single-Slab Atmo.)"));
        assert!(svg.contains("Time [s]"));
        assert!(svg.contains("Earth Temperature [K]"));
        assert_eq!(svg.matches("<polyline").count(), 1);
        // Temperature ticks at 50 K spacing
        for tick in ["50", "100", "150", "200", "250", "300"] {
            assert!(svg.contains(&format!(">{}</text>", tick)), "missing tick {}", tick);
        }
    }

    #[test]
    fn svg_without_grid() {
        let chart = ChartSpec {
            grid: false,
            ..Default::default()
        };
        let mut sink = SvgChart::new(Vec::new());
        sink.render(&chart, &trajectory(5)).unwrap();
        let svg = String::from_utf8(sink.into_inner()).unwrap();
        assert!(!svg.contains("#d1d5db"));
    }

    #[test]
    fn svg_of_empty_trajectory() {
        let svg = render_svg(&trajectory(0));
        assert_eq!(svg.matches("<polyline").count(), 0);
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn svg_escapes_title() {
        let chart = ChartSpec {
            title: "T<sub> & co".to_string(),
            ..Default::default()
        };
        let mut sink = SvgChart::new(Vec::new());
        sink.render(&chart, &trajectory(2)).unwrap();
        let svg = String::from_utf8(sink.into_inner()).unwrap();
        assert!(svg.contains("T&lt;sub&gt; &amp; co"));
    }

    #[test]
    fn svg_breaks_line_at_non_finite_values() {
        let params = SimulationParameters {
            dt: 1.0e5,
            duration: 1.0e6,
            heat_capacity: 1.0,
            atmosphere_heat_capacity: 1.0,
            ..Default::default()
        };
        let trajectory = run(&params).unwrap().trajectory;
        let svg = render_svg(&trajectory);
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn csv_rows() {
        let mut sink = CsvTrajectory::new(Vec::new());
        sink.render(&ChartSpec::default(), &trajectory(3)).unwrap();
        let csv = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "time,surface_temperature,atmosphere_temperature");
        assert!(lines[1].starts_with("0,"));
        assert!(lines[2].starts_with("60,"));
        assert!(lines[3].starts_with("120,"));
    }
}
