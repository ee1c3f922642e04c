//! SVG markup for a [`ChartSpec`].

use chrono::NaiveDate;

use crate::domain::chart::ChartSpec;

const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 50.0;
const Y_TICKS: usize = 5;
const SERIES_COLOR: &str = "#1F77B4";
const FONT_FAMILY: &str = "DejaVu Sans, Arial, Helvetica, sans-serif";

/// Maps data coordinates onto the plot area.
struct Frame {
    start: NaiveDate,
    days: f64,
    lo: f64,
    hi: f64,
    plot_width: f64,
    plot_height: f64,
}

impl Frame {
    fn new(chart: &ChartSpec, width: f64, height: f64) -> Self {
        let (lo, hi) = padded_extent(chart.y_extent().unwrap_or((0.0, 1.0)));
        Self {
            start: chart.start,
            days: (chart.end - chart.start).num_days() as f64,
            lo,
            hi,
            plot_width: (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            plot_height: (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        }
    }

    fn x(&self, date: NaiveDate) -> f64 {
        if self.days <= 0.0 {
            return MARGIN_LEFT + self.plot_width / 2.0;
        }
        let offset = (date - self.start).num_days() as f64;
        MARGIN_LEFT + offset / self.days * self.plot_width
    }

    fn y(&self, value: f64) -> f64 {
        MARGIN_TOP + (self.hi - value) / (self.hi - self.lo) * self.plot_height
    }

    fn bottom(&self) -> f64 {
        MARGIN_TOP + self.plot_height
    }

    fn right(&self) -> f64 {
        MARGIN_LEFT + self.plot_width
    }
}

/// Adds 5% headroom; a flat extent is widened so the scale never divides by 0.
fn padded_extent((lo, hi): (f64, f64)) -> (f64, f64) {
    let range = hi - lo;
    if range > 0.0 {
        (lo - range * 0.05, hi + range * 0.05)
    } else {
        let pad = (lo.abs() * 0.05).max(1.0);
        (lo - pad, hi + pad)
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Polyline point lists, split wherever a value is missing.
fn series_segments(chart: &ChartSpec, frame: &Frame) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for point in &chart.points {
        if point.value.is_finite() {
            current.push(format!(
                "{:.1},{:.1}",
                frame.x(point.date),
                frame.y(point.value)
            ));
        } else if !current.is_empty() {
            segments.push(current.join(" "));
            current.clear();
        }
    }
    if !current.is_empty() {
        segments.push(current.join(" "));
    }
    segments
}

fn date_ticks(chart: &ChartSpec) -> Vec<NaiveDate> {
    let mid = chart
        .points
        .get(chart.points.len() / 2)
        .map(|p| p.date)
        .unwrap_or(chart.start);
    let mut ticks = vec![chart.start, mid, chart.end];
    ticks.dedup();
    ticks
}

pub fn render_svg(chart: &ChartSpec, width: u32, height: u32) -> String {
    let (width, height) = (f64::from(width), f64::from(height));
    let frame = Frame::new(chart, width, height);

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{FONT_FAMILY}">"#,
        w = width,
        h = height,
    ));
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n");
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"16\" fill=\"#000000\">{}</text>\n",
        width / 2.0,
        MARGIN_TOP / 2.0 + 6.0,
        escape_xml(&chart.title)
    ));

    // axes
    svg.push_str(&format!(
        "  <line x1=\"{l:.1}\" y1=\"{t:.1}\" x2=\"{l:.1}\" y2=\"{b:.1}\" stroke=\"#666666\" stroke-width=\"1\"/>\n",
        l = MARGIN_LEFT,
        t = MARGIN_TOP,
        b = frame.bottom(),
    ));
    svg.push_str(&format!(
        "  <line x1=\"{l:.1}\" y1=\"{b:.1}\" x2=\"{r:.1}\" y2=\"{b:.1}\" stroke=\"#666666\" stroke-width=\"1\"/>\n",
        l = MARGIN_LEFT,
        r = frame.right(),
        b = frame.bottom(),
    ));

    for i in 0..Y_TICKS {
        let value = frame.lo + (frame.hi - frame.lo) * i as f64 / (Y_TICKS - 1) as f64;
        let y = frame.y(value);
        svg.push_str(&format!(
            "  <line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#666666\" stroke-width=\"1\"/>\n",
            MARGIN_LEFT - 5.0,
            MARGIN_LEFT,
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"11\" fill=\"#333333\">{:.2}</text>\n",
            MARGIN_LEFT - 8.0,
            y + 4.0,
            value
        ));
    }

    for date in date_ticks(chart) {
        let x = frame.x(date);
        svg.push_str(&format!(
            "  <line x1=\"{x:.1}\" y1=\"{b:.1}\" x2=\"{x:.1}\" y2=\"{t:.1}\" stroke=\"#666666\" stroke-width=\"1\"/>\n",
            b = frame.bottom(),
            t = frame.bottom() + 5.0,
        ));
        svg.push_str(&format!(
            "  <text x=\"{x:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"11\" fill=\"#333333\">{}</text>\n",
            frame.bottom() + 20.0,
            date.format("%Y-%m-%d")
        ));
    }

    for points in series_segments(chart, &frame) {
        svg.push_str(&format!(
            "  <polyline fill=\"none\" stroke=\"{SERIES_COLOR}\" stroke-width=\"1.5\" points=\"{points}\"/>\n"
        ));
    }

    let (x1, x2) = (frame.x(chart.start), frame.x(chart.end));
    for line in &chart.lines {
        if !line.value.is_finite() {
            continue;
        }
        let y = frame.y(line.value);
        svg.push_str(&format!(
            "  <line x1=\"{x1:.1}\" y1=\"{y:.1}\" x2=\"{x2:.1}\" y2=\"{y:.1}\" stroke=\"{}\" stroke-width=\"2\"/>\n",
            line.color
        ));
    }

    for note in &chart.annotations {
        if !note.value.is_finite() {
            continue;
        }
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" fill=\"#000000\">{}</text>\n",
            frame.x(note.date),
            frame.y(note.value) - 3.0,
            escape_xml(&note.text)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}
