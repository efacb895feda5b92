use std::collections::HashMap;
use std::sync::Arc;
use pv_core::{ItemInfo, PlotPoint};
use crate::scale::LinearScale;

pub const POINT_RADIUS: f64 = 4.0;
const MARGIN_X: f64 = 50.0;
const MARGIN_TOP: f64 = 70.0;
const MARGIN_BOTTOM: f64 = 120.0;
const STROKE_WIDTH: f64 = 0.1;
const OPACITY: f64 = 0.4;

/// A layout point projected to pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPoint {
    pub item_id: String,
    pub cx: f64,
    pub cy: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub title: String,
    pub description: String,
    pub journal: String,
}

impl Tooltip {
    fn from_info(info: &ItemInfo) -> Self {
        Self {
            title: info.title.clone(),
            description: info.authors.clone(),
            journal: format!("{} ({})", info.publisher, info.pub_year),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScatterPlot {
    width: f64,
    height: f64,
    points: Vec<PlacedPoint>,
    info: Arc<HashMap<String, ItemInfo>>,
}

impl ScatterPlot {
    pub fn new(points: &[PlotPoint], info: Arc<HashMap<String, ItemInfo>>, width: f64, height: f64) -> Self {
        let x_scale = LinearScale::fit(points.iter().map(|p| p.x), (MARGIN_X, width - MARGIN_X));
        let y_scale = LinearScale::fit(points.iter().map(|p| p.y), (height - MARGIN_BOTTOM, MARGIN_TOP));

        let points = points
            .iter()
            .map(|p| PlacedPoint {
                item_id: p.item_id.clone(),
                cx: x_scale.map(p.x),
                cy: y_scale.map(p.y),
                color: p.color.clone(),
            })
            .collect();

        Self { width, height, points, info }
    }

    pub fn points(&self) -> &[PlacedPoint] {
        &self.points
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Hover text for `item_id`, joined from the item metadata.
    pub fn tooltip(&self, item_id: &str) -> Option<Tooltip> {
        self.info.get(item_id).map(Tooltip::from_info)
    }

    /// The item under pixel `(x, y)`, preferring the closest and then the topmost point.
    pub fn pick(&self, x: f64, y: f64) -> Option<&str> {
        self.points
            .iter()
            .rev()
            .map(|p| (p, (p.cx - x).hypot(p.cy - y)))
            .filter(|(_, distance)| *distance <= POINT_RADIUS)
            .fold(None, |best: Option<(&PlacedPoint, f64)>, (p, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((p, d)),
            })
            .map(|(p, _)| p.item_id.as_str())
    }

    /// Standalone SVG document; each point links to `{link_base}{item_id}`.
    pub fn render_svg(&self, link_base: &str) -> String {
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n<g>\n<rect class=\"overlay\" width=\"{w}\" height=\"{h}\" fill=\"none\"/>\n",
            w = self.width,
            h = self.height,
        );

        for point in &self.points {
            let circle = format!(
                "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" fill=\"{}\" stroke=\"black\" stroke-width=\"{}\" opacity=\"{}\"",
                point.cx,
                point.cy,
                POINT_RADIUS,
                escape_xml(&point.color),
                STROKE_WIDTH,
                OPACITY,
            );
            let circle = match self.tooltip(&point.item_id) {
                Some(tooltip) => format!(
                    "{}><title>{}\n{}\n{}</title></circle>",
                    circle,
                    escape_xml(&tooltip.title),
                    escape_xml(&tooltip.description),
                    escape_xml(&tooltip.journal),
                ),
                None => format!("{}/>", circle),
            };
            svg.push_str(&format!(
                "<a href=\"{}{}\">{}</a>\n",
                escape_xml(link_base),
                escape_xml(&point.item_id),
                circle
            ));
        }

        svg.push_str("</g>\n</svg>\n");
        svg
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
