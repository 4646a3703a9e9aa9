use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::form_urlencoded;

use crate::types::Point;
use crate::viewport::ViewportState;

/// Path the pre-rendered image is served from.
pub const RENDER_PATH: &str = "/render";

/// Parameters of the pre-rendered image matching a viewport state.
///
/// Encodes to the `/render` query string the image server understands:
///
/// ```text
/// width=900&height=600&center=-0.5,0&zoom=1&colors=#000764,...&colorSpacing=30
/// ```
///
/// `center` and `colors` are comma-joined lists. The last colour paints the
/// inside of the set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub width: u32,
    pub height: u32,
    pub center: Point,
    pub zoom: f64,
    pub colors: Vec<String>,
    pub color_spacing: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("missing query parameter `{0}`")]
    Missing(&'static str),
    #[error("malformed query parameter `{field}`: {value:?}")]
    Malformed { field: &'static str, value: String },
}

impl ImageRequest {
    pub fn for_state(
        state: &ViewportState,
        width: u32,
        height: u32,
        colors: &[String],
        color_spacing: u32,
    ) -> Self {
        Self {
            width,
            height,
            center: state.center(),
            zoom: state.zoom,
            colors: colors.to_vec(),
            color_spacing,
        }
    }

    /// Encode as an `application/x-www-form-urlencoded` query (no leading `?`).
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("width", &self.width.to_string())
            .append_pair("height", &self.height.to_string())
            .append_pair("center", &format!("{},{}", self.center.x, self.center.y))
            .append_pair("zoom", &self.zoom.to_string())
            .append_pair("colors", &self.colors.join(","))
            .append_pair("colorSpacing", &self.color_spacing.to_string())
            .finish()
    }

    /// Path plus query, suitable for an `<img src>`.
    pub fn to_path(&self) -> String {
        format!("{RENDER_PATH}?{}", self.to_query())
    }

    /// Decode a query string (with or without a leading `?`).
    pub fn from_query(query: &str) -> Result<Self, RequestError> {
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut width = None;
        let mut height = None;
        let mut center = None;
        let mut zoom = None;
        let mut colors = None;
        let mut color_spacing = None;

        // First occurrence wins.
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match &*key {
                "width" => &mut width,
                "height" => &mut height,
                "center" => &mut center,
                "zoom" => &mut zoom,
                "colors" => &mut colors,
                "colorSpacing" => &mut color_spacing,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        let width = parse_number("width", width)?;
        let height = parse_number("height", height)?;
        let center = parse_center(center.ok_or(RequestError::Missing("center"))?)?;
        let zoom: f64 = parse_number("zoom", zoom)?;
        if !(zoom.is_finite() && zoom > 0.0) {
            return Err(RequestError::Malformed {
                field: "zoom",
                value: zoom.to_string(),
            });
        }
        let colors: Vec<String> = colors
            .ok_or(RequestError::Missing("colors"))?
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect();
        if colors.is_empty() {
            return Err(RequestError::Malformed {
                field: "colors",
                value: String::new(),
            });
        }
        let color_spacing = parse_number("colorSpacing", color_spacing)?;

        Ok(Self {
            width,
            height,
            center,
            zoom,
            colors,
            color_spacing,
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    value: Option<String>,
) -> Result<T, RequestError> {
    let value = value.ok_or(RequestError::Missing(field))?;
    value
        .trim()
        .parse()
        .map_err(|_| RequestError::Malformed { field, value })
}

/// `"x,y"` → point on the plane.
fn parse_center(value: String) -> Result<Point, RequestError> {
    let malformed = || RequestError::Malformed {
        field: "center",
        value: value.clone(),
    };
    let (x, y) = value.split_once(',').ok_or_else(malformed)?;
    let x: f64 = x.trim().parse().map_err(|_| malformed())?;
    let y: f64 = y.trim().parse().map_err(|_| malformed())?;
    if !(x.is_finite() && y.is_finite()) {
        return Err(malformed());
    }
    Ok(Point::new(x, y))
}
