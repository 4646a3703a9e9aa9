use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "width")]
    pub w: f64,
    #[serde(rename = "height")]
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// A rectangle anchored at the origin.
    pub fn from_size(w: f64, h: f64) -> Self {
        Self::new(0.0, 0.0, w, h)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_center() {
        let r = Rect::from_size(900.0, 600.0);
        assert_eq!(r.center(), Point::new(450.0, 300.0));
    }

    #[test]
    fn rect_uses_widget_key_names() {
        let json = serde_json::to_value(Rect::new(1.0, 2.0, 900.0, 600.0)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "x": 1.0, "y": 2.0, "width": 900.0, "height": 600.0 })
        );
        let back: Rect = serde_json::from_value(json).unwrap();
        assert_eq!(back, Rect::new(1.0, 2.0, 900.0, 600.0));
    }
}
