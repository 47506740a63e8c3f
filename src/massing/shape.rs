//! Footprint templates.
//!
//! Every template is laid out around the origin with x pointing east and y
//! pointing north. `pole_sign` is +1 for sites in the northern hemisphere and
//! -1 in the southern one; notches and courts always open toward the pole so
//! the equator-facing facade stays a single straight edge.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::{Point, Polygon};

/// Plan shape of the footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FootprintShape {
    Rectangle,
    /// Rectangle with one pole-side quadrant removed.
    LShape,
    /// Rectangle with a pole-side court one third wide and half deep.
    UShape,
}

impl FootprintShape {
    /// Fraction of the bounding rectangle covered by the shape.
    pub fn fill_factor(&self) -> f64 {
        match self {
            FootprintShape::Rectangle => 1.0,
            FootprintShape::LShape => 0.75,
            FootprintShape::UShape => 5.0 / 6.0,
        }
    }

    /// Bounding width and depth for a footprint of `area` with plan ratio `ratio`.
    pub fn bounding_dimensions(&self, area: f64, ratio: f64) -> (f64, f64) {
        let gross = area / self.fill_factor();
        let width = (gross * ratio).sqrt();
        (width, gross / width)
    }

    /// Builds the footprint polygon for the given bounding dimensions.
    pub fn footprint(&self, width: f64, depth: f64, pole_sign: f64) -> Result<Polygon> {
        let hw = width / 2.0;
        let hd = depth / 2.0;
        let p = |x: f64, y: f64| Point::new(x, y * pole_sign);
        let pts = match self {
            FootprintShape::Rectangle => vec![p(-hw, -hd), p(hw, -hd), p(hw, hd), p(-hw, hd)],
            FootprintShape::LShape => vec![
                p(-hw, -hd),
                p(hw, -hd),
                p(hw, 0.0),
                p(0.0, 0.0),
                p(0.0, hd),
                p(-hw, hd),
            ],
            FootprintShape::UShape => {
                let cx = width / 6.0;
                vec![
                    p(-hw, -hd),
                    p(hw, -hd),
                    p(hw, hd),
                    p(cx, hd),
                    p(cx, 0.0),
                    p(-cx, 0.0),
                    p(-cx, hd),
                    p(-hw, hd),
                ]
            }
        };
        Polygon::new(pts)
    }
}
