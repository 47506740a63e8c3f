use serde::{Deserialize, Serialize};

use crate::geom::bboxes::{bounding_box, is_point_inside_bbox};
use crate::geom::segment::segments_intersect;
use crate::massing::BuildingMassing;
use crate::sim::solar::SolarPosition;
use crate::{Point, Polygon, Vector};

use super::config::ShadowModel;

/// Part of the massing that throws a shadow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CasterKind {
    Floor { level: u32 },
    /// Floor above the setback line, with the reduced footprint.
    SetbackFloor { level: u32 },
    Balcony { level: u32 },
}

/// A prism standing on the site plane: an outline between two elevations.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowCaster {
    pub kind: CasterKind,
    pub outline: Polygon,
    /// Lowest elevation of the prism [m].
    pub bottom: f64,
    /// Elevation whose shadow reaches the farthest [m].
    pub top: f64,
}

impl ShadowCaster {
    /// Collects every element of the massing that rises above the
    /// measurement plane.
    pub fn collect(
        massing: &BuildingMassing,
        measurement_height: f64,
        balcony_rail_height: f64,
    ) -> Vec<Self> {
        let setback_start = massing.setback().map(|s| s.start_floor);
        let floors = massing.floors().iter().map(|f| {
            let kind = match setback_start {
                Some(start) if f.level >= start => CasterKind::SetbackFloor { level: f.level },
                _ => CasterKind::Floor { level: f.level },
            };
            Self {
                kind,
                outline: f.footprint.clone(),
                bottom: f.elevation,
                top: f.top(),
            }
        });
        let balconies = massing.balconies().iter().map(|b| Self {
            kind: CasterKind::Balcony { level: b.level },
            outline: b.outline.clone(),
            bottom: b.elevation,
            top: b.elevation + balcony_rail_height,
        });

        floors
            .chain(balconies)
            .filter(|c| c.top > measurement_height)
            .collect()
    }

    /// Volume of the prism above the measurement plane [m3].
    pub fn volume_above(&self, measurement_height: f64) -> f64 {
        let h = self.top - self.bottom.max(measurement_height);
        if h > 0.0 { self.outline.area() * h } else { 0.0 }
    }
}

/// Shadow of one caster at one sun position.
#[derive(Debug, Clone)]
struct CasterShadow {
    /// Outline translated by the offset of the caster top.
    translated: Polygon,
    /// Offsets of the bottom (clamped to the measurement plane) and the top.
    near: Vector,
    far: Vector,
    bbox_min: Point,
    bbox_max: Point,
}

/// All caster shadows for one time step.
#[derive(Debug, Clone)]
pub struct StepShadow {
    model: ShadowModel,
    outlines: Vec<Polygon>,
    shadows: Vec<CasterShadow>,
}

impl StepShadow {
    /// Projects every caster onto the measurement plane.
    ///
    /// With the sun at or below the horizon the step casts nothing.
    pub fn project(
        casters: &[ShadowCaster],
        sun: &SolarPosition,
        measurement_height: f64,
        model: ShadowModel,
    ) -> Self {
        let mut outlines = Vec::new();
        let mut shadows = Vec::new();
        if let Some(unit) = sun.shadow_offset(1.0) {
            for c in casters {
                let near = unit * (c.bottom.max(measurement_height) - measurement_height);
                let far = unit * (c.top - measurement_height);
                let translated = c.outline.translate(far);
                let (bbox_min, bbox_max) = match model {
                    ShadowModel::Translated => translated.bbox(),
                    ShadowModel::Swept => {
                        let (a0, a1) = c.outline.translate(near).bbox();
                        let (b0, b1) = translated.bbox();
                        bounding_box(&[a0, a1, b0, b1])
                    }
                };
                outlines.push(c.outline.clone());
                shadows.push(CasterShadow {
                    translated,
                    near,
                    far,
                    bbox_min,
                    bbox_max,
                });
            }
        }
        Self {
            model,
            outlines,
            shadows,
        }
    }

    /// Returns true if nothing is cast at this step.
    pub fn is_empty(&self) -> bool {
        self.shadows.is_empty()
    }

    /// Returns true if any caster shades `pt`.
    pub fn shades(&self, pt: Point) -> bool {
        self.shadows.iter().zip(&self.outlines).any(|(s, outline)| {
            if !is_point_inside_bbox(pt, s.bbox_min, s.bbox_max) {
                return false;
            }
            match self.model {
                ShadowModel::Translated => s.translated.is_point_inside(pt, true),
                ShadowModel::Swept => is_swept_over(pt, outline, s.near, s.far),
            }
        })
    }
}

/// Checks whether `pt` lies in the area swept by `outline` moving from offset
/// `near` to offset `far`.
///
/// Equivalent to the segment `pt - far .. pt - near` touching the outline.
fn is_swept_over(pt: Point, outline: &Polygon, near: Vector, far: Vector) -> bool {
    let a = pt + (-far);
    let b = pt + (-near);
    outline.is_point_inside(a, true)
        || outline.is_point_inside(b, true)
        || outline.edges().any(|(p, q)| segments_intersect(a, b, p, q))
}
