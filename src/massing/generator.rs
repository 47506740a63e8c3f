use log::debug;

use super::config::MassingConfig;
use super::params::{BuildingParameters, StructuralGrid};
use super::shape::FootprintShape;
use super::{Balcony, BuildingMassing, FloorPlate, Foundation, Setback, SetbackAnchor};
use crate::error::{Error, Result};
use crate::site::SiteLocation;
use crate::{Point, Polygon, Usage};

/// Floor levels are rounded to this step; the top floor takes the remainder.
const HEIGHT_ROUNDING: f64 = 0.01;
const MAX_BALCONIES_PER_ROW: usize = 1_000;

/// Builds a [`BuildingMassing`] from scalar building parameters.
#[derive(Debug, Clone, Default)]
pub struct MassingGenerator {
    config: MassingConfig,
}

impl MassingGenerator {
    pub fn new(config: MassingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MassingConfig {
        &self.config
    }

    /// Generates the massing.
    ///
    /// `site` is optional and only steers orientation: set-back floors are
    /// anchored to the equator-facing edge and balconies face the equator.
    pub fn generate(
        &self,
        params: &BuildingParameters,
        site: Option<&SiteLocation>,
    ) -> Result<BuildingMassing> {
        params.validate()?;

        let grid = params.structure.grid();
        let pole_sign = match site {
            Some(s) if s.is_southern_hemisphere() => -1.0,
            _ => 1.0,
        };

        let shape = self.select_shape(params);
        let ratio = params
            .usage
            .aspect_ratio(params.residential_units(), params.building_area);
        let (width, depth) = shape.bounding_dimensions(params.building_area, ratio);
        let base = shape.footprint(width, depth, pole_sign)?;

        let heights = self.floor_heights(params, &grid);
        let setback = self.setback(params, site);
        let setback_footprint = match &setback {
            Some(sb) => Some(self.setback_footprint(&base, sb, depth, pole_sign)?),
            None => None,
        };

        let mut floors = Vec::with_capacity(heights.len());
        let mut elevation = grid.foundation_height;
        for (i, &height) in heights.iter().enumerate() {
            let level = i as u32 + 1;
            let footprint = match (&setback, &setback_footprint) {
                (Some(sb), Some(fp)) if level >= sb.start_floor => fp.clone(),
                _ => base.clone(),
            };
            floors.push(FloorPlate {
                level,
                footprint,
                elevation,
                height,
            });
            elevation += height;
        }

        let balconies = if params.usage.is_residential() {
            self.balconies(&floors, pole_sign)?
        } else {
            Vec::new()
        };

        let foundation = Foundation {
            footprint: base.scale_about(
                base.centroid(),
                self.config.foundation_enlargement,
                self.config.foundation_enlargement,
            )?,
            top_elevation: grid.foundation_height,
            depth: grid.foundation_height,
        };

        debug!(
            "massing: {:?} {:.1} x {:.1} m, {} floors, height {:.2} m, {} balconies",
            shape,
            width,
            depth,
            floors.len(),
            elevation,
            balconies.len()
        );

        Ok(BuildingMassing::new(
            floors,
            (width, depth),
            shape,
            setback,
            balconies,
            foundation,
            grid,
        ))
    }

    fn select_shape(&self, params: &BuildingParameters) -> FootprintShape {
        if params.usage != Usage::ResidentialMulti {
            return FootprintShape::Rectangle;
        }
        if params.unit_count.unwrap_or(0) > self.config.u_shape_min_units {
            return FootprintShape::UShape;
        }
        let ratio = params
            .usage
            .aspect_ratio(params.unit_count, params.building_area);
        let (width, _) = FootprintShape::Rectangle.bounding_dimensions(params.building_area, ratio);
        if width > self.config.l_shape_min_width {
            FootprintShape::LShape
        } else {
            FootprintShape::Rectangle
        }
    }

    /// Splits the height above the foundation into storeys.
    ///
    /// Offices and shops get a taller ground floor. The storeys fill the
    /// maximum height exactly; the top floor absorbs the rounding remainder.
    /// Floor levels, not storey heights, are rounded so the error never
    /// accumulates.
    fn floor_heights(&self, params: &BuildingParameters, grid: &StructuralGrid) -> Vec<f64> {
        let n = params.floors as usize;
        let available = params.max_height - grid.foundation_height;
        let ground_mult = params.usage.ground_floor_multiplier();
        let weights = ground_mult + (n - 1) as f64;
        let typical = available / weights;

        let mut heights = Vec::with_capacity(n);
        let mut level = 0.0;
        let mut used = 0.0;
        for i in 0..n.saturating_sub(1) {
            level += if i == 0 { typical * ground_mult } else { typical };
            let top = if typical > HEIGHT_ROUNDING {
                (level / HEIGHT_ROUNDING).round() * HEIGHT_ROUNDING
            } else {
                level
            };
            heights.push(top - used);
            used = top;
        }
        heights.push(available - used);
        heights
    }

    fn setback(&self, params: &BuildingParameters, site: Option<&SiteLocation>) -> Option<Setback> {
        if params.floors <= self.config.setback_trigger_floors {
            return None;
        }
        let start_floor =
            (params.floors as f64 * self.config.setback_percentile).floor() as u32 + 1;
        Some(Setback {
            start_floor,
            ratio: self.config.setback_ratio,
            anchor: if site.is_some() {
                SetbackAnchor::Equatorward
            } else {
                SetbackAnchor::Centered
            },
        })
    }

    fn setback_footprint(
        &self,
        base: &Polygon,
        setback: &Setback,
        depth: f64,
        pole_sign: f64,
    ) -> Result<Polygon> {
        let anchor = match setback.anchor {
            SetbackAnchor::Centered => Point::origin(),
            SetbackAnchor::Equatorward => Point::new(0.0, -pole_sign * depth / 2.0),
        };
        base.scale_about(anchor, setback.ratio, setback.ratio)
    }

    /// One row of balconies per floor above ground on the equator-facing facade.
    fn balconies(&self, floors: &[FloorPlate], pole_sign: f64) -> Result<Vec<Balcony>> {
        let bw = self.config.balcony_width;
        let bd = self.config.balcony_depth;
        let gap = self.config.balcony_gap;
        if bw <= 0.0 || bd <= 0.0 {
            return Err(Error::InvalidParameters(
                "balcony width and depth must be positive".to_string(),
            ));
        }

        let mut balconies = Vec::new();
        for floor in floors.iter().skip(1) {
            let (pmin, pmax) = floor.footprint.bbox();
            let facade = pmax.x - pmin.x;
            let fits = ((facade + gap) / (bw + gap)).floor();
            if !fits.is_finite() || fits > MAX_BALCONIES_PER_ROW as f64 {
                return Err(Error::InvalidParameters(format!(
                    "facade of {facade:.1} m is too long for a balcony row"
                )));
            }
            let count = fits as usize;
            if count == 0 {
                continue;
            }
            let span = count as f64 * bw + (count - 1) as f64 * gap;
            let x0 = (pmin.x + pmax.x) / 2.0 - span / 2.0;
            // Facade edge and outward direction
            let (edge_y, out) = if pole_sign > 0.0 {
                (pmin.y, -1.0)
            } else {
                (pmax.y, 1.0)
            };
            for k in 0..count {
                let cx = x0 + bw / 2.0 + k as f64 * (bw + gap);
                let cy = edge_y + out * bd / 2.0;
                let position = Point::new(cx, cy);
                balconies.push(Balcony {
                    level: floor.level,
                    position,
                    width: bw,
                    depth: bd,
                    elevation: floor.elevation,
                    outline: Polygon::rectangle(position, bw, bd)?,
                });
            }
        }
        Ok(balconies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StructuralSystem;

    fn params(usage: Usage, floors: u32, area: f64, height: f64) -> BuildingParameters {
        BuildingParameters {
            usage,
            structure: StructuralSystem::RigidFrameRc,
            floors,
            building_area: area,
            total_floor_area: area * floors as f64,
            max_height: height,
            unit_count: None,
        }
    }

    #[test]
    fn test_rectangle_area_and_heights() {
        let generator = MassingGenerator::default();
        let m = generator
            .generate(&params(Usage::Office, 4, 400.0, 15.0), None)
            .unwrap();
        assert_eq!(m.shape(), FootprintShape::Rectangle);
        assert!((m.base_footprint().area() - 400.0).abs() < 1e-6);
        assert!((m.width() / m.depth() - 1.3).abs() < 1e-9);
        assert!((m.total_height() - 15.0).abs() < 1e-9);
        // Office ground floor is 1.2x a typical floor
        let f = m.floors();
        assert!((f[0].height / f[1].height - 1.2).abs() < 0.01);
        assert!(m.balconies().is_empty());
    }

    #[test]
    fn test_tall_single_storey_keeps_max_height() {
        let generator = MassingGenerator::default();
        let p = params(Usage::Other, 1, 100.0, 30.0);
        let m = generator.generate(&p, None).unwrap();
        assert!((m.total_height() - 30.0).abs() < 1e-9);
        let grid = p.structure.grid();
        assert!((m.floors()[0].height - (30.0 - grid.foundation_height)).abs() < 1e-9);
    }

    #[test]
    fn test_setback_from_sixtieth_percentile() {
        let generator = MassingGenerator::default();
        let m = generator
            .generate(&params(Usage::Office, 10, 500.0, 36.0), None)
            .unwrap();
        let sb = m.setback().unwrap();
        assert_eq!(sb.start_floor, 7);
        assert_eq!(sb.anchor, SetbackAnchor::Centered);
        let lower = m.floors()[5].footprint.area();
        let upper = m.floors()[6].footprint.area();
        assert!((upper / lower - 0.64).abs() < 1e-9);
    }

    #[test]
    fn test_no_setback_at_five_floors() {
        let generator = MassingGenerator::default();
        let m = generator
            .generate(&params(Usage::Office, 5, 500.0, 20.0), None)
            .unwrap();
        assert!(m.setback().is_none());
    }

    #[test]
    fn test_equatorward_setback_keeps_south_edge() {
        let generator = MassingGenerator::default();
        let site = SiteLocation::new(35.0, 139.0, "").unwrap();
        let m = generator
            .generate(&params(Usage::Office, 8, 500.0, 30.0), Some(&site))
            .unwrap();
        let sb = m.setback().unwrap();
        assert_eq!(sb.anchor, SetbackAnchor::Equatorward);
        let (base_min, _) = m.floors()[0].footprint.bbox();
        let (top_min, top_max) = m.floors()[7].footprint.bbox();
        assert!((base_min.y - top_min.y).abs() < 1e-9);
        assert!(top_max.y < m.depth() / 2.0);
    }

    #[test]
    fn test_residential_balconies() {
        let generator = MassingGenerator::default();
        let mut p = params(Usage::ResidentialMulti, 3, 300.0, 10.0);
        p.unit_count = Some(9);
        let m = generator.generate(&p, None).unwrap();
        // Rows on floors 2 and 3 only
        assert!(m.balconies().iter().all(|b| b.level >= 2));
        let per_floor = m.balconies().iter().filter(|b| b.level == 2).count();
        let expected = ((m.width() + 1.0) / 4.0).floor() as usize;
        assert_eq!(per_floor, expected);
        // Balconies hang off the south facade, outside the footprint
        for b in m.balconies() {
            assert!(b.position.y < -m.depth() / 2.0);
            assert!(!m.base_footprint().is_point_inside(b.position, true));
        }
    }

    #[test]
    fn test_shape_selection() {
        let generator = MassingGenerator::default();
        let mut p = params(Usage::ResidentialMulti, 6, 1500.0, 20.0);
        p.unit_count = Some(30);
        let m = generator.generate(&p, None).unwrap();
        assert_eq!(m.shape(), FootprintShape::LShape);
        assert!((m.base_footprint().area() - 1500.0).abs() < 1e-6);

        p.unit_count = Some(60);
        let m = generator.generate(&p, None).unwrap();
        assert_eq!(m.shape(), FootprintShape::UShape);
        assert!((m.base_footprint().area() - 1500.0).abs() < 1e-6);

        // Same footprint for offices stays rectangular
        let m = generator
            .generate(&params(Usage::Office, 6, 1500.0, 20.0), None)
            .unwrap();
        assert_eq!(m.shape(), FootprintShape::Rectangle);
    }

    #[test]
    fn test_foundation_enlarged() {
        let generator = MassingGenerator::default();
        let m = generator
            .generate(&params(Usage::Office, 2, 200.0, 8.0), None)
            .unwrap();
        let ratio = m.foundation().footprint.area() / m.base_footprint().area();
        assert!((ratio - 1.21).abs() < 1e-9);
        assert_eq!(m.foundation().top_elevation, m.floors()[0].elevation);
    }

    #[test]
    fn test_invalid_parameters() {
        let generator = MassingGenerator::default();
        let err = generator
            .generate(&params(Usage::Office, 0, 200.0, 8.0), None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameters(_)));
    }
}
