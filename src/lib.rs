pub mod engine;
pub mod error;
pub mod geom;
pub mod io;
pub mod massing;
pub mod regulation;
pub mod sim;
pub mod site;

// Prelude
pub use error::{Error, Result};
pub use geom::point::Point;
pub use geom::polygon::Polygon;
pub use geom::vector::Vector;
pub use site::SiteLocation;

pub use massing::{BuildingMassing, BuildingParameters, MassingGenerator, StructuralSystem, Usage};
pub use regulation::{RegulationOutcome, RegulationResolver, ZoneRegulation};

// Compliance entry points
pub use engine::{ComplianceEngine, ComplianceRequest, EngineConfig, check_compliance};
pub use sim::recommend::{Recommendation, RecommendationEngine};
pub use sim::shadow::{ComplianceOutcome, ComplianceResult};
pub use sim::solar::{SolarPosition, SolarTable};
