use serde::{Deserialize, Serialize};

/// Shadow-regulation tier of a zoning classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoneClass {
    /// Category 1/2 low-rise exclusive residential and rural residential.
    LowRiseResidential,
    /// Category 1/2 mid/high-rise exclusive residential.
    MidHighRiseResidential,
    /// Category 1/2 residential and quasi-residential.
    GeneralResidential,
    /// Neighborhood commercial and commercial.
    Commercial,
    /// Quasi-industrial, industrial and exclusive industrial.
    Industrial,
    Unknown,
}

const LOW_RISE_KEYS: &[&str] = &["低層", "田園住居", "low-rise", "lowrise", "rural-residential"];
const MID_HIGH_KEYS: &[&str] = &[
    "中高層",
    "mid-high",
    "mid-rise",
    "midrise",
    "medium-high",
    "high-rise",
];
const INDUSTRIAL_KEYS: &[&str] = &["工業", "industrial"];
const COMMERCIAL_KEYS: &[&str] = &["商業", "commercial"];
const RESIDENTIAL_KEYS: &[&str] = &["住居", "residential"];

impl ZoneClass {
    /// Classifies a zoning string.
    ///
    /// Accepts the Japanese use-district names (第一種低層住居専用地域, 商業地域,
    /// ...) and English slugs in any case with `-`, `_` or spaces as separators.
    /// Unrecognized strings map to [`ZoneClass::Unknown`].
    pub fn parse(zone: &str) -> Self {
        let key = zone.trim().to_lowercase().replace(['_', ' '], "-");
        if key.is_empty() {
            return ZoneClass::Unknown;
        }
        let has = |keys: &[&str]| keys.iter().any(|k| key.contains(k));
        if has(LOW_RISE_KEYS) {
            ZoneClass::LowRiseResidential
        } else if has(MID_HIGH_KEYS) {
            ZoneClass::MidHighRiseResidential
        } else if has(INDUSTRIAL_KEYS) {
            ZoneClass::Industrial
        } else if has(COMMERCIAL_KEYS) {
            ZoneClass::Commercial
        } else if has(RESIDENTIAL_KEYS) {
            ZoneClass::GeneralResidential
        } else {
            ZoneClass::Unknown
        }
    }

    /// Residential tiers carry their own shadow regulation.
    pub fn is_regulated_residential(&self) -> bool {
        matches!(
            self,
            ZoneClass::LowRiseResidential
                | ZoneClass::MidHighRiseResidential
                | ZoneClass::GeneralResidential
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_japanese_names() {
        let cases = [
            ("第一種低層住居専用地域", ZoneClass::LowRiseResidential),
            ("第二種低層住居専用地域", ZoneClass::LowRiseResidential),
            ("田園住居地域", ZoneClass::LowRiseResidential),
            ("第一種中高層住居専用地域", ZoneClass::MidHighRiseResidential),
            ("第二種中高層住居専用地域", ZoneClass::MidHighRiseResidential),
            ("第一種住居地域", ZoneClass::GeneralResidential),
            ("第二種住居地域", ZoneClass::GeneralResidential),
            ("準住居地域", ZoneClass::GeneralResidential),
            ("近隣商業地域", ZoneClass::Commercial),
            ("商業地域", ZoneClass::Commercial),
            ("準工業地域", ZoneClass::Industrial),
            ("工業地域", ZoneClass::Industrial),
            ("工業専用地域", ZoneClass::Industrial),
        ];
        for (name, class) in cases {
            assert_eq!(ZoneClass::parse(name), class, "{name}");
        }
    }

    #[test]
    fn test_english_slugs() {
        assert_eq!(
            ZoneClass::parse("Low-Rise Exclusive Residential"),
            ZoneClass::LowRiseResidential
        );
        assert_eq!(
            ZoneClass::parse("mid_high_rise_residential"),
            ZoneClass::MidHighRiseResidential
        );
        assert_eq!(
            ZoneClass::parse("quasi-residential"),
            ZoneClass::GeneralResidential
        );
        assert_eq!(ZoneClass::parse("commercial"), ZoneClass::Commercial);
        assert_eq!(ZoneClass::parse("light industrial"), ZoneClass::Industrial);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(ZoneClass::parse(""), ZoneClass::Unknown);
        assert_eq!(ZoneClass::parse("urbanization control"), ZoneClass::Unknown);
        assert!(!ZoneClass::Unknown.is_regulated_residential());
    }
}
