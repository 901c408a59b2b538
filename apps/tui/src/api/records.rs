//! Wire shapes returned by the data service.
//!
//! Every numeric field is decoded leniently: numbers and numeric strings are
//! accepted, anything else becomes `None` so a single odd row never fails the
//! whole payload. Eligibility is decided later, per chart.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts a JSON number, a numeric string, or anything else as `None`.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

/// Accepts a JSON string, stringifies numbers, and maps the rest to `None`.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

fn number_from_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawBarRecord {
    #[serde(default, deserialize_with = "lenient_number")]
    pub visit_month: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub visit_year: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cholesterol: Option<f64>,
    #[serde(rename = "HDL", default, deserialize_with = "lenient_number")]
    pub hdl: Option<f64>,
    #[serde(rename = "LDL", default, deserialize_with = "lenient_number")]
    pub ldl: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub triglycerides: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sex: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub wave: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawScatterRecord {
    #[serde(default, deserialize_with = "lenient_number")]
    pub visit_month: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub visit_year: Option<f64>,
    #[serde(rename = "SystolicBP", default, deserialize_with = "lenient_number")]
    pub systolic_bp: Option<f64>,
    #[serde(rename = "DiastolicBP", default, deserialize_with = "lenient_number")]
    pub diastolic_bp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sex: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub wave: Option<String>,
}

/// One hearing-aid survey answer; `gor` is the government office region.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMapRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub gor: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub wave: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub hehear: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnimationRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub region: Option<String>,
    #[serde(rename = "Wave", default, deserialize_with = "lenient_string")]
    pub wave: Option<String>,
    #[serde(rename = "Average_Income", default, deserialize_with = "lenient_number")]
    pub average_income: Option<f64>,
    #[serde(rename = "IllnessPercentage", default, deserialize_with = "lenient_number")]
    pub illness_percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoFeatureCollection {
    #[serde(default)]
    pub features: Vec<GeoFeature>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoFeature {
    #[serde(default)]
    pub properties: GeoProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoProperties {
    #[serde(default, deserialize_with = "lenient_string")]
    pub rgn_name: Option<String>,
}

impl GeoFeatureCollection {
    /// Region names in feature order, without duplicates.
    pub fn region_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in self.features.iter().filter_map(|f| f.properties.rgn_name.as_ref()) {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_record_reads_survey_field_names() {
        let json = r#"{"VisitMonth":4,"VisitYear":2008,"Cholesterol":100,"HDL":50,
            "LDL":30,"Triglycerides":20,"Sex":"Male","Wave":"Wave 4"}"#;
        let record: RawBarRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.visit_month, Some(4.0));
        assert_eq!(record.hdl, Some(50.0));
        assert_eq!(record.ldl, Some(30.0));
        assert_eq!(record.wave.as_deref(), Some("Wave 4"));
    }

    #[test]
    fn malformed_numbers_become_missing() {
        let json = r#"[{"VisitMonth":"n/a","VisitYear":"2004","SystolicBP":null,
            "DiastolicBP":{"v":1},"Sex":"Female"}]"#;
        let records: Vec<RawScatterRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].visit_month, None);
        assert_eq!(records[0].visit_year, Some(2004.0));
        assert_eq!(records[0].systolic_bp, None);
        assert_eq!(records[0].diastolic_bp, None);
        assert_eq!(records[0].wave, None);
    }

    #[test]
    fn animation_record_accepts_numeric_strings() {
        let json = r#"{"region":"London","Wave":"Wave 3","Average_Income":"412.5",
            "IllnessPercentage":31}"#;
        let record: RawAnimationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.average_income, Some(412.5));
        assert_eq!(record.illness_percentage, Some(31.0));
    }

    #[test]
    fn geo_regions_are_deduplicated_in_order() {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"rgn_name":"London"},"geometry":null},
            {"type":"Feature","properties":{"rgn_name":"Wales"},"geometry":null},
            {"type":"Feature","properties":{"rgn_name":"London"},"geometry":null},
            {"type":"Feature","properties":{},"geometry":null}]}"#;
        let geo: GeoFeatureCollection = serde_json::from_str(json).unwrap();
        assert_eq!(geo.region_names(), vec!["London", "Wales"]);
    }
}
