use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_DATA_COMPLETENESS: f64 = 0.0;
pub const DEFAULT_RSRZ: f64 = 100.0;
pub const DEFAULT_TWIN_L: f64 = 0.0;
pub const DEFAULT_TWIN_L2: f64 = 0.0;

/// Summary statistics of an entry's crystallographic validation report.
///
/// Every value is optional; absent values are replaced with pessimistic defaults when
/// the report is applied to a protein.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct ValidationReport {
    #[serde(rename = "DataCompleteness", default)]
    pub data_completeness: Option<f64>,
    #[serde(rename = "percent-RSRZ-outliers", default)]
    pub rsrz_outliers_percent: Option<f64>,
    #[serde(rename = "TwinL", default)]
    pub twin_l: Option<f64>,
    #[serde(rename = "TwinL2", default)]
    pub twin_l2: Option<f64>,
}

impl ValidationReport {
    /// Collects the report from the attribute pairs of a validation document's entry element.
    ///
    /// Unknown attributes are ignored; known attributes whose value is not a number are
    /// treated as absent.
    pub fn from_attributes<'a>(attributes: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut report = Self::default();
        for (key, value) in attributes {
            let slot = match key {
                "DataCompleteness" => &mut report.data_completeness,
                "percent-RSRZ-outliers" => &mut report.rsrz_outliers_percent,
                "TwinL" => &mut report.twin_l,
                "TwinL2" => &mut report.twin_l2,
                _ => continue,
            };
            match value.trim().parse() {
                Ok(parsed) => *slot = Some(parsed),
                Err(_) => warn!(
                    attribute = key,
                    value,
                    "Ignoring non-numeric validation attribute"
                ),
            }
        }
        report
    }

    pub(crate) fn value_or_default(value: Option<f64>, default: f64, name: &str) -> f64 {
        value.unwrap_or_else(|| {
            warn!(field = name, default, "Validation report has no value; using default");
            default
        })
    }
}
