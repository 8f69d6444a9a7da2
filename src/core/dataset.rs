//! In-memory housing market table and its row type.

use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt::Display;
use std::str::FromStr;

pub const COUNTRY: &str = "Country";
pub const YEAR: &str = "Year";
pub const HOUSE_PRICE_INDEX: &str = "House Price Index";
pub const RENT_INDEX: &str = "Rent Index";
pub const INFLATION_RATE: &str = "Inflation Rate (%)";
pub const GDP_GROWTH: &str = "GDP Growth (%)";
pub const SURFACE: &str = "Surface";
pub const ROOMS: &str = "Rooms";

/// Cell contents read as a missing value.
pub const MISSING_MARKERS: [&str; 12] = [
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// Columns a dataset must carry to be usable.
pub const REQUIRED_COLUMNS: [&str; 3] = [COUNTRY, YEAR, HOUSE_PRICE_INDEX];

/// A single country/year observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "House Price Index")]
    pub house_price_index: f64,
    #[serde(rename = "Rent Index", default, deserialize_with = "optional_float")]
    pub rent_index: Option<f64>,
    #[serde(rename = "Inflation Rate (%)", default, deserialize_with = "optional_float")]
    pub inflation_rate: Option<f64>,
    #[serde(rename = "GDP Growth (%)", default, deserialize_with = "optional_float")]
    pub gdp_growth: Option<f64>,
    #[serde(rename = "Surface", default, deserialize_with = "optional_value")]
    pub surface: Option<u32>,
    #[serde(rename = "Rooms", default, deserialize_with = "optional_value")]
    pub rooms: Option<u32>,
}

fn optional_value<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None => Ok(None),
        Some(cell) if cell.is_empty() || MISSING_MARKERS.contains(&cell) => Ok(None),
        Some(cell) => cell
            .parse()
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid value '{cell}': {e}"))),
    }
}

/// Like [`optional_value`], with non-finite numbers read as missing.
fn optional_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_value::<D, f64>(deserializer)?.filter(|v| v.is_finite()))
}

impl Record {
    pub fn new(country: &str, year: i32, house_price_index: f64) -> Self {
        Record {
            country: country.to_string(),
            year,
            house_price_index,
            rent_index: None,
            inflation_rate: None,
            gdp_growth: None,
            surface: None,
            rooms: None,
        }
    }

    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::HousePriceIndex => Some(self.house_price_index),
            Metric::RentIndex => self.rent_index,
            Metric::InflationRate => self.inflation_rate,
            Metric::GdpGrowth => self.gdp_growth,
        }
    }
}

/// Ordered rows plus the header they were read with.
///
/// A dataset is never modified in place. Filtering and synthesis hand back a
/// new `Dataset`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Dataset { columns, records }
    }

    /// Builds a dataset from rows alone, with the canonical column list.
    pub fn from_records(records: Vec<Record>) -> Self {
        let columns = [
            COUNTRY,
            YEAR,
            HOUSE_PRICE_INDEX,
            RENT_INDEX,
            INFLATION_RATE,
            GDP_GROWTH,
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();
        Dataset { columns, records }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Returns a new view holding the rows matching `predicate`, in order.
    pub fn filtered<F>(&self, predicate: F) -> Dataset
    where
        F: Fn(&Record) -> bool,
    {
        Dataset {
            columns: self.columns.clone(),
            records: self
                .records
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        }
    }
}

/// Numeric columns that views can chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    HousePriceIndex,
    RentIndex,
    InflationRate,
    GdpGrowth,
}

impl Metric {
    pub fn column(&self) -> &'static str {
        match self {
            Metric::HousePriceIndex => HOUSE_PRICE_INDEX,
            Metric::RentIndex => RENT_INDEX,
            Metric::InflationRate => INFLATION_RATE,
            Metric::GdpGrowth => GDP_GROWTH,
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Metric::HousePriceIndex => "hpi",
                Metric::RentIndex => "rent",
                Metric::InflationRate => "inflation",
                Metric::GdpGrowth => "gdp",
            }
        )
    }
}

impl FromStr for Metric {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hpi" => Ok(Metric::HousePriceIndex),
            "rent" => Ok(Metric::RentIndex),
            "inflation" => Ok(Metric::InflationRate),
            "gdp" => Ok(Metric::GdpGrowth),
            _ => Err(anyhow::anyhow!("Invalid metric: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filtered_returns_new_view() {
        let dataset = Dataset::from_records(vec![
            Record::new("USA", 2020, 100.0),
            Record::new("France", 2020, 105.0),
            Record::new("USA", 2021, 110.0),
        ]);

        let usa = dataset.filtered(|r| r.country == "USA");

        assert_eq!(usa.len(), 2);
        assert_eq!(usa.records()[1].year, 2021);
        assert_eq!(usa.columns(), dataset.columns());
        assert_eq!(dataset.len(), 3);
    }

    #[test]
    fn test_metric_parsing() {
        assert_eq!("HPI".parse::<Metric>().unwrap(), Metric::HousePriceIndex);
        assert_eq!("gdp".parse::<Metric>().unwrap(), Metric::GdpGrowth);
        assert_eq!(Metric::InflationRate.to_string(), "inflation");
        assert!("price".parse::<Metric>().is_err());
    }
}
