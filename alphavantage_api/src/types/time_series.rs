use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Advisory;

/// Response body of `function=TIME_SERIES_DAILY_ADJUSTED`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyAdjustedResponse {
    #[serde(rename = "Meta Data", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<TimeSeriesMeta>,
    /// Keyed by `YYYY-MM-DD`, so the map's ordering is chronological.
    #[serde(rename = "Time Series (Daily)", default, skip_serializing_if = "Option::is_none")]
    pub series: Option<BTreeMap<String, DailyAdjustedBar>>,
    #[serde(flatten)]
    pub advisory: Advisory,
}

impl DailyAdjustedResponse {
    /// The most recent trading day and its bar.
    pub fn latest(&self) -> Option<(&str, &DailyAdjustedBar)> {
        self.series
            .as_ref()?
            .iter()
            .next_back()
            .map(|(date, bar)| (date.as_str(), bar))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSeriesMeta {
    #[serde(rename = "1. Information")]
    pub information: Option<String>,
    #[serde(rename = "2. Symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "3. Last Refreshed")]
    pub last_refreshed: Option<String>,
    #[serde(rename = "4. Output Size")]
    pub output_size: Option<String>,
    #[serde(rename = "5. Time Zone")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyAdjustedBar {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. adjusted close")]
    pub adjusted_close: String,
    #[serde(rename = "6. volume")]
    pub volume: String,
    #[serde(rename = "7. dividend amount", default)]
    pub dividend_amount: Option<String>,
    #[serde(rename = "8. split coefficient", default)]
    pub split_coefficient: Option<String>,
}

impl DailyAdjustedBar {
    pub fn adjusted_close(&self) -> Option<f64> {
        self.adjusted_close.trim().parse().ok()
    }
}
