use chrono::NaiveDate;
use classy_forecast::{ForecastResult, LookupState};

/// One rendered day
#[derive(Debug, Clone, PartialEq)]
pub struct DayRow {
    pub icon: &'static str,
    pub label: String,
    pub description: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// View of the published forecast, ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastModel {
    pub heading: String,
    pub days: Vec<DayRow>,
}

impl ForecastModel {
    /// `None` unless a forecast has been published
    pub fn from_state(state: &LookupState) -> Option<Self> {
        state.forecast().map(Self::from_forecast)
    }

    pub fn from_forecast(forecast: &ForecastResult) -> Self {
        let days = forecast
            .days()
            .enumerate()
            .map(|(index, day)| {
                let condition = day.condition();
                DayRow {
                    icon: condition.icon(),
                    label: day_label(index, day.date),
                    description: condition.description(),
                    min: day.min,
                    max: day.max,
                }
            })
            .collect();

        Self {
            heading: format!("Weather in {}", forecast.display_location()),
            days,
        }
    }

    pub fn forecast_count(&self) -> usize {
        self.days.len()
    }
}

/// "Today" for the first day, else the short weekday ("Mon").
///
/// Dates that are not `YYYY-MM-DD` are shown as given.
pub fn day_label(index: usize, date: &str) -> String {
    if index == 0 {
        return "Today".to_string();
    }

    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%a").to_string())
        .unwrap_or_else(|_| date.to_string())
}
