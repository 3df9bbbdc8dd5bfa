use std::collections::HashMap;
use std::sync::OnceLock;

use classy_core::WeatherError;
use serde::Deserialize;

/// Icon shown for codes outside the WMO set we know about
pub const UNMAPPED_ICON: &str = "NOT FOUND";

/// Weather condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherCondition {
    Clear,
    MostlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    Showers,
    Rain,
    Snow,
    Thunderstorm,
    ThunderstormWithHail,
    Unmapped,
}

/// WMO codes per condition. See: https://open-meteo.com/en/docs#weathervariables
const WMO_GROUPS: &[(WeatherCondition, &[i32])] = &[
    (WeatherCondition::Clear, &[0]),
    (WeatherCondition::MostlyClear, &[1]),
    (WeatherCondition::PartlyCloudy, &[2]),
    (WeatherCondition::Overcast, &[3]),
    (WeatherCondition::Fog, &[45, 48]),
    (WeatherCondition::Showers, &[51, 56, 61, 66, 80]),
    (WeatherCondition::Rain, &[53, 55, 57, 63, 65, 67, 81, 82]),
    (WeatherCondition::Snow, &[71, 73, 75, 77, 85, 86]),
    (WeatherCondition::Thunderstorm, &[95]),
    (WeatherCondition::ThunderstormWithHail, &[96, 99]),
];

fn condition_table() -> &'static HashMap<i32, WeatherCondition> {
    static TABLE: OnceLock<HashMap<i32, WeatherCondition>> = OnceLock::new();
    TABLE.get_or_init(|| {
        WMO_GROUPS
            .iter()
            .flat_map(|(condition, codes)| codes.iter().map(move |code| (*code, *condition)))
            .collect()
    })
}

impl WeatherCondition {
    /// Convert WMO weather code to WeatherCondition
    pub fn from_wmo_code(code: i32) -> Self {
        condition_table()
            .get(&code)
            .copied()
            .unwrap_or(Self::Unmapped)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear sky",
            Self::MostlyClear => "Mainly clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Overcast => "Overcast",
            Self::Fog => "Fog",
            Self::Showers => "Light rain",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Thunderstorm => "Thunderstorm",
            Self::ThunderstormWithHail => "Thunderstorm with hail",
            Self::Unmapped => "Unknown",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::MostlyClear => "🌤",
            Self::PartlyCloudy => "⛅️",
            Self::Overcast => "☁️",
            Self::Fog => "🌫",
            Self::Showers => "🌦",
            Self::Rain => "🌧",
            Self::Snow => "🌨",
            Self::Thunderstorm => "🌩",
            Self::ThunderstormWithHail => "⛈",
            Self::Unmapped => UNMAPPED_ICON,
        }
    }

    pub fn is_mapped(&self) -> bool {
        !matches!(self, Self::Unmapped)
    }
}

/// Flag emoji for a two-letter ISO country code, e.g. "de" -> 🇩🇪.
///
/// Returns `None` unless the code is exactly two ASCII letters.
pub fn country_flag(country_code: &str) -> Option<String> {
    let code = country_code.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    code.chars()
        .map(|c| char::from_u32(0x1F1E6 + (c.to_ascii_uppercase() as u32 - 'A' as u32)))
        .collect()
}

fn default_timezone() -> String {
    // Accepted by the forecast endpoint as "resolve from coordinates"
    "auto".to_string()
}

/// First match of a geocoding search
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub name: String,
    #[serde(default)]
    pub country_code: String,
}

impl ResolvedLocation {
    /// "{name} {flag}", or the bare name when the country code is unusable
    pub fn display_name(&self) -> String {
        match country_flag(&self.country_code) {
            Some(flag) => format!("{} {}", self.name, flag),
            None => self.name.clone(),
        }
    }
}

/// One calendar day of a [`ForecastResult`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayForecast<'a> {
    pub date: &'a str,
    pub weather_code: Option<i32>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl DayForecast<'_> {
    /// A day without a weather code is `Unmapped`
    pub fn condition(&self) -> WeatherCondition {
        self.weather_code.map_or(WeatherCondition::Unmapped, WeatherCondition::from_wmo_code)
    }
}

/// Daily forecast, index-aligned across dates, codes and temperatures.
///
/// Codes and temperatures are `None` where the API reported `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    dates: Vec<String>,
    weather_codes: Vec<Option<i32>>,
    min_temps: Vec<Option<f64>>,
    max_temps: Vec<Option<f64>>,
    display_location: String,
}

impl ForecastResult {
    /// Build a result, rejecting sequences of unequal length.
    pub fn new(
        dates: Vec<String>,
        weather_codes: Vec<Option<i32>>,
        min_temps: Vec<Option<f64>>,
        max_temps: Vec<Option<f64>>,
        display_location: impl Into<String>,
    ) -> Result<Self, WeatherError> {
        let days = dates.len();
        if weather_codes.len() != days || min_temps.len() != days || max_temps.len() != days {
            return Err(WeatherError::InvalidResponse(format!(
                "daily arrays differ in length: time={}, weathercode={}, min={}, max={}",
                days,
                weather_codes.len(),
                min_temps.len(),
                max_temps.len()
            )));
        }

        Ok(Self {
            dates,
            weather_codes,
            min_temps,
            max_temps,
            display_location: display_location.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn weather_codes(&self) -> &[Option<i32>] {
        &self.weather_codes
    }

    pub fn min_temps(&self) -> &[Option<f64>] {
        &self.min_temps
    }

    pub fn max_temps(&self) -> &[Option<f64>] {
        &self.max_temps
    }

    pub fn display_location(&self) -> &str {
        &self.display_location
    }

    pub fn day(&self, index: usize) -> Option<DayForecast<'_>> {
        Some(DayForecast {
            date: self.dates.get(index)?,
            weather_code: *self.weather_codes.get(index)?,
            min: *self.min_temps.get(index)?,
            max: *self.max_temps.get(index)?,
        })
    }

    pub fn days(&self) -> impl Iterator<Item = DayForecast<'_>> {
        (0..self.len()).filter_map(|i| self.day(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENTED_CODES: &[i32] = &[
        0, 1, 2, 3, 45, 48, 51, 53, 55, 56, 57, 61, 63, 65, 66, 67, 71, 73, 75, 77, 80, 81, 82,
        85, 86, 95, 96, 99,
    ];

    #[test]
    fn test_every_documented_code_is_mapped() {
        for code in DOCUMENTED_CODES {
            let condition = WeatherCondition::from_wmo_code(*code);
            assert!(condition.is_mapped(), "code {} should be mapped", code);
            assert_ne!(condition.icon(), UNMAPPED_ICON);
        }
    }

    #[test]
    fn test_codes_outside_the_set_are_unmapped() {
        for code in -5..=120 {
            if DOCUMENTED_CODES.contains(&code) {
                continue;
            }
            assert_eq!(
                WeatherCondition::from_wmo_code(code),
                WeatherCondition::Unmapped,
                "code {}",
                code
            );
        }
        assert_eq!(WeatherCondition::from_wmo_code(i32::MAX).icon(), UNMAPPED_ICON);
    }

    #[test]
    fn test_wmo_code_groups() {
        assert_eq!(WeatherCondition::from_wmo_code(0).icon(), "☀️");
        assert_eq!(WeatherCondition::from_wmo_code(48), WeatherCondition::Fog);
        assert_eq!(WeatherCondition::from_wmo_code(56), WeatherCondition::Showers);
        assert_eq!(WeatherCondition::from_wmo_code(57), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_wmo_code(86), WeatherCondition::Snow);
        assert_eq!(WeatherCondition::from_wmo_code(95).icon(), "🌩");
        assert_eq!(WeatherCondition::from_wmo_code(99).icon(), "⛈");
    }

    #[test]
    fn test_country_flag() {
        assert_eq!(country_flag("DE").as_deref(), Some("🇩🇪"));
        assert_eq!(country_flag("us").as_deref(), Some("🇺🇸"));
        assert_eq!(country_flag(""), None);
        assert_eq!(country_flag("DEU"), None);
        assert_eq!(country_flag("1A"), None);
    }

    #[test]
    fn test_display_name_without_country() {
        let loc = ResolvedLocation {
            latitude: 0.0,
            longitude: 0.0,
            timezone: "GMT".into(),
            name: "Null Island".into(),
            country_code: String::new(),
        };
        assert_eq!(loc.display_name(), "Null Island");
    }

    #[test]
    fn test_geocoding_result_defaults() {
        let loc: ResolvedLocation = serde_json::from_value(serde_json::json!({
            "latitude": 1.5,
            "longitude": 2.5,
            "name": "Somewhere"
        }))
        .unwrap();
        assert_eq!(loc.timezone, "auto");
        assert!(loc.country_code.is_empty());
    }

    #[test]
    fn test_forecast_result_rejects_misaligned_arrays() {
        let err = ForecastResult::new(
            vec!["2026-10-18".into(), "2026-10-19".into()],
            vec![Some(0)],
            vec![Some(1.0), Some(2.0)],
            vec![Some(3.0), Some(4.0)],
            "Berlin",
        )
        .unwrap_err();
        assert!(matches!(err, WeatherError::InvalidResponse(_)));
    }

    #[test]
    fn test_forecast_days_are_index_aligned() {
        let forecast = ForecastResult::new(
            vec!["2026-10-18".into(), "2026-10-19".into()],
            vec![Some(3), Some(61)],
            vec![Some(6.1), Some(4.0)],
            vec![Some(12.3), Some(9.8)],
            "Berlin 🇩🇪",
        )
        .unwrap();

        let days: Vec<_> = forecast.days().collect();
        assert_eq!(days.len(), 2);
        assert_eq!(days[1].date, "2026-10-19");
        assert_eq!(days[1].weather_code, Some(61));
        assert_eq!(days[1].min, Some(4.0));
        assert_eq!(days[1].max, Some(9.8));
        assert_eq!(days[1].condition(), WeatherCondition::Showers);
        assert!(forecast.day(2).is_none());
    }

    #[test]
    fn test_day_without_code_is_unmapped() {
        let forecast = ForecastResult::new(
            vec!["2026-10-18".into()],
            vec![None],
            vec![None],
            vec![Some(9.0)],
            "Berlin",
        )
        .unwrap();

        let day = forecast.day(0).unwrap();
        assert_eq!(day.condition(), WeatherCondition::Unmapped);
        assert_eq!(day.condition().icon(), UNMAPPED_ICON);
        assert_eq!(day.min, None);
        assert_eq!(day.max, Some(9.0));
    }
}
