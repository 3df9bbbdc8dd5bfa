//! Text rendering of the published lookup state.

use classy_forecast::LookupState;

use crate::models::ForecastModel;

/// Shown in place of a temperature the API did not report
const MISSING_TEMPERATURE: &str = "--";

/// Render `state` for the terminal. Empty when nothing is published.
pub fn render(state: &LookupState) -> String {
    let Some(model) = ForecastModel::from_state(state) else {
        return String::new();
    };

    let mut out = model.heading.clone();
    out.push('\n');
    for day in &model.days {
        out.push_str(&format!(
            "  {}  {:<5}  {} - {}  {}\n",
            day.icon,
            day.label,
            temperature(day.min),
            temperature(day.max),
            day.description
        ));
    }
    out
}

fn temperature(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{}°", value),
        None => MISSING_TEMPERATURE.to_string(),
    }
}
