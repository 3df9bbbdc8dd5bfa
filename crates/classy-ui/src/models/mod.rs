pub mod forecast_model;

pub use forecast_model::{day_label, DayRow, ForecastModel};
