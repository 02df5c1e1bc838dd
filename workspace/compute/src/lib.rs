pub mod coerce;
pub mod mock_forecast;
pub mod numeric;

pub use coerce::coerce_number;
pub use mock_forecast::{generate, seed};
