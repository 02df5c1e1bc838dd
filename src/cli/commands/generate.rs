use anyhow::Result;
use tracing::debug;

/// Prints the mock forecast for one location to stdout.
pub fn generate(lat: f64, lon: f64, tz: &str) -> Result<()> {
    debug!("Generating forecast for lat={} lon={} tz={}", lat, lon, tz);
    let payload = compute::generate(lat, lon, tz);
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
