//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::{services::ring::RingGeometry, state::MAX_DURATION_SECS};

/// Parse a ring dimension: a finite, positive pixel count
fn parse_pixels(value: &str) -> Result<f64, String> {
    let pixels: f64 = value
        .parse()
        .map_err(|e| format!("`{}` is not a number: {}", value, e))?;
    if pixels.is_finite() && pixels > 0.0 {
        Ok(pixels)
    } else {
        Err(format!("`{}` must be a positive number of pixels", value))
    }
}

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "ring-timer")]
#[command(about = "A countdown timer with an animated progress ring")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Countdown duration in seconds
    #[arg(short, long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..=MAX_DURATION_SECS))]
    pub duration: u64,

    /// How often the running timer re-reads the clock, in milliseconds
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u64).range(10..))]
    pub tick_ms: u64,

    /// Ring diameter in pixels
    #[arg(long, default_value = "240", value_parser = parse_pixels)]
    pub size: f64,

    /// Ring stroke width in pixels, less than the diameter
    #[arg(long, default_value = "12", value_parser = parse_pixels)]
    pub stroke_width: f64,

    /// Start counting down as soon as the server is up
    #[arg(long)]
    pub autostart: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Ring geometry; a stroke at least as wide as the ring is narrowed to a tenth of it
    pub fn ring_geometry(&self) -> RingGeometry {
        let stroke_width = if self.stroke_width < self.size {
            self.stroke_width
        } else {
            self.size / 10.0
        };
        RingGeometry::new(self.size, stroke_width)
    }
}
