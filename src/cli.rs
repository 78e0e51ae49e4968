use std::time::Duration;

use clap::Parser;

pub const MAX_GENERIC_WINDOWS: usize = 32;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "realm-wm",
    version = env!("CARGO_PKG_VERSION"),
    about = "Movable, focusable panel windows in the terminal"
)]
pub struct Cli {
    /// Generic windows to open at start.
    #[arg(short = 'g', long = "generic", value_name = "N", default_value_t = 0)]
    pub generic: usize,

    /// Leave mouse capture off (no clicking or dragging).
    #[arg(long = "no-mouse")]
    pub no_mouse: bool,

    /// Send logs to stderr instead of the in-app debug log.
    #[arg(long = "log-stderr")]
    pub log_stderr: bool,

    /// Redraw interval.
    #[arg(long = "tick-ms", value_name = "MS", default_value_t = 16)]
    pub tick_ms: u64,
}

impl Cli {
    pub fn validate(&self) -> Result<(), String> {
        if self.generic > MAX_GENERIC_WINDOWS {
            return Err(format!(
                "--generic must be at most {MAX_GENERIC_WINDOWS}"
            ));
        }
        if !(1..=1000).contains(&self.tick_ms) {
            return Err("--tick-ms must be between 1 and 1000".to_string());
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["realm-wm"]).unwrap();
        assert_eq!(cli.generic, 0);
        assert!(!cli.no_mouse);
        assert!(!cli.log_stderr);
        assert_eq!(cli.tick(), Duration::from_millis(16));
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn flags_parse() {
        let cli =
            Cli::try_parse_from(["realm-wm", "--generic", "3", "--no-mouse", "--log-stderr"])
                .unwrap();
        assert_eq!(cli.generic, 3);
        assert!(cli.no_mouse);
        assert!(cli.log_stderr);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let cli = Cli::try_parse_from(["realm-wm", "-g", "100"]).unwrap();
        assert!(cli.validate().is_err());
        let cli = Cli::try_parse_from(["realm-wm", "--tick-ms", "0"]).unwrap();
        assert!(cli.validate().is_err());
    }
}
