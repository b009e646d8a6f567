//! Resolver configuration.

/// Tunable parameters for route resolution.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Average bus speed under free-flowing traffic (km/h).
    pub avg_speed_kmh: f64,

    /// Dwell time added per intermediate stop (minutes).
    pub stop_delay_minutes: f64,

    /// Maximum number of transfer itineraries to return.
    pub max_transfer_results: usize,

    /// Per-stop travel estimate used for transfer legs (minutes).
    /// Transfers use a cruder fixed model than direct routes.
    pub leg_minutes_per_stop: f64,

    /// Expected wait for the connecting bus at the transfer point
    /// (minutes).
    pub transfer_wait_minutes: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            avg_speed_kmh: 20.0,
            stop_delay_minutes: 1.0,
            max_transfer_results: 5,
            leg_minutes_per_stop: 3.0,
            transfer_wait_minutes: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.avg_speed_kmh, 20.0);
        assert_eq!(config.stop_delay_minutes, 1.0);
        assert_eq!(config.max_transfer_results, 5);
        assert_eq!(config.leg_minutes_per_stop, 3.0);
        assert_eq!(config.transfer_wait_minutes, 10.0);
    }
}
