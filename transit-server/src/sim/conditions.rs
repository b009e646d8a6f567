//! Process-wide simulation conditions.

/// Current weather condition. Each variant carries a travel-time
/// slowdown multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weather {
    #[default]
    Clear,
    Cloudy,
    Rain,
    HeavyRain,
}

impl Weather {
    /// Parse from the fixed wire vocabulary. Anything else is `None`;
    /// callers treat unknown values as a no-op rather than an error.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "clear" => Some(Weather::Clear),
            "cloudy" => Some(Weather::Cloudy),
            "rain" => Some(Weather::Rain),
            "heavy_rain" => Some(Weather::HeavyRain),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Clear => "clear",
            Weather::Cloudy => "cloudy",
            Weather::Rain => "rain",
            Weather::HeavyRain => "heavy_rain",
        }
    }

    /// Travel-time multiplier for this weather.
    pub fn factor(&self) -> f64 {
        match self {
            Weather::Clear => 1.0,
            Weather::Cloudy => 1.05,
            Weather::Rain => 1.3,
            Weather::HeavyRain => 1.8,
        }
    }
}

/// Reported traffic condition. Unlike weather this does not feed the
/// feature vector directly (congestion there comes from the time-of-day
/// table); it is surfaced alongside predictions as context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traffic {
    Light,
    #[default]
    Normal,
    Heavy,
    VeryHeavy,
}

impl Traffic {
    /// Parse from the fixed wire vocabulary; unknown values are `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Traffic::Light),
            "normal" => Some(Traffic::Normal),
            "heavy" => Some(Traffic::Heavy),
            "very_heavy" => Some(Traffic::VeryHeavy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Traffic::Light => "light",
            Traffic::Normal => "normal",
            Traffic::Heavy => "heavy",
            Traffic::VeryHeavy => "very_heavy",
        }
    }
}

/// Congestion multiplier by time of day. Weekends flatten to a single
/// mild factor; weekday evening rush is the worst.
pub fn congestion_factor(hour: u32, weekend: bool) -> f64 {
    if weekend {
        return 1.1;
    }
    match hour {
        7..=10 => 1.6,
        17..=20 => 1.8,
        11..=16 => 1.2,
        21..=23 | 0..=6 => 0.9,
        _ => 1.0,
    }
}

/// The pair of live conditions the registry carries.
#[derive(Debug, Clone, Copy, Default)]
pub struct Conditions {
    pub weather: Weather,
    pub traffic: Traffic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_parses_fixed_domain() {
        assert_eq!(Weather::parse("clear"), Some(Weather::Clear));
        assert_eq!(Weather::parse("heavy_rain"), Some(Weather::HeavyRain));
        assert_eq!(Weather::parse("snow"), None);
        assert_eq!(Weather::parse("CLEAR"), None);
    }

    #[test]
    fn traffic_parses_fixed_domain() {
        assert_eq!(Traffic::parse("very_heavy"), Some(Traffic::VeryHeavy));
        assert_eq!(Traffic::parse("gridlock"), None);
    }

    #[test]
    fn weather_factors_ordered_by_severity() {
        let factors = [
            Weather::Clear.factor(),
            Weather::Cloudy.factor(),
            Weather::Rain.factor(),
            Weather::HeavyRain.factor(),
        ];
        for pair in factors.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn congestion_table() {
        assert_eq!(congestion_factor(8, false), 1.6);
        assert_eq!(congestion_factor(18, false), 1.8);
        assert_eq!(congestion_factor(13, false), 1.2);
        assert_eq!(congestion_factor(23, false), 0.9);
        assert_eq!(congestion_factor(2, false), 0.9);
        assert_eq!(congestion_factor(7, true), 1.1);
        assert_eq!(congestion_factor(13, true), 1.1);
    }
}
