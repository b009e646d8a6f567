//! Ranking of mixed direct and transfer itineraries.

use std::cmp::Ordering;
use std::fmt;

use super::direct::DirectRoute;
use super::transfer::TransferRoute;

/// Rider-facing label attached to a ranked itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteLabel {
    BestRoute,
    LeastStops,
    ShortestDistance,
}

impl fmt::Display for RouteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RouteLabel::BestRoute => "Best Route",
            RouteLabel::LeastStops => "Least Stops",
            RouteLabel::ShortestDistance => "Shortest Distance",
        };
        f.write_str(s)
    }
}

/// What the ranker needs to know about an itinerary.
pub trait Rankable {
    fn is_direct(&self) -> bool;
    fn predicted_minutes(&self) -> f64;
    fn stops_between(&self) -> u32;
    fn distance_km(&self) -> f64;
}

impl Rankable for DirectRoute {
    fn is_direct(&self) -> bool {
        true
    }

    fn predicted_minutes(&self) -> f64 {
        self.predicted_time_minutes
    }

    fn stops_between(&self) -> u32 {
        self.stops_between
    }

    fn distance_km(&self) -> f64 {
        self.distance_km
    }
}

impl Rankable for TransferRoute {
    fn is_direct(&self) -> bool {
        false
    }

    fn predicted_minutes(&self) -> f64 {
        self.total_time_minutes
    }

    fn stops_between(&self) -> u32 {
        self.total_stops
    }

    /// Transfer itineraries carry no measured distance; they compete on
    /// time and stop count alone.
    fn distance_km(&self) -> f64 {
        0.0
    }
}

/// An itinerary with its composite score and any earned labels.
#[derive(Debug, Clone)]
pub struct Ranked<T> {
    pub item: T,
    pub score: f64,
    pub labels: Vec<RouteLabel>,
}

fn score(item: &impl Rankable) -> f64 {
    let direct_bonus = if item.is_direct() { -100.0 } else { 0.0 };
    direct_bonus
        + item.predicted_minutes() * 2.0
        + item.stops_between() as f64 * 0.5
        + item.distance_km() * 0.3
}

/// Rank itineraries ascending by composite score. Any direct route
/// outranks any transfer because the direct bonus (-100) dwarfs the
/// other terms at city scale.
///
/// The first itinerary is labelled "Best Route"; every itinerary tied
/// for fewest stops gets "Least Stops" and every one tied for shortest
/// distance gets "Shortest Distance". One itinerary can earn all three.
pub fn rank_routes<T: Rankable>(items: Vec<T>) -> Vec<Ranked<T>> {
    let mut ranked: Vec<Ranked<T>> = items
        .into_iter()
        .map(|item| {
            let score = score(&item);
            Ranked {
                item,
                score,
                labels: Vec::new(),
            }
        })
        .collect();

    ranked.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));

    if ranked.is_empty() {
        return ranked;
    }

    ranked[0].labels.push(RouteLabel::BestRoute);

    if let Some(min_stops) = ranked.iter().map(|r| r.item.stops_between()).min() {
        for r in &mut ranked {
            if r.item.stops_between() == min_stops {
                r.labels.push(RouteLabel::LeastStops);
            }
        }
    }

    let min_distance = ranked
        .iter()
        .map(|r| r.item.distance_km())
        .fold(f64::INFINITY, f64::min);
    for r in &mut ranked {
        if r.item.distance_km() == min_distance {
            r.labels.push(RouteLabel::ShortestDistance);
        }
    }

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Fake {
        direct: bool,
        minutes: f64,
        stops: u32,
        km: f64,
    }

    impl Rankable for Fake {
        fn is_direct(&self) -> bool {
            self.direct
        }

        fn predicted_minutes(&self) -> f64 {
            self.minutes
        }

        fn stops_between(&self) -> u32 {
            self.stops
        }

        fn distance_km(&self) -> f64 {
            self.km
        }
    }

    #[test]
    fn direct_always_beats_transfer() {
        // Even a slow direct route outranks a quick transfer.
        let ranked = rank_routes(vec![
            Fake {
                direct: false,
                minutes: 15.0,
                stops: 4,
                km: 0.0,
            },
            Fake {
                direct: true,
                minutes: 40.0,
                stops: 12,
                km: 9.0,
            },
        ]);

        assert!(ranked[0].item.direct);
        assert!(ranked[0].labels.contains(&RouteLabel::BestRoute));
    }

    #[test]
    fn score_formula() {
        let item = Fake {
            direct: true,
            minutes: 10.0,
            stops: 4,
            km: 3.0,
        };
        // -100 + 10*2 + 4*0.5 + 3*0.3 = -77.1
        assert!((score(&item) - (-77.1)).abs() < 1e-9);
    }

    #[test]
    fn labels_can_stack_on_one_itinerary() {
        let ranked = rank_routes(vec![
            Fake {
                direct: true,
                minutes: 10.0,
                stops: 2,
                km: 1.5,
            },
            Fake {
                direct: true,
                minutes: 20.0,
                stops: 6,
                km: 4.0,
            },
        ]);

        let winner = &ranked[0];
        assert!(winner.labels.contains(&RouteLabel::BestRoute));
        assert!(winner.labels.contains(&RouteLabel::LeastStops));
        assert!(winner.labels.contains(&RouteLabel::ShortestDistance));
        assert!(ranked[1].labels.is_empty());
    }

    #[test]
    fn ties_share_labels() {
        let ranked = rank_routes(vec![
            Fake {
                direct: true,
                minutes: 10.0,
                stops: 3,
                km: 2.0,
            },
            Fake {
                direct: true,
                minutes: 12.0,
                stops: 3,
                km: 2.0,
            },
        ]);

        for r in &ranked {
            assert!(r.labels.contains(&RouteLabel::LeastStops));
            assert!(r.labels.contains(&RouteLabel::ShortestDistance));
        }
        // Only the cheapest score carries the headline label.
        assert!(ranked[0].labels.contains(&RouteLabel::BestRoute));
        assert!(!ranked[1].labels.contains(&RouteLabel::BestRoute));
    }

    #[test]
    fn empty_input_ranks_empty() {
        let ranked = rank_routes(Vec::<Fake>::new());
        assert!(ranked.is_empty());
    }

    #[test]
    fn label_display_strings() {
        assert_eq!(RouteLabel::BestRoute.to_string(), "Best Route");
        assert_eq!(RouteLabel::LeastStops.to_string(), "Least Stops");
        assert_eq!(RouteLabel::ShortestDistance.to_string(), "Shortest Distance");
    }

    #[test]
    fn sorted_ascending_by_score() {
        let ranked = rank_routes(vec![
            Fake {
                direct: false,
                minutes: 30.0,
                stops: 8,
                km: 0.0,
            },
            Fake {
                direct: true,
                minutes: 18.0,
                stops: 5,
                km: 4.0,
            },
            Fake {
                direct: true,
                minutes: 12.0,
                stops: 3,
                km: 2.5,
            },
        ]);

        for pair in ranked.windows(2) {
            assert!(pair[0].score <= pair[1].score);
        }
    }
}
