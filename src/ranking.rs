//! Distance ranking of POIs relative to the user

use tracing::warn;

use crate::geo::distance_km;
use crate::models::{Coordinate, PointOfInterest, RankedRoute};

/// POIs whose rating is at least `min_rating`, in their original order
pub fn filter_by_rating<'a, I>(pois: I, min_rating: f64) -> impl Iterator<Item = &'a PointOfInterest>
where
    I: IntoIterator<Item = &'a PointOfInterest>,
{
    pois.into_iter().filter(move |poi| poi.rating >= min_rating)
}

/// Pair every POI with its distance from `user` and sort nearest first.
///
/// POIs whose distance cannot be computed are logged and left out. Equal
/// distances keep their input order.
pub fn rank_routes<'a, I>(user: &Coordinate, pois: I) -> Vec<RankedRoute>
where
    I: IntoIterator<Item = &'a PointOfInterest>,
{
    let mut routes: Vec<RankedRoute> = pois
        .into_iter()
        .filter_map(|poi| match distance_km(user, &poi.coordinate) {
            Ok(distance_km) => Some(RankedRoute {
                poi: poi.clone(),
                distance_km,
            }),
            Err(e) => {
                warn!("Failed to compute route for {}: {}", poi.name, e);
                None
            }
        })
        .collect();

    routes.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    routes
}

/// Filter by minimum rating, then rank by distance
pub fn rank_pois(user: &Coordinate, pois: &[PointOfInterest], min_rating: f64) -> Vec<RankedRoute> {
    rank_routes(user, filter_by_rating(pois, min_rating))
}
