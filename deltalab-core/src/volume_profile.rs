//! Point-of-control reduction over a bar's volume profile.

use crate::domain::{non_negative, VolumeProfile, VolumeProfileLevel};

/// Volume used to rank a level.
///
/// Bid + ask volume is what footprint charts display, so it wins whenever it
/// is positive. Levels without a bid/ask split fall back to the total `vol`.
pub fn level_metric(level: &VolumeProfileLevel) -> f64 {
    let bid_ask = non_negative(level.bid_vol) + non_negative(level.ask_vol);
    if bid_ask > 0.0 {
        bid_ask
    } else {
        non_negative(level.vol)
    }
}

/// Price of the highest-volume level, or `None` when there is nothing to show.
///
/// Returns `None` for an absent or empty profile and when every level has a
/// zero metric. Ties keep the first level in input order.
pub fn find_point_of_control(profile: &VolumeProfile) -> Option<f64> {
    let levels = profile.levels()?;

    let mut max_volume = 0.0;
    let mut poc_price = None;
    for level in levels {
        let volume = level_metric(level);
        if volume > max_volume {
            max_volume = volume;
            poc_price = Some(level.price);
        }
    }
    poc_price
}
