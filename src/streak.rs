use crate::dates::{DateError, parse_day};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

/// Length of the run of consecutive days ending at the most recent
/// completion. The run is not reset when the latest day lies in the past;
/// use [`is_streak_active`] for that.
pub fn current_streak(dates: &BTreeSet<NaiveDate>) -> u32 {
    let mut days = dates.iter().rev();
    let Some(mut later) = days.next() else {
        return 0;
    };

    let mut streak = 1;
    for earlier in days {
        if (*later - *earlier).num_days() != 1 {
            break;
        }
        streak += 1;
        later = earlier;
    }
    streak
}

pub fn streak_from_days<'a, I>(days: I) -> Result<u32, DateError>
where
    I: IntoIterator<Item = &'a str>,
{
    let dates = days
        .into_iter()
        .map(parse_day)
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(current_streak(&dates))
}

/// Whether the latest completion is today or yesterday.
pub fn is_streak_active(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> bool {
    match dates.last() {
        Some(latest) => *latest == today || *latest == today - Duration::days(1),
        None => false,
    }
}

pub fn longest_streak(dates: &BTreeSet<NaiveDate>) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in dates {
        run = match previous {
            Some(prev) if (*date - prev).num_days() == 1 => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(*date);
    }
    best
}
