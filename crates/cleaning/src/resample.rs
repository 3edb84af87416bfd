use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CleaningError;
use crate::frame::{Column, Frame};

/// Calendar period a frame is bucketed into. Buckets are labelled with the
/// last day of the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    /// Weeks end on Sunday.
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Periods per year, the annualization factor for data at this frequency.
    pub fn periods_per_year(self) -> u32 {
        match self {
            Frequency::Daily => 252,
            Frequency::Weekly => 52,
            Frequency::Monthly => 12,
            Frequency::Quarterly => 4,
            Frequency::Yearly => 1,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        };
        f.write_str(s)
    }
}

impl FromStr for Frequency {
    type Err = CleaningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "d" | "daily" => Ok(Frequency::Daily),
            "w" | "weekly" => Ok(Frequency::Weekly),
            "m" | "monthly" => Ok(Frequency::Monthly),
            "q" | "quarterly" => Ok(Frequency::Quarterly),
            "y" | "a" | "yearly" | "annual" => Ok(Frequency::Yearly),
            other => Err(CleaningError::InvalidParameter {
                name: "frequency",
                reason: format!("expected one of D, W, M, Q, Y, got '{other}'"),
            }),
        }
    }
}

/// How the rows that fall in one bucket are reduced to a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    #[default]
    Last,
    First,
    Mean,
    Sum,
}

impl Aggregation {
    fn apply(self, values: &[Option<f64>]) -> Option<f64> {
        let mut present = values.iter().flatten().copied();
        match self {
            Aggregation::Last => present.next_back(),
            Aggregation::First => present.next(),
            Aggregation::Mean => {
                let (sum, count) = present.fold((0.0, 0usize), |(s, c), x| (s + x, c + 1));
                (count > 0).then(|| sum / count as f64)
            }
            Aggregation::Sum => Some(present.sum()),
        }
    }
}

/// Downsamples a frame to one row per calendar period.
///
/// Every period between the first and the last observation is emitted, so a
/// period with no rows shows up with `None` in each column (`0.0` for `Sum`).
pub fn resample(
    frame: &Frame,
    frequency: Frequency,
    aggregation: Aggregation,
) -> Result<Frame, CleaningError> {
    let row_labels = frame
        .index()
        .iter()
        .map(|ts| period_end(ts.date_naive(), frequency))
        .collect::<Result<Vec<_>, _>>()?;

    let (Some(&first), Some(&last)) = (row_labels.first(), row_labels.last()) else {
        return Ok(frame.clone());
    };

    let mut labels = vec![first];
    let mut current = first;
    while current < last {
        let next_day = current
            .succ_opt()
            .ok_or_else(|| CleaningError::DateOutOfRange(current.to_string()))?;
        current = period_end(next_day, frequency)?;
        labels.push(current);
    }

    // Row ranges per label; rows are ascending so each bucket is contiguous.
    let mut ranges = Vec::with_capacity(labels.len());
    let mut start = 0;
    for label in &labels {
        let end = start + row_labels[start..].iter().take_while(|l| *l == label).count();
        ranges.push(start..end);
        start = end;
    }

    let columns = frame
        .columns()
        .iter()
        .map(|c| Column {
            name: c.name.clone(),
            values: ranges
                .iter()
                .map(|r| aggregation.apply(&c.values[r.clone()]))
                .collect(),
        })
        .collect();

    let index = labels
        .iter()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .collect();

    tracing::debug!(
        rows = frame.len(),
        buckets = labels.len(),
        %frequency,
        ?aggregation,
        "Resampled frame"
    );
    Ok(Frame::from_parts(index, columns))
}

fn period_end(date: NaiveDate, frequency: Frequency) -> Result<NaiveDate, CleaningError> {
    let end = match frequency {
        Frequency::Daily => Some(date),
        Frequency::Weekly => {
            let to_sunday = 6 - u64::from(date.weekday().num_days_from_monday());
            date.checked_add_days(Days::new(to_sunday))
        }
        Frequency::Monthly => month_end(date.year(), date.month()),
        Frequency::Quarterly => month_end(date.year(), date.month().div_ceil(3) * 3),
        Frequency::Yearly => NaiveDate::from_ymd_opt(date.year(), 12, 31),
    };
    end.ok_or_else(|| CleaningError::DateOutOfRange(date.to_string()))
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    if month == 12 {
        NaiveDate::from_ymd_opt(year, 12, 31)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?.pred_opt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn frame(rows: &[(DateTime<Utc>, Option<f64>)]) -> Frame {
        Frame::new(rows.iter().map(|(ts, _)| *ts).collect())
            .unwrap()
            .with_column("close", rows.iter().map(|(_, v)| *v).collect())
            .unwrap()
    }

    #[test]
    fn test_period_end_labels() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(); // a Wednesday
        let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(period_end(d, Frequency::Daily).unwrap(), d);
        assert_eq!(period_end(d, Frequency::Weekly).unwrap(), ymd(2024, 2, 18));
        assert_eq!(period_end(d, Frequency::Monthly).unwrap(), ymd(2024, 2, 29));
        assert_eq!(period_end(d, Frequency::Quarterly).unwrap(), ymd(2024, 3, 31));
        assert_eq!(period_end(d, Frequency::Yearly).unwrap(), ymd(2024, 12, 31));

        // Sunday is its own week end
        assert_eq!(period_end(ymd(2024, 2, 18), Frequency::Weekly).unwrap(), ymd(2024, 2, 18));
    }

    #[test]
    fn test_monthly_last_includes_empty_months() {
        let f = frame(&[
            (at(2024, 1, 3), Some(10.0)),
            (at(2024, 1, 31), Some(11.0)),
            (at(2024, 3, 1), Some(12.0)),
        ]);
        let out = resample(&f, Frequency::Monthly, Aggregation::Last).unwrap();
        assert_eq!(out.index(), &[at(2024, 1, 31), at(2024, 2, 29), at(2024, 3, 31)]);
        assert_eq!(out.column("close").unwrap(), &[Some(11.0), None, Some(12.0)]);
    }

    #[test]
    fn test_aggregations_skip_missing() {
        let f = frame(&[
            (at(2024, 1, 1), Some(1.0)),
            (at(2024, 1, 2), None),
            (at(2024, 1, 3), Some(3.0)),
            (at(2024, 1, 4), None),
        ]);
        let agg = |a| resample(&f, Frequency::Weekly, a).unwrap().column("close").unwrap()[0];
        assert_eq!(agg(Aggregation::Last), Some(3.0));
        assert_eq!(agg(Aggregation::First), Some(1.0));
        assert_eq!(agg(Aggregation::Mean), Some(2.0));
        assert_eq!(agg(Aggregation::Sum), Some(4.0));
    }

    #[test]
    fn test_empty_bucket_sum_is_zero() {
        let f = frame(&[(at(2024, 1, 1), Some(1.0)), (at(2024, 1, 15), Some(2.0))]);
        let out = resample(&f, Frequency::Weekly, Aggregation::Sum).unwrap();
        assert_eq!(out.column("close").unwrap(), &[Some(1.0), Some(0.0), Some(2.0)]);
    }

    #[test]
    fn test_empty_frame_is_returned_unchanged() {
        let f = Frame::new(Vec::new()).unwrap().with_column("close", Vec::new()).unwrap();
        assert_eq!(resample(&f, Frequency::Monthly, Aggregation::Last).unwrap(), f);
    }

    #[test]
    fn test_parse_frequency() {
        assert_eq!("M".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert_eq!("annual".parse::<Frequency>().unwrap(), Frequency::Yearly);
        assert!("hourly".parse::<Frequency>().is_err());
        assert_eq!(Frequency::Weekly.periods_per_year(), 52);
    }
}
