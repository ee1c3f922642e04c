//! Calendar-duration period codes (`1d`, `5d`, `1mo`, `6mo`, `1y`, `ytd`, `max`).
//!
//! Only the window is parsed here. The code itself names the output directory
//! and is sent to the remote source unchanged as the `range` parameter.

use chrono::{Datelike, Days, Months, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodSpan {
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
    YearToDate,
    Max,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub span: PeriodSpan,
}

impl Period {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let lower = raw.trim().to_lowercase();

        let span = match lower.as_str() {
            "ytd" => PeriodSpan::YearToDate,
            "max" => PeriodSpan::Max,
            _ => {
                let split = lower
                    .find(|c: char| !c.is_ascii_digit())
                    .ok_or_else(|| "missing unit (d, wk, mo, y)".to_string())?;
                let (count, unit) = lower.split_at(split);
                let count: u32 = count
                    .parse()
                    .map_err(|_| "missing count before unit".to_string())?;
                if count == 0 {
                    return Err("count must be positive".to_string());
                }
                match unit {
                    "d" => PeriodSpan::Days(count),
                    "wk" => PeriodSpan::Weeks(count),
                    "mo" => PeriodSpan::Months(count),
                    "y" => PeriodSpan::Years(count),
                    other => return Err(format!("unknown unit {other:?} (d, wk, mo, y)")),
                }
            }
        };

        Ok(Self { span })
    }

    /// First date strictly excluded from a window ending at `anchor`, or `None`
    /// when the window is unbounded. Bars with `date > cutoff` are in range.
    pub fn cutoff(&self, anchor: NaiveDate) -> Option<NaiveDate> {
        match self.span {
            PeriodSpan::Days(n) => anchor.checked_sub_days(Days::new(n as u64)),
            PeriodSpan::Weeks(n) => anchor.checked_sub_days(Days::new(u64::from(n) * 7)),
            PeriodSpan::Months(n) => anchor.checked_sub_months(Months::new(n)),
            PeriodSpan::Years(n) => anchor.checked_sub_months(Months::new(n.saturating_mul(12))),
            PeriodSpan::YearToDate => NaiveDate::from_ymd_opt(anchor.year(), 1, 1)
                .and_then(|jan1| jan1.pred_opt()),
            PeriodSpan::Max => None,
        }
    }

    pub fn contains(&self, date: NaiveDate, anchor: NaiveDate) -> bool {
        date <= anchor && self.cutoff(anchor).is_none_or(|cutoff| date > cutoff)
    }
}

/// Output directory for a period code: the code with an `r` appended
/// (`1y` → `1yr`, `6mo` → `6mor`).
pub fn directory_name(period: &str) -> String {
    format!("{period}r")
}
