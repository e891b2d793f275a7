use serde::*;

/// Time of day as whole minutes since midnight.
///
/// Working hours and slot arithmetic are minute-granular; sub-minute
/// precision never occurs in this domain.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub const MINUTES_PER_DAY: u32 = 24 * 60;

    /// Create from minutes since midnight. Values are clamped to one day.
    pub fn new(minutes: u32) -> Self {
        Self(minutes.min(Self::MINUTES_PER_DAY))
    }

    /// Create from an hour/minute pair.
    pub fn from_hm(hour: u32, minute: u32) -> Self {
        Self::new(hour * 60 + minute)
    }

    /// Minutes since midnight.
    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn hour(&self) -> u32 {
        self.0 / 60
    }

    pub fn minute(&self) -> u32 {
        self.0 % 60
    }

    /// Parse an "HH:MM" wall-clock string.
    pub fn parse(s: &str) -> Result<Self, String> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| format!("Invalid time '{}': expected HH:MM", s))?;
        let hour: u32 = h
            .parse()
            .map_err(|_| format!("Invalid time '{}': bad hour", s))?;
        let minute: u32 = m
            .parse()
            .map_err(|_| format!("Invalid time '{}': bad minute", s))?;
        if hour > 23 || minute > 59 {
            return Err(format!("Invalid time '{}': out of range", s));
        }
        Ok(Self::from_hm(hour, minute))
    }

    /// Saturating addition of a minute offset.
    pub fn plus_minutes(&self, minutes: u32) -> Self {
        Self::new(self.0 + minutes)
    }

    /// Convert to a chrono `NaiveTime`.
    pub fn to_naive_time(&self) -> chrono::NaiveTime {
        chrono::NaiveTime::from_hms_opt(self.hour().min(23), self.minute(), 0)
            .unwrap_or(chrono::NaiveTime::MIN)
    }

    /// Anchor this time of day to a date, yielding a UTC instant.
    pub fn on_date(&self, date: chrono::NaiveDate) -> chrono::DateTime<chrono::Utc> {
        date.and_time(self.to_naive_time()).and_utc()
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Half-open time-of-day range `[start, end)` within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeRange {
    /// Create a range; `None` unless start < end.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Parse a pair of "HH:MM" strings into a range.
    pub fn parse(start: &str, end: &str) -> Result<Self, String> {
        let start = TimeOfDay::parse(start)?;
        let end = TimeOfDay::parse(end)?;
        Self::new(start, end).ok_or_else(|| {
            format!("Invalid range: start {} must precede end {}", start, end)
        })
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end.value() - self.start.value()
    }

    /// Half-open overlap test.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether an instant lies inside this range (inclusive start, exclusive end).
    pub fn contains(&self, t: TimeOfDay) -> bool {
        self.start <= t && t < self.end
    }

    /// Subtract another range, yielding the remaining sub-ranges in order.
    ///
    /// Subtraction never inverts ordering: each surviving piece keeps
    /// start < end, and pieces come out sorted.
    pub fn subtract(&self, other: &Self) -> Vec<TimeRange> {
        if !self.overlaps(other) {
            return vec![*self];
        }
        let mut remaining = Vec::new();
        if let Some(before) = TimeRange::new(self.start, other.start.min(self.end)) {
            remaining.push(before);
        }
        if let Some(after) = TimeRange::new(other.end.max(self.start), self.end) {
            remaining.push(after);
        }
        remaining
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Parse a "YYYY-MM-DD" date string.
pub fn parse_date(s: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {}", s, e))
}

/// Weekday index with 0 = Monday, matching the schedule store convention.
pub fn weekday_index(date: chrono::NaiveDate) -> u8 {
    use chrono::Datelike;
    date.weekday().num_days_from_monday() as u8
}
