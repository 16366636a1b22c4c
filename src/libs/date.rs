use crate::libs::phylo::error::TreeError;
use std::fmt;
use std::str::FromStr;

const MONTHS_3: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Calendar date with month precision accepted on input.
///
/// `year == 0` is the empty sentinel. Field order gives the lexicographic
/// (year, month, day) ordering used everywhere dates are compared.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    year: i32,
    month: u32,
    day: u32,
}

impl Date {
    /// ```
    /// use tredraw::libs::date::Date;
    /// let d = Date::new(2019, 3, 12);
    /// assert_eq!(d.to_string(), "2019-03-12");
    /// assert!(Date::default().is_empty());
    /// ```
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    pub fn is_empty(&self) -> bool {
        self.year == 0
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Accepts exactly `YYYY-MM-DD` or `YYYY-MM` (day defaults to 1).
    pub fn parse(text: &str) -> Result<Self, TreeError> {
        let bad = || TreeError::DateFormat(format!("cannot parse date from {}", text));
        if text.len() != 10 && text.len() != 7 {
            return Err(bad());
        }
        let field = |range: std::ops::Range<usize>| -> Result<u32, TreeError> {
            let s = text.get(range).ok_or_else(bad)?;
            if !s.bytes().all(|b| b.is_ascii_digit()) {
                return Err(bad());
            }
            s.parse::<u32>().map_err(|_| bad())
        };
        if text.as_bytes()[4] != b'-' {
            return Err(bad());
        }
        let year = field(0..4)? as i32;
        let month = field(5..7)?;
        let day = if text.len() == 10 {
            if text.as_bytes()[7] != b'-' {
                return Err(bad());
            }
            field(8..10)?
        } else {
            1
        };
        if year == 0 || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(bad());
        }
        Ok(Self { year, month, day })
    }

    /// Same year and month, day forced to 1.
    pub fn first_of_month(&self) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self { day: 1, ..*self }
    }

    pub fn increment_month(&mut self) {
        if self.month < 12 {
            self.month += 1;
        } else {
            self.month = 1;
            self.year += 1;
        }
    }

    /// `months` earlier, keeping the day.
    ///
    /// ```
    /// use tredraw::libs::date::Date;
    /// let d = Date::new(2019, 5, 1).subtract_months(2);
    /// assert_eq!(d, Date::new(2019, 3, 1));
    /// let d = Date::new(2019, 2, 1).subtract_months(14);
    /// assert_eq!(d, Date::new(2017, 12, 1));
    /// ```
    pub fn subtract_months(&self, months: usize) -> Self {
        let total = self.year as i64 * 12 + (self.month as i64 - 1) - months as i64;
        Self {
            year: total.div_euclid(12) as i32,
            month: total.rem_euclid(12) as u32 + 1,
            day: self.day,
        }
    }

    /// Three-letter English month name.
    pub fn month_3(&self) -> &'static str {
        MONTHS_3[(self.month.clamp(1, 12) - 1) as usize]
    }

    /// Two-digit year.
    pub fn year_2(&self) -> String {
        format!("{:02}", self.year.rem_euclid(100))
    }
}

/// Signed number of whole months from `a` to `b`; negative when `b < a`.
///
/// ```
/// use tredraw::libs::date::{months_between, Date};
/// let a = Date::new(2018, 11, 20);
/// let b = Date::new(2019, 2, 1);
/// assert_eq!(months_between(&a, &b), 3);
/// assert_eq!(months_between(&b, &a), -3);
/// ```
pub fn months_between(a: &Date, b: &Date) -> i32 {
    if b < a {
        -months_between(b, a)
    } else {
        12 * (b.year - a.year) + (b.month as i32 - a.month as i32)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for Date {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for Date {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Date {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Ok(Date::default());
        }
        Date::parse(&s).map_err(serde::de::Error::custom)
    }
}
