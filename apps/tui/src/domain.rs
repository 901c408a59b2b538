use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Survey years covered by waves 1 through 10.
pub const WAVE_YEARS: [&str; 10] = [
    "2002–2003",
    "2004–2005",
    "2006–2007",
    "2008–2009",
    "2010–2011",
    "2012–2013",
    "2014–2015",
    "2016–2017",
    "2018–2019",
    "2020–2021",
];

/// Waves offered by the bar chart and scatter plot pickers.
pub const LIMITED_WAVES: [u32; 4] = [2, 4, 6, 8];

/// Visit month/year bucket, rendered as `MM-YYYY`.
///
/// Ordering is chronological (year first, then month), so `11-2003` sorts
/// before `02-2004`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeKey {
    month: u8,
    year: i32,
}

impl TimeKey {
    pub const fn new(month: u8, year: i32) -> Option<Self> {
        if month >= 1 && month <= 12 && year > 0 {
            Some(Self { month, year })
        } else {
            None
        }
    }

    /// Rounds a raw visit month and year the same way the survey exports
    /// them (half away from zero) and rejects anything outside a calendar.
    pub fn from_visit(month: f64, year: f64) -> Option<Self> {
        if !month.is_finite() || !year.is_finite() {
            return None;
        }
        let month = month.round();
        let year = year.round();
        if !(1.0..=12.0).contains(&month) || year < 1.0 || year > f64::from(i32::MAX) {
            return None;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self::new(month as u8, year as i32)
    }

    pub fn parse(value: &str) -> Option<Self> {
        let (month, year) = value.trim().split_once('-')?;
        Self::new(month.parse().ok()?, year.parse().ok()?)
    }

    pub const fn month(self) -> u8 {
        self.month
    }

    pub const fn year(self) -> i32 {
        self.year
    }
}

impl Ord for TimeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then_with(|| self.month.cmp(&other.month))
    }
}

impl PartialOrd for TimeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{}", self.month, self.year)
    }
}

impl Serialize for TimeKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Gender {
    Male,
    Female,
    Other(String),
}

impl Gender {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "" => None,
            "Male" => Some(Self::Male),
            "Female" => Some(Self::Female),
            other => Some(Self::Other(other.to_string())),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other(value) => value,
        }
    }
}

/// Blood lipid measurements shown on the bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cholesterol,
    Hdl,
    Ldl,
    Triglycerides,
}

impl Metric {
    pub const ALL: [Self; 4] = [Self::Cholesterol, Self::Hdl, Self::Ldl, Self::Triglycerides];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cholesterol => "cholesterol",
            Self::Hdl => "hdl",
            Self::Ldl => "ldl",
            Self::Triglycerides => "triglycerides",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Cholesterol => "Cholesterol (g/l)",
            Self::Hdl => "HDL (g/l)",
            Self::Ldl => "LDL (g/l)",
            Self::Triglycerides => "Triglycerides (g/l)",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Cholesterol => 0,
            Self::Hdl => 1,
            Self::Ldl => 2,
            Self::Triglycerides => 3,
        }
    }
}

/// Extracts the wave number from labels such as `"Wave 4"`.
pub fn wave_number(label: &str) -> Option<u32> {
    let digits: String = label.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

pub fn wave_label(number: u32) -> String {
    format!("Wave {number}")
}

pub fn wave_years(number: u32) -> Option<&'static str> {
    let index = usize::try_from(number.checked_sub(1)?).ok()?;
    WAVE_YEARS.get(index).copied()
}

/// A selectable wave: the value matched against record `Wave` fields plus
/// the caption shown in pickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveOption {
    pub value: String,
    pub caption: String,
}

impl WaveOption {
    pub fn for_number(number: u32) -> Self {
        let value = wave_label(number);
        let caption = wave_years(number)
            .map_or_else(|| value.clone(), |years| format!("{value} ({years})"));
        Self { value, caption }
    }
}

pub fn limited_wave_options() -> Vec<WaveOption> {
    LIMITED_WAVES.iter().copied().map(WaveOption::for_number).collect()
}

pub fn full_wave_options() -> Vec<WaveOption> {
    (1..=10).map(WaveOption::for_number).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_key_pads_month_and_rounds() {
        let key = TimeKey::from_visit(3.6, 2007.8).unwrap();
        assert_eq!(key.to_string(), "04-2008");
    }

    #[test]
    fn time_key_orders_by_year_then_month() {
        let late = TimeKey::parse("11-2003").unwrap();
        let early = TimeKey::parse("02-2004").unwrap();
        assert!(late < early);

        let mut keys = vec![early, late];
        keys.sort();
        assert_eq!(keys, vec![late, early]);
    }

    #[test]
    fn time_key_rejects_out_of_range_months() {
        assert!(TimeKey::from_visit(0.2, 2004.0).is_none());
        assert!(TimeKey::from_visit(12.6, 2004.0).is_none());
        assert!(TimeKey::from_visit(f64::NAN, 2004.0).is_none());
        assert!(TimeKey::from_visit(5.0, 0.0).is_none());
    }

    #[test]
    fn wave_numbers_come_from_digits() {
        assert_eq!(wave_number("Wave 4"), Some(4));
        assert_eq!(wave_number("Wave 10"), Some(10));
        assert_eq!(wave_number("baseline"), None);
    }

    #[test]
    fn wave_options_carry_year_captions() {
        let options = limited_wave_options();
        assert_eq!(options.len(), 4);
        assert_eq!(options[1].value, "Wave 4");
        assert_eq!(options[1].caption, "Wave 4 (2008–2009)");
        assert_eq!(full_wave_options().len(), 10);
    }

    #[test]
    fn gender_keeps_unknown_labels() {
        assert_eq!(Gender::parse("Male"), Some(Gender::Male));
        assert_eq!(Gender::parse(" "), None);
        assert_eq!(Gender::parse("X").unwrap().label(), "X");
    }
}
