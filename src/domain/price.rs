/// A non-negative amount with two fractional digits, held as cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(i64);

/// Largest amount a `decimal(8, 2)` column holds.
const MAX_CENTS: i64 = 99_999_999;

impl Price {
    pub fn parse(s: &str) -> Result<Price, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("The price field is required.".to_string());
        }
        if s.starts_with('-') && is_unsigned_number(&s[1..]) {
            return Err("The price field must be at least 0.".to_string());
        }
        let s = s.strip_prefix('+').unwrap_or(s);
        if !is_unsigned_number(s) {
            return Err("The price field must be a number.".to_string());
        }

        let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
        if fraction.len() > 2 {
            return Err("The price field must have 0-2 decimal places.".to_string());
        }
        let whole = whole.trim_start_matches('0');
        if whole.len() > 6 {
            return Err("The price field must be less than 1000000.".to_string());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| "The price field must be a number.".to_string())?
        };
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map(|tenths| tenths * 10).unwrap_or(0),
            _ => fraction.parse().unwrap_or(0),
        };
        Ok(Price(whole * 100 + fraction))
    }

    pub fn cents(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Price {
    type Error = String;

    fn try_from(cents: i64) -> Result<Self, Self::Error> {
        if (0..=MAX_CENTS).contains(&cents) {
            Ok(Price(cents))
        } else {
            Err(format!("{} cents is not a valid price.", cents))
        }
    }
}

fn is_unsigned_number(s: &str) -> bool {
    let (whole, fraction) = match s.split_once('.') {
        Some(parts) => parts,
        None => (s, ""),
    };
    let digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    !(whole.is_empty() && fraction.is_empty()) && digits(whole) && digits(fraction)
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl serde::Serialize for Price {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
