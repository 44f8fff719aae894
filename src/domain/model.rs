use std::fmt;
use std::str::FromStr;

/// 拖車牌照最多保留的字元數
pub const LICENSE_TAG_CAPACITY: usize = 9;

/// Currency amount held as whole cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: u64) -> Self {
        Money(cents)
    }

    pub fn from_dollars(dollars: u64) -> Self {
        Money(dollars.saturating_mul(100))
    }

    pub fn cents(self) -> u64 {
        self.0
    }

    /// 解析十進位金額，第三位小數起四捨五入到分。
    /// Only plain `digits[.digits]` with an optional `+` is accepted; negatives
    /// and exponents yield `None`.
    pub fn parse_decimal(text: &str) -> Option<Self> {
        let text = text.trim();
        let text = text.strip_prefix('+').unwrap_or(text);
        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
            return None;
        }

        let dollars: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let mut digits = fraction.bytes().map(|b| u64::from(b - b'0'));
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let round_up = digits.next().is_some_and(|d| d >= 5);

        dollars
            .checked_mul(100)?
            .checked_add(tenths * 10 + hundredths + u64::from(round_up))
            .map(Money)
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Overpayment is absorbed: the result never drops below zero.
    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
    Slip,
    Land,
    Trailor,
    Storage,
}

impl LocationKind {
    pub const ALL: [LocationKind; 4] = [
        LocationKind::Slip,
        LocationKind::Land,
        LocationKind::Trailor,
        LocationKind::Storage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LocationKind::Slip => "slip",
            LocationKind::Land => "land",
            LocationKind::Trailor => "trailor",
            LocationKind::Storage => "storage",
        }
    }

    /// 每英尺每月費率
    pub fn monthly_rate(self) -> Money {
        match self {
            LocationKind::Slip => Money::from_dollars(15),
            LocationKind::Land => Money::from_dollars(12),
            LocationKind::Trailor => Money::from_dollars(10),
            LocationKind::Storage => Money::from_dollars(8),
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationKind {
    type Err = String;

    /// Case-sensitive: only the lowercase names are accepted.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        LocationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Slip(i32),
    Land(char),
    Trailor(String),
    Storage(i32),
}

impl Location {
    pub fn kind(&self) -> LocationKind {
        match self {
            Location::Slip(_) => LocationKind::Slip,
            Location::Land(_) => LocationKind::Land,
            Location::Trailor(_) => LocationKind::Trailor,
            Location::Storage(_) => LocationKind::Storage,
        }
    }

    /// Builds a trailer location, keeping at most [`LICENSE_TAG_CAPACITY`] characters.
    pub fn trailor(tag: &str) -> Self {
        Location::Trailor(tag.chars().take(LICENSE_TAG_CAPACITY).collect())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Slip(n) => write!(f, "slip {}", n),
            Location::Land(bay) => write!(f, "bay {}", bay),
            Location::Trailor(tag) => write!(f, "tag {}", tag),
            Location::Storage(n) => write!(f, "slot {}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boat {
    pub name: String,
    pub length: u32,
    pub location: Location,
    pub amount_owed: Money,
}

impl Boat {
    pub fn new(name: impl Into<String>, length: u32, location: Location, amount_owed: Money) -> Self {
        Self {
            name: name.into(),
            length,
            location,
            amount_owed,
        }
    }

    pub fn kind(&self) -> LocationKind {
        self.location.kind()
    }

    pub fn monthly_charge(&self) -> Money {
        let rate = self.kind().monthly_rate();
        Money::from_cents(rate.cents().saturating_mul(u64::from(self.length)))
    }
}

impl fmt::Display for Boat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} ft, {}, {}, ${}",
            self.name,
            self.length,
            self.kind(),
            self.location,
            self.amount_owed
        )
    }
}
