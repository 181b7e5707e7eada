use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{CalculationError, Result};

/// one published rate pair, effective from `effective_date` until the next entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateEntry {
    pub effective_date: NaiveDate,
    pub statutory: Rate,
    pub commercial: Rate,
}

/// time-indexed statutory and commercial rates, sorted ascending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RateEntry>", into = "Vec<RateEntry>")]
pub struct RateTable {
    entries: Vec<RateEntry>,
}

// Dutch wettelijke rente / handelsrente since 2004
const DUTCH_RATES: &[(i32, u32, u32, Decimal, Decimal)] = &[
    (2004, 1, 1, dec!(0.05), dec!(0.0902)),
    (2004, 2, 1, dec!(0.04), dec!(0.0902)),
    (2004, 7, 1, dec!(0.04), dec!(0.0901)),
    (2005, 1, 1, dec!(0.04), dec!(0.0909)),
    (2005, 7, 1, dec!(0.04), dec!(0.0905)),
    (2006, 1, 1, dec!(0.04), dec!(0.0925)),
    (2006, 7, 1, dec!(0.04), dec!(0.0983)),
    (2007, 1, 1, dec!(0.06), dec!(0.1058)),
    (2007, 7, 1, dec!(0.06), dec!(0.1107)),
    (2008, 1, 1, dec!(0.06), dec!(0.112)),
    (2008, 7, 1, dec!(0.06), dec!(0.1107)),
    (2009, 1, 1, dec!(0.06), dec!(0.095)),
    (2009, 7, 1, dec!(0.04), dec!(0.08)),
    (2010, 1, 1, dec!(0.03), dec!(0.08)),
    (2010, 7, 1, dec!(0.03), dec!(0.08)),
    (2011, 1, 1, dec!(0.03), dec!(0.08)),
    (2011, 7, 1, dec!(0.04), dec!(0.0825)),
    (2012, 1, 1, dec!(0.04), dec!(0.08)),
    (2012, 7, 1, dec!(0.03), dec!(0.08)),
    (2013, 1, 1, dec!(0.03), dec!(0.0775)),
    (2013, 3, 16, dec!(0.03), dec!(0.0875)),
    (2013, 7, 1, dec!(0.03), dec!(0.085)),
    (2014, 1, 1, dec!(0.03), dec!(0.0825)),
    (2014, 7, 1, dec!(0.03), dec!(0.0815)),
    (2015, 1, 1, dec!(0.02), dec!(0.0805)),
    (2015, 7, 1, dec!(0.02), dec!(0.0805)),
    (2016, 1, 1, dec!(0.02), dec!(0.0805)),
    (2016, 7, 1, dec!(0.02), dec!(0.08)),
    (2017, 1, 1, dec!(0.02), dec!(0.08)),
    (2017, 7, 1, dec!(0.02), dec!(0.08)),
    (2018, 1, 1, dec!(0.02), dec!(0.08)),
    (2018, 7, 1, dec!(0.02), dec!(0.08)),
    (2019, 1, 1, dec!(0.02), dec!(0.08)),
    (2019, 7, 1, dec!(0.02), dec!(0.08)),
    (2020, 1, 1, dec!(0.02), dec!(0.08)),
    (2020, 7, 1, dec!(0.02), dec!(0.08)),
    (2021, 1, 1, dec!(0.02), dec!(0.08)),
    (2021, 7, 1, dec!(0.02), dec!(0.08)),
    (2022, 1, 1, dec!(0.02), dec!(0.08)),
    (2023, 1, 1, dec!(0.04), dec!(0.105)),
    (2023, 7, 1, dec!(0.06), dec!(0.12)),
    (2024, 1, 1, dec!(0.07), dec!(0.125)),
    (2024, 7, 1, dec!(0.07), dec!(0.1225)),
    (2025, 1, 1, dec!(0.06), dec!(0.1115)),
    (2025, 7, 1, dec!(0.06), dec!(0.1015)),
    (2026, 1, 1, dec!(0.04), dec!(0.1015)),
    (2027, 1, 1, dec!(0.04), dec!(0.1015)),
];

impl RateTable {
    /// build a table from arbitrary entries; sorts them and rejects
    /// empty tables and duplicate effective dates
    pub fn from_entries(mut entries: Vec<RateEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(CalculationError::InvalidRateTable {
                message: "table has no entries".to_string(),
            });
        }

        entries.sort_by_key(|e| e.effective_date);

        if let Some(pair) = entries
            .windows(2)
            .find(|pair| pair[0].effective_date == pair[1].effective_date)
        {
            return Err(CalculationError::InvalidRateTable {
                message: format!("duplicate effective date {}", pair[0].effective_date),
            });
        }

        if let Some(entry) = entries
            .iter()
            .find(|e| e.statutory.is_negative() || e.commercial.is_negative())
        {
            return Err(CalculationError::InvalidRateTable {
                message: format!("negative rate effective {}", entry.effective_date),
            });
        }

        Ok(Self { entries })
    }

    /// table with a single constant rate pair from `from` onward
    pub fn flat(from: NaiveDate, statutory: Rate, commercial: Rate) -> Self {
        Self {
            entries: vec![RateEntry {
                effective_date: from,
                statutory,
                commercial,
            }],
        }
    }

    /// published Dutch statutory and commercial rates
    pub fn dutch_statutory() -> Self {
        let entries = DUTCH_RATES
            .iter()
            .filter_map(|&(year, month, day, statutory, commercial)| {
                Some(RateEntry {
                    effective_date: NaiveDate::from_ymd_opt(year, month, day)?,
                    statutory: Rate::from_decimal(statutory),
                    commercial: Rate::from_decimal(commercial),
                })
            })
            .collect();
        Self { entries }
    }

    /// load a table from a JSON array of entries
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn entries(&self) -> &[RateEntry] {
        &self.entries
    }

    /// first date the table covers
    pub fn earliest(&self) -> NaiveDate {
        self.entries[0].effective_date
    }

    /// entry in force on `date`
    pub fn entry_for(&self, date: NaiveDate) -> Result<&RateEntry> {
        let idx = self.entries.partition_point(|e| e.effective_date <= date);
        if idx == 0 {
            return Err(CalculationError::RateTableGap {
                date,
                earliest: self.earliest(),
            });
        }
        Ok(&self.entries[idx - 1])
    }

    /// statutory or commercial rate in force on `date`
    pub fn rate_for(&self, date: NaiveDate, is_commercial: bool) -> Result<Rate> {
        let entry = self.entry_for(date)?;
        Ok(if is_commercial {
            entry.commercial
        } else {
            entry.statutory
        })
    }

    /// effective dates strictly between `from` and `to`
    pub fn change_dates_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries
            .iter()
            .map(|e| e.effective_date)
            .filter(move |d| from < *d && *d < to)
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::dutch_statutory()
    }
}

impl TryFrom<Vec<RateEntry>> for RateTable {
    type Error = CalculationError;

    fn try_from(entries: Vec<RateEntry>) -> Result<Self> {
        Self::from_entries(entries)
    }
}

impl From<RateTable> for Vec<RateEntry> {
    fn from(table: RateTable) -> Self {
        table.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_lookup_uses_most_recent_entry() {
        let table = RateTable::dutch_statutory();

        assert_eq!(table.rate_for(date(2024, 1, 1), false).unwrap(), Rate::from_decimal(dec!(0.07)));
        assert_eq!(table.rate_for(date(2024, 6, 30), true).unwrap(), Rate::from_decimal(dec!(0.125)));
        assert_eq!(table.rate_for(date(2024, 7, 1), true).unwrap(), Rate::from_decimal(dec!(0.1225)));
        // mid-quarter change in 2013
        assert_eq!(table.rate_for(date(2013, 3, 15), true).unwrap(), Rate::from_decimal(dec!(0.0775)));
        assert_eq!(table.rate_for(date(2013, 3, 16), true).unwrap(), Rate::from_decimal(dec!(0.0875)));
        // far future stays on the last entry
        assert_eq!(table.rate_for(date(2040, 1, 1), false).unwrap(), Rate::from_decimal(dec!(0.04)));
    }

    #[test]
    fn test_dutch_table_is_complete_and_ordered() {
        let table = RateTable::dutch_statutory();

        // every row is a real calendar date
        assert_eq!(table.entries().len(), DUTCH_RATES.len());
        assert_eq!(table.earliest(), date(2004, 1, 1));
        assert!(table
            .entries()
            .windows(2)
            .all(|pair| pair[0].effective_date < pair[1].effective_date));

        let validated = RateTable::from_entries(table.entries().to_vec()).unwrap();
        assert_eq!(validated.entries(), table.entries());
    }

    #[test]
    fn test_gap_before_first_entry() {
        let table = RateTable::dutch_statutory();
        let err = table.rate_for(date(2003, 12, 31), false).unwrap_err();
        assert!(matches!(
            err,
            CalculationError::RateTableGap { earliest, .. } if earliest == date(2004, 1, 1)
        ));
    }

    #[test]
    fn test_change_dates_are_exclusive() {
        let table = RateTable::dutch_statutory();
        let changes: Vec<_> = table
            .change_dates_between(date(2024, 1, 1), date(2025, 1, 1))
            .collect();
        assert_eq!(changes, vec![date(2024, 7, 1)]);
    }

    #[test]
    fn test_from_entries_validation() {
        assert!(RateTable::from_entries(vec![]).is_err());

        let entry = RateEntry {
            effective_date: date(2020, 1, 1),
            statutory: Rate::from_percentage(2),
            commercial: Rate::from_percentage(8),
        };
        assert!(RateTable::from_entries(vec![entry, entry]).is_err());

        let later = RateEntry {
            effective_date: date(2021, 1, 1),
            ..entry
        };
        let table = RateTable::from_entries(vec![later, entry]).unwrap();
        assert_eq!(table.earliest(), date(2020, 1, 1));
    }

    #[test]
    fn test_json_table() {
        let json = r#"[
            {"effective_date": "2022-01-01", "statutory": "0.02", "commercial": "0.08"},
            {"effective_date": "2023-01-01", "statutory": "0.04", "commercial": "0.105"}
        ]"#;
        let table = RateTable::from_json(json).unwrap();
        assert_eq!(table.entries().len(), 2);
        assert_eq!(table.rate_for(date(2023, 5, 1), true).unwrap(), Rate::from_decimal(dec!(0.105)));

        assert!(RateTable::from_json("[]").is_err());
    }
}
