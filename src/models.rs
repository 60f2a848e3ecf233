//! Customer record model.

use csv::StringRecord;

use crate::config::FIELD_COUNT;

/// One parsed data row.
///
/// Fields are kept exactly as they appear in the file. `birthday` is a date
/// in the source data but is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomerRecord {
    /// Customer id (first column)
    pub id: String,
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Company name
    pub company: String,
    /// City
    pub city: String,
    /// Country
    pub country: String,
    /// Birthday, as written in the file
    pub birthday: String,
}

impl CustomerRecord {
    /// Builds a record from a CSV row in file order
    /// (id, name, email, company, city, country, birthday).
    ///
    /// Returns `None` unless the row has exactly seven fields.
    pub fn from_row(row: &StringRecord) -> Option<Self> {
        if row.len() != FIELD_COUNT {
            return None;
        }
        Some(Self {
            id: row[0].to_string(),
            name: row[1].to_string(),
            email: row[2].to_string(),
            company: row[3].to_string(),
            city: row[4].to_string(),
            country: row[5].to_string(),
            birthday: row[6].to_string(),
        })
    }

    /// Fields in insert-statement order, which is also file order.
    pub fn fields(&self) -> [&str; FIELD_COUNT] {
        [
            self.id.as_str(),
            self.name.as_str(),
            self.email.as_str(),
            self.company.as_str(),
            self.city.as_str(),
            self.country.as_str(),
            self.birthday.as_str(),
        ]
    }
}
