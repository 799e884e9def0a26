//! Per-field filters for the users table

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::result::Error;
use super::user::User;

/// A filterable column of the users table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Organization,
    Username,
    Email,
    PhoneNumber,
    Status,
    Date,
}

impl FilterField {
    pub const ALL: [FilterField; 6] = [
        FilterField::Organization,
        FilterField::Username,
        FilterField::Email,
        FilterField::PhoneNumber,
        FilterField::Status,
        FilterField::Date,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Organization => "organization",
            FilterField::Username => "username",
            FilterField::Email => "email",
            FilterField::PhoneNumber => "phoneNumber",
            FilterField::Status => "status",
            FilterField::Date => "date",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "organization" => Ok(FilterField::Organization),
            "username" => Ok(FilterField::Username),
            "email" => Ok(FilterField::Email),
            "phone" | "phoneNumber" | "phone_number" => Ok(FilterField::PhoneNumber),
            "status" => Ok(FilterField::Status),
            "date" | "dateJoined" => Ok(FilterField::Date),
            other => Err(Error::validation(format!("Unknown filter field: {}", other))),
        }
    }
}

/// Filter values keyed by column. An empty string means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilters {
    pub organization: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub status: String,
    /// Date prefix matched against `dateJoined`, e.g. "2021-03-04"
    pub date: String,
}

impl UserFilters {
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Organization => &self.organization,
            FilterField::Username => &self.username,
            FilterField::Email => &self.email,
            FilterField::PhoneNumber => &self.phone_number,
            FilterField::Status => &self.status,
            FilterField::Date => &self.date,
        }
    }

    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let slot = match field {
            FilterField::Organization => &mut self.organization,
            FilterField::Username => &mut self.username,
            FilterField::Email => &mut self.email,
            FilterField::PhoneNumber => &mut self.phone_number,
            FilterField::Status => &mut self.status,
            FilterField::Date => &mut self.date,
        };
        *slot = value.into();
    }

    /// True when no field carries a constraint
    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    /// Fields that currently carry a constraint
    pub fn active(&self) -> Vec<(FilterField, &str)> {
        FilterField::ALL
            .iter()
            .filter_map(|f| {
                let value = self.get(*f);
                (!value.is_empty()).then_some((*f, value))
            })
            .collect()
    }

    /// Whether a user passes every non-empty filter
    pub fn matches(&self, user: &User) -> bool {
        contains_ignore_case(&user.organization, &self.organization)
            && contains_ignore_case(&user.username, &self.username)
            && contains_ignore_case(&user.email, &self.email)
            && (self.phone_number.is_empty() || user.phone_number.contains(&self.phone_number))
            && (self.status.is_empty() || user.status.as_str().to_lowercase() == self.status.to_lowercase())
            && (self.date.is_empty() || user.date_joined.starts_with(&self.date))
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserStatus;

    fn user() -> User {
        let mut user = User::new("LSQ00000001", "adebayo1");
        user.organization = "Lendsqr".to_string();
        user.email = "Adebayo1@Gmail.com".to_string();
        user.phone_number = "08031234567".to_string();
        user.status = UserStatus::Blacklisted;
        user.date_joined = "2021-03-04T14:30:00.000Z".to_string();
        user
    }

    #[test]
    fn test_empty_filters_match_everything() {
        assert!(UserFilters::default().matches(&user()));
        assert!(UserFilters::default().is_empty());
    }

    #[test]
    fn test_text_fields_are_case_insensitive_substrings() {
        let mut filters = UserFilters::default();
        filters.set(FilterField::Organization, "LENDS");
        filters.set(FilterField::Email, "gmail");
        filters.set(FilterField::Username, "BAYO");
        assert!(filters.matches(&user()));

        filters.set(FilterField::Organization, "Irorun");
        assert!(!filters.matches(&user()));
    }

    #[test]
    fn test_status_requires_exact_match() {
        let mut filters = UserFilters::default();
        filters.set(FilterField::Status, "blacklisted");
        assert!(filters.matches(&user()));

        filters.set(FilterField::Status, "black");
        assert!(!filters.matches(&user()));
    }

    #[test]
    fn test_phone_is_plain_substring() {
        let mut filters = UserFilters::default();
        filters.set(FilterField::PhoneNumber, "1234");
        assert!(filters.matches(&user()));
        filters.set(FilterField::PhoneNumber, "0806");
        assert!(!filters.matches(&user()));
    }

    #[test]
    fn test_date_is_prefix_match() {
        let mut filters = UserFilters::default();
        filters.set(FilterField::Date, "2021-03-04");
        assert!(filters.matches(&user()));

        filters.set(FilterField::Date, "03-04");
        assert!(!filters.matches(&user()));
    }

    #[test]
    fn test_active_lists_constrained_fields() {
        let mut filters = UserFilters::default();
        filters.set(FilterField::Status, "Active");
        assert_eq!(filters.active(), vec![(FilterField::Status, "Active")]);
    }

    #[test]
    fn test_field_parse() {
        assert_eq!("phone".parse::<FilterField>().unwrap(), FilterField::PhoneNumber);
        assert!("bvn".parse::<FilterField>().is_err());
    }
}
