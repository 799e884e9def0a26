//! User record domain model
//!
//! Mirrors the flat camelCase JSON object served by the users endpoint.
//! Guarantor and bank fields are grouped into flattened sub-records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::result::Error;

/// Account status of a platform user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UserStatus {
    Active,
    Inactive,
    Pending,
    Blacklisted,
}

impl UserStatus {
    pub const ALL: [UserStatus; 4] = [
        UserStatus::Active,
        UserStatus::Inactive,
        UserStatus::Pending,
        UserStatus::Blacklisted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
            UserStatus::Pending => "Pending",
            UserStatus::Blacklisted => "Blacklisted",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = Error;

    /// Case-insensitive parse ("blacklisted" == "Blacklisted")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::validation(format!("Unknown user status: {}", s)))
    }
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Guarantor sub-record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Guarantor {
    #[serde(rename = "guarantorFullName")]
    pub full_name: String,
    #[serde(rename = "guarantorPhoneNumber")]
    pub phone_number: String,
    #[serde(rename = "guarantorEmailAddress")]
    pub email: String,
    #[serde(rename = "guarantorRelationship")]
    pub relationship: String,
}

/// Optional second guarantor, only present on some records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalGuarantor {
    #[serde(rename = "guarantorFullName2", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(rename = "guarantorPhoneNumber2", default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(rename = "guarantorEmailAddress2", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "guarantorRelationship2", default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
}

impl AdditionalGuarantor {
    /// The second guarantor as a full record, if a name was supplied
    pub fn as_guarantor(&self) -> Option<Guarantor> {
        let full_name = self.full_name.clone().filter(|n| !n.is_empty())?;
        Some(Guarantor {
            full_name,
            phone_number: self.phone_number.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            relationship: self.relationship.clone().unwrap_or_default(),
        })
    }
}

/// Bank sub-record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankDetails {
    /// Formatted currency string, e.g. "₦200,000.00"
    #[serde(rename = "accountBalance")]
    pub balance: String,
    #[serde(rename = "accountNumber")]
    pub account_number: String,
    #[serde(rename = "bankName")]
    pub bank_name: String,
}

/// A platform customer as returned by the users API
///
/// Only `id` and `status` are required; missing free-form fields read as blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    /// ISO-8601 timestamp
    #[serde(default)]
    pub date_joined: String,
    pub status: UserStatus,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub bvn: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub marital_status: String,
    #[serde(default)]
    pub children: String,
    #[serde(default)]
    pub type_of_residence: String,
    #[serde(default)]
    pub level_of_education: String,
    #[serde(default)]
    pub employment_status: String,
    #[serde(default)]
    pub sector_of_employment: String,
    #[serde(default)]
    pub duration_of_employment: String,
    #[serde(default)]
    pub office_email: String,
    #[serde(default)]
    pub monthly_income: String,
    #[serde(default)]
    pub loan_repayment: String,
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub facebook: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(flatten)]
    pub guarantor: Guarantor,
    #[serde(flatten)]
    pub additional_guarantor: AdditionalGuarantor,
    #[serde(flatten)]
    pub bank: BankDetails,
}

/// Tier shown on the detail card (filled stars out of `USER_TIER_MAX`)
pub const USER_TIER: u8 = 1;
pub const USER_TIER_MAX: u8 = 3;

impl User {
    /// Create a user with the given id and username; every other field is blank
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            organization: String::new(),
            username: username.into(),
            email: String::new(),
            phone_number: String::new(),
            date_joined: String::new(),
            status: UserStatus::Active,
            full_name: String::new(),
            bvn: String::new(),
            gender: String::new(),
            marital_status: String::new(),
            children: String::new(),
            type_of_residence: String::new(),
            level_of_education: String::new(),
            employment_status: String::new(),
            sector_of_employment: String::new(),
            duration_of_employment: String::new(),
            office_email: String::new(),
            monthly_income: String::new(),
            loan_repayment: String::new(),
            twitter: String::new(),
            facebook: String::new(),
            instagram: String::new(),
            guarantor: Guarantor::default(),
            additional_guarantor: AdditionalGuarantor::default(),
            bank: BankDetails::default(),
        }
    }

    /// Identifier as displayed on the detail page.
    ///
    /// Legacy `user-N` ids are rendered as `LSQ` + zero-padded number;
    /// ids that already carry the `LSQ` prefix are shown unchanged.
    pub fn display_id(&self) -> String {
        if self.id.starts_with("LSQ") {
            return self.id.clone();
        }
        let numeric = self.id.trim_start_matches("user-");
        format!("LSQ{:0>5}", numeric)
    }

    /// Star tier as (filled, total). Placeholder: every user is tier 1.
    pub fn tier(&self) -> (u8, u8) {
        (USER_TIER, USER_TIER_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": "LSQ00000001",
        "organization": "Lendsqr",
        "username": "adebayo1",
        "email": "adebayo1@gmail.com",
        "phoneNumber": "08031234567",
        "dateJoined": "2020-05-15T10:00:00.000Z",
        "status": "Blacklisted",
        "fullName": "Adebayo Okafor",
        "bvn": "12345678901",
        "gender": "Male",
        "maritalStatus": "Single",
        "children": "2",
        "typeOfResidence": "Own Apartment",
        "levelOfEducation": "B.Sc",
        "employmentStatus": "Employed",
        "sectorOfEmployment": "FinTech",
        "durationOfEmployment": "3 years",
        "officeEmail": "adebayo.okafor@company.com",
        "monthlyIncome": "₦200,000 - ₦400,000",
        "loanRepayment": "40000",
        "twitter": "@adebayo_okafor",
        "facebook": "Adebayo Okafor",
        "instagram": "@adebayo.okafor",
        "guarantorFullName": "Chioma Bello",
        "guarantorPhoneNumber": "08061234567",
        "guarantorEmailAddress": "chioma1@gmail.com",
        "guarantorRelationship": "Sister",
        "accountBalance": "₦1,250,000.00",
        "accountNumber": "0123456789",
        "bankName": "GTBank"
    }"#;

    #[test]
    fn test_deserialize_flat_record() {
        let user: User = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(user.id, "LSQ00000001");
        assert_eq!(user.status, UserStatus::Blacklisted);
        assert_eq!(user.guarantor.full_name, "Chioma Bello");
        assert_eq!(user.guarantor.relationship, "Sister");
        assert_eq!(user.bank.bank_name, "GTBank");
        assert_eq!(user.bank.balance, "₦1,250,000.00");
        assert!(user.additional_guarantor.as_guarantor().is_none());
    }

    #[test]
    fn test_serialize_keeps_wire_names() {
        let user: User = serde_json::from_str(SAMPLE).unwrap();
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["phoneNumber"], "08031234567");
        assert_eq!(value["guarantorEmailAddress"], "chioma1@gmail.com");
        assert_eq!(value["accountNumber"], "0123456789");
        assert!(value.get("guarantorFullName2").is_none());
    }

    #[test]
    fn test_second_guarantor() {
        let mut value: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        value["guarantorFullName2"] = "Tunde Musa".into();
        value["guarantorRelationship2"] = "Friend".into();
        let user: User = serde_json::from_value(value).unwrap();

        let second = user.additional_guarantor.as_guarantor().unwrap();
        assert_eq!(second.full_name, "Tunde Musa");
        assert_eq!(second.relationship, "Friend");
        assert_eq!(second.phone_number, "");
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("blacklisted".parse::<UserStatus>().unwrap(), UserStatus::Blacklisted);
        assert_eq!("ACTIVE".parse::<UserStatus>().unwrap(), UserStatus::Active);
        assert!("suspended".parse::<UserStatus>().is_err());
    }

    #[test]
    fn test_list_with_lowercase_status_and_missing_fields_parses() {
        let mut sparse: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        sparse["id"] = "LSQ00000002".into();
        sparse["status"] = "active".into();
        let record = sparse.as_object_mut().unwrap();
        record.remove("twitter");
        record.remove("bankName");
        record.remove("guarantorRelationship");

        let list = format!("[{}, {}]", SAMPLE, sparse);
        let users: Vec<User> = serde_json::from_str(&list).unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[1].status, UserStatus::Active);
        assert_eq!(users[1].twitter, "");
        assert_eq!(users[1].bank.bank_name, "");
        assert_eq!(users[1].guarantor.relationship, "");
        assert_eq!(users[1].guarantor.full_name, "Chioma Bello");
    }

    #[test]
    fn test_unknown_status_rejected() {
        let mut value: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        value["status"] = "suspended".into();
        assert!(serde_json::from_value::<User>(value).is_err());
    }

    #[test]
    fn test_display_id() {
        assert_eq!(User::new("LSQ00000042", "a").display_id(), "LSQ00000042");
        assert_eq!(User::new("user-42", "a").display_id(), "LSQ00042");
    }
}
