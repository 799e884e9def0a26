//! Mock user data generator
//!
//! Produces synthetic Nigerian lending-platform customers for the mock
//! server and the `db.json` dataset. Output is deterministic for a seed.

use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::result::Result;
use crate::domain::{BankDetails, Guarantor, User, UserStatus};

/// Number of users in the default dataset
pub const DEFAULT_USER_COUNT: usize = 500;

const FIRST_NAMES: &[&str] = &[
    "Adebayo", "Chioma", "Oluwaseun", "Fatima", "Ibrahim", "Ngozi", "Emeka", "Aminat",
    "Chukwudi", "Blessing", "Adeola", "Chiamaka", "Tunde", "Zainab", "Ifeanyi", "Grace",
    "Segun", "Hauwa", "Chinedu", "Funmilayo", "Babatunde", "Amaka", "Kunle", "Aisha",
    "Obinna", "Nneka", "Femi", "Khadija", "Ikechukwu", "Josephine", "Adeyemi", "Chidinma",
    "Yusuf", "Shade", "Chidi", "Victoria", "Olu", "Maryam", "Uche", "Deborah", "Tosin",
    "Folake", "Ahmed", "Joy", "Kemi", "Bukola", "Lanre", "Hassana", "Nnamdi", "Patience",
];

const LAST_NAMES: &[&str] = &[
    "Adeyemi", "Okafor", "Ibrahim", "Musa", "Olowo", "Nwosu", "Bello", "Okonkwo",
    "Mohammed", "Adebayo", "Eze", "Yusuf", "Obi", "Hassan", "Okoro", "Aliyu", "Chukwu",
    "Suleiman", "Ojo", "Abubakar", "Nwankwo", "Abdullahi", "Chukwuma", "Usman", "Ike",
    "Garba", "Okoye", "Bashir", "Onyeka", "Lawal", "Chibueze", "Ismail", "Nwachukwu",
    "Bala", "Nnamdi", "Sani", "Onyebuchi", "Mustapha", "Emeka", "Audu", "Ifeanyi", "Umar",
    "Ogbonna", "Ezeh", "Dauda", "Sadiq", "Udoka", "Tanko",
];

pub const ORGANIZATIONS: &[&str] = &["Lendsqr", "Irorun", "Lendstar"];

const EDUCATION_LEVELS: &[&str] = &["SSCE", "OND", "HND", "B.Sc", "M.Sc", "Ph.D"];

const EMPLOYMENT_STATUSES: &[&str] = &["Employed", "Self-employed", "Unemployed"];

const EMPLOYMENT_SECTORS: &[&str] = &[
    "FinTech", "Education", "Healthcare", "Technology", "Agriculture", "Manufacturing",
    "Retail", "Entertainment", "Real Estate", "Transportation",
];

const BANKS: &[&str] = &[
    "Access Bank", "GTBank", "First Bank", "UBA", "Zenith Bank", "Providus Bank",
    "Wema Bank", "Fidelity Bank", "Union Bank", "Sterling Bank", "Stanbic IBTC",
    "Polaris Bank",
];

const MARITAL_STATUSES: &[&str] = &["Single", "Married", "Divorced", "Widowed"];

const RESIDENCE_TYPES: &[&str] = &[
    "Parent's Apartment",
    "Own Apartment",
    "Rented Apartment",
    "Company Accommodation",
];

const GENDERS: &[&str] = &["Male", "Female"];

const RELATIONSHIPS: &[&str] = &[
    "Father", "Mother", "Brother", "Sister", "Uncle", "Aunt", "Cousin", "Friend", "Colleague",
];

const EMAIL_DOMAINS: &[&str] = &["gmail", "yahoo", "outlook"];

const PHONE_PREFIXES: &[&str] = &[
    "0803", "0806", "0810", "0813", "0814", "0816", "0903", "0906", "0913",
];

/// On-disk dataset layout served by the JSON server
#[derive(Debug, Serialize, Deserialize)]
pub struct Dataset {
    pub users: Vec<User>,
}

fn pick(rng: &mut StdRng, items: &[&'static str]) -> &'static str {
    items[rng.gen_range(0..items.len())]
}

fn phone_number(rng: &mut StdRng) -> String {
    format!("{}{:07}", pick(rng, PHONE_PREFIXES), rng.gen_range(0..10_000_000u32))
}

/// Random join timestamp between `start_year` and `end_year` inclusive
fn join_date(rng: &mut StdRng, start_year: i32, end_year: i32) -> String {
    let date = NaiveDate::from_ymd_opt(
        rng.gen_range(start_year..=end_year),
        rng.gen_range(1..=12),
        rng.gen_range(1..=28),
    )
    .unwrap_or_default();
    let time = NaiveTime::from_hms_opt(rng.gen_range(0..24), rng.gen_range(0..60), 0)
        .unwrap_or_default();
    date.and_time(time)
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Insert thousands separators into a string of ASCII digits
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format an amount as naira with two decimals, e.g. "₦1,250,000.00"
pub fn format_naira(amount: Decimal) -> String {
    let rendered = format!("{:.2}", amount.round_dp(2));
    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "00"));
    format!("{}₦{}.{}", sign, group_thousands(whole), fraction)
}

/// Format a whole naira amount without decimals, e.g. "₦200,000"
fn format_naira_whole(amount: u64) -> String {
    format!("₦{}", group_thousands(&amount.to_string()))
}

fn generate_user(rng: &mut StdRng, index: usize) -> User {
    let first_name = pick(rng, FIRST_NAMES);
    let last_name = pick(rng, LAST_NAMES);
    let first_lower = first_name.to_lowercase();
    let last_lower = last_name.to_lowercase();
    let full_name = format!("{} {}", first_name, last_name);
    let username = format!("{}{}", first_lower, index);
    let email = format!("{}@{}.com", username, pick(rng, EMAIL_DOMAINS));

    let min_income = rng.gen_range(50_000..350_000u64);
    let max_income = min_income + rng.gen_range(100_000..500_000u64);
    let loan_repayment = rng.gen_range(10_000..90_000u64);
    let balance = Decimal::from(rng.gen_range(0..5_000_000u64));

    let guarantor_first = pick(rng, FIRST_NAMES);
    let guarantor_last = pick(rng, LAST_NAMES);

    let mut user = User::new(format!("LSQ{:08}", index), username);
    user.organization = pick(rng, ORGANIZATIONS).to_string();
    user.email = email;
    user.phone_number = phone_number(rng);
    user.date_joined = join_date(rng, 2019, 2023);
    user.status = UserStatus::ALL[rng.gen_range(0..UserStatus::ALL.len())];
    user.bvn = rng.gen_range(10_000_000_000u64..100_000_000_000).to_string();
    user.gender = pick(rng, GENDERS).to_string();
    user.marital_status = pick(rng, MARITAL_STATUSES).to_string();
    user.children = rng.gen_range(0..6u8).to_string();
    user.type_of_residence = pick(rng, RESIDENCE_TYPES).to_string();
    user.level_of_education = pick(rng, EDUCATION_LEVELS).to_string();
    user.employment_status = pick(rng, EMPLOYMENT_STATUSES).to_string();
    user.sector_of_employment = pick(rng, EMPLOYMENT_SECTORS).to_string();
    user.duration_of_employment = format!("{} years", rng.gen_range(1..=15u8));
    user.office_email = format!("{}.{}@company.com", first_lower, last_lower);
    user.monthly_income = format!(
        "{} - {}",
        format_naira_whole(min_income),
        format_naira_whole(max_income)
    );
    user.loan_repayment = loan_repayment.to_string();
    user.twitter = format!("@{}_{}", first_lower, last_lower);
    user.facebook = full_name.clone();
    user.instagram = format!("@{}.{}", first_lower, last_lower);
    user.full_name = full_name;
    user.guarantor = Guarantor {
        full_name: format!("{} {}", guarantor_first, guarantor_last),
        phone_number: phone_number(rng),
        email: format!("{}{}@gmail.com", guarantor_first.to_lowercase(), index),
        relationship: pick(rng, RELATIONSHIPS).to_string(),
    };
    user.bank = BankDetails {
        balance: format_naira(balance),
        account_number: format!("{:010}", rng.gen_range(0..10_000_000_000u64)),
        bank_name: pick(rng, BANKS).to_string(),
    };
    user
}

/// Generate `count` users with ids `LSQ00000001`..; same seed, same data
pub fn generate_users(count: usize, seed: u64) -> Vec<User> {
    let mut rng = StdRng::seed_from_u64(seed);
    (1..=count).map(|i| generate_user(&mut rng, i)).collect()
}

/// Write users as `{"users": [...]}`, the JSON server's database format
pub fn write_dataset(path: &Path, users: Vec<User>) -> Result<()> {
    let content = serde_json::to_string_pretty(&Dataset { users })?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Read a dataset previously written by `write_dataset`
pub fn read_dataset(path: &Path) -> Result<Vec<User>> {
    let content = std::fs::read_to_string(path)?;
    let dataset: Dataset = serde_json::from_str(&content)?;
    Ok(dataset.users)
}
