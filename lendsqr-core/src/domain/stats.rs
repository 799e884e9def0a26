//! Dashboard statistics

use serde::{Deserialize, Serialize};

use super::user::{User, UserStatus};

/// Share of users reported as having loans, in percent.
///
/// Placeholder: records carry no loan flag, so this is a fixed fraction.
pub const LOANS_PLACEHOLDER_PERCENT: usize = 25;

/// Share of users reported as having savings, in percent (placeholder).
pub const SAVINGS_PLACEHOLDER_PERCENT: usize = 40;

/// Aggregate counts shown on the dashboard cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub active_users: usize,
    pub users_with_loans: usize,
    pub users_with_savings: usize,
}

impl DashboardStats {
    pub fn from_users(users: &[User]) -> Self {
        let total_users = users.len();
        Self {
            total_users,
            active_users: users
                .iter()
                .filter(|u| u.status == UserStatus::Active)
                .count(),
            users_with_loans: total_users * LOANS_PLACEHOLDER_PERCENT / 100,
            users_with_savings: total_users * SAVINGS_PLACEHOLDER_PERCENT / 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_with_active(total: usize, active: usize) -> Vec<User> {
        (0..total)
            .map(|i| {
                let mut user = User::new(format!("LSQ{:08}", i + 1), format!("user{}", i));
                user.status = if i < active {
                    UserStatus::Active
                } else {
                    UserStatus::Pending
                };
                user
            })
            .collect()
    }

    #[test]
    fn test_stats_for_500_users() {
        let stats = DashboardStats::from_users(&users_with_active(500, 120));
        assert_eq!(
            stats,
            DashboardStats {
                total_users: 500,
                active_users: 120,
                users_with_loans: 125,
                users_with_savings: 200,
            }
        );
    }

    #[test]
    fn test_placeholder_fractions_round_down() {
        let stats = DashboardStats::from_users(&users_with_active(7, 0));
        assert_eq!(stats.users_with_loans, 1);
        assert_eq!(stats.users_with_savings, 2);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(DashboardStats::from_users(&[]), DashboardStats::default());
    }

    #[test]
    fn test_json_keys_are_camel_case() {
        let value = serde_json::to_value(DashboardStats::default()).unwrap();
        assert!(value.get("usersWithLoans").is_some());
        assert!(value.get("totalUsers").is_some());
    }
}
