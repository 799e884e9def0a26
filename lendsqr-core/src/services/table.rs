//! Filter/paginate view-model over a fetched user list
//!
//! Holds the full list, the active filters and the pager state. The
//! filtered view is recomputed whenever the list or the filters change, and
//! any such change sends the pager back to page 1.

use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{FilterField, User, UserFilters};

pub const DEFAULT_PER_PAGE: usize = 10;

/// Page sizes offered by the pager
pub const PER_PAGE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

/// Number of leading page links shown before the ellipsis
const LEADING_LINKS: usize = 5;

/// One slot in the pager's link row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageLink {
    Page(usize),
    Ellipsis,
}

/// "Showing X out of Y" summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Showing {
    /// 1-based index of the first row on the page (0 when empty)
    pub from: usize,
    /// 1-based index of the last row on the page (0 when empty)
    pub to: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct UserTable {
    users: Vec<User>,
    filters: UserFilters,
    filtered: Vec<usize>,
    page: usize,
    per_page: usize,
}

impl UserTable {
    pub fn new(users: Vec<User>) -> Self {
        let mut table = Self {
            users,
            filters: UserFilters::default(),
            filtered: Vec::new(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        };
        table.recompute();
        table
    }

    /// Builder-style page size, for callers that start from a config value
    pub fn with_per_page(mut self, per_page: usize) -> Result<Self> {
        self.set_per_page(per_page)?;
        Ok(self)
    }

    fn recompute(&mut self) {
        self.filtered = self
            .users
            .iter()
            .enumerate()
            .filter(|(_, user)| self.filters.matches(user))
            .map(|(i, _)| i)
            .collect();
        self.page = 1;
    }

    pub fn set_users(&mut self, users: Vec<User>) {
        self.users = users;
        self.recompute();
    }

    pub fn set_filter(&mut self, field: FilterField, value: impl Into<String>) {
        self.filters.set(field, value);
        self.recompute();
    }

    pub fn set_filters(&mut self, filters: UserFilters) {
        self.filters = filters;
        self.recompute();
    }

    pub fn reset_filters(&mut self) {
        self.set_filters(UserFilters::default());
    }

    pub fn filters(&self) -> &UserFilters {
        &self.filters
    }

    /// Change the page size and go back to page 1. Zero is rejected.
    pub fn set_per_page(&mut self, per_page: usize) -> Result<()> {
        if per_page == 0 {
            return Err(Error::validation("page size must be at least 1"));
        }
        self.per_page = per_page;
        self.page = 1;
        Ok(())
    }

    /// Jump to a page, clamped into `1..=max(total_pages, 1)`
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Ceiling of filtered count over page size; 0 for an empty view
    pub fn total_pages(&self) -> usize {
        self.filtered.len().div_ceil(self.per_page)
    }

    pub fn total_users(&self) -> usize {
        self.users.len()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn filtered(&self) -> Vec<&User> {
        self.filtered.iter().map(|&i| &self.users[i]).collect()
    }

    /// Rows `[(page-1)*size, page*size)` of the filtered view
    pub fn page_items(&self) -> Vec<&User> {
        let start = (self.page - 1) * self.per_page;
        self.filtered
            .iter()
            .skip(start)
            .take(self.per_page)
            .map(|&i| &self.users[i])
            .collect()
    }

    /// Pager links: every page when few, else the first five, an
    /// ellipsis and the last page
    pub fn page_links(&self) -> Vec<PageLink> {
        let total = self.total_pages();
        if total <= LEADING_LINKS + 1 {
            return (1..=total).map(PageLink::Page).collect();
        }
        let mut links: Vec<PageLink> = (1..=LEADING_LINKS).map(PageLink::Page).collect();
        links.push(PageLink::Ellipsis);
        links.push(PageLink::Page(total));
        links
    }

    pub fn showing(&self) -> Showing {
        let total = self.filtered.len();
        let shown = self.page_items().len();
        if shown == 0 {
            return Showing { from: 0, to: 0, total };
        }
        let from = (self.page - 1) * self.per_page + 1;
        Showing {
            from,
            to: from + shown - 1,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserStatus;

    fn users(n: usize) -> Vec<User> {
        (1..=n)
            .map(|i| {
                let mut user = User::new(format!("LSQ{:08}", i), format!("user{}", i));
                user.organization = if i % 2 == 0 { "Lendsqr" } else { "Irorun" }.to_string();
                user.status = UserStatus::ALL[i % UserStatus::ALL.len()];
                user
            })
            .collect()
    }

    #[test]
    fn test_23_records_paginate() {
        let mut table = UserTable::new(users(23));
        assert_eq!(table.total_pages(), 3);

        table.set_page(3);
        assert_eq!(table.page_items().len(), 3);
        assert_eq!(table.page_items()[0].id, "LSQ00000021");

        table.set_per_page(25).unwrap();
        assert_eq!(table.current_page(), 1);
        assert_eq!(table.total_pages(), 1);
        assert_eq!(table.page_items().len(), 23);
    }

    #[test]
    fn test_status_filter_any_case_resets_page() {
        let all = users(40);
        let mut table = UserTable::new(all.clone());
        table.set_page(3);

        table.set_filter(FilterField::Status, "bLaCkLiStEd");
        assert_eq!(table.current_page(), 1);

        let expected: Vec<&str> = all
            .iter()
            .filter(|u| u.status == UserStatus::Blacklisted)
            .map(|u| u.id.as_str())
            .collect();
        let got: Vec<&str> = table.filtered().iter().map(|u| u.id.as_str()).collect();
        assert_eq!(got, expected);
        assert_eq!(got.len(), 10);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let mut table = UserTable::new(users(40));
        table.set_filter(FilterField::Organization, "lendsqr");
        table.set_filter(FilterField::Status, "active");

        assert!(table
            .filtered()
            .iter()
            .all(|u| u.organization == "Lendsqr" && u.status == UserStatus::Active));
        assert_eq!(table.filtered_count(), 10);

        table.reset_filters();
        assert_eq!(table.filtered_count(), 40);
    }

    #[test]
    fn test_set_users_resets_page() {
        let mut table = UserTable::new(users(30));
        table.set_page(2);
        table.set_users(users(12));
        assert_eq!(table.current_page(), 1);
        assert_eq!(table.total_pages(), 2);
    }

    #[test]
    fn test_empty_view() {
        let mut table = UserTable::new(users(5));
        table.set_filter(FilterField::Username, "nobody");

        assert_eq!(table.total_pages(), 0);
        assert!(table.page_items().is_empty());
        assert!(table.page_links().is_empty());
        assert_eq!(table.showing(), Showing { from: 0, to: 0, total: 0 });

        table.next_page();
        assert_eq!(table.current_page(), 1);
    }

    #[test]
    fn test_page_navigation_clamps() {
        let mut table = UserTable::new(users(23));
        table.prev_page();
        assert_eq!(table.current_page(), 1);

        table.set_page(99);
        assert_eq!(table.current_page(), 3);
        table.next_page();
        assert_eq!(table.current_page(), 3);
        table.prev_page();
        assert_eq!(table.current_page(), 2);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut table = UserTable::new(users(3));
        assert!(table.set_per_page(0).is_err());
        assert_eq!(table.per_page(), DEFAULT_PER_PAGE);
    }

    #[test]
    fn test_page_links() {
        let table = UserTable::new(users(40));
        assert_eq!(
            table.page_links(),
            (1..=4).map(PageLink::Page).collect::<Vec<_>>()
        );

        let table = UserTable::new(users(500));
        assert_eq!(
            table.page_links(),
            vec![
                PageLink::Page(1),
                PageLink::Page(2),
                PageLink::Page(3),
                PageLink::Page(4),
                PageLink::Page(5),
                PageLink::Ellipsis,
                PageLink::Page(50),
            ]
        );
    }

    #[test]
    fn test_showing() {
        let mut table = UserTable::new(users(23));
        assert_eq!(table.showing(), Showing { from: 1, to: 10, total: 23 });
        table.set_page(3);
        assert_eq!(table.showing(), Showing { from: 21, to: 23, total: 23 });
    }
}
