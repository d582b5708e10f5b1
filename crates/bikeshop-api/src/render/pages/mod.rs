//! Page contexts, one `Template` struct per page.

pub mod admin;
pub mod customer;
pub mod public;
pub mod workshop;

use bikeshop_core::types::PageResponse;
use bikeshop_entity::ticket::TicketStatus;
use bikeshop_entity::user::User;
use serde::Serialize;

/// One `<option>` of a select box.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl ToString, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            label: label.into(),
            selected,
        }
    }
}

/// Status choices with `current` preselected.
pub fn status_options(
    statuses: impl IntoIterator<Item = TicketStatus>,
    current: TicketStatus,
) -> Vec<SelectOption> {
    statuses
        .into_iter()
        .map(|s| SelectOption::new(s.as_str(), s.label(), s == current))
        .collect()
}

/// Technician picker with the assigned one preselected.
pub fn technician_options(technicians: &[User], assigned: Option<i64>) -> Vec<SelectOption> {
    technicians
        .iter()
        .map(|u| SelectOption::new(u.id, u.name.as_str(), assigned == Some(u.id)))
        .collect()
}

/// A filter or tab link.
#[derive(Debug, Clone)]
pub struct Chip {
    pub href: String,
    pub label: &'static str,
    pub active: bool,
}

/// "All" followed by one chip per ticket status.
pub fn status_chips(base: &str, current: Option<TicketStatus>) -> Vec<Chip> {
    std::iter::once(Chip {
        href: base.to_string(),
        label: "All",
        active: current.is_none(),
    })
    .chain(TicketStatus::ALL.into_iter().map(|status| Chip {
        href: format!("{base}?status={}", status.as_str()),
        label: status.label(),
        active: current == Some(status),
    }))
    .collect()
}

/// Previous/next links for a paged listing, keeping the status filter.
#[derive(Debug, Clone)]
pub struct Pager {
    pub page: u32,
    pub total_pages: i64,
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl Pager {
    pub fn new<T: Serialize>(
        page: &PageResponse<T>,
        base: &str,
        status: Option<TicketStatus>,
    ) -> Self {
        let filter = status
            .map(|s| format!("&status={}", s.as_str()))
            .unwrap_or_default();
        let link = |n: u32| format!("{base}?page={n}{filter}");
        Self {
            page: page.page,
            total_pages: page.total_pages,
            previous: page.has_previous().then(|| link(page.page - 1)),
            next: page.has_next().then(|| link(page.page + 1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use bikeshop_core::types::PageRequest;

    use super::*;

    #[test]
    fn test_status_chips_mark_current() {
        let chips = status_chips("/tickets", Some(TicketStatus::Ready));
        assert_eq!(chips.len(), TicketStatus::ALL.len() + 1);
        assert!(!chips[0].active);
        let active: Vec<_> = chips.iter().filter(|c| c.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].href, "/tickets?status=ready");
    }

    #[test]
    fn test_pager_links_keep_filter() {
        let page = PageResponse::new(vec![1, 2], PageRequest::new(2, 2), 6);
        let pager = Pager::new(&page, "/tickets", Some(TicketStatus::Diagnosing));
        assert_eq!(
            pager.previous.as_deref(),
            Some("/tickets?page=1&status=diagnosing")
        );
        assert_eq!(
            pager.next.as_deref(),
            Some("/tickets?page=3&status=diagnosing")
        );

        let single = PageResponse::new(vec![1], PageRequest::new(1, 20), 1);
        let pager = Pager::new(&single, "/tickets", None);
        assert!(pager.previous.is_none() && pager.next.is_none());
    }

    #[test]
    fn test_status_options_preselect_current() {
        let options = status_options(TicketStatus::ALL, TicketStatus::Diagnosing);
        let selected: Vec<_> = options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].value, "diagnosing");
    }
}
