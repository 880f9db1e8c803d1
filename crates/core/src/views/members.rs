//! Member list filtering and sorting

use feruca::Collator;

use crate::models::Member;
use crate::store::{MemberViewState, SortBy, StatusFilter};

/// Members matching `filter`, ordered by `sort_by`.
///
/// Names compare by Unicode collation (case and accents are minor
/// differences, so "alice" < "Alice" < "bob" < "Émile" < "Zoe"). Task counts
/// sort descending, statuses by tag. The sort is stable: members with equal
/// keys keep their collection order.
pub fn filter_members(members: &[Member], filter: StatusFilter, sort_by: SortBy) -> Vec<&Member> {
    let mut list: Vec<&Member> = members.iter().filter(|m| filter.matches(m.status)).collect();
    match sort_by {
        SortBy::Name => {
            let mut collator = Collator::default();
            list.sort_by(|a, b| collator.collate(a.name.as_str(), b.name.as_str()));
        }
        SortBy::Tasks => list.sort_by(|a, b| b.tasks_count.cmp(&a.tasks_count)),
        SortBy::Status => list.sort_by(|a, b| a.status.as_str().cmp(b.status.as_str())),
    }
    list
}

/// Member list as configured by the stored view settings
pub fn member_list(members: &[Member], view: MemberViewState) -> Vec<&Member> {
    filter_members(members, view.status_filter, view.sort_by)
}
