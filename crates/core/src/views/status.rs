//! Status distribution

use crate::models::{Member, MemberStatus};

/// Member count per status; every status is present, absent ones are zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusDistribution {
    counts: [usize; 4],
}

impl StatusDistribution {
    pub fn count(&self, status: MemberStatus) -> usize {
        self.counts[status.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Members in any status other than offline
    pub fn active(&self) -> usize {
        self.total() - self.count(MemberStatus::Offline)
    }

    /// Share of members in `status`, in `0.0..=1.0` (zero for an empty team)
    pub fn share(&self, status: MemberStatus) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.count(status) as f64 / total as f64,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MemberStatus, usize)> + '_ {
        MemberStatus::ALL.into_iter().map(|s| (s, self.count(s)))
    }
}

pub fn status_distribution(members: &[Member]) -> StatusDistribution {
    let mut distribution = StatusDistribution::default();
    for member in members {
        distribution.counts[member.status.index()] += 1;
    }
    distribution
}
