use std::collections::BTreeSet;

pub(super) const FILTER_TRANSITION_SECS: f32 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(super) enum AuthorBucket {
    Single,
    Pair,
    Many,
}

impl AuthorBucket {
    pub(super) const ALL: [Self; 3] = [Self::Single, Self::Pair, Self::Many];

    /// Representative author count, also what the color scale is sampled at.
    pub(super) fn value(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::Pair => 2,
            Self::Many => 3,
        }
    }

    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Single => "1 author",
            Self::Pair => "2 authors",
            Self::Many => "2+ authors",
        }
    }

    pub(super) fn matches(self, author_count: u32) -> bool {
        match self {
            Self::Single => author_count == 1,
            Self::Pair => author_count == 2,
            Self::Many => author_count >= 3,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(super) struct FilterSelection {
    selected: BTreeSet<AuthorBucket>,
}

impl FilterSelection {
    /// Flips membership of `bucket`; returns whether it is selected afterwards.
    pub(super) fn toggle(&mut self, bucket: AuthorBucket) -> bool {
        if self.selected.remove(&bucket) {
            false
        } else {
            self.selected.insert(bucket);
            true
        }
    }

    pub(super) fn is_selected(&self, bucket: AuthorBucket) -> bool {
        self.selected.contains(&bucket)
    }

    pub(super) fn is_active(&self) -> bool {
        !self.selected.is_empty()
    }

    pub(super) fn selected_labels(&self) -> Vec<&'static str> {
        self.selected.iter().map(|bucket| bucket.label()).collect()
    }

    /// Whether a leaf with this author count is filtered out.
    pub(super) fn hides(&self, author_count: Option<u32>) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        match author_count {
            Some(count) => !self.selected.iter().any(|bucket| bucket.matches(count)),
            None => true,
        }
    }
}
