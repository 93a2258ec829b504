use super::ShootList;

/// Narrows a snapshot for one request.
///
/// Filters work on a snapshot the caller already holds and produce a new
/// value; they never reach back into the cache.
pub trait Filter<T>: Send + Sync {
    fn apply(
        &self,
        snapshot: &T,
    ) -> T;
}

/// Keeps shoots created by a given identity. An empty filter keeps all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShootFilter {
    pub created_by: Option<String>,
}

impl ShootFilter {
    pub fn created_by(owner: impl Into<String>) -> Self {
        Self {
            created_by: Some(owner.into()),
        }
    }
}

impl Filter<ShootList> for ShootFilter {
    fn apply(
        &self,
        snapshot: &ShootList,
    ) -> ShootList {
        match &self.created_by {
            Some(owner) => ShootList::new(
                snapshot
                    .items
                    .iter()
                    .filter(|s| &s.created_by == owner)
                    .cloned()
                    .collect(),
            ),
            None => snapshot.clone(),
        }
    }
}
