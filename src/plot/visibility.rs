use super::series::Series;

/// Shown/hidden flag per series, all shown initially.
#[derive(Debug, Clone, Default)]
pub struct VisibilityController {
    flags: Vec<(String, bool)>,
}

impl VisibilityController {
    pub fn new(series: &[Series]) -> Self {
        Self {
            flags: series.iter().map(|s| (s.identity.clone(), true)).collect(),
        }
    }

    /// Flip a series' flag and return its new state, or `None` for an unknown identity.
    pub fn toggle(&mut self, identity: &str) -> Option<bool> {
        let (_, visible) = self.flags.iter_mut().find(|(id, _)| id == identity)?;
        *visible = !*visible;
        Some(*visible)
    }

    /// Unknown identities are reported as hidden.
    pub fn is_visible(&self, identity: &str) -> bool {
        self.flags
            .iter()
            .find(|(id, _)| id == identity)
            .is_some_and(|(_, visible)| *visible)
    }
}
