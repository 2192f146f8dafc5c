use std::collections::BTreeSet;

/// Expand/collapse state of the collapsible panels inside the deck content.
///
/// Panels are addressed by id. A panel is expanded when the baseline says so,
/// flipped once for every toggle since the baseline last changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPanels {
    all_expanded: bool,
    flipped: BTreeSet<String>,
}

impl DetailPanels {
    pub fn is_expanded(&self, id: &str) -> bool {
        self.all_expanded != self.flipped.contains(id)
    }

    /// Flips one panel. Returns its new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if !self.flipped.remove(id) {
            self.flipped.insert(id.to_string());
        }
        self.is_expanded(id)
    }

    /// Returns whether anything changed.
    pub fn expand_all(&mut self) -> bool {
        let changed = !self.all_expanded || !self.flipped.is_empty();
        self.all_expanded = true;
        self.flipped.clear();
        changed
    }

    /// Ids known to be expanded. Only meaningful before an expand-all.
    pub fn expanded_ids(&self) -> impl Iterator<Item = &str> {
        let listed = !self.all_expanded;
        self.flipped
            .iter()
            .filter(move |_| listed)
            .map(String::as_str)
    }

    pub fn all_expanded(&self) -> bool {
        self.all_expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_flips_a_single_panel() {
        let mut panels = DetailPanels::default();
        assert!(!panels.is_expanded("pricing"));

        assert!(panels.toggle("pricing"));
        assert!(panels.is_expanded("pricing"));
        assert!(!panels.is_expanded("risks"));
        assert_eq!(panels.expanded_ids().collect::<Vec<_>>(), vec!["pricing"]);

        assert!(!panels.toggle("pricing"));
        assert!(!panels.is_expanded("pricing"));
    }

    #[test]
    fn expand_all_opens_every_panel_and_toggles_still_collapse() {
        let mut panels = DetailPanels::default();
        panels.toggle("pricing");

        assert!(panels.expand_all());
        assert!(panels.all_expanded());
        assert!(panels.is_expanded("pricing"));
        assert!(panels.is_expanded("never-seen"));
        assert!(!panels.expand_all());

        assert!(!panels.toggle("risks"));
        assert!(!panels.is_expanded("risks"));
        assert!(panels.expand_all());
        assert!(panels.is_expanded("risks"));
    }
}
