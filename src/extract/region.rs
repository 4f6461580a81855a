//! Scoping a scan to one section of a multi-section listing page.

use crate::dom::TreeNode;
use serde::Deserialize;

/// Heading markers bounding the part of a page worth scanning.
///
/// A heading opens the region when its text *contains* a start marker; the
/// region closes at the next heading whose text *equals* a stop marker. Both
/// comparisons ignore case.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Region {
    #[serde(default)]
    pub start: Vec<String>,
    #[serde(default)]
    pub stop: Vec<String>,
}

impl Region {
    fn opens(&self, heading: &str) -> bool {
        let text = heading.to_lowercase();
        self.start
            .iter()
            .any(|m| !m.trim().is_empty() && text.contains(&m.trim().to_lowercase()))
    }

    fn closes(&self, heading: &str) -> bool {
        let text = heading.trim().to_lowercase();
        self.stop.iter().any(|m| m.trim().to_lowercase() == text)
    }
}

/// Keep only the nodes strictly between the start heading and the next stop
/// heading. `nodes` must be the whole document in document order.
///
/// Without a start heading everything before the first stop heading is kept,
/// so a page whose section title changed still yields its leading articles.
/// Without a stop heading the region runs to the end of the document.
pub fn restrict<N: TreeNode>(nodes: Vec<N>, region: &Region) -> Vec<N> {
    let start = nodes
        .iter()
        .position(|n| n.is_heading() && region.opens(&n.flat_text()));
    let from = start.map_or(0, |i| i + 1);
    let stop = nodes[from..]
        .iter()
        .position(|n| n.is_heading() && region.closes(&n.flat_text()))
        .map(|i| i + from);

    match (start, stop) {
        (None, None) => tracing::debug!("No region headings found; scanning whole document"),
        (None, Some(_)) => tracing::debug!("No start heading found; scanning up to first stop heading"),
        _ => {}
    }

    let end = stop.unwrap_or(nodes.len());
    nodes.into_iter().take(end).skip(from).collect()
}
