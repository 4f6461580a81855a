//! Card location: the container an article link sits in.
//!
//! Listing pages wrap each article in some block (`<div class="card">`,
//! `<li>`, `<article>`) that also holds its date and teaser. Markup differs
//! per site, so the card is found by content rather than by class name.

use crate::dates;
use crate::dom::TreeNode;

/// Find the "card" an anchor belongs to.
///
/// Walks from the anchor upward, at most `max_depth` nodes, and returns the
/// first one whose text contains a date. Containment in a common ancestor is
/// a steadier signal than looking at preceding siblings, whose layout varies
/// from card to card. Without a dated ancestor the anchor's parent is used,
/// or the anchor itself at the root.
///
/// # Arguments
///
/// * `anchor` - The article link
/// * `max_depth` - Number of nodes, the anchor included, examined on the way up
///
/// # Returns
///
/// The card node; never fails.
pub fn find_card<N: TreeNode>(anchor: &N, max_depth: usize) -> N {
    let mut node = Some(anchor.clone());
    for _ in 0..max_depth {
        let Some(current) = node else { break };
        if dates::contains_date(&current.flat_text()) {
            return current;
        }
        node = current.parent_node();
    }
    anchor.parent_node().unwrap_or_else(|| anchor.clone())
}
