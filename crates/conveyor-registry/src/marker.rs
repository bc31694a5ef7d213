use std::collections::BTreeSet;
use std::fmt;

/// A capability identifier a component can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Marker(&'static str);

impl Marker {
  pub const fn new(id: &'static str) -> Self {
    Self(id)
  }

  pub fn id(&self) -> &'static str {
    self.0
  }
}

impl fmt::Display for Marker {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.0)
  }
}

/// The set of capability markers a component satisfies.
///
/// A set holds markers declared directly plus nested sets the component
/// inherits (the stand-in for capabilities exposed through implemented
/// interfaces). Membership checks walk the whole tree, so a marker reachable
/// through several paths counts as a single satisfied requirement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapabilitySet {
  direct: Vec<Marker>,
  inherited: Vec<CapabilitySet>,
}

impl CapabilitySet {
  pub fn new() -> Self {
    Self::default()
  }

  /// A set of directly declared markers.
  pub fn of(markers: &[Marker]) -> Self {
    Self {
      direct: markers.to_vec(),
      inherited: Vec::new(),
    }
  }

  pub fn with_marker(mut self, marker: Marker) -> Self {
    self.direct.push(marker);
    self
  }

  /// Inherit every marker another capability set exposes.
  pub fn with_set(mut self, set: CapabilitySet) -> Self {
    self.inherited.push(set);
    self
  }

  /// Whether the marker is declared anywhere in this set, transitively.
  pub fn contains(&self, marker: &Marker) -> bool {
    self.direct.contains(marker) || self.inherited.iter().any(|set| set.contains(marker))
  }

  /// The deduplicated union of all markers, direct and inherited.
  pub fn markers(&self) -> BTreeSet<Marker> {
    let mut union: BTreeSet<Marker> = self.direct.iter().copied().collect();
    for set in &self.inherited {
      union.extend(set.markers());
    }
    union
  }

  pub fn is_empty(&self) -> bool {
    self.direct.is_empty() && self.inherited.iter().all(CapabilitySet::is_empty)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const HANDLER: Marker = Marker::new("test.handler");
  const CODEC: Marker = Marker::new("test.codec");
  const QUEUE_AWARE: Marker = Marker::new("test.queue-aware");

  #[test]
  fn test_contains_walks_inherited_sets() {
    let base = CapabilitySet::of(&[HANDLER]);
    let set = CapabilitySet::of(&[QUEUE_AWARE]).with_set(base);

    assert!(set.contains(&HANDLER));
    assert!(set.contains(&QUEUE_AWARE));
    assert!(!set.contains(&CODEC));
  }

  #[test]
  fn test_union_deduplicates_markers_declared_on_multiple_paths() {
    // HANDLER is declared directly and again through an inherited set.
    let inherited = CapabilitySet::of(&[HANDLER, CODEC]);
    let set = CapabilitySet::of(&[HANDLER]).with_set(inherited);

    let markers = set.markers();
    assert_eq!(markers.len(), 2);
    assert!(markers.contains(&HANDLER));
    assert!(markers.contains(&CODEC));
  }

  #[test]
  fn test_empty_set_contains_nothing() {
    let set = CapabilitySet::new();
    assert!(set.is_empty());
    assert!(!set.contains(&HANDLER));
  }
}
