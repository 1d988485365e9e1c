use crate::core::models::probe::Probe;
use crate::core::models::sphere::Sphere;
use nalgebra::Point3;

/// What happened to a candidate offered to [`ProbeSet::weed_insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeedOutcome {
    /// Appended as a new probe at this index.
    Inserted(usize),
    /// Outranked every probe within the weed distance. The first of them was
    /// overwritten at `index`; the other `retired` ones were removed.
    Replaced { index: usize, retired: usize },
    /// Lost to the probe at this index.
    Dropped(usize),
}

impl WeedOutcome {
    /// Whether the probe set changed.
    #[inline]
    pub fn changed(&self) -> bool {
        !matches!(self, WeedOutcome::Dropped(_))
    }

    /// Probes removed from the set by this outcome.
    #[inline]
    pub fn retired(&self) -> usize {
        match self {
            WeedOutcome::Replaced { retired, .. } => *retired,
            _ => 0,
        }
    }
}

/// The probes accepted so far in one detection run.
///
/// Removed probes leave an empty slot behind, so an index stays valid for the
/// lifetime of the set and never refers to a different probe.
#[derive(Debug, Clone)]
pub struct ProbeSet {
    slots: Vec<Option<Probe>>,
    live: usize,
    weed_distance_sq: f64,
}

impl ProbeSet {
    pub fn new(weed_distance_sq: f64) -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
            weed_distance_sq,
        }
    }

    /// Number of live probes.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Probe> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Live probes with their stable indices, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Probe)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|p| (i, p)))
    }

    /// Live probes in index order.
    pub fn probes(&self) -> impl Iterator<Item = &Probe> + '_ {
        self.slots.iter().flatten()
    }

    /// Offers a candidate probe, deduplicating against the existing set.
    ///
    /// Every live probe closer than the weed distance is a rival. Without
    /// rivals the candidate is appended. It takes the slot of the first rival
    /// only when its burial count is strictly higher than that of every rival;
    /// the remaining rivals are then removed. Otherwise the candidate is dropped.
    pub fn weed_insert(
        &mut self,
        center: Point3<f64>,
        burial_count: usize,
        radius: f64,
        layer: usize,
    ) -> WeedOutcome {
        let rivals: Vec<usize> = self
            .iter()
            .filter(|(_, p)| p.sphere.distance_squared_to(&center) < self.weed_distance_sq)
            .map(|(i, _)| i)
            .collect();

        let Some(&first) = rivals.first() else {
            self.slots
                .push(Some(Probe::new(center, radius, burial_count, layer)));
            self.live += 1;
            return WeedOutcome::Inserted(self.slots.len() - 1);
        };

        if let Some(&winner) = rivals.iter().find(|&&i| {
            self.get(i)
                .is_some_and(|p| p.burial_count >= burial_count)
        }) {
            return WeedOutcome::Dropped(winner);
        }

        self.slots[first] = Some(Probe::new(center, radius, burial_count, layer));
        for &loser in &rivals[1..] {
            self.slots[loser] = None;
        }
        let retired = rivals.len() - 1;
        self.live -= retired;
        WeedOutcome::Replaced {
            index: first,
            retired,
        }
    }

    /// Whether any live probe other than those in `exclude` has its center
    /// closer than `distance` to `point`.
    pub fn any_within(&self, point: &Point3<f64>, distance: f64, exclude: &[usize]) -> bool {
        let limit = distance * distance;
        self.iter()
            .any(|(i, p)| !exclude.contains(&i) && p.sphere.distance_squared_to(point) < limit)
    }

    /// Copies the spheres of the live probes tagged with `layer`, together with
    /// the set index of each.
    pub fn layer_snapshot(&self, layer: usize) -> (Vec<usize>, Vec<Sphere>) {
        self.iter()
            .filter(|(_, p)| p.layer == layer)
            .map(|(i, p)| (i, p.sphere))
            .unzip()
    }

    /// Live probes in index order.
    pub fn into_probes(self) -> Vec<Probe> {
        self.slots.into_iter().flatten().collect()
    }
}
