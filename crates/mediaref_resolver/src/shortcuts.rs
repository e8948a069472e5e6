//! Keyboard shortcut assignment for resolved samples.

use mediaref_core::{MediaKind, Sample};
use std::sync::Arc;

/// Slot digits in assignment order; `0` is the tenth key.
const SLOTS: [char; 10] = ['1', '2', '3', '4', '5', '6', '7', '8', '9', '0'];

/// Shortcut labels of the samples of one media kind.
///
/// Iteration follows assignment order, which is sample export order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShortcutTable {
    kind: Option<MediaKind>,
    entries: Vec<(String, Arc<Sample>)>,
    unassigned: Vec<Arc<Sample>>,
}

impl ShortcutTable {
    /// Kind the table was built for.
    pub fn kind(&self) -> Option<MediaKind> {
        self.kind
    }

    /// Sample bound to `label`.
    ///
    /// A custom shortcut wins over a pool label with the same text.
    pub fn get(&self, label: &str) -> Option<&Arc<Sample>> {
        self.entries
            .iter()
            .filter(|(assigned, _)| assigned == label)
            .min_by_key(|(_, sample)| sample.custom_shortcut().as_deref() != Some(label))
            .map(|(_, sample)| sample)
    }

    /// Label of `sample`, if it received one.
    pub fn label_for(&self, sample: &Sample) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, assigned)| assigned.key() == sample.key())
            .map(|(label, _)| label.as_str())
    }

    /// Labels and samples in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Sample>)> {
        self.entries
            .iter()
            .map(|(label, sample)| (label.as_str(), sample))
    }

    /// Labels in assignment order.
    pub fn labels(&self) -> Vec<&str> {
        self.iter().map(|(label, _)| label).collect()
    }

    /// Samples left without a label once the slots ran out.
    pub fn unassigned(&self) -> &[Arc<Sample>] {
        &self.unassigned
    }

    /// Number of labelled samples.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no sample got a label.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hands out `"{trigger} {digit}"` labels from a pool of ten.
///
/// # Example
///
/// ```
/// use mediaref_core::MediaKind;
/// use mediaref_resolver::SampleShortcutAssigner;
///
/// let mut assigner = SampleShortcutAssigner::new(MediaKind::Video);
/// assert_eq!(assigner.next_label().as_deref(), Some("v 1"));
/// for _ in 0..8 {
///     assigner.next_label();
/// }
/// assert_eq!(assigner.next_label().as_deref(), Some("v 0"));
/// assert_eq!(assigner.next_label(), None);
/// ```
#[derive(Debug, Clone)]
pub struct SampleShortcutAssigner {
    kind: MediaKind,
    next_slot: usize,
}

impl SampleShortcutAssigner {
    /// Fresh pool for `kind`.
    pub fn new(kind: MediaKind) -> Self {
        Self { kind, next_slot: 0 }
    }

    /// Take the next free label, or `None` once all ten are used.
    pub fn next_label(&mut self) -> Option<String> {
        let digit = SLOTS.get(self.next_slot)?;
        self.next_slot += 1;
        Some(format!("{} {}", self.kind.shortcut_trigger(), digit))
    }

    /// Label every sample whose asset is of `kind`, in the given order.
    ///
    /// Custom shortcuts are used verbatim and take no slot, so the other
    /// samples always get the full pool of ten. When a custom shortcut reads
    /// like a pool label, [`ShortcutTable::get`] resolves to the custom one.
    #[tracing::instrument(skip(samples), fields(candidates = samples.len()))]
    pub fn assign(kind: MediaKind, samples: &[Arc<Sample>]) -> ShortcutTable {
        let matching = samples
            .iter()
            .filter(|sample| *sample.asset().kind() == kind);

        let mut assigner = Self::new(kind);
        let mut table = ShortcutTable {
            kind: Some(kind),
            ..Default::default()
        };
        for sample in matching {
            if let Some(shortcut) = sample.custom_shortcut() {
                table.entries.push((shortcut.clone(), Arc::clone(sample)));
                continue;
            }
            match assigner.next_label() {
                Some(label) => table.entries.push((label, Arc::clone(sample))),
                None => table.unassigned.push(Arc::clone(sample)),
            }
        }

        tracing::debug!(
            assigned = table.len(),
            unassigned = table.unassigned.len(),
            "Assigned sample shortcuts"
        );
        table
    }
}
