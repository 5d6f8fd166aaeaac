//! Environment entry matching and control-variable resolution.
//!
//! Works on raw `NAME=VALUE` byte entries. Walking `environ` itself lives
//! in the ABI layer since it requires unsafe pointer operations.

use crate::config::ControlNames;

/// Given a `NAME=VALUE` entry, check if `name` matches the key portion.
///
/// Returns `true` if `entry` starts with `name` followed by `'='`.
pub fn entry_matches(entry: &[u8], name: &[u8]) -> bool {
    if entry.len() <= name.len() {
        return false;
    }
    entry[..name.len()] == *name && entry[name.len()] == b'='
}

/// The three recognised control variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Index,
    File,
    Preload,
}

impl ControlKind {
    pub const ALL: [Self; 3] = [Self::Index, Self::File, Self::Preload];
}

/// A control variable found in an environment entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlMatch<'e> {
    pub kind: ControlKind,
    /// Byte offset of the value inside the entry.
    pub offset: usize,
    pub value: &'e [u8],
}

/// Classify one environment entry against the control names.
#[must_use]
pub fn classify<'e>(entry: &'e [u8], names: &ControlNames) -> Option<ControlMatch<'e>> {
    ControlKind::ALL.into_iter().find_map(|kind| {
        let name = names.name(kind).to_bytes();
        entry_matches(entry, name).then(|| ControlMatch {
            kind,
            offset: name.len() + 1,
            value: &entry[name.len() + 1..],
        })
    })
}

/// Resolved control variables, one optional slot per kind.
#[derive(Debug, PartialEq, Eq)]
pub struct ControlSet<V> {
    pub index: Option<V>,
    pub file: Option<V>,
    pub preload: Option<V>,
}

impl<V> Default for ControlSet<V> {
    fn default() -> Self {
        Self {
            index: None,
            file: None,
            preload: None,
        }
    }
}

impl<V> ControlSet<V> {
    /// Record `value` for `kind`. A later entry with the same name wins.
    pub fn insert(&mut self, kind: ControlKind, value: V) {
        *self.slot_mut(kind) = Some(value);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_none() && self.file.is_none() && self.preload.is_none()
    }

    /// Both halves of a substitution request, if present.
    #[must_use]
    pub fn substitution(&self) -> Option<(&V, &V)> {
        self.index.as_ref().zip(self.file.as_ref())
    }

    /// Consume the set, yielding resolved entries in index, file, preload order.
    pub fn drain(self) -> impl Iterator<Item = (ControlKind, V)> {
        [
            (ControlKind::Index, self.index),
            (ControlKind::File, self.file),
            (ControlKind::Preload, self.preload),
        ]
        .into_iter()
        .filter_map(|(kind, value)| value.map(|v| (kind, v)))
    }

    fn slot_mut(&mut self, kind: ControlKind) -> &mut Option<V> {
        match kind {
            ControlKind::Index => &mut self.index,
            ControlKind::File => &mut self.file,
            ControlKind::Preload => &mut self.preload,
        }
    }
}

/// Resolve control variables from a sequence of environment entries.
///
/// Values borrow from the entries; nothing is copied.
pub fn resolve<'e, I>(entries: I, names: &ControlNames) -> ControlSet<&'e [u8]>
where
    I: IntoIterator<Item = &'e [u8]>,
{
    let mut set = ControlSet::default();
    for entry in entries {
        if let Some(m) = classify(entry, names) {
            set.insert(m.kind, m.value);
        }
    }
    set
}
