/// Maximum number of completed conversions kept in the history.
pub const MAX_HISTORY_ENTRIES: usize = 5;

/// One completed conversion, as remembered by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub filename: String,
    pub title: String,
    pub filesize_formatted: String,
    pub timestamp_millis: u64,
}

/// Recently completed conversions, most recent first.
///
/// Filenames are unique within the list and the list never grows beyond
/// [`MAX_HISTORY_ENTRIES`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a history from persisted entries, restoring the invariants in
    /// case the stored list was edited or written by an older client.
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        let mut history = Self::new();
        for entry in entries {
            if history.entries.len() >= MAX_HISTORY_ENTRIES {
                break;
            }
            if !history.contains(&entry.filename) {
                history.entries.push(entry);
            }
        }
        history
    }

    /// Inserts `entry` at the front, replacing any entry with the same filename.
    pub fn add(&mut self, entry: HistoryEntry) -> &[HistoryEntry] {
        self.entries.retain(|existing| existing.filename != entry.filename);
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_HISTORY_ENTRIES);
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn contains(&self, filename: &str) -> bool {
        self.entries.iter().any(|entry| entry.filename == filename)
    }
}
