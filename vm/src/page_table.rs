use std::collections::HashMap;

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct PageTableEntry {
    pub valid: bool,
    pub frame_index: usize,
    pub referenced: bool,
    pub modified: bool,
}

impl PageTableEntry {
    /// NRU class, `2 * R + M`. Lower classes are better eviction candidates.
    pub fn nru_class(&self) -> u8 {
        2 * self.referenced as u8 + self.modified as u8
    }
}

/// Sparse page table, only holds the pages the trace has touched.
#[derive(Default, Debug)]
pub struct PageTable {
    table: HashMap<usize, PageTableEntry>,
}

impl PageTable {
    pub fn new() -> Self {
        PageTable {
            table: HashMap::new(),
        }
    }

    pub fn lookup(&self, page_number: usize) -> Option<PageTableEntry> {
        self.table.get(&page_number).copied()
    }

    pub fn is_resident(&self, page_number: usize) -> bool {
        self.table
            .get(&page_number)
            .map_or(false, |entry| entry.valid)
    }

    pub fn install(&mut self, page_number: usize, frame_index: usize, write: bool) {
        self.table.insert(
            page_number,
            PageTableEntry {
                valid: true,
                frame_index,
                referenced: true,
                modified: write,
            },
        );
    }

    /// Invalidates the entry and returns the frame it was holding.
    pub fn evict(&mut self, page_number: usize) -> Option<usize> {
        let entry = self.table.get_mut(&page_number).filter(|e| e.valid)?;
        let frame_index = entry.frame_index;

        *entry = PageTableEntry::default();

        Some(frame_index)
    }

    pub fn mark_accessed(&mut self, page_number: usize, write: bool) {
        if let Some(entry) = self.table.get_mut(&page_number).filter(|e| e.valid) {
            entry.referenced = true;
            entry.modified |= write;
        }
    }

    pub fn clear_referenced(&mut self) {
        for entry in self.table.values_mut().filter(|e| e.valid) {
            entry.referenced = false;
        }
    }

    pub fn resident_count(&self) -> usize {
        self.table.values().filter(|e| e.valid).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &PageTableEntry)> {
        self.table.iter().map(|(page_number, entry)| (*page_number, entry))
    }
}
