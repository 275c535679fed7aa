use log::{debug, trace};

use crate::{
    address::AddressTranslator,
    aging::AgingClock,
    config::VmConfig,
    error::{Result, VmError},
    frame_table::FrameTable,
    page_replacer::{PageEvent, PageReplacer},
    page_table::PageTable,
    stats::Statistics,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

impl Operation {
    pub fn is_write(self) -> bool {
        self == Operation::Write
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccessOutcome {
    Hit {
        page_number: usize,
        frame_index: usize,
    },
    Fault {
        page_number: usize,
        frame_index: usize,
        evicted: Option<usize>,
    },
}

impl AccessOutcome {
    pub fn is_fault(&self) -> bool {
        matches!(self, AccessOutcome::Fault { .. })
    }
}

pub struct Mmu<REPLACER: PageReplacer> {
    translator: AddressTranslator,
    page_table: PageTable,
    frames: FrameTable,
    aging: AgingClock,
    replacer: REPLACER,
    stats: Statistics,
}

impl<REPLACER> Mmu<REPLACER>
where
    REPLACER: PageReplacer,
{
    pub fn new(config: VmConfig, replacer: REPLACER) -> Result<Self> {
        config.validate()?;

        Ok(Mmu {
            translator: AddressTranslator::new(config.page_size)?,
            page_table: PageTable::new(),
            frames: FrameTable::new(config.frame_count()),
            aging: AgingClock::new(config.clear_r_every)?,
            replacer,
            stats: Statistics::default(),
        })
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn frames(&self) -> &FrameTable {
        &self.frames
    }

    pub fn translator(&self) -> &AddressTranslator {
        &self.translator
    }

    fn handle_page_fault(
        &mut self,
        page_number: usize,
        write: bool,
    ) -> Result<(usize, Option<usize>)> {
        self.stats.faults += 1;

        let (frame_index, evicted) = match self.frames.first_free_frame() {
            Some(free_idx) => (free_idx, None),
            None => {
                let victim_idx = self
                    .replacer
                    .pick_victim(&self.frames, &self.page_table)
                    .ok_or(VmError::NoVictim)?;

                let evicted_page = self.frames.vacate(victim_idx).ok_or(VmError::NoVictim)?;

                if let Some(entry) = self.page_table.lookup(evicted_page) {
                    debug!(
                        "mmu: evicting page {:#x} from frame {} (class {}{})",
                        evicted_page,
                        victim_idx,
                        entry.nru_class(),
                        if entry.modified { ", dirty" } else { "" }
                    );
                }

                self.page_table.evict(evicted_page);

                (victim_idx, Some(evicted_page))
            }
        };

        self.frames.occupy(frame_index, page_number);
        self.page_table.install(page_number, frame_index, write);

        self.replacer.page_event(PageEvent::Loaded {
            page_number,
            frame_index,
        });

        Ok((frame_index, evicted))
    }

    /// Replays one access: counts it, resolves hit or fault and runs the aging
    /// check.
    pub fn access(&mut self, address: u32, op: Operation) -> Result<AccessOutcome> {
        self.stats.accesses += 1;
        match op {
            Operation::Read => self.stats.reads += 1,
            Operation::Write => self.stats.writes += 1,
        }

        let (page_number, page_offset) = self.translator.split(address);

        trace!(
            "mmu: access addr {:#06x} page_num={:#x} page_offset={:#x} {:?}",
            address,
            page_number,
            page_offset,
            op
        );

        let outcome = match self.page_table.lookup(page_number).filter(|e| e.valid) {
            Some(entry) => {
                trace!("mmu: page hit, frame {}", entry.frame_index);

                self.page_table.mark_accessed(page_number, op.is_write());
                self.replacer.page_event(PageEvent::Touched {
                    page_number,
                    frame_index: entry.frame_index,
                });

                AccessOutcome::Hit {
                    page_number,
                    frame_index: entry.frame_index,
                }
            }
            None => {
                debug!("mmu: page fault on {:#x}", page_number);

                let (frame_index, evicted) = self.handle_page_fault(page_number, op.is_write())?;

                AccessOutcome::Fault {
                    page_number,
                    frame_index,
                    evicted,
                }
            }
        };

        self.aging.tick(self.stats.accesses, &mut self.page_table);

        Ok(outcome)
    }

    /// Checks that frames and valid page table entries map one to one and that
    /// no more pages are resident than there are frames.
    pub fn check_invariants(&self) -> bool {
        let frames_ok = self.frames.occupied().all(|(frame_index, page_number)| {
            self.page_table
                .lookup(page_number)
                .map_or(false, |e| e.valid && e.frame_index == frame_index)
        });

        let pages_ok = self.page_table.iter().all(|(page_number, e)| {
            if e.valid {
                self.frames.occupant(e.frame_index) == Some(page_number)
            } else {
                !e.referenced && !e.modified
            }
        });

        let occupied = self.frames.occupied().count();

        frames_ok
            && pages_ok
            && occupied == self.page_table.resident_count()
            && occupied <= self.frames.capacity()
            && occupied + self.frames.free_frame_count() == self.frames.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_replacer::{FIFOPageReplacer, NruPageReplacer};

    fn nru(
        page_size: usize,
        clear_r_every: usize,
        physical_memory_size: usize,
    ) -> Mmu<NruPageReplacer> {
        let config = VmConfig::new(page_size, clear_r_every)
            .with_physical_memory_size(physical_memory_size);
        Mmu::new(config, NruPageReplacer::new()).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        assert_eq!(
            Mmu::new(VmConfig::new(100, 1), NruPageReplacer::new()).err(),
            Some(VmError::UnsupportedPageSize(100))
        );
        assert_eq!(
            Mmu::new(VmConfig::new(32, 0), NruPageReplacer::new()).err(),
            Some(VmError::InvalidAgingInterval)
        );
    }

    #[test]
    fn hit_after_fault() {
        let mut mmu = nru(32, 100, 1024);

        let first = mmu.access(0x21, Operation::Read).unwrap();
        assert_eq!(
            first,
            AccessOutcome::Fault {
                page_number: 1,
                frame_index: 0,
                evicted: None
            }
        );

        let second = mmu.access(0x3F, Operation::Write).unwrap();
        assert_eq!(
            second,
            AccessOutcome::Hit {
                page_number: 1,
                frame_index: 0
            }
        );

        let entry = mmu.page_table().lookup(1).unwrap();
        assert!(entry.referenced && entry.modified);
        assert_eq!(
            *mmu.stats(),
            Statistics {
                reads: 1,
                writes: 1,
                faults: 1,
                accesses: 2
            }
        );
    }

    #[test]
    fn evicts_lowest_class() {
        let mut mmu = nru(32, 100, 64);

        mmu.access(0x0, Operation::Read).unwrap();
        mmu.access(0x20, Operation::Write).unwrap();
        let outcome = mmu.access(0x40, Operation::Read).unwrap();

        assert_eq!(
            outcome,
            AccessOutcome::Fault {
                page_number: 2,
                frame_index: 0,
                evicted: Some(0)
            }
        );
        assert!(!mmu.page_table().is_resident(0));
        assert_eq!(mmu.frames().slots().collect::<Vec<_>>(), vec![Some(2), Some(1)]);
        assert!(mmu.check_invariants());
    }

    #[test]
    fn aging_runs_after_the_access_is_counted() {
        let mut mmu = nru(64, 2, 1024);

        mmu.access(0x00, Operation::Write).unwrap();
        assert!(mmu.page_table().lookup(0).unwrap().referenced);

        // second access triggers the sweep, including for the page it just touched
        mmu.access(0x40, Operation::Read).unwrap();
        assert!(mmu.page_table().iter().all(|(_, e)| !e.referenced));
        assert!(mmu.page_table().lookup(0).unwrap().modified);
    }

    #[test]
    fn fifo_ignores_bits() {
        let config = VmConfig::new(32, 100).with_physical_memory_size(64);
        let mut mmu = Mmu::new(config, FIFOPageReplacer::new()).unwrap();

        mmu.access(0x20, Operation::Read).unwrap();
        mmu.access(0x00, Operation::Read).unwrap();
        // page 1 was loaded first, so it goes even though page 0 looks identical
        let outcome = mmu.access(0x40, Operation::Read).unwrap();

        assert_eq!(
            outcome,
            AccessOutcome::Fault {
                page_number: 2,
                frame_index: 0,
                evicted: Some(1)
            }
        );
        assert!(mmu.check_invariants());
    }
}
