use std::collections::VecDeque;

use crate::{frame_table::FrameTable, page_table::PageTable};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PageEvent {
    Touched { page_number: usize, frame_index: usize },
    Loaded { page_number: usize, frame_index: usize },
}

pub trait PageReplacer {
    fn page_event(&mut self, _event: PageEvent) {}

    /// Picks the frame to evict. Only called when every frame is occupied.
    fn pick_victim(&mut self, frames: &FrameTable, pages: &PageTable) -> Option<usize>;
}

/// Not-Recently-Used: evicts the lowest `2 * R + M` class, lowest frame first.
#[derive(Default, Debug)]
pub struct NruPageReplacer;

impl NruPageReplacer {
    pub fn new() -> Self {
        NruPageReplacer
    }
}

impl PageReplacer for NruPageReplacer {
    fn pick_victim(&mut self, frames: &FrameTable, pages: &PageTable) -> Option<usize> {
        let mut best: Option<(usize, u8)> = None;

        for (frame_index, page_number) in frames.occupied() {
            // an occupied frame whose page isn't valid means the tables disagree
            let class = pages.lookup(page_number).filter(|e| e.valid)?.nru_class();

            if best.map_or(true, |(_, best_class)| class < best_class) {
                best = Some((frame_index, class));

                if class == 0 {
                    break;
                }
            }
        }

        best.map(|(frame_index, _)| frame_index)
    }
}

/// Evicts frames in the order their pages were loaded.
#[derive(Default, Debug)]
pub struct FIFOPageReplacer {
    fifo: VecDeque<usize>,
}

impl FIFOPageReplacer {
    pub fn new() -> Self {
        FIFOPageReplacer {
            fifo: VecDeque::new(),
        }
    }
}

impl PageReplacer for FIFOPageReplacer {
    fn page_event(&mut self, event: PageEvent) {
        if let PageEvent::Loaded { frame_index, .. } = event {
            self.fifo.push_back(frame_index)
        }
    }

    fn pick_victim(&mut self, _frames: &FrameTable, _pages: &PageTable) -> Option<usize> {
        self.fifo.pop_front()
    }
}
