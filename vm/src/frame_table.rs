use std::collections::VecDeque;

/// Physical frames, each free or owned by a single page.
#[derive(Debug)]
pub struct FrameTable {
    frames: Vec<Option<usize>>,
    // kept sorted, so the front is always the lowest free frame
    free_frames: VecDeque<usize>,
}

impl FrameTable {
    pub fn new(frame_count: usize) -> Self {
        FrameTable {
            frames: vec![None; frame_count],
            free_frames: (0..frame_count).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.frames.len()
    }

    pub fn free_frame_count(&self) -> usize {
        self.free_frames.len()
    }

    pub fn first_free_frame(&self) -> Option<usize> {
        self.free_frames.front().copied()
    }

    pub fn occupant(&self, frame_index: usize) -> Option<usize> {
        self.frames.get(frame_index).copied().flatten()
    }

    /// Assigns a free frame to `page_number`.
    ///
    /// Panics if the frame is out of range or already occupied.
    pub fn occupy(&mut self, frame_index: usize, page_number: usize) {
        assert!(
            self.frames[frame_index].is_none(),
            "frame {} already holds page {:#x}",
            frame_index,
            self.frames[frame_index].unwrap_or_default()
        );

        if self.free_frames.front() == Some(&frame_index) {
            self.free_frames.pop_front();
        } else {
            self.free_frames.retain(|&idx| idx != frame_index);
        }

        self.frames[frame_index] = Some(page_number);
    }

    /// Frees the frame and returns the page it held.
    pub fn vacate(&mut self, frame_index: usize) -> Option<usize> {
        let page_number = self.frames.get_mut(frame_index)?.take()?;

        let pos = self.free_frames.partition_point(|&idx| idx < frame_index);
        self.free_frames.insert(pos, frame_index);

        Some(page_number)
    }

    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.frames
            .iter()
            .enumerate()
            .filter_map(|(frame_index, slot)| slot.map(|page_number| (frame_index, page_number)))
    }

    pub fn slots(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.frames.iter().copied()
    }
}
