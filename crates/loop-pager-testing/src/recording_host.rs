use loop_pager_ui::{PagePlacement, PagerLayoutHost};

/// Layout host that keeps every placed page for inspection.
#[derive(Debug)]
pub struct RecordingLayoutHost<E> {
    placed: Vec<(PagePlacement, E)>,
}

impl<E> Default for RecordingLayoutHost<E> {
    fn default() -> Self {
        Self { placed: Vec::new() }
    }
}

impl<E> RecordingLayoutHost<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets earlier passes.
    pub fn clear(&mut self) {
        self.placed.clear();
    }

    pub fn placed(&self) -> &[(PagePlacement, E)] {
        &self.placed
    }

    pub fn placements(&self) -> Vec<PagePlacement> {
        self.placed.iter().map(|(placement, _)| *placement).collect()
    }

    pub fn elements(&self) -> Vec<&E> {
        self.placed.iter().map(|(_, element)| element).collect()
    }

    pub fn logical_pages(&self) -> Vec<i32> {
        self.placed
            .iter()
            .map(|(placement, _)| placement.slot.logical_page)
            .collect()
    }

    pub fn physical_pages(&self) -> Vec<usize> {
        self.placed
            .iter()
            .map(|(placement, _)| placement.slot.physical_page)
            .collect()
    }

    pub fn slot_keys(&self) -> Vec<usize> {
        self.placed
            .iter()
            .map(|(placement, _)| placement.slot.slot_key)
            .collect()
    }

    pub fn main_axis_offsets(&self) -> Vec<i32> {
        self.placed
            .iter()
            .map(|(placement, _)| placement.offset_main)
            .collect()
    }

    pub fn element_at_offset(&self, offset_main: i32) -> Option<&E> {
        self.placed
            .iter()
            .find(|(placement, _)| placement.offset_main == offset_main)
            .map(|(_, element)| element)
    }
}

impl<E> PagerLayoutHost<E> for RecordingLayoutHost<E> {
    fn place_page(&mut self, placement: &PagePlacement, element: E) {
        self.placed.push((*placement, element));
    }
}
