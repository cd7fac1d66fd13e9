//! Identity assignment for the pages a loop pager draws.
//!
//! Logical page indices are unbounded; content only exists for physical
//! pages `0..page_count`. With few pages and a wide viewport the same
//! physical page can be on screen twice, so each occurrence gets its own
//! slot key: `physical + cycle * page_count`, where `cycle` counts how many
//! full loops the occurrence sits past the first visible index.

use crate::error::PagerError;
use smallvec::SmallVec;

/// One drawn occurrence of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSlot {
    pub logical_page: i32,
    pub physical_page: usize,
    /// Unique among the slots of one pass.
    pub slot_key: usize,
}

/// Floor-mod mapping of a logical page onto `0..page_count`.
pub fn physical_page(logical_page: i32, page_count: usize) -> usize {
    debug_assert!(page_count > 0);
    let count = page_count as i64;
    i64::from(logical_page).rem_euclid(count) as usize
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopPagerItemProvider {
    page_count: usize,
    visible_page_count: usize,
}

impl LoopPagerItemProvider {
    pub fn new(page_count: usize) -> Result<Self, PagerError> {
        if page_count == 0 {
            return Err(PagerError::InvalidPageCount { page_count });
        }
        Ok(Self {
            page_count,
            visible_page_count: 0,
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Follows the state's page count. The visible high-water mark is kept.
    pub fn set_page_count(&mut self, page_count: usize) -> Result<(), PagerError> {
        if page_count == 0 {
            return Err(PagerError::InvalidPageCount { page_count });
        }
        self.page_count = page_count;
        Ok(())
    }

    /// Most slots ever needed at once. Never shrinks.
    pub fn visible_page_count(&self) -> usize {
        self.visible_page_count
    }

    pub fn update_visible_page_count(&mut self, count: usize) {
        if count > self.visible_page_count {
            log::debug!(
                "visible page count grew {} -> {count}",
                self.visible_page_count
            );
            self.visible_page_count = count;
        }
    }

    /// Size of the slot key space: whole loops of pages covering every slot
    /// ever visible at once.
    pub fn item_count(&self) -> usize {
        let loops = self.visible_page_count.div_ceil(self.page_count).max(1);
        self.page_count * loops
    }

    /// Assigns slot keys to an ascending window of logical pages.
    pub fn resolve_slots(
        &mut self,
        logical_pages: impl IntoIterator<Item = i32>,
    ) -> SmallVec<[PageSlot; 8]> {
        let count = self.page_count as i64;
        let mut slots = SmallVec::<[PageSlot; 8]>::new();
        let mut first = None;
        for logical_page in logical_pages {
            let first = *first.get_or_insert(logical_page);
            let physical_page = physical_page(logical_page, self.page_count);
            let cycle = (i64::from(logical_page) - i64::from(first)).div_euclid(count);
            let slot_key = physical_page + (cycle as usize) * self.page_count;
            slots.push(PageSlot {
                logical_page,
                physical_page,
                slot_key,
            });
        }
        debug_assert!(
            slots
                .iter()
                .enumerate()
                .all(|(i, a)| slots[i + 1..].iter().all(|b| a.slot_key != b.slot_key)),
            "slot keys collided: {slots:?}"
        );
        self.update_visible_page_count(slots.len());
        slots
    }
}
