use loop_pager_foundation::PageSlot;

/// Where one rendered page goes, relative to the pager's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PagePlacement {
    pub slot: PageSlot,
    pub offset_main: i32,
    pub offset_cross: i32,
    pub x: i32,
    pub y: i32,
}

/// Receives rendered pages during [`LoopPager::layout`].
///
/// Hosts that recycle elements should key them by `placement.slot.slot_key`,
/// which stays distinct when a physical page is visible more than once.
///
/// [`LoopPager::layout`]: crate::LoopPager::layout
pub trait PagerLayoutHost<E> {
    fn place_page(&mut self, placement: &PagePlacement, element: E);
}

impl<E, F> PagerLayoutHost<E> for F
where
    F: FnMut(&PagePlacement, E),
{
    fn place_page(&mut self, placement: &PagePlacement, element: E) {
        self(placement, element)
    }
}
