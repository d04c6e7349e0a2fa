//! Pagination cursor logic
//!
//! Pure decision logic for the incremental search flow: where the next
//! page starts and whether a further page exists at all. No I/O, fully
//! unit-testable.

/// Tracks the position of the next page within a committed search.
///
/// `start_index` is 1-based, matching the volumes API. It only moves
/// forward, by exactly `page_size`, when a fetched page is accepted.
/// `total_items` stays unknown until the first accepted page reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub start_index: u32,
    pub page_size: u32,
    pub total_items: Option<u32>,
}

impl PageCursor {
    /// A cursor positioned at the first page, total count unknown.
    pub fn new(page_size: u32) -> Self {
        Self {
            start_index: 1,
            page_size,
            total_items: None,
        }
    }

    /// Advances past the page just accepted and records the reported
    /// total.
    ///
    /// The step is always exactly `page_size`, even when the final page
    /// came back short.
    pub fn advance(&mut self, total_items: u32) {
        self.start_index += self.page_size;
        self.total_items = Some(total_items);
    }

    /// Whether no further item exists at or beyond `start_index`.
    ///
    /// False while the total is still unknown, so an initial dispatch is
    /// never suppressed. A trailing short page still counts as fetchable:
    /// the list only ends once the cursor has moved past the last item.
    pub fn is_end_of_list(&self) -> bool {
        match self.total_items {
            None => false,
            Some(total) => self.start_index > total,
        }
    }

    /// Items not yet fetched, when the total is known.
    pub fn remaining(&self) -> Option<u32> {
        self.total_items
            .map(|total| total.saturating_sub(self.start_index.saturating_sub(1)))
    }
}
