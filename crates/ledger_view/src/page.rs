//! Pagination window over an ordered record set.

use crate::Record;

/// One page of records plus the counts the pager needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub visible: Vec<Record>,
    /// Size of the whole set the page was cut from.
    pub total: usize,
    /// 1-based, already clamped to the available pages.
    pub page_number: usize,
    pub page_size: usize,
}

impl Page {
    /// Index of the first visible record in the whole set.
    pub fn offset(&self) -> usize {
        (self.page_number - 1) * self.page_size
    }

    pub fn page_count(&self) -> usize {
        page_count(self.total, self.page_size)
    }

    pub fn has_prev(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.page_count()
    }
}

/// Number of pages needed for `total` records, never less than 1.
pub fn page_count(total: usize, size: usize) -> usize {
    total.div_ceil(size.max(1)).max(1)
}

/// Clamps `number` into `[1, page_count]`.
pub fn clamp_page(number: usize, total: usize, size: usize) -> usize {
    number.clamp(1, page_count(total, size))
}

/// Cuts page `number` out of `items`.
///
/// Out-of-range numbers clamp to the nearest existing page; a size of 0 is
/// treated as 1.
pub fn paginate(number: usize, size: usize, items: &[Record]) -> Page {
    let size = size.max(1);
    let total = items.len();
    let page_number = clamp_page(number, total, size);
    let start = ((page_number - 1) * size).min(total);
    let end = (start + size).min(total);

    Page {
        visible: items[start..end].to_vec(),
        total,
        page_number,
        page_size: size,
    }
}
