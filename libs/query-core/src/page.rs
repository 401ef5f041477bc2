use serde::{Deserialize, Serialize};

/// Zero-based page descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub index: u64,
    pub size: u64,
}

impl PageRequest {
    pub fn new(index: u64, size: u64) -> Self {
        Self { index, size }
    }

    /// Number of rows before this page.
    ///
    /// An index whose offset does not fit in `u64` saturates, which places
    /// the page past the end of any result.
    pub fn skip(&self) -> u64 {
        self.index.checked_mul(self.size).unwrap_or(u64::MAX)
    }

    pub fn take(&self) -> u64 {
        self.size
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub page_size: u64,
    pub total_count: u64,
}

impl<T> Page<T> {
    /// Create a page from an already sliced set of items and the size of the full result.
    pub fn new(items: Vec<T>, current_page: u64, page_size: u64, total_count: u64) -> Self {
        Self {
            items,
            current_page,
            page_size,
            total_count,
        }
    }

    /// Create an empty page for the given position.
    pub fn empty(current_page: u64, page_size: u64) -> Self {
        Self::new(Vec::new(), current_page, page_size, 0)
    }

    /// Slice the page out of the full sequence.
    ///
    /// `total_count` is the length of the full sequence; a page past the end is empty.
    pub fn paginate<I>(sequence: I, current_page: u64, page_size: u64) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let all: Vec<T> = sequence.into_iter().collect();
        let total_count = all.len() as u64;
        let request = PageRequest::new(current_page, page_size);

        let items = match usize::try_from(request.skip()) {
            Ok(skip) if page_size > 0 => all
                .into_iter()
                .skip(skip)
                .take(usize::try_from(page_size).unwrap_or(usize::MAX))
                .collect(),
            _ => Vec::new(),
        };

        Self::new(items, current_page, page_size, total_count)
    }

    /// Map items while preserving the page metadata
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            page_size: self.page_size,
            total_count: self.total_count,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.current_page.saturating_add(1) < self.total_pages()
    }

    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.current_page, self.page_size)
    }
}
