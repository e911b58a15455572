//! Page windows over the filtered and sorted records.

pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 3] = [5, 10, 25];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice<T> {
    pub rows: Vec<T>,
    /// Padding rows that keep the table height stable on a short last page.
    pub empty_rows: usize,
}

/// Cut page `page` (0-based) of `page_size` rows out of `records`.
pub fn paginate<T: Clone>(records: &[T], page: usize, page_size: usize) -> PageSlice<T> {
    let start = page.saturating_mul(page_size).min(records.len());
    let end = start.saturating_add(page_size).min(records.len());
    PageSlice {
        rows: records[start..end].to_vec(),
        empty_rows: empty_rows(records.len(), page, page_size),
    }
}

/// Zero on the first page; otherwise the gap between a full page and what
/// is left.
pub fn empty_rows(len: usize, page: usize, page_size: usize) -> usize {
    if page == 0 {
        return 0;
    }
    page.saturating_add(1).saturating_mul(page_size).saturating_sub(len)
}

/// Terminal lines per table row.
pub fn row_lines(dense: bool) -> u16 {
    if dense {
        1
    } else {
        2
    }
}

/// Terminal lines taken by the padding block for `empty_rows` rows.
pub fn filler_lines(dense: bool, empty_rows: usize) -> u16 {
    u16::try_from(empty_rows)
        .unwrap_or(u16::MAX)
        .saturating_mul(row_lines(dense))
}

pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

pub fn last_page(len: usize, page_size: usize) -> usize {
    page_count(len, page_size).saturating_sub(1)
}

/// Pull `page` back onto the last page that has rows.
pub fn clamp_page(page: usize, len: usize, page_size: usize) -> usize {
    page.min(last_page(len, page_size))
}

/// `"6–10 of 13"`, the same text a pagination footer shows.
pub fn displayed_rows_label(page: usize, page_size: usize, len: usize) -> String {
    if len == 0 {
        return "0–0 of 0".to_string();
    }
    let from = page.saturating_mul(page_size).saturating_add(1).min(len);
    let to = page.saturating_add(1).saturating_mul(page_size).min(len);
    format!("{}–{} of {}", from, to, len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_page_of_seven() {
        let records: Vec<u32> = (0..7).collect();
        let slice = paginate(&records, 1, 5);
        assert_eq!(slice.rows, vec![5, 6]);
        assert_eq!(slice.empty_rows, 3);
    }

    #[test]
    fn test_first_page_never_pads() {
        let records: Vec<u32> = (0..2).collect();
        let slice = paginate(&records, 0, 10);
        assert_eq!(slice.rows, vec![0, 1]);
        assert_eq!(slice.empty_rows, 0);
    }

    #[test]
    fn test_out_of_range_page_is_empty_and_padded() {
        let records: Vec<u32> = (0..3).collect();
        let slice = paginate(&records, 4, 5);
        assert!(slice.rows.is_empty());
        assert_eq!(slice.empty_rows, 22);
    }

    #[test]
    fn test_pages_cover_everything_once() {
        for page_size in DEFAULT_PAGE_SIZE_OPTIONS {
            for len in 0..50usize {
                let records: Vec<usize> = (0..len).collect();
                let mut seen = Vec::new();
                for page in 0..page_count(len, page_size) {
                    seen.extend(paginate(&records, page, page_size).rows);
                }
                assert_eq!(seen, records, "size {} len {}", page_size, len);
            }
        }
    }

    #[test]
    fn test_empty_row_bound() {
        for page_size in DEFAULT_PAGE_SIZE_OPTIONS {
            for len in 0..50usize {
                let records: Vec<usize> = (0..len).collect();
                for page in 0..page_count(len, page_size) {
                    let slice = paginate(&records, page, page_size);
                    if page == 0 || slice.rows.len() == page_size {
                        assert_eq!(slice.empty_rows, 0);
                    } else {
                        assert_eq!(slice.rows.len() + slice.empty_rows, page_size);
                    }
                }
            }
        }
    }

    #[test]
    fn test_filler_lines() {
        assert_eq!(filler_lines(true, 3), 3);
        assert_eq!(filler_lines(false, 3), 6);
        assert_eq!(filler_lines(false, 0), 0);
        assert_eq!(filler_lines(false, usize::MAX), u16::MAX);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let records: Vec<u32> = (0..7).collect();
        let slice = paginate(&records, usize::MAX, 5);
        assert!(slice.rows.is_empty());
        assert_eq!(slice.empty_rows, usize::MAX - 7);

        let slice = paginate(&records, usize::MAX / 2, usize::MAX);
        assert!(slice.rows.is_empty());
        assert_eq!(empty_rows(7, usize::MAX, usize::MAX), usize::MAX - 7);

        assert_eq!(displayed_rows_label(usize::MAX / 2, 5, 7), "7–7 of 7");
        assert_eq!(displayed_rows_label(usize::MAX, usize::MAX, 7), "7–7 of 7");
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(page_count(0, 5), 0);
        assert_eq!(page_count(13, 5), 3);
        assert_eq!(clamp_page(7, 13, 5), 2);
        assert_eq!(clamp_page(1, 13, 5), 1);
        assert_eq!(clamp_page(3, 0, 5), 0);
    }

    #[test]
    fn test_displayed_rows_label() {
        assert_eq!(displayed_rows_label(0, 5, 0), "0–0 of 0");
        assert_eq!(displayed_rows_label(0, 5, 13), "1–5 of 13");
        assert_eq!(displayed_rows_label(2, 5, 13), "11–13 of 13");
    }
}
