use std::collections::HashMap;

use handle_errors::Error;

/// Number of questions per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// 1-indexed page requested by the client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination { page: 1 }
    }
}

/// Extract the `page` query parameter, defaulting to the first page.
/// # Example query
/// GET requests to this route can have a pagination attached so we just
/// return the questions we need
/// `/questions?page=2`
pub fn extract_pagination(params: HashMap<String, String>) -> Result<Pagination, Error> {
    match params.get("page") {
        None => Ok(Pagination::default()),
        Some(page) => {
            let page = page.trim().parse::<u32>().map_err(Error::ParseError)?;
            if page == 0 {
                return Err(Error::InvalidPage);
            }
            Ok(Pagination { page })
        }
    }
}

/// Window of `items` shown on `page`. A page past the end is empty.
pub fn paginate<T>(items: &[T], page: u32, page_size: u32) -> &[T] {
    let page_size = page_size as usize;
    let start = (page.saturating_sub(1) as usize).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
