use parkspot_core::page::DEFAULT_PAGE_SIZE;
use parkspot_core::{Page, PageRequest, Sort, ValidationError};
use serde::{Deserialize, Serialize};

/// Query parameters of the listing endpoint.
///
/// `sort` takes `property` or `property,direction`, e.g. `registeredAt,desc`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
}

impl ListParams {
    pub fn into_page_request(self) -> Result<PageRequest, ValidationError> {
        let sort = match self.sort.as_deref() {
            Some(sort) if !sort.trim().is_empty() => sort.parse()?,
            _ => Sort::default(),
        };

        PageRequest::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
            sort,
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageableResponse {
    pub page_number: u32,
    pub page_size: u32,
    pub offset: u64,
    pub sort: Sort,
}

/// Paginated envelope returned by the listing endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub pageable: PageableResponse,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> From<Page<T>> for PageResponse<T> {
    fn from(page: Page<T>) -> Self {
        let request = *page.request();
        let total_elements = page.total_elements();
        let total_pages = page.total_pages();
        let first = page.is_first();
        let last = page.is_last();
        let content = page.into_content();

        Self {
            pageable: PageableResponse {
                page_number: request.page(),
                page_size: request.size(),
                offset: request.offset(),
                sort: request.sort(),
            },
            total_elements,
            total_pages,
            number_of_elements: content.len(),
            first,
            last,
            empty: content.is_empty(),
            content,
        }
    }
}
