use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Requests for larger pages are clamped to this size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Record attributes a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Id,
    SpotNumber,
    LicensePlate,
    Brand,
    Model,
    Color,
    ResponsibleName,
    Apartment,
    Block,
    RegisteredAt,
}

impl SortField {
    pub const ALL: [SortField; 10] = [
        SortField::Id,
        SortField::SpotNumber,
        SortField::LicensePlate,
        SortField::Brand,
        SortField::Model,
        SortField::Color,
        SortField::ResponsibleName,
        SortField::Apartment,
        SortField::Block,
        SortField::RegisteredAt,
    ];

    /// The wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::SpotNumber => "spotNumber",
            SortField::LicensePlate => "licensePlate",
            SortField::Brand => "brand",
            SortField::Model => "model",
            SortField::Color => "color",
            SortField::ResponsibleName => "responsibleName",
            SortField::Apartment => "apartment",
            SortField::Block => "block",
            SortField::RegisteredAt => "registeredAt",
        }
    }

    /// The column backing the field in the relational schema.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::SpotNumber => "spot_number",
            SortField::LicensePlate => "license_plate",
            SortField::Brand => "brand",
            SortField::Model => "model",
            SortField::Color => "color",
            SortField::ResponsibleName => "responsible_name",
            SortField::Apartment => "apartment",
            SortField::Block => "block",
            SortField::RegisteredAt => "registered_at",
        }
    }
}

impl FromStr for SortField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                ValidationError::single("sort", format!("unknown sort property '{s}'"))
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Direction::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Direction::Desc)
        } else {
            Err(ValidationError::single(
                "sort",
                format!("sort direction must be 'asc' or 'desc', got '{s}'"),
            ))
        }
    }
}

/// Ordering of a listing. `id` ascending is always applied as a final
/// tie-breaker by repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    pub property: SortField,
    pub direction: Direction,
}

impl Sort {
    pub fn new(property: SortField, direction: Direction) -> Self {
        Self {
            property,
            direction,
        }
    }

    pub fn asc(property: SortField) -> Self {
        Self::new(property, Direction::Asc)
    }

    pub fn desc(property: SortField) -> Self {
        Self::new(property, Direction::Desc)
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::asc(SortField::RegisteredAt)
    }
}

/// Parses `property` or `property,direction`.
impl FromStr for Sort {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (property, direction) = match s.split_once(',') {
            Some((property, direction)) => (property.trim(), direction.trim().parse()?),
            None => (s.trim(), Direction::Asc),
        };
        Ok(Self::new(property.parse()?, direction))
    }
}

impl Display for Sort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.property.as_str(), self.direction.as_sql())
    }
}

/// A request for one page of a sorted listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort: Sort,
}

impl PageRequest {
    /// Creates a page request. `page` is zero-based; `size` must be
    /// positive and is clamped to [`MAX_PAGE_SIZE`].
    pub fn new(page: u32, size: u32, sort: Sort) -> Result<Self, ValidationError> {
        if size == 0 {
            return Err(ValidationError::single(
                "size",
                "page size must be at least 1",
            ));
        }

        Ok(Self {
            page,
            size: size.min(MAX_PAGE_SIZE),
            sort,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    /// Number of records preceding this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Sort::default(),
        }
    }
}

/// One page of records together with totals over the whole listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    content: Vec<T>,
    request: PageRequest,
    total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            request,
            total_elements,
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(u64::from(self.request.size))
    }

    pub fn is_first(&self) -> bool {
        self.request.page == 0
    }

    pub fn is_last(&self) -> bool {
        u64::from(self.request.page) + 1 >= self.total_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sort_expressions() {
        assert_eq!(
            "spotNumber".parse::<Sort>().unwrap(),
            Sort::asc(SortField::SpotNumber)
        );
        assert_eq!(
            "registeredAt,DESC".parse::<Sort>().unwrap(),
            Sort::desc(SortField::RegisteredAt)
        );
        assert_eq!(
            "licensePlate, asc".parse::<Sort>().unwrap(),
            Sort::asc(SortField::LicensePlate)
        );
    }

    #[test]
    fn rejects_unknown_sort_property_and_direction() {
        let err = "password".parse::<Sort>().unwrap_err();
        assert_eq!(err.errors()[0].field, "sort");
        assert!("spotNumber,sideways".parse::<Sort>().is_err());
    }

    #[test]
    fn page_size_must_be_positive() {
        let err = PageRequest::new(0, 0, Sort::default()).unwrap_err();
        assert_eq!(err.errors()[0].field, "size");
    }

    #[test]
    fn page_size_is_clamped() {
        let request = PageRequest::new(2, 1_000, Sort::default()).unwrap();
        assert_eq!(request.size(), MAX_PAGE_SIZE);
        assert_eq!(request.offset(), 200);
    }

    #[test]
    fn page_totals() {
        let request = PageRequest::new(0, 10, Sort::default()).unwrap();
        let page = Page::new((0..10).collect::<Vec<_>>(), request, 15);
        assert_eq!(page.total_pages(), 2);
        assert!(page.is_first());
        assert!(!page.is_last());

        let request = PageRequest::new(1, 10, Sort::default()).unwrap();
        let page = Page::new((10..15).collect::<Vec<_>>(), request, 15);
        assert!(page.is_last());
    }

    #[test]
    fn empty_listing_has_no_pages() {
        let page: Page<u8> = Page::new(Vec::new(), PageRequest::default(), 0);
        assert_eq!(page.total_pages(), 0);
        assert!(page.is_first());
        assert!(page.is_last());
    }
}
