pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 5;

/// Page window over the catalog, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Parse raw query values. Missing values fall back to the defaults;
    /// anything that is not a positive integer is rejected.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, String> {
        let page = parse_positive("page", page, DEFAULT_PAGE)?;
        let limit = parse_positive("limit", limit, DEFAULT_LIMIT)?;

        if (page - 1).checked_mul(limit).is_none() {
            return Err("page is out of range".to_string());
        }

        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Number of pages needed for `total` rows; zero rows means zero pages.
    pub fn pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        total / self.limit + i64::from(total % self.limit != 0)
    }
}

fn parse_positive(name: &str, raw: Option<&str>, default: i64) -> Result<i64, String> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(default),
        Some(raw) => raw,
    };

    match raw.parse::<i64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(format!("{name} must be a positive integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_missing() {
        let p = Pagination::parse(None, None).unwrap();
        assert_eq!(p, Pagination { page: 1, limit: 5 });
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn offset_and_page_count() {
        let p = Pagination::parse(Some("3"), Some("2")).unwrap();
        assert_eq!(p.offset(), 4);
        assert_eq!(p.pages(5), 3);
        assert_eq!(p.pages(4), 2);
        assert_eq!(p.pages(0), 0);
    }

    #[test]
    fn rejects_non_positive_and_garbage() {
        for bad in ["0", "-1", "abc", "1.5"] {
            assert!(Pagination::parse(Some(bad), None).is_err(), "page={bad}");
            assert!(Pagination::parse(None, Some(bad)).is_err(), "limit={bad}");
        }
    }

    #[test]
    fn rejects_offset_overflow() {
        let huge = i64::MAX.to_string();
        assert!(Pagination::parse(Some(&huge), Some("10")).is_err());
        assert!(Pagination::parse(Some("99999999999999999999"), None).is_err());
    }
}
