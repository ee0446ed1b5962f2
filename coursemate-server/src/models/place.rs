//! Place search options

/// Ordering for place search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceSort {
    /// Highest average rating first ("main destinations")
    Best,
    /// Most recently registered first
    Latest,
    /// Ascending spot id
    #[default]
    Id,
}

impl PlaceSort {
    /// Map the `sort` query parameter. Unknown values fall back to id order.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("best") => Self::Best,
            Some("latest") => Self::Latest,
            _ => Self::Id,
        }
    }

    pub(crate) fn order_by(self) -> &'static str {
        match self {
            Self::Best => "avg_rating DESC, spot_id ASC",
            Self::Latest => "reg_date DESC, spot_id ASC",
            Self::Id => "spot_id ASC",
        }
    }
}
