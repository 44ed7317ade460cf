//! # Pagination Ranges
//!
//! A pagination field reads several alternative raw keys at once, so it is
//! declared top-level and receives the whole input mapping.
//!
//! ## Precedence
//!
//! ```text
//! _page present      ──▶ Page { page: max(1, _page) }     (offset/limit ignored)
//! otherwise          ──▶ Offset { offset, limit }
//!     offset = _offset, else _skip, else 0; negative → 0
//!     limit  = _limit;  absent, negative or malformed → no limit
//! ```
//!
//! Malformed numbers never fail the request: they fall back to a default
//! (`_page` → 0, i.e. page 1; offset → 0; limit → none).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::types::int_from_json;

/// The raw key names a pagination field reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeKeys {
    pub page: String,
    pub offset: String,
    /// Alias consulted only when `offset` is absent.
    pub skip: String,
    pub limit: String,
}

impl Default for RangeKeys {
    fn default() -> Self {
        Self {
            page: "_page".to_string(),
            offset: "_offset".to_string(),
            skip: "_skip".to_string(),
            limit: "_limit".to_string(),
        }
    }
}

/// A requested slice of a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeInfo {
    /// Offset-based window; `limit: None` means "to the end".
    Offset { offset: u64, limit: Option<u64> },
    /// One-based page number; page size is chosen by the handler.
    Page { page: u64 },
}

impl Default for RangeInfo {
    fn default() -> Self {
        Self::Offset {
            offset: 0,
            limit: None,
        }
    }
}

impl RangeInfo {
    /// Resolve the range to `(offset, limit)` given the page size used for
    /// page-based requests.
    pub fn window(&self, page_size: u64) -> (u64, Option<u64>) {
        match *self {
            Self::Offset { offset, limit } => (offset, limit),
            Self::Page { page } => (
                page.saturating_sub(1).saturating_mul(page_size),
                Some(page_size),
            ),
        }
    }

    /// Read a range out of a raw input mapping. Never fails.
    pub fn from_mapping(keys: &RangeKeys, data: &Map<String, JsonValue>) -> Self {
        if let Some(page) = lenient_int(data.get(&keys.page), Some(0)) {
            return Self::Page {
                page: page.max(1) as u64,
            };
        }

        let offset = lenient_int(data.get(&keys.offset), Some(0))
            .or_else(|| lenient_int(data.get(&keys.skip), Some(0)))
            .map_or(0, |n| n.max(0) as u64);

        let limit = lenient_int(data.get(&keys.limit), None)
            .filter(|n| *n >= 0)
            .map(|n| n as u64);

        Self::Offset { offset, limit }
    }
}

/// Parse an optional raw integer.
///
/// Absent (or JSON null) yields `None`; anything present but unparsable
/// yields `default`.
fn lenient_int(raw: Option<&JsonValue>, default: Option<i64>) -> Option<i64> {
    match raw? {
        JsonValue::Null => None,
        other => int_from_json(other).or(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn range(data: JsonValue) -> RangeInfo {
        let map = data.as_object().cloned().unwrap_or_default();
        RangeInfo::from_mapping(&RangeKeys::default(), &map)
    }

    #[test]
    fn page_takes_priority_over_offset_and_limit() {
        let r = range(json!({"_page": "2", "_offset": "5", "_limit": "10"}));
        assert_eq!(r, RangeInfo::Page { page: 2 });
    }

    #[test]
    fn page_is_clamped_to_one() {
        assert_eq!(range(json!({"_page": "0"})), RangeInfo::Page { page: 1 });
        assert_eq!(range(json!({"_page": "-4"})), RangeInfo::Page { page: 1 });
    }

    #[test]
    fn malformed_page_falls_back_to_first_page() {
        assert_eq!(range(json!({"_page": "abc"})), RangeInfo::Page { page: 1 });
        assert_eq!(range(json!({"_page": ""})), RangeInfo::Page { page: 1 });
    }

    #[test]
    fn offset_and_limit() {
        let r = range(json!({"_offset": "5", "_limit": "10"}));
        assert_eq!(
            r,
            RangeInfo::Offset {
                offset: 5,
                limit: Some(10)
            }
        );
    }

    #[test]
    fn negative_offset_is_clamped() {
        let r = range(json!({"_offset": "-3"}));
        assert_eq!(
            r,
            RangeInfo::Offset {
                offset: 0,
                limit: None
            }
        );
    }

    #[test]
    fn skip_is_used_only_when_offset_absent() {
        assert_eq!(
            range(json!({"_skip": "7"})),
            RangeInfo::Offset {
                offset: 7,
                limit: None
            }
        );
        assert_eq!(
            range(json!({"_offset": "2", "_skip": "7"})),
            RangeInfo::Offset {
                offset: 2,
                limit: None
            }
        );
        // A malformed offset is still "present": it defaults to 0 without
        // consulting the alias.
        assert_eq!(
            range(json!({"_offset": "x", "_skip": "7"})),
            RangeInfo::Offset {
                offset: 0,
                limit: None
            }
        );
    }

    #[test]
    fn malformed_or_negative_limit_means_no_limit() {
        assert_eq!(range(json!({"_limit": "lots"})), RangeInfo::default());
        assert_eq!(range(json!({"_limit": "-1"})), RangeInfo::default());
    }

    #[test]
    fn empty_input_is_unbounded_from_zero() {
        assert_eq!(range(json!({})), RangeInfo::default());
    }

    #[test]
    fn json_numbers_are_read() {
        let r = range(json!({"_offset": 4, "_limit": 2}));
        assert_eq!(
            r,
            RangeInfo::Offset {
                offset: 4,
                limit: Some(2)
            }
        );

        let r = range(json!({"_offset": 5.0, "_limit": 10.7}));
        assert_eq!(
            r,
            RangeInfo::Offset {
                offset: 5,
                limit: Some(10)
            }
        );
        assert_eq!(range(json!({"_page": 2.0})), RangeInfo::Page { page: 2 });
    }

    #[test]
    fn json_booleans_read_as_zero_or_one() {
        assert_eq!(range(json!({"_page": true})), RangeInfo::Page { page: 1 });
        assert_eq!(
            range(json!({"_offset": true, "_limit": false})),
            RangeInfo::Offset {
                offset: 1,
                limit: Some(0)
            }
        );
    }

    #[test]
    fn custom_keys() {
        let keys = RangeKeys {
            page: "p".into(),
            offset: "from".into(),
            skip: "start".into(),
            limit: "size".into(),
        };
        let map = json!({"from": "3", "size": "4", "_page": "9"});
        let r = RangeInfo::from_mapping(&keys, map.as_object().unwrap());
        assert_eq!(
            r,
            RangeInfo::Offset {
                offset: 3,
                limit: Some(4)
            }
        );
    }

    #[test]
    fn window_for_pages() {
        assert_eq!(RangeInfo::Page { page: 1 }.window(20), (0, Some(20)));
        assert_eq!(RangeInfo::Page { page: 3 }.window(20), (40, Some(20)));
        assert_eq!(
            RangeInfo::Offset {
                offset: 5,
                limit: None
            }
            .window(20),
            (5, None)
        );
    }

    #[test]
    fn serde_shape() {
        let v = serde_json::to_value(RangeInfo::Page { page: 2 }).unwrap();
        assert_eq!(v, json!({"kind": "page", "page": 2}));
    }
}
