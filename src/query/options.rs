//! Turning a list request's query string into paging, ordering and filters.

use std::collections::{BTreeMap, HashMap};

use crate::config::{
    DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, EXPORT_PAGE_SIZE, MAX_PAGE_SIZE, MAX_ROW_OFFSET,
    RESERVED_QUERY_KEYS,
};

use super::predicate::{Direction, Predicate, SortOrder};
use super::schema::{FieldKind, Schema};

/// Raw list request parameters.
///
/// The control keys are split out; every other key is kept as a candidate
/// equality filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub filter: Option<String>,
    pub fields: Option<String>,
    pub filters: BTreeMap<String, String>,
}

impl From<HashMap<String, String>> for ListQuery {
    fn from(raw: HashMap<String, String>) -> Self {
        let mut query = ListQuery::default();
        for (key, value) in raw {
            match key.as_str() {
                "sort" => query.sort = Some(value),
                "order" => query.order = Some(value),
                "page" => query.page = Some(value),
                "limit" => query.limit = Some(value),
                "filter" => query.filter = Some(value),
                "fields" => query.fields = Some(value),
                _ => {
                    query.filters.insert(key, value);
                }
            }
        }
        query
    }
}

impl<const N: usize> From<[(&str, &str); N]> for ListQuery {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
            .into()
    }
}

/// Default and maximum page size of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLimits {
    pub default: u64,
    pub max: u64,
}

impl ListLimits {
    /// Regular paginated listings
    pub const LISTING: ListLimits = ListLimits {
        default: DEFAULT_PAGE_SIZE,
        max: MAX_PAGE_SIZE,
    };

    /// "List everything" endpoints
    pub const EXPORT: ListLimits = ListLimits {
        default: EXPORT_PAGE_SIZE,
        max: EXPORT_PAGE_SIZE,
    };
}

/// Normalized paging and ordering of a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub sort: SortOrder,
    /// 1-indexed, always at least 1
    pub page: u64,
    /// Always at least 1
    pub limit: u64,
}

impl ListOptions {
    /// Number of rows to skip for the requested page, never above
    /// [`MAX_ROW_OFFSET`].
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.limit)
            .min(MAX_ROW_OFFSET)
    }
}

/// Normalize paging and ordering. Never fails: anything malformed falls
/// back to its default.
pub fn parse_list_options(query: &ListQuery, schema: &Schema, limits: ListLimits) -> ListOptions {
    let field = query
        .sort
        .as_deref()
        .and_then(|name| schema.field(name.trim()))
        .map(|field| field.name)
        .unwrap_or(schema.default_sort);

    let direction = query
        .order
        .as_deref()
        .map(Direction::parse)
        .unwrap_or_default();

    let page = parse_positive(query.page.as_deref()).unwrap_or(DEFAULT_PAGE_NUMBER);

    let limit = parse_positive(query.limit.as_deref())
        .unwrap_or(limits.default)
        .min(limits.max);

    ListOptions {
        sort: SortOrder::new(field, direction),
        page,
        limit,
    }
}

/// Build the filter of a list request.
///
/// Known fields become equality conditions. A non-empty `filter` together
/// with `fields` adds a case-insensitive substring search over the named
/// text fields. Unknown fields and values that do not parse for their field
/// are skipped.
pub fn build_filter_predicate(query: &ListQuery, schema: &Schema) -> Option<Predicate> {
    let mut conditions: Vec<Predicate> = query
        .filters
        .iter()
        .filter(|(key, _)| !RESERVED_QUERY_KEYS.contains(&key.as_str()))
        .filter_map(|(key, raw)| {
            let field = schema.field(key)?;
            let value = field.kind.parse(raw)?;
            Some(Predicate::Eq(field.name, value))
        })
        .collect();

    let needle = query.filter.as_deref().map(str::trim).unwrap_or_default();
    if let Some(fields) = query.fields.as_deref().filter(|_| !needle.is_empty()) {
        let search: Vec<Predicate> = fields
            .split(',')
            .filter_map(|name| schema.field(name.trim()))
            .filter(|field| field.kind == FieldKind::Text)
            .map(|field| Predicate::Contains(field.name, needle.to_string()))
            .collect();

        if let Some(search) = Predicate::any(search) {
            conditions.push(search);
        }
    }

    Predicate::all(conditions)
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value > 0)
        .map(|value| value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::schema::{FieldDef, Value};

    static BOTS: Schema = Schema {
        fields: &[
            FieldDef::new("id", FieldKind::Integer),
            FieldDef::new("name", FieldKind::Text),
            FieldDef::new("description", FieldKind::Text),
            FieldDef::new("isActive", FieldKind::Boolean),
            FieldDef::new("createdAt", FieldKind::Timestamp),
        ],
        default_sort: "createdAt",
    };

    #[test]
    fn test_defaults() {
        let options = parse_list_options(&ListQuery::default(), &BOTS, ListLimits::LISTING);
        assert_eq!(options.sort, SortOrder::asc("createdAt"));
        assert_eq!(options.page, 1);
        assert_eq!(options.limit, 20);
        assert_eq!(options.offset(), 0);
    }

    #[test]
    fn test_explicit_options() {
        let query = ListQuery::from([("sort", "name"), ("order", "-1"), ("page", "3"), ("limit", "10")]);
        let options = parse_list_options(&query, &BOTS, ListLimits::LISTING);
        assert_eq!(options.sort, SortOrder::new("name", Direction::Desc));
        assert_eq!(options.page, 3);
        assert_eq!(options.limit, 10);
        assert_eq!(options.offset(), 20);
    }

    #[test]
    fn test_malformed_paging_falls_back() {
        for (page, limit) in [("0", "0"), ("-2", "-5"), ("abc", "xyz"), ("", "")] {
            let query = ListQuery::from([("page", page), ("limit", limit)]);
            let options = parse_list_options(&query, &BOTS, ListLimits::LISTING);
            assert_eq!(options.page, 1);
            assert_eq!(options.limit, 20);
        }
    }

    #[test]
    fn test_huge_page_offset_stays_in_range() {
        let query = ListQuery::from([("page", "100000000000000000"), ("limit", "100")]);
        let options = parse_list_options(&query, &BOTS, ListLimits::LISTING);
        assert_eq!(options.page, 100_000_000_000_000_000);
        assert_eq!(options.offset(), MAX_ROW_OFFSET);
        assert!(i64::try_from(options.offset()).is_ok());
    }

    #[test]
    fn test_limit_is_capped() {
        let query = ListQuery::from([("limit", "5000")]);
        assert_eq!(parse_list_options(&query, &BOTS, ListLimits::LISTING).limit, 100);
        assert_eq!(parse_list_options(&query, &BOTS, ListLimits::EXPORT).limit, 5000);

        let all = parse_list_options(&ListQuery::default(), &BOTS, ListLimits::EXPORT);
        assert_eq!(all.limit, 99_999);
    }

    #[test]
    fn test_unknown_sort_falls_back_to_default() {
        let query = ListQuery::from([("sort", "password")]);
        let options = parse_list_options(&query, &BOTS, ListLimits::LISTING);
        assert_eq!(options.sort.field, "createdAt");
    }

    #[test]
    fn test_equality_filters_skip_unknown_and_unparsable() {
        let query = ListQuery::from([
            ("name", "alpha"),
            ("isActive", "yes-please"),
            ("password", "secret"),
            ("page", "2"),
        ]);
        assert_eq!(
            build_filter_predicate(&query, &BOTS),
            Some(Predicate::Eq("name", Value::Text("alpha".into())))
        );
    }

    #[test]
    fn test_no_conditions_gives_none() {
        let query = ListQuery::from([("bogus", "1"), ("limit", "5")]);
        assert_eq!(build_filter_predicate(&query, &BOTS), None);
    }

    #[test]
    fn test_search_over_text_fields() {
        let query = ListQuery::from([
            ("filter", "bot"),
            ("fields", "name, description,isActive,nope"),
            ("isActive", "true"),
        ]);
        assert_eq!(
            build_filter_predicate(&query, &BOTS),
            Some(Predicate::And(vec![
                Predicate::Eq("isActive", Value::Boolean(true)),
                Predicate::Or(vec![
                    Predicate::Contains("name", "bot".into()),
                    Predicate::Contains("description", "bot".into()),
                ]),
            ]))
        );
    }

    #[test]
    fn test_search_over_unknown_fields_is_dropped() {
        let query = ListQuery::from([("filter", "bot"), ("fields", "nope,password")]);
        assert_eq!(build_filter_predicate(&query, &BOTS), None);
    }

    #[test]
    fn test_search_requires_both_filter_and_fields() {
        let only_filter = ListQuery::from([("filter", "bot")]);
        assert_eq!(build_filter_predicate(&only_filter, &BOTS), None);

        let blank_filter = ListQuery::from([("filter", "  "), ("fields", "name")]);
        assert_eq!(build_filter_predicate(&blank_filter, &BOTS), None);
    }
}
