// Cross-category join of normalized forecast records
use super::forecast::{
    ConditionsRecord, ForecastCategory, ForecastRecord, JoinKey, MergedRecord, SURF_LOCATION,
    TIMESTAMP, WaveRecord,
};
use super::normalizer::CONDITIONS_COLUMNS;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Records of one category, labelled for column disambiguation.
#[derive(Debug, Clone, Copy)]
pub struct CategoryTable<'a> {
    pub category: ForecastCategory,
    pub records: &'a [ForecastRecord],
}

impl<'a> CategoryTable<'a> {
    pub fn new(category: ForecastCategory, records: &'a [ForecastRecord]) -> Self {
        Self { category, records }
    }
}

/// Joins the four mandatory categories on `(timestamp, surf_location)` and
/// left-joins conditions when given.
pub fn merge_categories(
    wave: &[WaveRecord],
    wind: &[ForecastRecord],
    tide: &[ForecastRecord],
    weather: &[ForecastRecord],
    conditions: Option<&[ConditionsRecord]>,
) -> Vec<MergedRecord> {
    let required = [
        CategoryTable::new(ForecastCategory::Wave, wave),
        CategoryTable::new(ForecastCategory::Wind, wind),
        CategoryTable::new(ForecastCategory::Tides, tide),
        CategoryTable::new(ForecastCategory::Weather, weather),
    ];
    let optional: Vec<CategoryTable> = conditions
        .map(|records| CategoryTable::new(ForecastCategory::Conditions, records))
        .into_iter()
        .collect();

    merge_tables(&required, &optional)
}

/// Inner-joins `required`, then left-joins each of `optional`.
///
/// Non-key columns present in more than one table are renamed
/// `{column}_{suffix}` in every table that has them. Rows come out sorted by
/// join key, so the result does not depend on table order. Within a table the
/// first row for a key wins.
pub fn merge_tables(required: &[CategoryTable], optional: &[CategoryTable]) -> Vec<MergedRecord> {
    let indexed: Vec<IndexedTable> = required
        .iter()
        .chain(optional.iter())
        .map(IndexedTable::build)
        .collect();

    let mut column_counts: HashMap<&str, usize> = HashMap::new();
    for table in &indexed {
        for column in &table.columns {
            *column_counts.entry(column.as_str()).or_default() += 1;
        }
    }

    let Some((first, rest)) = indexed[..required.len()].split_first() else {
        return Vec::new();
    };
    let keys: Vec<&JoinKey> = first
        .rows
        .keys()
        .filter(|key| rest.iter().all(|table| table.rows.contains_key(*key)))
        .collect();

    keys.into_iter()
        .map(|key| {
            let mut merged = MergedRecord::default();
            merged.insert(TIMESTAMP, key.timestamp);
            merged.insert(SURF_LOCATION, key.surf_location.as_str());

            for table in &indexed {
                let row = table.rows.get(key);
                for column in &table.columns {
                    let name = if column_counts.get(column.as_str()).copied().unwrap_or(0) > 1 {
                        format!("{}_{}", column, table.category.column_suffix())
                    } else {
                        column.clone()
                    };
                    let value = row
                        .and_then(|r| r.get(column))
                        .cloned()
                        .unwrap_or(Value::Null);
                    merged.insert(name, value);
                }
            }

            merged
        })
        .collect()
}

struct IndexedTable<'a> {
    category: ForecastCategory,
    rows: BTreeMap<JoinKey, &'a ForecastRecord>,
    columns: BTreeSet<String>,
}

impl<'a> IndexedTable<'a> {
    fn build(table: &CategoryTable<'a>) -> Self {
        let mut rows = BTreeMap::new();
        let mut columns: BTreeSet<String> = BTreeSet::new();
        // Derived conditions columns exist even when no conditions row does
        if table.category == ForecastCategory::Conditions {
            columns.extend(CONDITIONS_COLUMNS.iter().map(|c| c.to_string()));
        }

        for record in table.records {
            let Some(key) = record.join_key() else {
                tracing::debug!(category = %table.category, "Skipping record without join key");
                continue;
            };
            rows.entry(key).or_insert(record);
            columns.extend(
                record
                    .field_names()
                    .filter(|name| *name != TIMESTAMP && *name != SURF_LOCATION)
                    .map(str::to_string),
            );
        }

        Self {
            category: table.category,
            rows,
            columns,
        }
    }
}
