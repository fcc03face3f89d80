//! Lottery record shapes and the registry of supported lotteries
//!
//! Every supported lottery is described by a [`LotterySchema`]: the role of
//! each CSV column (index, date, optional draw time, primary numbers,
//! secondary numbers), the inclusive range of each number group and the
//! `chrono` format of the date column.
//!
//! The [`SchemaRegistry`] is built once at startup, either from the
//! built-in definitions or from built-ins overridden by configuration, and
//! is read-only afterwards.
//!
//! # Column layout
//!
//! ```text
//! index, date, [time], n1 .. nP, s1 .. sS
//! ```
//!
//! # Examples
//!
//! ```
//! use drawstat_analysis::schema::SchemaRegistry;
//!
//! let registry = SchemaRegistry::builtin();
//! let lotto = registry.lookup("lotto").unwrap();
//! assert_eq!(lotto.primary_count(), 6);
//! assert_eq!(lotto.columns()[..3], ["index", "date", "n1"]);
//! assert!(registry.lookup("bingo").is_err());
//! ```

use std::{collections::BTreeMap, fmt, ops::RangeInclusive, str::FromStr};

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

pub const INDEX_COLUMN: &str = "index";
pub const DATE_COLUMN: &str = "date";
pub const TIME_COLUMN: &str = "time";

/// Inclusive integer range of a number group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct NumberRange {
    pub min: u32,
    pub max: u32,
}

impl NumberRange {
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Every value of the range in ascending order.
    #[must_use]
    pub fn values(&self) -> RangeInclusive<u32> {
        self.min..=self.max
    }
}

impl fmt::Display for NumberRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// The two independently ranged number groups a lottery may draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumberGroup {
    Primary,
    Secondary,
}

impl NumberGroup {
    pub const ALL: [NumberGroup; 2] = [NumberGroup::Primary, NumberGroup::Secondary];

    /// Column name prefix (`n1`, `s1`, ...).
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            NumberGroup::Primary => "n",
            NumberGroup::Secondary => "s",
        }
    }

    /// Column name of the 0-based `position` in this group.
    #[must_use]
    pub fn column_name(self, position: usize) -> String {
        format!("{}{}", self.prefix(), position + 1)
    }

    /// Column name of the range bucket derived from the 0-based `position`.
    #[must_use]
    pub fn bucket_column_name(self, position: usize) -> String {
        format!("{}{}_bucket", self.prefix(), position + 1)
    }
}

impl fmt::Display for NumberGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberGroup::Primary => f.write_str("primary"),
            NumberGroup::Secondary => f.write_str("secondary"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown number group '{input}' (expected 'primary' or 'secondary')")]
pub struct ParseNumberGroupError {
    pub input: String,
}

impl FromStr for NumberGroup {
    type Err = ParseNumberGroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" | "n" => Ok(NumberGroup::Primary),
            "secondary" | "s" => Ok(NumberGroup::Secondary),
            _ => Err(ParseNumberGroupError {
                input: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SchemaError {
    #[display("lottery id must not be empty")]
    EmptyId,
    #[display("lottery '{id}': at least one primary number is required")]
    NoPrimaryNumbers { id: String },
    #[display("lottery '{id}': {group} range {range} has min above max")]
    InvertedRange {
        id: String,
        group: NumberGroup,
        range: NumberRange,
    },
    #[display("lottery '{id}': {count} secondary numbers declared without a secondary range")]
    MissingSecondaryRange { id: String, count: usize },
    #[display("lottery '{id}': invalid date format '{format}'")]
    InvalidDateFormat { id: String, format: String },
    #[display("lottery '{id}' is defined more than once")]
    DuplicateId { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown lottery '{id}' (known: {known})")]
pub struct UnknownLotteryError {
    pub id: String,
    pub known: String,
}

/// Serialized form of a [`LotterySchema`], as written in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LotterySchemaDef {
    pub id: String,
    pub name: String,
    /// `chrono` strftime format of the date column, e.g. `%d.%m.%Y` for `DD.MM.YYYY`.
    pub date_format: String,
    #[serde(default)]
    pub has_time: bool,
    pub primary_count: usize,
    pub primary_range: NumberRange,
    #[serde(default)]
    pub secondary_count: usize,
    #[serde(default)]
    pub secondary_range: Option<NumberRange>,
}

/// Validated description of one lottery's record shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "LotterySchemaDef", into = "LotterySchemaDef")]
pub struct LotterySchema {
    def: LotterySchemaDef,
    columns: Vec<String>,
}

impl LotterySchema {
    /// Validates a definition and derives its column layout.
    pub fn new(def: LotterySchemaDef) -> Result<Self, SchemaError> {
        if def.id.trim().is_empty() {
            return Err(SchemaError::EmptyId);
        }
        if def.primary_count == 0 {
            return Err(SchemaError::NoPrimaryNumbers { id: def.id });
        }
        let ranges = [
            (NumberGroup::Primary, Some(def.primary_range)),
            (NumberGroup::Secondary, def.secondary_range),
        ];
        for (group, range) in ranges {
            if let Some(range) = range.filter(|r| r.min > r.max) {
                return Err(SchemaError::InvertedRange {
                    id: def.id,
                    group,
                    range,
                });
            }
        }
        if def.secondary_count > 0 && def.secondary_range.is_none() {
            return Err(SchemaError::MissingSecondaryRange {
                count: def.secondary_count,
                id: def.id,
            });
        }
        let format_is_valid = !def.date_format.is_empty()
            && StrftimeItems::new(&def.date_format).all(|item| !matches!(item, Item::Error));
        if !format_is_valid {
            return Err(SchemaError::InvalidDateFormat {
                format: def.date_format,
                id: def.id,
            });
        }
        Ok(Self::build(def))
    }

    fn build(def: LotterySchemaDef) -> Self {
        let mut columns = vec![INDEX_COLUMN.to_owned(), DATE_COLUMN.to_owned()];
        if def.has_time {
            columns.push(TIME_COLUMN.to_owned());
        }
        columns.extend((0..def.primary_count).map(|k| NumberGroup::Primary.column_name(k)));
        columns.extend((0..def.secondary_count).map(|k| NumberGroup::Secondary.column_name(k)));
        debug_assert_eq!(
            columns.len(),
            2 + usize::from(def.has_time) + def.primary_count + def.secondary_count
        );
        Self { def, columns }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.def.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.def.name
    }

    #[must_use]
    pub fn date_format(&self) -> &str {
        &self.def.date_format
    }

    #[must_use]
    pub fn has_time(&self) -> bool {
        self.def.has_time
    }

    #[must_use]
    pub fn primary_count(&self) -> usize {
        self.def.primary_count
    }

    #[must_use]
    pub fn primary_range(&self) -> NumberRange {
        self.def.primary_range
    }

    #[must_use]
    pub fn secondary_count(&self) -> usize {
        self.def.secondary_count
    }

    #[must_use]
    pub fn secondary_range(&self) -> Option<NumberRange> {
        self.def.secondary_range
    }

    #[must_use]
    pub fn count(&self, group: NumberGroup) -> usize {
        match group {
            NumberGroup::Primary => self.primary_count(),
            NumberGroup::Secondary => self.secondary_count(),
        }
    }

    /// Range of `group`; `None` for a secondary group the lottery does not draw.
    #[must_use]
    pub fn range(&self, group: NumberGroup) -> Option<NumberRange> {
        match group {
            NumberGroup::Primary => Some(self.primary_range()),
            NumberGroup::Secondary => self.secondary_range(),
        }
    }

    /// Raw column names in file order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn time_position(&self) -> Option<usize> {
        self.has_time().then_some(2)
    }

    /// Raw column position of the 0-based `position` within `group`.
    #[must_use]
    pub fn number_position(&self, group: NumberGroup, position: usize) -> usize {
        let first_primary = 2 + usize::from(self.has_time());
        match group {
            NumberGroup::Primary => first_primary + position,
            NumberGroup::Secondary => first_primary + self.primary_count() + position,
        }
    }
}

impl TryFrom<LotterySchemaDef> for LotterySchema {
    type Error = SchemaError;

    fn try_from(def: LotterySchemaDef) -> Result<Self, Self::Error> {
        Self::new(def)
    }
}

impl From<LotterySchema> for LotterySchemaDef {
    fn from(schema: LotterySchema) -> Self {
        schema.def
    }
}

fn builtin_defs() -> [LotterySchemaDef; 4] {
    let def = |id: &str,
               name: &str,
               has_time: bool,
               primary: (usize, NumberRange),
               secondary: (usize, Option<NumberRange>)| LotterySchemaDef {
        id: id.to_owned(),
        name: name.to_owned(),
        date_format: "%d.%m.%Y".to_owned(),
        has_time,
        primary_count: primary.0,
        primary_range: primary.1,
        secondary_count: secondary.0,
        secondary_range: secondary.1,
    };
    [
        def(
            "lotto",
            "Lotto 6aus49",
            false,
            (6, NumberRange::new(1, 49)),
            (1, Some(NumberRange::new(0, 9))),
        ),
        def(
            "eurojackpot",
            "Eurojackpot",
            false,
            (5, NumberRange::new(1, 50)),
            (2, Some(NumberRange::new(1, 12))),
        ),
        def(
            "eurodreams",
            "EuroDreams",
            false,
            (6, NumberRange::new(1, 40)),
            (1, Some(NumberRange::new(1, 5))),
        ),
        def(
            "keno",
            "KENO",
            true,
            (20, NumberRange::new(1, 70)),
            (0, None),
        ),
    ]
}

/// Immutable lookup table of the supported lotteries, keyed by id.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, LotterySchema>,
}

impl SchemaRegistry {
    /// Registry of the lotteries supported out of the box.
    #[must_use]
    pub fn builtin() -> Self {
        let schemas = builtin_defs()
            .into_iter()
            .map(|def| (def.id.clone(), LotterySchema::build(def)))
            .collect();
        Self { schemas }
    }

    pub fn from_schemas<I>(schemas: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = LotterySchema>,
    {
        let mut map = BTreeMap::new();
        for schema in schemas {
            let id = schema.id().to_owned();
            if map.insert(id.clone(), schema).is_some() {
                return Err(SchemaError::DuplicateId { id });
            }
        }
        Ok(Self { schemas: map })
    }

    /// Replaces schemas with the same id and adds new ones.
    ///
    /// Each override is validated; an id appearing twice among `overrides` is an error.
    pub fn with_overrides<I>(mut self, overrides: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = LotterySchema>,
    {
        let overrides = Self::from_schemas(overrides)?;
        self.schemas.extend(overrides.schemas);
        Ok(self)
    }

    pub fn lookup(&self, id: &str) -> Result<&LotterySchema, UnknownLotteryError> {
        self.schemas.get(id).ok_or_else(|| UnknownLotteryError {
            id: id.to_owned(),
            known: self.ids().collect::<Vec<_>>().join(", "),
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LotterySchema> {
        self.schemas.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lotto_def() -> LotterySchemaDef {
        builtin_defs()
            .into_iter()
            .find(|def| def.id == "lotto")
            .unwrap()
    }

    #[test]
    fn test_builtin_definitions_are_valid() {
        for def in builtin_defs() {
            let schema = LotterySchema::new(def.clone()).unwrap();
            assert_eq!(schema, LotterySchema::build(def));
        }
    }

    #[test]
    fn test_column_count_invariant() {
        for schema in SchemaRegistry::builtin().iter() {
            let time = usize::from(schema.has_time());
            assert_eq!(
                schema.columns().len(),
                2 + time + schema.primary_count() + schema.secondary_count()
            );
            assert_eq!(schema.columns()[0], INDEX_COLUMN);
            assert_eq!(schema.columns()[1], DATE_COLUMN);
        }
    }

    #[test]
    fn test_number_positions_match_columns() {
        let registry = SchemaRegistry::builtin();
        for schema in registry.iter() {
            for group in NumberGroup::ALL {
                for k in 0..schema.count(group) {
                    let pos = schema.number_position(group, k);
                    assert_eq!(schema.columns()[pos], group.column_name(k));
                }
            }
        }
        let keno = registry.lookup("keno").unwrap();
        assert_eq!(keno.time_position(), Some(2));
        assert_eq!(keno.columns()[2], TIME_COLUMN);
    }

    #[test]
    fn test_lookup_unknown_lists_known_ids() {
        let err = SchemaRegistry::builtin().lookup("bingo").unwrap_err();
        assert_eq!(err.id, "bingo");
        assert_eq!(err.known, "eurodreams, eurojackpot, keno, lotto");
    }

    #[test]
    fn test_validation_errors() {
        let mut def = lotto_def();
        def.primary_count = 0;
        assert!(matches!(
            LotterySchema::new(def),
            Err(SchemaError::NoPrimaryNumbers { .. })
        ));

        let mut def = lotto_def();
        def.primary_range = NumberRange::new(50, 1);
        assert!(matches!(
            LotterySchema::new(def),
            Err(SchemaError::InvertedRange {
                group: NumberGroup::Primary,
                ..
            })
        ));

        let mut def = lotto_def();
        def.secondary_range = None;
        assert!(matches!(
            LotterySchema::new(def),
            Err(SchemaError::MissingSecondaryRange { count: 1, .. })
        ));

        let mut def = lotto_def();
        def.date_format = "%d.%Q".to_owned();
        assert!(matches!(
            LotterySchema::new(def),
            Err(SchemaError::InvalidDateFormat { .. })
        ));

        let mut def = lotto_def();
        def.id = " ".to_owned();
        assert_eq!(LotterySchema::new(def), Err(SchemaError::EmptyId));
    }

    #[test]
    fn test_overrides_replace_and_add() {
        let mut replaced = lotto_def();
        replaced.name = "Lotto (custom)".to_owned();
        let mut added = lotto_def();
        added.id = "minilotto".to_owned();
        added.primary_count = 5;
        added.secondary_count = 0;
        added.secondary_range = None;

        let registry = SchemaRegistry::builtin()
            .with_overrides([
                LotterySchema::new(replaced).unwrap(),
                LotterySchema::new(added).unwrap(),
            ])
            .unwrap();
        assert_eq!(registry.lookup("lotto").unwrap().name(), "Lotto (custom)");
        assert_eq!(registry.lookup("minilotto").unwrap().columns().len(), 7);
        assert_eq!(registry.ids().count(), 5);
    }

    #[test]
    fn test_duplicate_override_ids() {
        let schema = LotterySchema::new(lotto_def()).unwrap();
        let err = SchemaRegistry::builtin()
            .with_overrides([schema.clone(), schema])
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateId {
                id: "lotto".to_owned()
            }
        );
    }

    #[test]
    fn test_schema_deserialization_validates() {
        let json = r#"{
            "id": "pick3",
            "name": "Pick 3",
            "date_format": "%Y-%m-%d",
            "primary_count": 3,
            "primary_range": { "min": 0, "max": 9 }
        }"#;
        let schema: LotterySchema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.columns(), ["index", "date", "n1", "n2", "n3"]);
        assert_eq!(schema.range(NumberGroup::Secondary), None);

        let invalid = json.replace("\"primary_count\": 3", "\"primary_count\": 0");
        assert!(serde_json::from_str::<LotterySchema>(&invalid).is_err());
    }

    #[test]
    fn test_number_group_parsing() {
        assert_eq!("primary".parse::<NumberGroup>().unwrap(), NumberGroup::Primary);
        assert_eq!("s".parse::<NumberGroup>().unwrap(), NumberGroup::Secondary);
        assert!("bonus".parse::<NumberGroup>().is_err());
    }
}
