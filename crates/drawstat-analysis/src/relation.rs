//! Named column pairs to correlate
//!
//! A [`RelationCatalogue`] is an ordered list of [`RelationSpec`]s. It is
//! independent of any lottery schema: the scanner skips relations naming
//! columns a table does not have, so one catalogue can serve every lottery.
//!
//! In configuration files a catalogue is a JSON object mapping each relation
//! name to its two column names; document order is kept.
//!
//! ```
//! use drawstat_analysis::relation::RelationCatalogue;
//!
//! let catalogue: RelationCatalogue = serde_json::from_str(
//!     r#"{
//!         "first number vs moon": ["n1", "dist_earth_moon"],
//!         "bonus vs weekday": ["s1", "day_of_week"]
//!     }"#,
//! )
//! .unwrap();
//! let names = catalogue.iter().map(|r| r.name.as_str()).collect::<Vec<_>>();
//! assert_eq!(names, ["first number vs moon", "bonus vs weekday"]);
//! ```

use std::{collections::HashSet, fmt};

use drawstat_ephemeris::BodyPair;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, MapAccess, Visitor},
    ser::SerializeMap as _,
};

use crate::{
    calendar::CalendarField,
    schema::{NumberGroup, SchemaRegistry},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RelationSpec {
    pub name: String,
    pub field_a: String,
    pub field_b: String,
}

impl RelationSpec {
    pub fn new(
        name: impl Into<String>,
        field_a: impl Into<String>,
        field_b: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            field_a: field_a.into(),
            field_b: field_b.into(),
        }
    }

    /// A relation named `"<a> vs <b>"`.
    pub fn between(field_a: impl Into<String>, field_b: impl Into<String>) -> Self {
        let (field_a, field_b) = (field_a.into(), field_b.into());
        Self {
            name: format!("{field_a} vs {field_b}"),
            field_a,
            field_b,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationCatalogue {
    relations: Vec<RelationSpec>,
}

impl RelationCatalogue {
    #[must_use]
    pub fn new(relations: Vec<RelationSpec>) -> Self {
        Self { relations }
    }

    /// Every `a` column against every `b` column, `a`-major.
    pub fn cross<A, B>(fields_a: A, fields_b: B) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        B: IntoIterator,
        B::Item: AsRef<str>,
    {
        let fields_b = fields_b
            .into_iter()
            .map(|b| b.as_ref().to_owned())
            .collect::<Vec<_>>();
        fields_a
            .into_iter()
            .flat_map(|a| {
                let a = a.as_ref().to_owned();
                fields_b
                    .iter()
                    .map(move |b| RelationSpec::between(a.clone(), b.clone()))
            })
            .collect()
    }

    /// Every drawn number (and its range bucket) against every calendar
    /// feature and the distance column of each body pair.
    ///
    /// Number positions run up to the largest group size of any lottery in
    /// `registry`, so one catalogue covers all of them.
    #[must_use]
    pub fn default_catalogue(registry: &SchemaRegistry, pairs: &[BodyPair]) -> Self {
        let numbers = NumberGroup::ALL
            .into_iter()
            .flat_map(|group| {
                let positions = registry
                    .iter()
                    .map(|schema| schema.count(group))
                    .max()
                    .unwrap_or(0);
                (0..positions).map(move |k| (group, k))
            })
            .collect::<Vec<_>>();
        let targets = CalendarField::ALL
            .into_iter()
            .map(|f| f.column_name().to_owned())
            .chain(pairs.iter().map(BodyPair::column_name))
            .collect::<Vec<_>>();

        let mut catalogue = Self::cross(
            numbers.iter().map(|&(group, k)| group.column_name(k)),
            &targets,
        );
        catalogue.extend(Self::cross(
            numbers.iter().map(|&(group, k)| group.bucket_column_name(k)),
            pairs.iter().map(BodyPair::column_name),
        ));
        catalogue
    }

    pub fn iter(&self) -> impl Iterator<Item = &RelationSpec> {
        self.relations.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

impl FromIterator<RelationSpec> for RelationCatalogue {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = RelationSpec>,
    {
        Self::new(iter.into_iter().collect())
    }
}

impl Extend<RelationSpec> for RelationCatalogue {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = RelationSpec>,
    {
        self.relations.extend(iter);
    }
}

impl IntoIterator for RelationCatalogue {
    type Item = RelationSpec;
    type IntoIter = std::vec::IntoIter<RelationSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.relations.into_iter()
    }
}

impl<'a> IntoIterator for &'a RelationCatalogue {
    type Item = &'a RelationSpec;
    type IntoIter = std::slice::Iter<'a, RelationSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.relations.iter()
    }
}

impl Serialize for RelationCatalogue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.relations.len()))?;
        for relation in &self.relations {
            map.serialize_entry(&relation.name, &(&relation.field_a, &relation.field_b))?;
        }
        map.end()
    }
}

struct CatalogueVisitor;

impl<'de> Visitor<'de> for CatalogueVisitor {
    type Value = RelationCatalogue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from relation name to a pair of column names")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut seen = HashSet::new();
        let mut relations = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, (field_a, field_b))) =
            access.next_entry::<String, (String, String)>()?
        {
            if !seen.insert(name.clone()) {
                return Err(de::Error::custom(format!("duplicate relation '{name}'")));
            }
            relations.push(RelationSpec {
                name,
                field_a,
                field_b,
            });
        }
        Ok(RelationCatalogue::new(relations))
    }
}

impl<'de> Deserialize<'de> for RelationCatalogue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CatalogueVisitor)
    }
}
