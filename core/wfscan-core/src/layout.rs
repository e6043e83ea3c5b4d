//! GSUB/GPOS feature extraction.

use std::collections::{BTreeMap, BTreeSet};

use read_fonts::types::Tag;
use serde::{Serialize, Serializer};

use crate::error::ScanError;
use crate::font::{FontTables, LayoutRecords};
use crate::tags::{tag_to_string, LayoutKind, DEFAULT_LANG_SYS};

/// script tag -> language-system tag -> feature indices, for one layout table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptLangFeatureMap {
    scripts: BTreeMap<Tag, BTreeMap<Tag, Vec<u16>>>,
}

impl ScriptLangFeatureMap {
    /// Build from script records; the default language system is keyed `dflt`.
    pub fn from_records(records: &LayoutRecords) -> Self {
        let mut scripts: BTreeMap<Tag, BTreeMap<Tag, Vec<u16>>> = BTreeMap::new();
        for script in &records.scripts {
            let langs = scripts.entry(script.tag).or_default();
            if let Some(indices) = &script.default_lang_sys {
                langs
                    .entry(DEFAULT_LANG_SYS)
                    .or_default()
                    .extend_from_slice(indices);
            }
            for (lang, indices) in &script.lang_systems {
                langs.entry(*lang).or_default().extend_from_slice(indices);
            }
        }
        Self { scripts }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tag, Tag, &[u16])> + '_ {
        self.scripts.iter().flat_map(|(script, langs)| {
            langs
                .iter()
                .map(move |(lang, indices)| (*script, *lang, indices.as_slice()))
        })
    }

    /// Map every index through `features`; any index past its end is an error.
    pub fn resolve(
        &self,
        kind: LayoutKind,
        features: &[Tag],
    ) -> Result<BTreeMap<Tag, BTreeMap<Tag, FeatureSet>>, ScanError> {
        let mut resolved: BTreeMap<Tag, BTreeMap<Tag, FeatureSet>> = BTreeMap::new();
        for (script, lang, indices) in self.iter() {
            let mut set = FeatureSet::default();
            for &index in indices {
                let tag = features.get(index as usize).ok_or_else(|| {
                    kind.malformed(format!(
                        "{}/{} references feature {index}, but the feature list has {} records",
                        tag_to_string(script),
                        tag_to_string(lang),
                        features.len()
                    ))
                })?;
                set.insert(*tag);
            }
            resolved.entry(script).or_default().insert(lang, set);
        }
        Ok(resolved)
    }
}

/// Deduplicated feature tags, iterated in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet(BTreeSet<Tag>);

impl FeatureSet {
    pub fn insert(&mut self, tag: Tag) -> bool {
        self.0.insert(tag)
    }

    pub fn extend(&mut self, other: &FeatureSet) {
        self.0.extend(other.0.iter().copied());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Tag> + '_ {
        self.0.iter().copied()
    }

    /// Tags joined with `", "`.
    pub fn joined(&self) -> String {
        self.iter().map(tag_to_string).collect::<Vec<_>>().join(", ")
    }
}

impl FromIterator<Tag> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for FeatureSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(tag_to_string))
    }
}

/// Features of one layout table: the font-wide union plus the per-script view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayoutReport {
    pub features: FeatureSet,
    #[serde(serialize_with = "serialize_by_script")]
    pub by_script: BTreeMap<Tag, BTreeMap<Tag, FeatureSet>>,
}

/// Extract the features of `kind`, or `None` if the font has no such table.
pub fn extract(
    font: &impl FontTables,
    kind: LayoutKind,
) -> Result<Option<LayoutReport>, ScanError> {
    if !font.has_table(kind.tag()) {
        return Ok(None);
    }

    let records = font.layout_records(kind)?;
    let map = ScriptLangFeatureMap::from_records(&records);
    let by_script = map.resolve(kind, &records.feature_tags)?;

    let mut features = FeatureSet::default();
    for set in by_script.values().flat_map(BTreeMap::values) {
        features.extend(set);
    }

    Ok(Some(LayoutReport {
        features,
        by_script,
    }))
}

fn serialize_by_script<S: Serializer>(
    by_script: &BTreeMap<Tag, BTreeMap<Tag, FeatureSet>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let rendered: BTreeMap<String, BTreeMap<String, &FeatureSet>> = by_script
        .iter()
        .map(|(script, langs)| {
            let langs = langs
                .iter()
                .map(|(lang, set)| (tag_to_string(*lang), set))
                .collect();
            (tag_to_string(*script), langs)
        })
        .collect();
    rendered.serialize(serializer)
}
