//! Font table access backed by `read-fonts`.
//!
//! The analysis modules only see the [`FontTables`] trait: the raw bytes of a
//! name record, and the script/language-system/feature records of a layout
//! table already lifted out of their offsets.

use std::path::Path;

use read_fonts::tables::layout::{FeatureList, LangSys, ScriptList};
use read_fonts::tables::name::NameRecord;
use read_fonts::types::Tag;
use read_fonts::{FontData, FontRef, Offset, ReadError, TableProvider};

use crate::error::ScanError;
use crate::tags::LayoutKind;

/// Language systems of one script record, as raw feature indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRecordView {
    pub tag: Tag,
    pub default_lang_sys: Option<Vec<u16>>,
    pub lang_systems: Vec<(Tag, Vec<u16>)>,
}

/// The script list and feature list of one GSUB or GPOS table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutRecords {
    pub scripts: Vec<ScriptRecordView>,
    pub feature_tags: Vec<Tag>,
}

/// Read access to the tables analysis needs.
pub trait FontTables {
    fn has_table(&self, tag: Tag) -> bool;

    /// Raw bytes of the first name record matching all three ids.
    ///
    /// `None` when no such record exists; `Some(Err(_))` when the record
    /// points outside the string storage.
    fn name_bytes(
        &self,
        name_id: u16,
        platform_id: u16,
        encoding_id: u16,
    ) -> Option<Result<Vec<u8>, ScanError>>;

    fn layout_records(&self, kind: LayoutKind) -> Result<LayoutRecords, ScanError>;
}

/// Owned sfnt bytes.
#[derive(Debug, Clone)]
pub struct LoadedFont {
    data: Vec<u8>,
}

impl LoadedFont {
    pub fn load(path: &Path) -> Result<Self, ScanError> {
        Ok(Self::from_bytes(std::fs::read(path)?))
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn tables(&self) -> Result<ReadFontsTables<'_>, ScanError> {
        Ok(ReadFontsTables {
            font: FontRef::new(&self.data)?,
        })
    }
}

pub struct ReadFontsTables<'a> {
    font: FontRef<'a>,
}

impl FontTables for ReadFontsTables<'_> {
    fn has_table(&self, tag: Tag) -> bool {
        self.font.table_data(tag).is_some()
    }

    fn name_bytes(
        &self,
        name_id: u16,
        platform_id: u16,
        encoding_id: u16,
    ) -> Option<Result<Vec<u8>, ScanError>> {
        let name = self.font.name().ok()?;
        let record = name.name_record().iter().find(|rec| {
            rec.name_id().to_u16() == name_id
                && rec.platform_id() == platform_id
                && rec.encoding_id() == encoding_id
        })?;

        let bytes = record_bytes(record, name.string_data()).map_err(|err| {
            ScanError::NameResolutionFailed {
                name_id,
                platform_id,
                encoding_id,
                reason: err.to_string(),
            }
        });
        Some(bytes)
    }

    fn layout_records(&self, kind: LayoutKind) -> Result<LayoutRecords, ScanError> {
        let malformed = |err: ReadError| kind.malformed(err.to_string());
        match kind {
            LayoutKind::Gsub => {
                let table = self.font.gsub().map_err(malformed)?;
                collect_records(kind, table.script_list(), table.feature_list())
            }
            LayoutKind::Gpos => {
                let table = self.font.gpos().map_err(malformed)?;
                collect_records(kind, table.script_list(), table.feature_list())
            }
        }
    }
}

/// Raw string bytes of `record` within the name table's storage area.
fn record_bytes(record: &NameRecord, data: FontData<'_>) -> Result<Vec<u8>, ReadError> {
    // `NameString` keeps its bytes private, and its UTF-16 decoding is lossy.
    record.string(data)?;
    let start = record.string_offset().non_null().unwrap_or(0);
    data.slice(start..start + record.length() as usize)
        .map(|bytes| bytes.as_bytes().to_vec())
        .ok_or(ReadError::OutOfBounds)
}

fn collect_records(
    kind: LayoutKind,
    script_list: Result<ScriptList<'_>, ReadError>,
    feature_list: Result<FeatureList<'_>, ReadError>,
) -> Result<LayoutRecords, ScanError> {
    let malformed = |err: ReadError| kind.malformed(err.to_string());
    let script_list = script_list.map_err(malformed)?;
    let feature_list = feature_list.map_err(malformed)?;

    let mut scripts = Vec::with_capacity(script_list.script_records().len());
    for record in script_list.script_records() {
        let script = record
            .script(script_list.offset_data())
            .map_err(malformed)?;

        let default_lang_sys = match script.default_lang_sys() {
            Some(lang_sys) => Some(feature_indices(&lang_sys.map_err(malformed)?)),
            None => None,
        };

        let mut lang_systems = Vec::with_capacity(script.lang_sys_records().len());
        for lang_record in script.lang_sys_records() {
            let lang_sys = lang_record
                .lang_sys(script.offset_data())
                .map_err(malformed)?;
            lang_systems.push((lang_record.lang_sys_tag(), feature_indices(&lang_sys)));
        }

        scripts.push(ScriptRecordView {
            tag: record.script_tag(),
            default_lang_sys,
            lang_systems,
        });
    }

    let feature_tags = feature_list
        .feature_records()
        .iter()
        .map(|rec| rec.feature_tag())
        .collect();

    Ok(LayoutRecords {
        scripts,
        feature_tags,
    })
}

/// Required feature first (when set), then the listed feature indices.
fn feature_indices(lang_sys: &LangSys<'_>) -> Vec<u16> {
    let required = lang_sys.required_feature_index();
    let listed = lang_sys.feature_indices();

    let mut indices = Vec::with_capacity(listed.len() + 1);
    if required != 0xFFFF {
        indices.push(required);
    }
    indices.extend(listed.iter().map(|idx| idx.get()));
    indices
}
