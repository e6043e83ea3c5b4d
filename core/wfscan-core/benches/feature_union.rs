//! Criterion benchmark for resolving a large script/language map against its feature list.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use read_fonts::types::Tag;
use wfscan_core::font::{LayoutRecords, ScriptRecordView};
use wfscan_core::layout::ScriptLangFeatureMap;
use wfscan_core::tags::LayoutKind;

fn synthetic_records() -> LayoutRecords {
    let feature_tags: Vec<Tag> = (0..200u16)
        .map(|i| Tag::new(&[b'f', b'0' + (i / 100) as u8, b'0' + (i / 10 % 10) as u8, b'0' + (i % 10) as u8]))
        .collect();

    let scripts = (0..40u8)
        .map(|s| ScriptRecordView {
            tag: Tag::new(&[b's', b'c', b'a' + s / 26, b'a' + s % 26]),
            default_lang_sys: Some((0..50).collect()),
            lang_systems: (0..20u8)
                .map(|l| {
                    let lang = Tag::new(&[b'L', b'a' + l, b' ', b' ']);
                    let indices = (0..30).map(|i| (i * 7 + l as u16) % 200).collect();
                    (lang, indices)
                })
                .collect(),
        })
        .collect();

    LayoutRecords {
        scripts,
        feature_tags,
    }
}

fn bench_resolve(c: &mut Criterion) {
    let records = synthetic_records();
    let map = ScriptLangFeatureMap::from_records(&records);

    c.bench_function("ScriptLangFeatureMap::resolve", |b| {
        b.iter(|| {
            map.resolve(LayoutKind::Gsub, black_box(&records.feature_tags))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
