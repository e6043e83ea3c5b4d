//! Synthetic font fixtures: tiny sfnts with `name`, `GSUB` and `GPOS`, wrapped as WOFF.
#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, SystemTime};

use flate2::write::ZlibEncoder;
use flate2::Compression;

pub const TRUETYPE: [u8; 4] = [0, 1, 0, 0];
pub const POSTSCRIPT: [u8; 4] = *b"OTTO";

pub fn init_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

fn push_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn tag_bytes(tag: &str) -> [u8; 4] {
    let mut buf = [b' '; 4];
    buf[..tag.len()].copy_from_slice(tag.as_bytes());
    buf
}

pub fn utf16be(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(u16::to_be_bytes).collect()
}

/// A script with its language systems; the language tag `dflt` marks the default.
pub type ScriptSpec<'a> = (&'a str, Vec<(&'a str, Vec<u16>)>);

fn lang_sys(indices: &[u16]) -> Vec<u8> {
    let mut out = Vec::new();
    push_u16(&mut out, 0);
    push_u16(&mut out, 0xFFFF);
    push_u16(&mut out, indices.len() as u16);
    for &idx in indices {
        push_u16(&mut out, idx);
    }
    out
}

fn script_table(langs: &[(&str, Vec<u16>)]) -> Vec<u8> {
    let default = langs.iter().find(|(tag, _)| *tag == "dflt");
    let named: Vec<_> = langs.iter().filter(|(tag, _)| *tag != "dflt").collect();
    let header_len = 4 + 6 * named.len();

    let mut head = Vec::new();
    let mut body = Vec::new();
    match default {
        Some((_, indices)) => {
            push_u16(&mut head, (header_len + body.len()) as u16);
            body.extend(lang_sys(indices));
        }
        None => push_u16(&mut head, 0),
    }
    push_u16(&mut head, named.len() as u16);
    for (tag, indices) in named {
        head.extend_from_slice(&tag_bytes(tag));
        push_u16(&mut head, (header_len + body.len()) as u16);
        body.extend(lang_sys(indices));
    }
    head.extend(body);
    head
}

/// Encode a GSUB/GPOS table with the given scripts and feature list (no lookups).
pub fn layout_table(scripts: &[ScriptSpec<'_>], features: &[&str]) -> Vec<u8> {
    let mut script_list = Vec::new();
    let header_len = 2 + 6 * scripts.len();
    let mut bodies = Vec::new();
    push_u16(&mut script_list, scripts.len() as u16);
    for (tag, langs) in scripts {
        script_list.extend_from_slice(&tag_bytes(tag));
        push_u16(&mut script_list, (header_len + bodies.len()) as u16);
        bodies.extend(script_table(langs));
    }
    script_list.extend(bodies);

    let mut feature_list = Vec::new();
    let records_len = 2 + 6 * features.len();
    push_u16(&mut feature_list, features.len() as u16);
    for (i, tag) in features.iter().enumerate() {
        feature_list.extend_from_slice(&tag_bytes(tag));
        push_u16(&mut feature_list, (records_len + 4 * i) as u16);
    }
    for _ in features {
        push_u16(&mut feature_list, 0);
        push_u16(&mut feature_list, 0);
    }

    let script_off = 10;
    let feature_off = script_off + script_list.len();
    let lookup_off = feature_off + feature_list.len();

    let mut out = Vec::new();
    push_u16(&mut out, 1);
    push_u16(&mut out, 0);
    push_u16(&mut out, script_off as u16);
    push_u16(&mut out, feature_off as u16);
    push_u16(&mut out, lookup_off as u16);
    out.extend(script_list);
    out.extend(feature_list);
    push_u16(&mut out, 0);
    out
}

/// (platform, encoding, language, name id, raw string bytes)
pub type NameSpec = (u16, u16, u16, u16, Vec<u8>);

pub fn name_table(records: &[NameSpec]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut storage = Vec::new();
    push_u16(&mut out, 0);
    push_u16(&mut out, records.len() as u16);
    push_u16(&mut out, (6 + 12 * records.len()) as u16);
    for (platform, encoding, language, name_id, bytes) in records {
        push_u16(&mut out, *platform);
        push_u16(&mut out, *encoding);
        push_u16(&mut out, *language);
        push_u16(&mut out, *name_id);
        push_u16(&mut out, bytes.len() as u16);
        push_u16(&mut out, storage.len() as u16);
        storage.extend_from_slice(bytes);
    }
    out.extend(storage);
    out
}

/// Name table with a full name (ID 6) under both the Mac and Windows platforms.
pub fn full_name_table(name: &str) -> Vec<u8> {
    name_table(&[
        (1, 0, 0, 6, name.as_bytes().to_vec()),
        (3, 1, 0x409, 6, utf16be(name)),
    ])
}

fn sorted(tables: &[(&str, Vec<u8>)]) -> Vec<([u8; 4], Vec<u8>)> {
    let mut tables: Vec<_> = tables
        .iter()
        .map(|(tag, data)| (tag_bytes(tag), data.clone()))
        .collect();
    tables.sort_by(|a, b| a.0.cmp(&b.0));
    tables
}

/// A bare sfnt holding exactly `tables`.
pub fn sfnt(flavor: [u8; 4], tables: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let tables = sorted(tables);
    let n = tables.len() as u16;
    let selector = 15 - n.leading_zeros() as u16;
    let range = (1u16 << selector) * 16;

    let mut out = Vec::new();
    out.extend_from_slice(&flavor);
    push_u16(&mut out, n);
    push_u16(&mut out, range);
    push_u16(&mut out, selector);
    push_u16(&mut out, n * 16 - range);

    let mut offset = 12 + 16 * tables.len();
    let mut body = Vec::new();
    for (tag, data) in &tables {
        out.extend_from_slice(tag);
        push_u32(&mut out, 0);
        push_u32(&mut out, offset as u32);
        push_u32(&mut out, data.len() as u32);
        body.extend_from_slice(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + 16 * tables.len() + body.len();
    }
    out.extend(body);
    out
}

/// Wrap `tables` as a WOFF 1.0 container, zlib-compressing each when `compress`.
pub fn woff(flavor: [u8; 4], tables: &[(&str, Vec<u8>)], compress: bool) -> Vec<u8> {
    let tables = sorted(tables);
    let dir_end = 44 + 20 * tables.len();

    let mut out = Vec::new();
    out.extend_from_slice(b"wOFF");
    out.extend_from_slice(&flavor);
    push_u32(&mut out, 0); // length, patched below
    push_u16(&mut out, tables.len() as u16);
    push_u16(&mut out, 0);
    push_u32(&mut out, 0); // totalSfntSize
    push_u16(&mut out, 1);
    push_u16(&mut out, 0);
    for _ in 0..5 {
        push_u32(&mut out, 0);
    }

    let mut body = Vec::new();
    for (tag, data) in &tables {
        let stored = if compress {
            let mut enc = ZlibEncoder::new(Vec::new(), Compression::best());
            enc.write_all(data).expect("deflate");
            let packed = enc.finish().expect("deflate");
            if packed.len() < data.len() {
                packed
            } else {
                data.clone()
            }
        } else {
            data.clone()
        };

        out.extend_from_slice(tag);
        push_u32(&mut out, (dir_end + body.len()) as u32);
        push_u32(&mut out, stored.len() as u32);
        push_u32(&mut out, data.len() as u32);
        push_u32(&mut out, 0);
        body.extend(stored);
        while body.len() % 4 != 0 {
            body.push(0);
        }
    }
    out.extend(body);
    let len = out.len() as u32;
    out[8..12].copy_from_slice(&len.to_be_bytes());
    out
}

/// A named TrueType-flavored WOFF with optional layout tables.
pub fn sample_woff(name: &str, gsub: Option<Vec<u8>>, gpos: Option<Vec<u8>>) -> Vec<u8> {
    let mut tables = vec![("name", full_name_table(name))];
    if let Some(gsub) = gsub {
        tables.push(("GSUB", gsub));
    }
    if let Some(gpos) = gpos {
        tables.push(("GPOS", gpos));
    }
    woff(TRUETYPE, &tables, true)
}

/// GSUB with one `latn` script whose default language system uses `features` in order.
pub fn simple_layout(features: &[&str]) -> Vec<u8> {
    let indices: Vec<u16> = (0..features.len() as u16).collect();
    layout_table(&[("latn", vec![("dflt", indices)])], features)
}

pub fn write_aged(path: &Path, bytes: &[u8], age: Duration) {
    fs::write(path, bytes).expect("write fixture");
    File::options()
        .write(true)
        .open(path)
        .expect("open fixture")
        .set_modified(SystemTime::now() - age)
        .expect("set mtime");
}
