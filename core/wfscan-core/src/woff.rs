//! WOFF 1.0 to sfnt conversion.
//!
//! The container is a 44-byte header, a directory of 20-byte table entries and
//! the table payloads, each either zlib-compressed or stored verbatim. The
//! rebuilt sfnt keeps the original `flavor` as its version tag and lays the
//! tables out tag-sorted on 4-byte boundaries.

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::error::ScanError;

const HEADER_LEN: usize = 44;
const DIR_ENTRY_LEN: usize = 20;
const SFNT_HEADER_LEN: usize = 12;
const SFNT_RECORD_LEN: usize = 16;
// Largest count whose sfnt record array still fits the u16 `rangeShift` math.
const MAX_TABLES: usize = 4095;
// Pre-allocation bound for one inflated table, as a multiple of its stored size.
const MAX_INFLATE_RATIO: usize = 64;

/// Converts a compressed web-font container into outline-font bytes.
pub trait Decompressor: Send + Sync {
    fn decompress(&self, container: &[u8]) -> Result<Vec<u8>, ScanError>;
}

/// zlib-backed WOFF 1.0 decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct WoffDecompressor;

struct TableEntry {
    tag: [u8; 4],
    offset: usize,
    comp_length: usize,
    orig_length: usize,
    checksum: u32,
}

impl Decompressor for WoffDecompressor {
    fn decompress(&self, container: &[u8]) -> Result<Vec<u8>, ScanError> {
        if container.len() < HEADER_LEN {
            return Err(ScanError::truncated(container, 0, HEADER_LEN));
        }

        let flavor = be_u32(container, 4)?;
        let num_tables = be_u16(container, 12)? as usize;
        let total_sfnt_size = be_u32(container, 16)? as usize;
        if num_tables == 0 || num_tables > MAX_TABLES {
            return Err(ScanError::MalformedContainer(format!(
                "implausible table count {num_tables}"
            )));
        }

        let mut entries = Vec::with_capacity(num_tables);
        for i in 0..num_tables {
            let at = HEADER_LEN + i * DIR_ENTRY_LEN;
            let raw = slice(container, at, DIR_ENTRY_LEN)?;
            entries.push(TableEntry {
                tag: [raw[0], raw[1], raw[2], raw[3]],
                offset: be_u32(raw, 4)? as usize,
                comp_length: be_u32(raw, 8)? as usize,
                orig_length: be_u32(raw, 12)? as usize,
                checksum: be_u32(raw, 16)?,
            });
        }
        entries.sort_by(|a, b| a.tag.cmp(&b.tag));

        let mut sfnt = Vec::with_capacity(total_sfnt_size.min(container.len() * 8));
        write_offset_table(&mut sfnt, flavor, num_tables as u16);

        let mut tables = Vec::with_capacity(num_tables);
        let mut data_offset = SFNT_HEADER_LEN + num_tables * SFNT_RECORD_LEN;
        for entry in &entries {
            let data = inflate_table(container, entry)?;
            sfnt.extend_from_slice(&entry.tag);
            sfnt.extend_from_slice(&entry.checksum.to_be_bytes());
            sfnt.extend_from_slice(&(data_offset as u32).to_be_bytes());
            sfnt.extend_from_slice(&(data.len() as u32).to_be_bytes());
            data_offset += padded(data.len());
            tables.push(data);
        }

        for data in tables {
            let pad = padded(data.len()) - data.len();
            sfnt.extend_from_slice(&data);
            sfnt.extend(std::iter::repeat(0u8).take(pad));
        }

        Ok(sfnt)
    }
}

fn inflate_table(container: &[u8], entry: &TableEntry) -> Result<Vec<u8>, ScanError> {
    let tag = String::from_utf8_lossy(&entry.tag);
    let stored = slice(container, entry.offset, entry.comp_length)?;

    if entry.comp_length > entry.orig_length {
        return Err(ScanError::MalformedContainer(format!(
            "table {tag} compressed length {} exceeds original length {}",
            entry.comp_length, entry.orig_length
        )));
    }
    if entry.comp_length == entry.orig_length {
        return Ok(stored.to_vec());
    }

    let mut data = Vec::with_capacity(inflate_capacity(entry));
    ZlibDecoder::new(stored)
        .take(entry.orig_length as u64 + 1)
        .read_to_end(&mut data)
        .map_err(|err| ScanError::MalformedContainer(format!("table {tag}: {err}")))?;

    if data.len() != entry.orig_length {
        return Err(ScanError::MalformedContainer(format!(
            "table {tag} inflated to {} bytes, expected {}",
            data.len(),
            entry.orig_length
        )));
    }
    Ok(data)
}

fn inflate_capacity(entry: &TableEntry) -> usize {
    entry
        .orig_length
        .min(entry.comp_length.saturating_mul(MAX_INFLATE_RATIO))
}

fn write_offset_table(out: &mut Vec<u8>, flavor: u32, num_tables: u16) {
    let entry_selector = 15 - num_tables.leading_zeros() as u16;
    let search_range = (1u16 << entry_selector) * 16;
    let range_shift = num_tables * 16 - search_range;

    out.extend_from_slice(&flavor.to_be_bytes());
    out.extend_from_slice(&num_tables.to_be_bytes());
    out.extend_from_slice(&search_range.to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&range_shift.to_be_bytes());
}

fn padded(len: usize) -> usize {
    (len + 3) & !3
}

fn slice(data: &[u8], offset: usize, len: usize) -> Result<&[u8], ScanError> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| ScanError::truncated(data, offset, len))
}

fn be_u16(data: &[u8], offset: usize) -> Result<u16, ScanError> {
    let b = slice(data, offset, 2)?;
    Ok(u16::from_be_bytes([b[0], b[1]]))
}

fn be_u32(data: &[u8], offset: usize) -> Result<u32, ScanError> {
    let b = slice(data, offset, 4)?;
    Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}
