//
// octbin.rs
// Oct-Convert-rs
//
// octbin container: magic, layout flag, SHA-256 digest, JSON metadata, then raw B-scan pixels.
//

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{CodecError, Result};
use crate::models::ScanRecord;
use crate::options::WriteOptions;

pub const MAGIC: &[u8] = b"OCTBIN01";

const FLAG_FLAT: u8 = 0b0000_0001;
const DIGEST_LEN: usize = 32;
const HEADER_LEN: usize = 8 + 1 + DIGEST_LEN;

// Layout:
//   MAGIC | flags:u8 | sha256(body):[u8; 32] | body
//   body = meta_len:u32le | meta json | pixels
// Pixels follow the hierarchy order of the metadata. Nested layout prefixes
// every B-scan with its byte length (u32le); flat layout does not.

pub fn encode(record: &ScanRecord, options: &WriteOptions) -> Result<Vec<u8>> {
    // Metadata carries B-scan dimensions only; pixels go into the payload.
    let mut meta = record.clone();
    let mut payload = Vec::new();
    for bscan in bscans_mut(&mut meta) {
        let pixels = std::mem::take(&mut bscan.pixels);
        if pixels.len() != bscan.expected_len() {
            return Err(CodecError::Malformed(format!(
                "B-scan {}x{} holds {} bytes",
                bscan.width,
                bscan.height,
                pixels.len()
            )));
        }
        if !options.octbin_flat {
            payload.extend_from_slice(&len_u32(pixels.len())?.to_le_bytes());
        }
        payload.extend_from_slice(&pixels);
    }

    let meta_json = serde_json::to_vec(&meta)?;
    let mut body = Vec::with_capacity(4 + meta_json.len() + payload.len());
    body.extend_from_slice(&len_u32(meta_json.len())?.to_le_bytes());
    body.extend_from_slice(&meta_json);
    body.extend_from_slice(&payload);

    let flags = if options.octbin_flat { FLAG_FLAT } else { 0 };
    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.extend_from_slice(MAGIC);
    out.push(flags);
    out.extend_from_slice(&Sha256::digest(&body));
    out.extend_from_slice(&body);
    Ok(out)
}

pub fn decode(bytes: &[u8]) -> Result<ScanRecord> {
    if bytes.len() < HEADER_LEN || !bytes.starts_with(MAGIC) {
        return Err(CodecError::Malformed("missing octbin header".into()));
    }
    let flat = bytes[MAGIC.len()] & FLAG_FLAT != 0;
    let stored_digest = &bytes[MAGIC.len() + 1..HEADER_LEN];
    let body = &bytes[HEADER_LEN..];

    let actual_digest = Sha256::digest(body);
    if actual_digest.as_slice() != stored_digest {
        return Err(CodecError::ChecksumMismatch {
            expected: hex::encode(stored_digest),
            actual: hex::encode(actual_digest),
        });
    }

    let mut cursor = Cursor { data: body, pos: 0 };
    let meta_len = cursor.read_u32()? as usize;
    let mut record: ScanRecord = serde_json::from_slice(cursor.take(meta_len)?)?;

    for bscan in bscans_mut(&mut record) {
        let expected = bscan.expected_len();
        if !flat {
            let chunk_len = cursor.read_u32()? as usize;
            if chunk_len != expected {
                return Err(CodecError::Malformed(format!(
                    "B-scan chunk of {} bytes, expected {}",
                    chunk_len, expected
                )));
            }
        }
        bscan.pixels = cursor.take(expected)?.to_vec();
    }

    if cursor.remaining() != 0 {
        return Err(CodecError::Malformed(format!(
            "{} trailing bytes after pixel data",
            cursor.remaining()
        )));
    }

    Ok(record)
}

pub fn read(path: &Path) -> Result<ScanRecord> {
    decode(&fs::read(path)?)
}

fn bscans_mut(record: &mut ScanRecord) -> impl Iterator<Item = &mut crate::models::BScan> {
    record
        .patients
        .values_mut()
        .flat_map(|p| p.studies.values_mut())
        .flat_map(|s| s.series.values_mut())
        .flat_map(|s| s.bscans.iter_mut())
}

fn len_u32(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| CodecError::Malformed(format!("block of {} bytes is too large", len)))
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(CodecError::Malformed(format!(
                "unexpected end of data: wanted {} bytes, {} left",
                n,
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(buf))
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}
