//! Hash table lookup using the "Compress, Hash, and Displace" minimum
//! perfect hash. See <http://cmph.sourceforge.net/papers/esa09.pdf> for
//! details. The table contents are precomputed against the exact hash
//! function below and shipped as a binary asset.

use std::sync::LazyLock;

use thiserror::Error;

const NUM_RAND_HASHES: usize = 140;
const NUM_INDICES: usize = 2444;
const NUM_VALUES: usize = 4888;
const ASSET_LEN: usize = NUM_RAND_HASHES * 8 + NUM_INDICES * 2 + NUM_VALUES * 2;

static PAIRED_RANKS: LazyLock<ChdTable> = LazyLock::new(|| {
    ChdTable::from_bytes(include_bytes!("../../assets/chd.bin"))
        .expect("embedded hand-rank asset is malformed")
});

/// The process-wide table mapping prime products of repeated-rank hands to
/// hand ranks. Loaded from the embedded asset on first use; immutable after.
pub fn paired_ranks() -> &'static ChdTable {
    &PAIRED_RANKS
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("malformed hand-rank asset")]
pub struct BadAssetError;

pub struct ChdTable {
    /// Random hash function table.
    r: [u64; NUM_RAND_HASHES],
    /// Per-bucket indices into `r`.
    indices: [u16; NUM_INDICES],
    /// Final table of values.
    values: [u16; NUM_VALUES],
}

fn hash_key(key: u32) -> u64 {
    let mut hash: u64 = 14695981039346656037;
    for i in 0..4 {
        hash ^= u64::from(key & (0xFF << (8 * i)));
        hash = hash.wrapping_mul(1099511628211);
    }
    hash
}

impl ChdTable {
    /// Parses a tightly packed little-endian asset: `NUM_RAND_HASHES` 64-bit
    /// words, then the bucket indices, then the values. No header.
    pub fn from_bytes(b: &[u8]) -> Result<ChdTable, BadAssetError> {
        if b.len() != ASSET_LEN {
            return Err(BadAssetError);
        }
        let mut table = ChdTable {
            r: [0; NUM_RAND_HASHES],
            indices: [0; NUM_INDICES],
            values: [0; NUM_VALUES],
        };
        let (r_bytes, rest) = b.split_at(NUM_RAND_HASHES * 8);
        let (index_bytes, value_bytes) = rest.split_at(NUM_INDICES * 2);
        for (slot, chunk) in table.r.iter_mut().zip(r_bytes.chunks_exact(8)) {
            *slot = u64::from_le_bytes(chunk.try_into().unwrap());
        }
        for (slot, chunk) in table.indices.iter_mut().zip(index_bytes.chunks_exact(2)) {
            *slot = u16::from_le_bytes(chunk.try_into().unwrap());
            if *slot as usize >= NUM_RAND_HASHES {
                return Err(BadAssetError);
            }
        }
        for (slot, chunk) in table.values.iter_mut().zip(value_bytes.chunks_exact(2)) {
            *slot = u16::from_le_bytes(chunk.try_into().unwrap());
        }
        Ok(table)
    }

    /// Looks up an entry. A key that was not part of the precomputed set
    /// returns an arbitrary value, never an error.
    pub fn get(&self, key: u32) -> u16 {
        let h = hash_key(key) ^ self.r[0];
        let ri = self.indices[(h % NUM_INDICES as u64) as usize];
        let ti = (h ^ self.r[ri as usize]) % NUM_VALUES as u64;
        self.values[ti as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_asset_loads() {
        // Forces the lazy load; a malformed asset would panic here.
        let _ = paired_ranks();
    }

    #[test]
    fn test_pinned_lookups() {
        // 41^4 * 37: four aces with a king kicker.
        assert_eq!(11, paired_ranks().get(104553157));
        // 2^4 * 3: four deuces with a trey kicker.
        assert_eq!(166, paired_ranks().get(48));
    }

    #[test]
    fn test_rejects_truncated_asset() {
        assert_eq!(Err(BadAssetError), ChdTable::from_bytes(&[0u8; 16]).map(|_| ()));
    }
}
