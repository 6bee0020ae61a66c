//! The generic cuckoo-filter substrate shared by both policies: sizing,
//! the insert/relocate protocol, query/delete/clear, and the
//! serialize/fromstring codec.
//!
//! Buckets hold `BUCKET_SIZE` slots each, with the payload shape selected
//! per filter policy, matching the real bucket layout in
//! `original_source/heka/plugins/fx/broken_sessions.c`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bucket::{Bucket, BUCKET_SIZE};
use crate::error::CuckooError;
use crate::hash::{alt_index, fingerprint, xxh32, HASH_SEED};
use crate::payload::Payload;

/// Cuckoo eviction bound: the insert path gives up and reports failure
/// after this many relocation attempts.
pub const MAX_KICKS: u32 = 512;

pub struct CuckooFilter<P: Payload> {
    buckets: Box<[Bucket<P>]>,
    num_buckets: usize,
    nlz: u32,
    cnt: usize,
    rng: StdRng,
}

impl<P: Payload> CuckooFilter<P> {
    /// Constructs a filter sized for at least `items` entries. `items` must
    /// be greater than 4; actual capacity is rounded up to the next
    /// power-of-two bucket count times `BUCKET_SIZE`.
    pub fn new(items: usize) -> Result<Self, CuckooError> {
        Self::with_rng(items, StdRng::from_entropy())
    }

    /// Same as `new`, but with a deterministic relocation RNG. Useful for
    /// reproducible tests: the reference implementation's relocation loop is
    /// otherwise only deterministic within an unseeded, process-wide PRNG
    /// stream.
    pub fn with_seed(items: usize, seed: u64) -> Result<Self, CuckooError> {
        Self::with_rng(items, StdRng::seed_from_u64(seed))
    }

    fn with_rng(items: usize, rng: StdRng) -> Result<Self, CuckooError> {
        if items <= 4 {
            return Err(CuckooError::CapacityTooSmall(items));
        }
        let raw_buckets = ((items + BUCKET_SIZE - 1) / BUCKET_SIZE) as u32;
        let num_buckets = crate::hash::clp2(raw_buckets) as usize;
        let nlz = (num_buckets as u32).leading_zeros() + 1;
        let buckets = (0..num_buckets)
            .map(|_| Bucket::new())
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self {
            buckets,
            num_buckets,
            nlz,
            cnt: 0,
            rng,
        })
    }

    /// Logical capacity: `num_buckets * BUCKET_SIZE`.
    pub fn items(&self) -> usize {
        self.num_buckets * BUCKET_SIZE
    }

    /// Exact on-wire size of the bucket array.
    pub fn bytes(&self) -> usize {
        self.num_buckets * Bucket::<P>::BYTES
    }

    /// Count of occupied slots.
    pub fn count(&self) -> usize {
        self.cnt
    }

    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.clear();
        }
        self.cnt = 0;
    }

    fn indices(&self, key: &[u8]) -> (u16, usize, usize) {
        let h = xxh32(key, HASH_SEED);
        let fp = fingerprint(h);
        let i1 = (h as usize) % self.num_buckets;
        let i2 = alt_index(i1, fp, self.nlz);
        (fp, i1, i2)
    }

    pub fn query(&self, key: &[u8]) -> bool {
        let (fp, i1, i2) = self.indices(key);
        self.buckets[i1].query(fp) || self.buckets[i2].query(fp)
    }

    pub fn delete(&mut self, key: &[u8]) -> bool {
        let (fp, i1, i2) = self.indices(key);
        if self.buckets[i1].delete(fp) {
            self.cnt -= 1;
            true
        } else if self.buckets[i2].delete(fp) {
            self.cnt -= 1;
            true
        } else {
            false
        }
    }

    /// Two-bucket merge attempt, then two-bucket fresh-add attempt, then up
    /// to `MAX_KICKS` relocation rounds.
    pub fn add(&mut self, key: &[u8], incoming: P) -> P::Outcome {
        let (fp, i1, i2) = self.indices(key);

        if let Some(outcome) = self.buckets[i1].insert_lookup(fp, &incoming) {
            return outcome;
        }
        if let Some(outcome) = self.buckets[i2].insert_lookup(fp, &incoming) {
            return outcome;
        }

        if self.buckets[i1].add(fp, incoming) {
            self.cnt += 1;
            return P::fresh_outcome();
        }
        if self.buckets[i2].add(fp, incoming) {
            self.cnt += 1;
            return P::fresh_outcome();
        }

        let mut ri = if self.rng.gen_bool(0.5) { i1 } else { i2 };
        let mut fp = fp;
        let mut payload = incoming;

        for _ in 0..MAX_KICKS {
            let slot = self.rng.gen_range(0..BUCKET_SIZE);
            let (evicted_fp, evicted_payload) = self.buckets[ri].swap(slot, fp, payload);
            fp = evicted_fp;
            payload = evicted_payload;
            ri = alt_index(ri, fp, self.nlz);

            // `payload` here is the evicted entry's own data, not the
            // caller's original input. A matching fingerprint at `ri`
            // absorbs the evicted entry and the chain returns; the
            // originally-requested key may silently never land. Mirrors the
            // original C exactly (see SPEC_FULL.md section 4.3).
            if let Some(outcome) = self.buckets[ri].insert_lookup(fp, &payload) {
                return outcome;
            }
            if self.buckets[ri].add(fp, payload) {
                self.cnt += 1;
                return P::fresh_outcome();
            }
        }

        P::failed_outcome()
    }

    /// All occupied (fingerprint, payload) pairs across every bucket,
    /// mutable. The generic traversal `ExecutiveReportFilter::report`
    /// builds on this.
    pub fn iter_occupied_mut(&mut self) -> impl Iterator<Item = (u16, &mut P)> {
        self.buckets.iter_mut().flat_map(|b| b.occupied_mut())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.bytes());
        for bucket in self.buckets.iter() {
            bucket.write_bytes(&mut out);
        }
        out
    }

    /// Restores `cnt` and overwrites the bucket array from `blob`. Fails
    /// without mutating the filter if `blob.len() != self.bytes()`.
    pub fn fromstring(&mut self, cnt: usize, blob: &[u8]) -> Result<(), CuckooError> {
        let expected = self.bytes();
        if blob.len() != expected {
            return Err(CuckooError::LengthMismatch {
                found: blob.len(),
                expected,
            });
        }
        let per_bucket = Bucket::<P>::BYTES;
        for (i, bucket) in self.buckets.iter_mut().enumerate() {
            let start = i * per_bucket;
            *bucket = Bucket::read_bytes(&blob[start..start + per_bucket]);
        }
        self.cnt = cnt;
        Ok(())
    }

    /// Emits the three-fragment reload form:
    /// `if KEY == nil then KEY = TYPE_TABLE.new(items) end\nKEY:fromstring(cnt, "blob")\n`
    pub fn serialize(&self, key_name: &str, type_table: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "if {key} == nil then {key} = {table}.new({items}) end\n",
            key = key_name,
            table = type_table,
            items = self.items()
        ));
        out.push_str(&format!(
            "{key}:fromstring({cnt}, \"",
            key = key_name,
            cnt = self.cnt
        ));
        crate::serialize::escape_into(&self.to_bytes(), &mut out);
        out.push_str("\")\n");
        out
    }
}
