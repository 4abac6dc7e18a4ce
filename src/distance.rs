//! Bit-parallel Levenshtein distance engine.
//!
//! Exact distances use Myers' 1999 recurrence, in a single 64-bit word when
//! the pattern fits and in blocks of 64 bits otherwise. Thresholded queries
//! go through a banded variant (Ukkonen band width + the Gropl/Klau/Reinert
//! and Hyyro column update) that gives up after `k` errors and answers
//! `min(ED, k + 1)`.
//!
//! The bitmask table is indexed by the full byte domain, so the engine works
//! on any byte strings, not only the {0,1,2,3} alphabet. All functions are
//! pure and safe to call from any number of threads; precompute a
//! [`PatternHandle`] once when comparing one pattern against many texts.

/// Precomputed per-pattern state for the bit-parallel recurrences.
#[derive(Debug, Clone)]
pub struct PatternHandle {
    /// Pattern length.
    m: usize,
    /// Number of 64-bit blocks, `ceil(m / 64)`.
    blocks: usize,
    /// Flat `256 x blocks` table; bit `k` of `peq[c * blocks + b]` is set iff
    /// pattern byte `b * 64 + k` equals `c`.
    peq: Vec<u64>,
    /// Mask for the valid bits of the last block.
    last_mask: u64,
    /// `(m - 1) & 63`, the in-block offset of the pattern's highest bit.
    high_shift: u32,
}

impl PatternHandle {
    /// Builds the handle for `pattern`.
    pub fn new(pattern: &str) -> Self {
        let bytes = pattern.as_bytes();
        let m = bytes.len();
        let blocks = m.div_ceil(64).max(1);
        let mut peq = vec![0u64; 256 * blocks];
        for (i, &c) in bytes.iter().enumerate() {
            peq[c as usize * blocks + (i >> 6)] |= 1u64 << (i & 63);
        }
        let (last_mask, high_shift) = if m == 0 {
            (!0u64, 0)
        } else {
            let rem = m - (blocks - 1) * 64;
            let mask = if rem == 64 { !0u64 } else { (1u64 << rem) - 1 };
            (mask, ((m - 1) & 63) as u32)
        };
        PatternHandle {
            m,
            blocks,
            peq,
            last_mask,
            high_shift,
        }
    }

    /// Pattern length.
    pub fn len(&self) -> usize {
        self.m
    }

    /// Whether the pattern is empty.
    pub fn is_empty(&self) -> bool {
        self.m == 0
    }

    #[inline]
    fn eq_blocks(&self, c: u8) -> &[u64] {
        &self.peq[c as usize * self.blocks..][..self.blocks]
    }
}

/// Exact edit distance between `text` and the precomputed pattern.
pub fn exact(text: &str, handle: &PatternHandle) -> i32 {
    if handle.m <= 64 {
        myers_single_word(text, handle)
    } else {
        myers_multi_word(text, handle)
    }
}

/// Exact edit distance between two strings; the shorter one becomes the
/// pattern.
pub fn exact_pair(a: &str, b: &str) -> i32 {
    let (pattern, text) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    exact(text, &PatternHandle::new(pattern))
}

/// `min(ED(text, pattern), k + 1)` with early termination.
pub fn banded(text: &str, handle: &PatternHandle, k: i32) -> i32 {
    gkr_hyyro_band(text, handle, k)
}

/// One-shot banded distance; the shorter string becomes the pattern.
pub fn banded_pair(a: &str, b: &str, k: i32) -> i32 {
    let (pattern, text) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    banded(text, &PatternHandle::new(pattern), k)
}

/// True iff the exact edit distance is at least `min_ed`.
pub fn exact_at_least(text: &str, handle: &PatternHandle, min_ed: i32) -> bool {
    exact(text, handle) >= min_ed
}

/// True iff the edit distance is at least `min_ed`, computed with a band of
/// width `min_ed - 1` so the search stops as soon as the bound is settled.
pub fn banded_at_least(text: &str, handle: &PatternHandle, min_ed: i32) -> bool {
    banded(text, handle, min_ed - 1) >= min_ed
}

/// Hamming distance between two equal-length strings.
pub fn hamming(a: &str, b: &str) -> usize {
    assert_eq!(a.len(), b.len());
    a.bytes().zip(b.bytes()).filter(|(x, y)| x != y).count()
}

/// Single-word Myers recurrence, `m <= 64`.
fn myers_single_word(text: &str, handle: &PatternHandle) -> i32 {
    if handle.m == 0 {
        return text.len() as i32;
    }
    debug_assert!(handle.blocks == 1);

    let mut pv = !0u64;
    let mut mv = 0u64;
    let mut score = handle.m as i32;

    for &tc in text.as_bytes() {
        let eq = handle.eq_blocks(tc)[0];

        let x = eq | mv;
        let d0 = ((x & pv).wrapping_add(pv) ^ pv) | x;
        let hn = pv & d0;
        let hp = mv | !(pv | d0);

        let x2 = (hp << 1) | 1;
        mv = x2 & d0;
        pv = (hn << 1) | !(x2 | d0);

        score += ((hp >> handle.high_shift) & 1) as i32 - ((hn >> handle.high_shift) & 1) as i32;
    }
    score
}

/// Multi-word Myers recurrence with a portable add-with-carry chain.
fn myers_multi_word(text: &str, handle: &PatternHandle) -> i32 {
    if handle.m == 0 {
        return text.len() as i32;
    }
    let blocks = handle.blocks;
    let last = blocks - 1;

    let mut pv = vec![!0u64; blocks];
    let mut mv = vec![0u64; blocks];
    pv[last] &= handle.last_mask;

    let mut score = handle.m as i32;

    for &tc in text.as_bytes() {
        let eq_base = handle.eq_blocks(tc);
        let mut last_hp = 0u64;
        let mut last_hn = 0u64;
        let mut add_carry = 0u64;
        let mut hp_carry = 1u64;
        let mut hn_carry = 0u64;

        for b in 0..blocks {
            let eq = eq_base[b];
            let x = eq | mv[b];

            // u = (x & pv) + pv + carry, tracking the 64-bit overflow
            let tmp = x & pv[b];
            let (sum, c_a) = tmp.overflowing_add(pv[b]);
            let (u, c_b) = sum.overflowing_add(add_carry);
            add_carry = (c_a || c_b) as u64;

            let d0 = (u ^ pv[b]) | x;
            let hn = pv[b] & d0;
            let hp = mv[b] | !(pv[b] | d0);
            last_hp = hp;
            last_hn = hn;

            let x2 = (hp << 1) | hp_carry;
            hp_carry = hp >> 63;
            let hns = (hn << 1) | hn_carry;
            hn_carry = hn >> 63;

            mv[b] = x2 & d0;
            pv[b] = hns | !(x2 | d0);
        }
        pv[last] &= handle.last_mask;
        mv[last] &= handle.last_mask;

        score +=
            ((last_hp >> handle.high_shift) & 1) as i32 - ((last_hn >> handle.high_shift) & 1) as i32;
    }
    score
}

/// Band-aligned `Eq` mask for text column `j`: the MSB corresponds to the
/// unclamped top diagonal row `j + c`.
#[inline]
fn compose_eq_band(handle: &PatternHandle, tc: u8, j: i32, c: i32) -> u64 {
    let i_top = j + c;
    let b_top = i_top >> 6;
    let off = (i_top & 63) as u32;
    let base = handle.eq_blocks(tc);

    let mut eq = 0u64;
    if b_top >= 0 && (b_top as usize) < handle.blocks {
        let keep = if off == 63 { !0u64 } else { (1u64 << (off + 1)) - 1 };
        let top_mask = base[b_top as usize] & keep;
        eq |= top_mask << (63 - off);
    }
    if off < 63 {
        let need = 63 - off;
        let b_prev = b_top - 1;
        if b_prev >= 0 && (b_prev as usize) < handle.blocks {
            let prev_mask = base[b_prev as usize] & (!0u64 << (64 - need));
            eq |= prev_mask >> (off + 1);
        }
    }
    eq
}

/// Banded single-word recurrence over the Ukkonen slab, with early exit once
/// `score - remainingLateColumns > k`. Falls back to the exact engine when
/// the band does not fit in one word.
fn gkr_hyyro_band(text: &str, handle: &PatternHandle, k: i32) -> i32 {
    let m = handle.m as i32;
    let n = text.len() as i32;

    if m == 0 {
        return if n <= k { n } else { k + 1 };
    }
    if n == 0 {
        return if m <= k { m } else { k + 1 };
    }
    // length-difference feasibility
    if k < (n - m).abs() {
        return k + 1;
    }
    // at or above min(m, n) the band covers the whole matrix
    if k >= m.min(n) {
        let d = exact(text, handle);
        return if d <= k { d } else { k + 1 };
    }

    let c = (k - n + m) / 2;
    let lv = m.min((k - n + m) / 2 + (k + n - m) / 2 + 1);
    debug_assert!(lv > 0);
    if lv > 64 || lv == m {
        let d = exact(text, handle);
        return if d <= k { d } else { k + 1 };
    }

    // VP starts with the top c+1 bits set
    let shift = (64 - (c + 1)) as u32;
    let mut vp = (!0u64 >> shift) << shift;
    let mut vn = 0u64;
    let mut score = c;

    // late phase starts at column m - c; `s` is the moving HP/HN bit index
    let late_start_j = m - c;
    let mut s: i32 = 62;
    let late_tail_full = (n - late_start_j).max(0);

    let bytes = text.as_bytes();
    for j in 0..n {
        let eq = compose_eq_band(handle, bytes[j as usize], j, c);

        let x = eq | vn;
        let d0 = ((x & vp).wrapping_add(vp) ^ vp) | x;

        let hn = vp & d0;
        let hp = vn | !(d0 | vp);

        let x2 = d0 >> 1;
        vn = x2 & hp;
        vp = hn | !(x2 | hp);

        if j < late_start_j {
            score += 1 - ((d0 >> 63) & 1) as i32;
        } else {
            score += ((hp >> s as u32) & 1) as i32 - ((hn >> s as u32) & 1) as i32;
            s -= 1;
        }

        let rem_late = if j + 1 < late_start_j {
            late_tail_full
        } else {
            n - (j + 1)
        };
        if score - rem_late > k {
            return k + 1;
        }
    }

    if score <= k {
        score
    } else {
        k + 1
    }
}
