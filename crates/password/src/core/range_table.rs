use std::fmt::Display;

/// A range of code points below `0x10000`: `{lo, lo + stride, ..., hi}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range16 {
    pub lo: u16,
    pub hi: u16,
    pub stride: u16,
}

/// A range of code points at or above `0x10000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range32 {
    pub lo: u32,
    pub hi: u32,
    pub stride: u32,
}

/// A set of Unicode code points stored as sorted, non-overlapping ranges.
///
/// Ranges below `0x10000` live in `r16`, the others in `r32`.
/// `latin_offset` is the number of leading `r16` entries lying entirely
/// within ASCII (`hi <= 0x7F`).
///
/// Every range must satisfy `lo <= hi`, `stride >= 1` and
/// `(hi - lo) % stride == 0`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeTable {
    pub r16: Vec<Range16>,
    pub r32: Vec<Range32>,
    pub latin_offset: usize,
}

const MAX_16: u32 = 0xFFFF;
const MAX_LATIN: u32 = 0x7F;
const SURROGATE_LO: u32 = 0xD800;
const SURROGATE_HI: u32 = 0xDFFF;

impl RangeTable {
    /// Builds a table from ascending, non-overlapping inclusive ranges with
    /// stride 1. Ranges straddling `0xFFFF` are split so that the 16-bit and
    /// 32-bit parts stay disjoint. Surrogates are dropped: every code point
    /// of the table is a `char`.
    pub fn from_ranges<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut table = Self::default();
        for (lo, hi) in ranges {
            if lo <= SURROGATE_HI && hi >= SURROGATE_LO {
                if lo < SURROGATE_LO {
                    table.push(lo, SURROGATE_LO - 1, 1);
                }
                if hi > SURROGATE_HI {
                    table.push(SURROGATE_HI + 1, hi, 1);
                }
            } else {
                table.push(lo, hi, 1);
            }
        }
        table.latin_offset = table.compute_latin_offset();
        table
    }

    fn push(&mut self, lo: u32, hi: u32, stride: u32) {
        if lo <= MAX_16 {
            if hi <= MAX_16 {
                // all three values fit in 16 bits
                self.r16.push(Range16 {
                    lo: lo as u16,
                    hi: hi as u16,
                    stride: stride as u16,
                });
                return;
            }
            // stride 1 only: split at the 16/32-bit boundary
            self.r16.push(Range16 {
                lo: lo as u16,
                hi: MAX_16 as u16,
                stride: 1,
            });
            self.r32.push(Range32 {
                lo: MAX_16 + 1,
                hi,
                stride: 1,
            });
        } else {
            self.r32.push(Range32 { lo, hi, stride });
        }
    }

    fn compute_latin_offset(&self) -> usize {
        self.r16
            .iter()
            .take_while(|r| u32::from(r.hi) <= MAX_LATIN)
            .count()
    }

    /// Iterates over all ranges as `(lo, hi, stride)`, in ascending order.
    pub fn ranges(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        self.r16
            .iter()
            .map(|r| (u32::from(r.lo), u32::from(r.hi), u32::from(r.stride)))
            .chain(self.r32.iter().map(|r| (r.lo, r.hi, r.stride)))
    }

    /// Total number of code points in the table.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.ranges()
            .map(|(lo, hi, stride)| (hi - lo) / stride + 1)
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.r16.is_empty() && self.r32.is_empty()
    }

    /// Returns `true` if every range has stride 1.
    #[must_use]
    pub fn is_unstrided(&self) -> bool {
        self.ranges().all(|(_, _, stride)| stride == 1)
    }

    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        let c = c as u32;
        self.ranges()
            .any(|(lo, hi, stride)| lo <= c && c <= hi && (c - lo) % stride == 0)
    }

    /// Returns the `i`-th code point of the table in ascending order.
    #[must_use]
    pub fn nth(&self, mut i: u32) -> Option<u32> {
        for (lo, hi, stride) in self.ranges() {
            let size = (hi - lo) / stride + 1;
            if i < size {
                return Some(lo + i * stride);
            }
            i -= size;
        }
        None
    }

    /// Returns an equivalent table in which every range has stride 1.
    ///
    /// Strided ranges are expanded into one range per code point.
    #[must_use]
    pub fn unstride(&self) -> Self {
        let mut table = Self::default();
        for (lo, hi, stride) in self.ranges() {
            if stride == 1 {
                table.push(lo, hi, 1);
            } else {
                for c in (lo..=hi).step_by(stride as usize) {
                    table.push(c, c, 1);
                }
            }
        }
        table.latin_offset = table.compute_latin_offset();
        table
    }

    /// Returns the intersection of `self` and `other`.
    ///
    /// Both operands are unstrided first if needed, so the result only
    /// contains stride-1 ranges.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let a = self.unstrided_ranges();
        let b = other.unstrided_ranges();

        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            let (a_lo, a_hi) = a[i];
            let (b_lo, b_hi) = b[j];
            let lo = a_lo.max(b_lo);
            let hi = a_hi.min(b_hi);
            if lo <= hi {
                out.push((lo, hi));
            }
            if a_hi < b_hi {
                i += 1;
            } else {
                j += 1;
            }
        }
        Self::from_ranges(out)
    }

    fn unstrided_ranges(&self) -> Vec<(u32, u32)> {
        if self.is_unstrided() {
            self.ranges().map(|(lo, hi, _)| (lo, hi)).collect()
        } else {
            self.unstride()
                .ranges()
                .map(|(lo, hi, _)| (lo, hi))
                .collect()
        }
    }
}

impl Display for RangeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (lo, hi, stride) in self.ranges() {
            match stride {
                1 if lo == hi => write!(f, "{{{lo:#x}}}")?,
                1 => write!(f, "{{{lo:#x}-{hi:#x}}}")?,
                _ => write!(f, "{{{lo:#x}-{hi:#x}/{stride}}}")?,
            }
        }
        write!(f, "]")
    }
}
