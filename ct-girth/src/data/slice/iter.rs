use crate::Idx2d;

/// 行优先索引迭代器.
///
/// 与 `(0..h).flat_map(move |a| (0..w).map(move |b| (a, b)))` 等价,
/// 但对象更小, 且可以在迭代前得知剩余长度.
#[derive(Debug, Clone)]
pub struct PosIter {
    cur_h: usize,
    cur_w: usize,
    h: usize,
    w: usize,
}

impl PosIter {
    #[inline]
    pub fn new((h, w): Idx2d) -> Self {
        Self {
            cur_h: 0,
            cur_w: 0,
            h,
            w,
        }
    }

    /// 剩余索引个数.
    #[inline]
    fn remaining(&self) -> usize {
        if self.w == 0 || self.cur_h >= self.h {
            0
        } else {
            (self.h - self.cur_h) * self.w - self.cur_w
        }
    }
}

impl Iterator for PosIter {
    type Item = Idx2d;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining() == 0 {
            return None;
        }
        let ret_pos = (self.cur_h, self.cur_w);
        if self.cur_w + 1 == self.w {
            self.cur_w = 0;
            self.cur_h += 1;
        } else {
            self.cur_w += 1;
        }
        Some(ret_pos)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for PosIter {}
