// crates/cfv_physics/src/spatial/accumulate.rs

//! 并行累加缓冲
//!
//! 面并行的残差/谱半径累加存在写冲突：同一单元被多个面同时累加。
//! 以 `AtomicU64` 按位存储 f64，CAS 循环实现原子加法。跨线程的
//! 浮点求和顺序不定，逐位可复现性不作要求。

use std::sync::atomic::{AtomicU64, Ordering};

/// 原子 f64 累加缓冲
pub struct AtomicF64Buffer {
    bits: Vec<AtomicU64>,
}

impl AtomicF64Buffer {
    /// 创建零初始化缓冲
    pub fn zeros(len: usize) -> Self {
        let mut bits = Vec::with_capacity(len);
        for _ in 0..len {
            bits.push(AtomicU64::new(0.0_f64.to_bits()));
        }
        Self { bits }
    }

    /// 长度
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// 原子累加
    #[inline]
    pub fn add(&self, idx: usize, value: f64) {
        let slot = &self.bits[idx];
        let mut current = slot.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(current) + value).to_bits();
            match slot.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    /// 读取当前值
    #[inline]
    pub fn load(&self, idx: usize) -> f64 {
        f64::from_bits(self.bits[idx].load(Ordering::Relaxed))
    }

    /// 转出为普通向量
    pub fn into_vec(self) -> Vec<f64> {
        self.bits
            .into_iter()
            .map(|b| f64::from_bits(b.into_inner()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_concurrent_adds() {
        let buf = AtomicF64Buffer::zeros(4);
        (0..10_000).into_par_iter().for_each(|i| {
            buf.add(i % 4, 0.5);
        });
        let v = buf.into_vec();
        for x in v {
            assert!((x - 1250.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_init() {
        let buf = AtomicF64Buffer::zeros(3);
        assert_eq!(buf.len(), 3);
        assert!(!buf.is_empty());
        assert_eq!(buf.load(1), 0.0);
    }
}
