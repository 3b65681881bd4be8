// crates/cfv_foundation/src/tolerance.rs

//! 数值容差常量
//!
//! 整个工作区共用的判零阈值，避免各处散落魔数。

/// 判零容差（约为 f64 机器精度）
pub const ZERO_TOL: f64 = 2.2e-16;

/// 比大多数收敛容差更小的小量
pub const SMALL_NUMBER: f64 = 1e-12;

/// 判断数值是否可视为零
#[inline]
pub fn is_zero(x: f64) -> bool {
    x.abs() < SMALL_NUMBER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_zero() {
        assert!(is_zero(0.0));
        assert!(is_zero(1e-14));
        assert!(!is_zero(1e-9));
    }
}
