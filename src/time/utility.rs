
pub const NSEC_PER_SEC: i64 = 1_000_000_000;

/// Folds `nsec` into `[0, NSEC_PER_SEC)` and carries the overflow into `sec`.
#[inline]
pub const fn normalize_sec_nsec(sec: i64, nsec: i64) -> (i64, u32) {
    let carry = nsec.div_euclid(NSEC_PER_SEC);
    let nsec = nsec.rem_euclid(NSEC_PER_SEC);
    (sec + carry, nsec as u32)
}

#[inline]
pub const fn split_nsec(total_nsec: i128) -> (i64, u32) {
    let sec = total_nsec.div_euclid(NSEC_PER_SEC as i128);
    let nsec = total_nsec.rem_euclid(NSEC_PER_SEC as i128);
    (sec as i64, nsec as u32)
}

/// Splits floating-point seconds into whole seconds and rounded nanoseconds.
pub fn split_sec(t: f64) -> (i64, u32) {
    let sec = t.floor();
    let nsec = ((t - sec) * 1e9).round() as i64;
    normalize_sec_nsec(sec as i64, nsec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_carries_overflow() {
        assert_eq!(normalize_sec_nsec(1, 2_500_000_000), (3, 500_000_000));
        assert_eq!(normalize_sec_nsec(0, -1), (-1, 999_999_999));
    }

    #[test]
    fn split_sec_handles_rounding_up_to_next_second() {
        assert_eq!(split_sec(0.9999999999), (1, 0));
        assert_eq!(split_sec(-0.1), (-1, 900_000_000));
    }
}
