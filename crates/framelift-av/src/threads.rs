//! Interpolator thread derivation.

/// Worker threads to give the interpolator.
///
/// Reserves two cores on machines with up to four logical cores, three up
/// to eight, four beyond that, and keeps the result inside the
/// interpolator's useful range of 2 to 16.
pub fn interpolation_threads(logical_cores: usize) -> usize {
    let reserved = if logical_cores <= 4 {
        2
    } else if logical_cores <= 8 {
        3
    } else {
        4
    };

    logical_cores.saturating_sub(reserved).clamp(2, 16)
}

/// Render the interpolator's `load:proc:save` thread spec for `-j`.
pub fn job_spec(threads: usize) -> String {
    format!("{}:2:2", threads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_table() {
        assert_eq!(interpolation_threads(2), 2);
        assert_eq!(interpolation_threads(4), 2);
        assert_eq!(interpolation_threads(8), 5);
        assert_eq!(interpolation_threads(16), 12);
        assert_eq!(interpolation_threads(32), 16);
    }

    #[test]
    fn test_floor_holds_on_tiny_machines() {
        assert_eq!(interpolation_threads(1), 2);
    }

    #[test]
    fn test_job_spec_format() {
        assert_eq!(job_spec(5), "5:2:2");
        assert_eq!(job_spec(12), "12:2:2");
    }
}
