//! Countdown display formatting

/// Format a second count as `MM:SS`, both fields zero-padded.
///
/// The minutes field simply grows past two digits for long countdowns.
pub fn format_mm_ss(total_seconds: u64) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_boundaries() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(59), "00:59");
        assert_eq!(format_mm_ss(60), "01:00");
        assert_eq!(format_mm_ss(7199), "119:59");
    }

    #[test]
    fn test_format_manual_entry_cap() {
        // 120 minutes is the manual entry ceiling
        assert_eq!(format_mm_ss(120 * 60), "120:00");
    }

    #[test]
    fn test_format_large_values() {
        assert_eq!(format_mm_ss(100_000), "1666:40");
    }
}
