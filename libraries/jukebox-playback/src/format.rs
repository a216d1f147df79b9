//! Time display formatting

/// Shown whenever a time is unknown or invalid
pub const UNKNOWN_TIME: &str = "00:00";

/// Format seconds as `MM:SS`
///
/// Both fields are zero-padded to two digits; minutes are not wrapped into
/// hours. NaN, infinite and negative inputs render as `"00:00"`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return UNKNOWN_TIME.to_string();
    }

    let total = seconds.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_renders_sentinel() {
        assert_eq!(format_time(f64::NAN), "00:00");
        assert_eq!(format_time(-5.0), "00:00");
        assert_eq!(format_time(f64::INFINITY), "00:00");
    }

    #[test]
    fn pads_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(9.99), "00:09");
        assert_eq!(format_time(65.0), "01:05");
    }

    #[test]
    fn minutes_are_unbounded() {
        assert_eq!(format_time(3661.0), "61:01");
        assert_eq!(format_time(6000.0), "100:00");
    }
}
