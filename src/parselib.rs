//!`parselib` is a collection of tools to pull numeric readings out of the
//!plain-text responses the control hub returns.
use crate::auxiliar::value_types::*;
use crate::constlib::*;
use regex::Regex;

///Strict pass: every float with a decimal point, skipping matches glued to an
///underscore. Register names such as `adc58_f` echo back inside the response
///text and must not count as readings.
pub fn strict_floats(result: &str) -> Vec<READING> {
    let float = Regex::new(r"-?\d+\.\d+").expect("literal regex");
    let bytes = result.as_bytes();
    float
        .find_iter(result)
        .filter(|m| m.start() == 0 || bytes[m.start() - 1] != b'_')
        .filter_map(|m| m.as_str().parse::<READING>().ok())
        .collect()
}

///Loose pass used after a truncated read: take the trailing token of each
///response line and keep whatever parses. Tolerates mangled echo text and
///integer-formatted values the strict pass rejects.
pub fn loose_floats(result: &str) -> Vec<READING> {
    result
        .lines()
        .filter_map(|line| line.split_whitespace().last())
        .filter_map(|token| token.parse::<READING>().ok())
        .collect()
}

///The hub reports failures inline rather than on a side channel.
pub fn is_error(result: &str) -> bool {
    result.contains(ERROR_TOKEN)
}

///Placeholder list appended when a command never produced usable values.
pub fn sentinel_values(expected: CHANNEL) -> Vec<READING> {
    vec![SENTINEL_READING; expected]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_reads_every_decimal_value() {
        let result = "get HB1-adc58_f # 26.43\nget HB2-adc58_f # 27.01";
        assert_eq!(strict_floats(result), vec![26.43, 27.01]);
    }

    #[test]
    fn strict_skips_underscored_matches() {
        //the 58_f register tag must not leak a value even when it carries a dot
        let result = "get HB1-adc_2.5V_f # 2.49";
        assert_eq!(strict_floats(result), vec![2.49]);
    }

    #[test]
    fn strict_keeps_negative_values() {
        assert_eq!(strict_floats("get HB1-PeltierCurrent_f # -0.12"), vec![-0.12]);
    }

    #[test]
    fn strict_ignores_bare_integers() {
        assert_eq!(strict_floats("get HB1-fec_status # 1"), Vec::<READING>::new());
    }

    #[test]
    fn loose_takes_trailing_tokens() {
        let result = "get HB1-adc58 # 26\nsome mangled echo 27.5\nnothing here";
        assert_eq!(loose_floats(result), vec![26.0, 27.5]);
    }

    #[test]
    fn error_detection_is_substring_based() {
        assert!(is_error("get HB1-adc58_f # ERROR: no such register"));
        assert!(!is_error("get HB1-adc58_f # 26.43"));
    }

    #[test]
    fn sentinel_list_matches_expected_length() {
        assert_eq!(sentinel_values(4), vec![-1.0; 4]);
    }
}
