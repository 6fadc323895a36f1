//! # Library-Internal Utilities

/// Computes the number of digits needed to represent a number in a given base
///
/// Zero is represented by a single digit.
#[must_use]
pub(crate) fn digits(mut number: usize, mut basis: u8) -> u32 {
    debug_assert!(basis > 1);
    if number == 0 {
        return 1;
    }
    let mut digits = 0;
    if basis.is_power_of_two() {
        // optimized version using shift operations
        let mut pow: u8 = 0;
        basis >>= 1;
        while basis > 0 {
            pow += 1;
            basis >>= 1;
        }
        while number > 0 {
            digits += 1;
            number >>= pow;
        }
    } else {
        while number > 0 {
            digits += 1;
            number /= basis as usize;
        }
    }
    digits
}

#[cfg(test)]
mod tests {
    #[test]
    fn digits_pow_2() {
        assert_eq!(super::digits(0b1111_1101, 2), 8);
        assert_eq!(super::digits(0b1111_1101, 4), 4);
        assert_eq!(super::digits(0b1111_1101, 16), 2);
    }

    #[test]
    fn digits_binary_small() {
        assert_eq!(super::digits(0, 2), 1);
        assert_eq!(super::digits(1, 2), 1);
        assert_eq!(super::digits(2, 2), 2);
        assert_eq!(super::digits(3, 2), 2);
        assert_eq!(super::digits(4, 2), 3);
    }

    #[test]
    fn digits_base_10() {
        assert_eq!(super::digits(3158, 10), 4);
        assert_eq!(super::digits(123, 10), 3);
    }
}
