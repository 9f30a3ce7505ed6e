//! The branch maze: four nesting levels feeding a double loop.

/// Combines four inputs through four levels of nested conditionals and a
/// nested double iteration.
///
/// Tier by tier: a non-positive first input leaves the result at 0; then a
/// non-positive second input yields `a`; then a non-positive third yields
/// `a * b`; then a non-positive fourth yields `a * b * c`. With all four
/// positive, every `(i, j)` pair in `0..a × 0..b` either adds `i * j` (when
/// the product exceeds 100) or subtracts `i + j`.
pub fn complex_function(a: i32, b: i32, c: i32, d: i32) -> i32 {
    let mut result = 0;

    if a > 0 {
        if b > 0 {
            if c > 0 {
                if d > 0 {
                    for i in 0..a {
                        for j in 0..b {
                            if i * j > 100 {
                                result += i * j;
                            } else {
                                result -= i + j;
                            }
                        }
                    }
                } else {
                    result = a * b * c;
                }
            } else {
                result = a * b;
            }
        } else {
            result = a;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_first_input_yields_zero() {
        assert_eq!(complex_function(0, 10, 15, 20), 0);
        assert_eq!(complex_function(-3, 10, 15, 20), 0);
    }

    #[test]
    fn non_positive_second_input_yields_first() {
        assert_eq!(complex_function(7, 0, 15, 20), 7);
        assert_eq!(complex_function(7, -1, 15, 20), 7);
    }

    #[test]
    fn non_positive_third_input_yields_product_of_two() {
        assert_eq!(complex_function(3, 4, 0, 20), 12);
        assert_eq!(complex_function(3, 4, -9, 20), 12);
    }

    #[test]
    fn non_positive_fourth_input_yields_product_of_three() {
        assert_eq!(complex_function(3, 4, 5, 0), 60);
        assert_eq!(complex_function(3, 4, 5, -2), 60);
    }

    #[test]
    fn loop_tier_with_small_products_subtracts_index_sums() {
        // Every i*j is at most 4*9 = 36, so all 50 pairs subtract i+j:
        // sum over i in 0..5, j in 0..10 of (i+j) = 325.
        assert_eq!(complex_function(5, 10, 15, 20), -325);
    }

    #[test]
    fn loop_tier_crossing_the_product_threshold_adds() {
        // Pairs (10,11), (11,10), (11,11) have i*j > 100 and add 341 in
        // total; the remaining 141 pairs subtract 1520.
        assert_eq!(complex_function(12, 12, 1, 1), -1179);
    }

    #[test]
    fn loop_tier_just_below_the_threshold_never_adds() {
        // i*j peaks at exactly 100, which does not exceed the threshold.
        assert_eq!(complex_function(11, 11, 1, 1), -1210);
    }
}
