//! Geohash encoding for the Discovery API's `geoPoint` parameter.

/// The precision the Discovery API is queried with, roughly 150m by 150m.
pub const SEARCH_PRECISION: usize = 7;

/// The geohash alphabet. Note the missing `a`, `i`, `l`, and `o`.
const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Encode a position as a geohash of `precision` characters.
///
/// Bits alternate between longitude and latitude, starting with longitude,
/// each one halving the remaining interval. Every five bits become one
/// character. Callers are expected to pass coordinates that are in range.
pub fn encode(latitude: f64, longitude: f64, precision: usize) -> String {
    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut lon_range = (-180.0_f64, 180.0_f64);
    let mut hash = String::with_capacity(precision);
    let mut is_lon = true;
    let mut bits = 0;
    let mut index = 0_usize;

    while hash.len() < precision {
        let (range, value) = if is_lon {
            (&mut lon_range, longitude)
        } else {
            (&mut lat_range, latitude)
        };
        let mid = (range.0 + range.1) / 2.0;
        index <<= 1;
        if value >= mid {
            index |= 1;
            range.0 = mid;
        } else {
            range.1 = mid;
        }
        is_lon = !is_lon;

        bits += 1;
        if bits == 5 {
            hash.push(BASE32[index] as char);
            bits = 0;
            index = 0;
        }
    }

    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use parameterized::parameterized;
    use pretty_assertions::assert_eq;

    #[parameterized(latitude = {
        34.0522, 40.7128, -33.8688, 0.0,
    }, longitude = {
        -118.2437, -74.0060, 151.2093, 0.0,
    }, expected = {
        "9q5ctr1", "dr5regw", "r3gx2f7", "s000000",
    })]
    fn known_positions(latitude: f64, longitude: f64, expected: &str) {
        assert_eq!(encode(latitude, longitude, SEARCH_PRECISION), expected);
    }

    #[test]
    fn longer_precision_extends_the_prefix() {
        let hash = encode(57.64911, 10.40744, 11);
        assert_eq!(hash, "u4pruydqqvj");
        assert!(hash.starts_with(&encode(57.64911, 10.40744, 7)));
    }

    #[test]
    fn corners() {
        assert_eq!(encode(90.0, 180.0, 7), "zzzzzzz");
        assert_eq!(encode(-90.0, -180.0, 7), "0000000");
    }
}
