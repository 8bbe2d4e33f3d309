use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// How many decimal digits a code has
pub const DIGITS: u32 = 6;

/// Length in bytes of an HMAC-SHA1 digest
pub const DIGEST_LEN: usize = 20;

/// Generates the [HMAC-based One-time Password](https://datatracker.ietf.org/doc/html/rfc4226)
/// for an already decoded secret and counter, reduced to [DIGITS] digits.
pub fn hotp(key: &[u8], counter: u64) -> u32 {
    let digest = calc_digest(key, counter);

    dynamic_truncation(&digest) % 10u32.pow(DIGITS)
}

/// Encodes the counter as the 8-byte big-endian moving factor.
pub fn moving_factor(counter: u64) -> [u8; 8] {
    counter.to_be_bytes()
}

/// Calculates the HMAC-SHA1 digest of the moving factor.
pub fn calc_digest(key: &[u8], counter: u64) -> [u8; DIGEST_LEN] {
    // HMAC is defined for keys of any length
    let mut mac = HmacSha1::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(&moving_factor(counter));

    let mut digest = [0u8; DIGEST_LEN];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    digest
}

/// Selects 4 bytes of the digest at the offset given by the low nibble of
/// the last byte and returns them as a 31-bit integer.
pub fn dynamic_truncation(digest: &[u8; DIGEST_LEN]) -> u32 {
    let offset = (digest[DIGEST_LEN - 1] & 0xf) as usize;

    let code_bytes = [
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ];

    u32::from_be_bytes(code_bytes)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use crate::hotp::{dynamic_truncation, hotp, moving_factor, DIGEST_LEN};

    #[fixture]
    #[once]
    fn rfc_key() -> Vec<u8> {
        b"12345678901234567890".to_vec()
    }

    #[rstest]
    #[case(0, 755224)]
    #[case(1, 287082)]
    #[case(2, 359152)]
    #[case(3, 969429)]
    #[case(4, 338314)]
    #[case(5, 254676)]
    #[case(6, 287922)]
    #[case(7, 162583)]
    #[case(8, 399871)]
    #[case(9, 520489)]
    fn rfc4226_vectors(rfc_key: &Vec<u8>, #[case] counter: u64, #[case] expected: u32) {
        assert_eq!(hotp(rfc_key, counter), expected);
    }

    #[test]
    fn rfc4226_truncation_example() {
        let digest: [u8; DIGEST_LEN] = [
            0x1f, 0x86, 0x98, 0x69, 0x0e, 0x02, 0xca, 0x16, 0x61, 0x85, 0x50, 0xef, 0x7f, 0x19,
            0xda, 0x8e, 0x94, 0x5b, 0x55, 0x5a,
        ];

        assert_eq!(dynamic_truncation(&digest), 0x50ef7f19);
        assert_eq!(dynamic_truncation(&digest) % 1_000_000, 872921);
    }

    #[test]
    fn truncation_clears_sign_bit() {
        let mut digest = [0xffu8; DIGEST_LEN];
        digest[DIGEST_LEN - 1] = 0xf0;

        assert_eq!(dynamic_truncation(&digest), 0x7fffffff);
    }

    #[test]
    fn truncation_reaches_last_offset() {
        let mut digest = [0u8; DIGEST_LEN];
        digest[15] = 0x80;
        digest[18] = 0x2a;
        digest[DIGEST_LEN - 1] = 0x0f;

        // bytes 15..=18 with the high bit of byte 15 masked off
        assert_eq!(dynamic_truncation(&digest), 0x2a);
    }

    #[test]
    fn moving_factor_is_big_endian() {
        assert_eq!(moving_factor(1), [0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(
            moving_factor(0x0102030405060708),
            [1, 2, 3, 4, 5, 6, 7, 8]
        );
    }

    #[test]
    fn empty_key_is_accepted() {
        assert!(hotp(&[], 0) < 1_000_000);
    }
}
