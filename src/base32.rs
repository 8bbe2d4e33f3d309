use crate::OtpError;

const PADDING: char = '=';
const SYMBOL_BITS: u8 = 5;

/// Decodes an RFC4648 base32 string into a byte string.
///
/// Trailing `=` padding is stripped and lower case symbols are accepted.
/// The output is exactly `len * 5 / 8` bytes long, leftover bits that do
/// not complete a byte are discarded.
pub fn decode(input: &str) -> Result<Vec<u8>, OtpError> {
    let input = input.trim_end_matches(PADDING);
    let expected_len = input.len() * 5 / 8;

    let mut decoded = Vec::with_capacity(expected_len);
    let mut cur_byte: u8 = 0;
    let mut bits_remaining: u8 = 8;

    for c in input.chars() {
        let value = symbol_value(c)?;

        if bits_remaining > SYMBOL_BITS {
            cur_byte |= value << (bits_remaining - SYMBOL_BITS);
            bits_remaining -= SYMBOL_BITS;
        } else {
            // The symbol straddles the current and the next output byte
            cur_byte |= value >> (SYMBOL_BITS - bits_remaining);
            decoded.push(cur_byte);

            // A shift of 8 means the symbol was consumed entirely
            cur_byte = value
                .checked_shl(u32::from(3 + bits_remaining))
                .unwrap_or(0);
            bits_remaining += 3;
        }
    }

    if decoded.len() < expected_len {
        decoded.push(cur_byte);
    }

    Ok(decoded)
}

fn symbol_value(c: char) -> Result<u8, OtpError> {
    match c {
        'A'..='Z' => Ok(c as u8 - b'A'),
        'a'..='z' => Ok(c as u8 - b'a'),
        '2'..='7' => Ok(c as u8 - b'2' + 26),
        _ => {
            tracing::debug!(character = %c.escape_debug(), "rejected base32 symbol");
            Err(OtpError::InvalidCharacter(c))
        }
    }
}
