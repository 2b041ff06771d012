/// Splits an A1-style cell reference (`C7`, `aa10`) into zero-based
/// `(row, col)` indices. Returns `None` unless the reference is one or more
/// column letters followed by a row number of at least 1.
pub fn address_to_index(a1: &str) -> Option<(u32, u32)> {
    let digits_at = a1.find(|c: char| !c.is_ascii_alphabetic())?;
    let (letters, digits) = a1.split_at(digits_at);
    if letters.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let col = letters.bytes().try_fold(0u32, |acc, b| {
        let value = u32::from(b.to_ascii_uppercase() - b'A') + 1;
        acc.checked_mul(26)?.checked_add(value)
    })?;
    let row: u32 = digits.parse().ok()?;

    Some((row.checked_sub(1)?, col - 1))
}
