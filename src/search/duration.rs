/// Seconds in an ISO-8601 duration of the form `PT[nH][nM][nS]`
/// (case-insensitive), e.g. `"PT2M58S"` is 178.
///
/// This is not a general ISO-8601 parser: day/week components, fractions and
/// anything else that does not fit the pattern give 0, as does `None`.
pub fn iso8601_seconds(value: Option<&str>) -> u64 {
    value.and_then(parse_pt).unwrap_or(0)
}

fn parse_pt(s: &str) -> Option<u64> {
    if !s.get(..2)?.eq_ignore_ascii_case("PT") {
        return None;
    }
    let rest = &s[2..];

    let mut total: u64 = 0;
    let mut digits = String::new();
    // Units must appear in H, M, S order, each at most once.
    let mut next_unit = 0usize;

    for c in rest.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let (rank, scale) = match c.to_ascii_uppercase() {
            'H' => (1, 3600),
            'M' => (2, 60),
            'S' => (3, 1),
            _ => return None,
        };
        if digits.is_empty() || rank <= next_unit {
            return None;
        }
        let n: u64 = digits.parse().ok()?;
        total = total.checked_add(n.checked_mul(scale)?)?;
        digits.clear();
        next_unit = rank;
    }

    if !digits.is_empty() {
        return None;
    }
    Some(total)
}
