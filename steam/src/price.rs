/// Normalizes locale-variant price text ("1 234,56 $", "$4.20 USD") into a
/// plain amount. Anything unparseable comes back as `0.0` rather than an
/// error, so a single garbled price never sinks a whole extraction pass; the
/// zero then falls below any sane price band and the entry is ignored.
pub fn parse_price(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    cleaned.parse().unwrap_or(0.0)
}
