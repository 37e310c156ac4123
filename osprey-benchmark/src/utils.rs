use std::time::Duration;

/// Sorts the samples and returns (p50, p95, p99).
pub fn calculate_percentiles(samples: &mut [Duration]) -> (Duration, Duration, Duration) {
    if samples.is_empty() {
        return (Duration::ZERO, Duration::ZERO, Duration::ZERO);
    }
    samples.sort_unstable();
    let at = |q: f64| {
        let idx = ((samples.len() as f64 * q) as usize).min(samples.len() - 1);
        samples[idx]
    };
    (at(0.50), at(0.95), at(0.99))
}

/// Formats a URLs-per-second rate with a thousands separator.
pub fn format_rate(urls: usize, elapsed: Duration) -> String {
    let rate = urls as f64 / elapsed.as_secs_f64();
    let whole = rate as u64;
    let mut out = String::new();
    let digits = whole.to_string();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("{out} urls/s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentiles_of_uniform_samples() {
        let mut samples: Vec<Duration> = (1..=100).map(Duration::from_micros).collect();
        let (p50, p95, p99) = calculate_percentiles(&mut samples);
        assert_eq!(p50, Duration::from_micros(51));
        assert_eq!(p95, Duration::from_micros(96));
        assert_eq!(p99, Duration::from_micros(100));
    }

    #[test]
    fn test_percentiles_of_empty_input() {
        let (p50, _, p99) = calculate_percentiles(&mut []);
        assert_eq!(p50, Duration::ZERO);
        assert_eq!(p99, Duration::ZERO);
    }

    #[test]
    fn test_rate_formatting() {
        let formatted = format_rate(1_500_000, Duration::from_secs(1));
        assert_eq!(formatted, "1,500,000 urls/s");
    }
}
