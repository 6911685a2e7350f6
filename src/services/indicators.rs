/// Simple Moving Average (SMA)
/// Returns a vector aligned with `values`:
/// - `None` until enough values exist
/// - `Some(avg)` after `window` values
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    // Running sum; subtract the value that falls out of the window.
    values
        .iter()
        .enumerate()
        .scan(0.0_f64, move |sum, (i, &v)| {
            *sum += v;
            if i >= window {
                *sum -= values[i - window];
            }

            let out = if i + 1 >= window {
                Some(*sum / window as f64)
            } else {
                None
            };

            Some(out)
        })
        .collect()
}

/// Relative Strength Index (RSI) with simple rolling means of gains and losses.
///
/// Gains and losses are aligned with `prices` (the first bar has neither), and
/// each is averaged over the trailing `period` bars:
/// RSI = 100 - 100 / (1 + avg_gain / avg_loss).
///
/// A window with no losses reads 100; a window with no movement at all is `None`.
pub fn rsi(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; prices.len()];
    }

    let deltas: Vec<f64> = std::iter::once(0.0)
        .chain(prices.windows(2).map(|w| w[1] - w[0]))
        .take(prices.len())
        .collect();
    let gains: Vec<f64> = deltas.iter().map(|&d| d.max(0.0)).collect();
    let losses: Vec<f64> = deltas.iter().map(|&d| (-d).max(0.0)).collect();

    sma(&gains, period)
        .into_iter()
        .zip(sma(&losses, period))
        .map(|(gain, loss)| match (gain, loss) {
            (Some(g), Some(l)) if l > 0.0 => Some(100.0 - 100.0 / (1.0 + g / l)),
            (Some(g), Some(_)) if g > 0.0 => Some(100.0),
            _ => None,
        })
        .collect()
}

/// Bollinger Bands
///
/// Middle band is the SMA; upper and lower bands sit `num_std_dev` sample
/// standard deviations of the window away from it.
///
/// Returns: (middle_band, upper_band, lower_band) as three separate Vec<Option<f64>>
pub fn bollinger_bands(
    prices: &[f64],
    period: usize,
    num_std_dev: f64,
) -> (Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<f64>>) {
    if prices.is_empty() || period == 0 {
        return (Vec::new(), Vec::new(), Vec::new());
    }

    let len = prices.len();
    let middle_band = sma(prices, period);

    let mut upper_band: Vec<Option<f64>> = vec![None; len];
    let mut lower_band: Vec<Option<f64>> = vec![None; len];

    for i in 0..len {
        if let (Some(mean), Some(std_dev)) = (
            middle_band[i],
            (i + 1 >= period).then(|| sample_std(&prices[i + 1 - period..=i])).flatten(),
        ) {
            upper_band[i] = Some(mean + num_std_dev * std_dev);
            lower_band[i] = Some(mean - num_std_dev * std_dev);
        }
    }

    (middle_band, upper_band, lower_band)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator); needs at least two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Simple daily returns: one fewer element than `prices`.
pub fn daily_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

/// Percent change from the first to the last price.
pub fn total_return_pct(prices: &[f64]) -> f64 {
    match (prices.first(), prices.last()) {
        (Some(&first), Some(&last)) if first != 0.0 => (last - first) / first * 100.0,
        _ => 0.0,
    }
}

/// Largest peak-to-trough decline as a (non-positive) percentage.
pub fn max_drawdown_pct(prices: &[f64]) -> f64 {
    let (_, worst) = prices
        .iter()
        .fold((f64::MIN, 0.0_f64), |(peak, worst), &p| {
            let peak = peak.max(p);
            let dd = if peak > 0.0 { p / peak - 1.0 } else { 0.0 };
            (peak, worst.min(dd))
        });
    worst * 100.0
}

/// Prices rebased so the first value is 100.
pub fn normalize_base_100(prices: &[f64]) -> Vec<f64> {
    match prices.first() {
        Some(&base) if base != 0.0 => prices.iter().map(|p| p / base * 100.0).collect(),
        _ => Vec::new(),
    }
}

/// Pearson correlation of two equally long series; `None` when undefined.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len().min(b.len());
    if n < 2 {
        return None;
    }
    let (a, b) = (&a[..n], &b[..n]);
    let (ma, mb) = (mean(a)?, mean(b)?);

    let (cov, var_a, var_b) = a.iter().zip(b).fold((0.0, 0.0, 0.0), |(c, va, vb), (x, y)| {
        let (dx, dy) = (x - ma, y - mb);
        (c + dx * dy, va + dx * dx, vb + dy * dy)
    });

    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some((cov / denom).clamp(-1.0, 1.0))
}
