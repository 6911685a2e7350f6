use crate::models::{Comparison, CorrelationStrength, PricePoint, TechnicalSummary};
use crate::services::indicators::{
    bollinger_bands, daily_returns, max_drawdown_pct, mean, normalize_base_100,
    pearson_correlation, rsi, sample_std, sma, total_return_pct,
};

/// Fewest bars for which indicators are reported
pub const MIN_POINTS: usize = 20;
const TRADING_DAYS: f64 = 252.0;

/// Indicator snapshot at the last bar; `None` with fewer than [`MIN_POINTS`] bars.
pub fn summarize(points: &[PricePoint]) -> Option<TechnicalSummary> {
    if points.len() < MIN_POINTS {
        return None;
    }

    let closes = PricePoint::closes(points);
    let current_price = *closes.last()?;

    let ma_20 = sma(&closes, 20).last().copied().flatten()?;
    let ma_50 = if closes.len() >= 50 {
        sma(&closes, 50).last().copied().flatten()?
    } else {
        ma_20
    };

    let (_, upper, lower) = bollinger_bands(&closes, 20, 2.0);
    let upper_band = upper.last().copied().flatten()?;
    let lower_band = lower.last().copied().flatten()?;

    let momentum_20d_pct = if closes.len() >= 21 {
        let base = closes[closes.len() - 21];
        if base != 0.0 {
            (current_price - base) / base * 100.0
        } else {
            0.0
        }
    } else {
        0.0
    };

    let returns = daily_returns(&closes);
    let daily_volatility = sample_std(&returns).unwrap_or(0.0);
    let sharpe_ratio = match (mean(&returns), daily_volatility) {
        (Some(m), std) if std != 0.0 => m / std * TRADING_DAYS.sqrt(),
        _ => 0.0,
    };

    let period_return_pct = total_return_pct(&closes);

    Some(TechnicalSummary {
        current_price,
        period_return_pct,
        rsi_14: rsi(&closes, 14).last().copied().flatten(),
        ma_20,
        ma_50,
        upper_band,
        lower_band,
        momentum_20d_pct,
        daily_volatility,
        annual_volatility: daily_volatility * TRADING_DAYS.sqrt(),
        sharpe_ratio,
        max_drawdown_pct: max_drawdown_pct(&closes),
        cumulative_return_pct: period_return_pct,
    })
}

impl CorrelationStrength {
    pub fn from_coefficient(r: f64) -> Self {
        let r = r.abs();
        if r > 0.7 {
            CorrelationStrength::Strong
        } else if r > 0.3 {
            CorrelationStrength::Moderate
        } else {
            CorrelationStrength::Weak
        }
    }
}

/// Relative performance of two series over their common length.
pub fn compare(
    ticker: &str,
    points: &[PricePoint],
    comparison_ticker: &str,
    comparison_points: &[PricePoint],
) -> Option<Comparison> {
    let len = points.len().min(comparison_points.len());
    if len < 2 {
        return None;
    }

    let a = PricePoint::closes(&points[..len]);
    let b = PricePoint::closes(&comparison_points[..len]);

    let ticker_return_pct = total_return_pct(&a);
    let comparison_return_pct = total_return_pct(&b);
    let correlation = pearson_correlation(&daily_returns(&a), &daily_returns(&b));

    Some(Comparison {
        ticker: ticker.to_string(),
        comparison_ticker: comparison_ticker.to_string(),
        ticker_return_pct,
        comparison_return_pct,
        outperformance_pct: ticker_return_pct - comparison_return_pct,
        correlation,
        correlation_strength: correlation.map(CorrelationStrength::from_coefficient),
        ticker_normalized: normalize_base_100(&a),
        comparison_normalized: normalize_base_100(&b),
    })
}
