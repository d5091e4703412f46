//! Text formatting of KPI cards and the trend peak for a renderer.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::kpi::ComparativePeriodResult;
use crate::trend::TrendSeries;

/// User-facing strings. Defaults are the Spanish dashboard texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayLabels {
    pub currency_symbol: String,
    pub no_comparison: String,
    pub sales_title: String,
    pub customers_title: String,
    pub ticket_title: String,
    pub peak_title: String,
    pub empty_trend: String,
    /// Shown in titles when there is no current period
    pub missing_period: String,
    pub kpi_heading: String,
    /// Rendered as "Top {n} {ranking_heading}"
    pub ranking_heading: String,
    pub trend_heading: String,
}

impl Default for DisplayLabels {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            no_comparison: "Sin comparación".to_string(),
            sales_title: "Ventas".to_string(),
            customers_title: "Clientes".to_string(),
            ticket_title: "Ticket Promedio".to_string(),
            peak_title: "Pico de ventas".to_string(),
            empty_trend: "No hay evolución mensual para mostrar.".to_string(),
            missing_period: "-".to_string(),
            kpi_heading: "Indicadores principales".to_string(),
            ranking_heading: "Clientes por ventas".to_string(),
            trend_heading: "Evolución mensual de ventas".to_string(),
        }
    }
}

/// How a renderer should color a delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeltaTone {
    Normal,
    /// Negative change
    Inverse,
}

impl DeltaTone {
    pub fn of(delta: Option<Decimal>) -> Self {
        match delta {
            Some(d) if d.is_sign_negative() && !d.is_zero() => DeltaTone::Inverse,
            _ => DeltaTone::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiCard {
    pub title: String,
    pub value: String,
    pub delta: String,
    pub tone: DeltaTone,
}

/// The three KPI cards: revenue, customers, average ticket.
pub fn kpi_cards(kpis: &ComparativePeriodResult, labels: &DisplayLabels) -> [KpiCard; 3] {
    let period = kpis
        .current_period
        .map(|y| y.to_string())
        .unwrap_or_else(|| labels.missing_period.clone());

    [
        KpiCard {
            title: format!("{} {}", labels.sales_title, period),
            value: format_currency(kpis.current_revenue, &labels.currency_symbol),
            delta: format_delta(kpis.revenue_delta_pct, &labels.no_comparison),
            tone: DeltaTone::of(kpis.revenue_delta_pct),
        },
        KpiCard {
            title: format!("{} {}", labels.customers_title, period),
            value: kpis.current_customer_count.to_string(),
            delta: format_delta(kpis.customer_delta_pct, &labels.no_comparison),
            tone: DeltaTone::of(kpis.customer_delta_pct),
        },
        KpiCard {
            title: labels.ticket_title.clone(),
            value: format_currency(kpis.current_ticket, &labels.currency_symbol),
            delta: format_delta(kpis.ticket_delta_pct, &labels.no_comparison),
            tone: DeltaTone::of(kpis.ticket_delta_pct),
        },
    ]
}

/// Whole units with thousands separators, e.g. `$1,234,568`.
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{symbol}{}", group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Signed one-decimal percentage, or the "no comparison" label.
pub fn format_delta(delta: Option<Decimal>, no_comparison: &str) -> String {
    match delta {
        Some(d) => {
            let mut d = d.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
            d.rescale(1);
            if d.is_sign_negative() && !d.is_zero() {
                format!("{d}%")
            } else {
                format!("+{}%", d.abs())
            }
        }
        None => no_comparison.to_string(),
    }
}

/// One-line description of the series peak.
pub fn peak_summary(trend: &TrendSeries, labels: &DisplayLabels) -> String {
    match &trend.peak {
        Some(p) => format!(
            "{}: {} → {}",
            labels.peak_title,
            p.label,
            format_currency(p.total_amount, &labels.currency_symbol)
        ),
        None => labels.empty_trend.clone(),
    }
}
