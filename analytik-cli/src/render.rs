//! Plain-text rendering of a dashboard snapshot.

use analytik_core::FilterOptions;
use analytik_reports::{DashboardSnapshot, DeltaTone, DisplayLabels, format_currency, kpi_cards, peak_summary};
use std::fmt::{self, Write};

pub fn render_report(snap: &DashboardSnapshot, labels: &DisplayLabels) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_report(&mut out, snap, labels)?;
    Ok(out)
}

pub fn render_options(options: &FilterOptions) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_options(&mut out, options)?;
    Ok(out)
}

fn write_report(out: &mut impl Write, snap: &DashboardSnapshot, labels: &DisplayLabels) -> fmt::Result {
    writeln!(out, "## {}\n", labels.kpi_heading)?;
    for card in kpi_cards(&snap.kpis, labels) {
        let marker = match card.tone {
            DeltaTone::Normal => "",
            DeltaTone::Inverse => " (!)",
        };
        writeln!(out, "{:<24} {:>16}   {}{}", card.title, card.value, card.delta, marker)?;
    }

    writeln!(out, "\n## Top {} {}\n", snap.filter.top_n, labels.ranking_heading)?;
    if snap.top_customers.is_empty() {
        writeln!(out, "(sin datos)")?;
    }
    for (i, e) in snap.top_customers.entries.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {:<40} {:>16}",
            i + 1,
            e.entity_name,
            format_currency(e.total_amount, &labels.currency_symbol)
        )?;
    }

    writeln!(out, "\n## {}\n", labels.trend_heading)?;
    for p in &snap.trend.points {
        writeln!(
            out,
            "{:<20} {:>16}",
            p.label,
            format_currency(p.total_amount, &labels.currency_symbol)
        )?;
    }
    writeln!(out, "\n{}", peak_summary(&snap.trend, labels))?;

    let d = &snap.diagnostics;
    writeln!(
        out,
        "\nRegistros: {} de {} (descartados: {} por fecha, {} por monto)",
        snap.records.len(),
        d.kept_rows(),
        d.dropped_dates,
        d.dropped_amounts
    )?;
    if d.lossy_rows > 0 {
        writeln!(out, "Filas con caracteres no UTF-8: {}", d.lossy_rows)?;
    }
    Ok(())
}

fn write_options(out: &mut impl Write, options: &FilterOptions) -> fmt::Result {
    let years: Vec<String> = options.years.iter().map(|y| y.to_string()).collect();
    writeln!(out, "Vendedores: {}", options.sellers.join(", "))?;
    writeln!(out, "Clientes:   {}", options.customers.join(", "))?;
    writeln!(out, "Años:       {}", years.join(", "))?;
    writeln!(out, "Meses:      {}", options.months.join(", "))
}
