//! Plotters-powered units-sold column chart for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color as TuiColor, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Column palette, cycled per product.
pub const PALETTE: [(u8, u8, u8); 10] = [
    (11, 61, 145),
    (30, 91, 198),
    (59, 125, 214),
    (90, 159, 231),
    (122, 184, 245),
    (154, 207, 255),
    (26, 71, 42),
    (45, 122, 77),
    (69, 163, 108),
    (95, 200, 141),
];

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call.
pub struct UnitsChart<'a> {
    /// `(label, units)` in display order.
    pub bars: &'a [(String, f64)],
    /// Upper y bound (units).
    pub y_max: f64,
}

impl<'a> Widget for UnitsChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(TuiColor::Yellow),
            );
            return;
        }

        if self.bars.is_empty() || !(self.y_max.is_finite() && self.y_max > 0.0) {
            return;
        }

        let n = self.bars.len() as f64;
        let bars = self.bars;
        let y_max = self.y_max;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(0.0..n, 0.0..y_max)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("product")
                .y_desc("units sold")
                .x_labels(bars.len().min(10))
                .y_labels(5)
                .x_label_formatter(&|v| {
                    let idx = v.floor() as usize;
                    bars.get(idx).map(|(label, _)| initials(label)).unwrap_or_default()
                })
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            chart.draw_series(bars.iter().enumerate().map(|(i, (_, units))| {
                let (r, g, b) = PALETTE[i % PALETTE.len()];
                let x0 = i as f64 + 0.15;
                let x1 = i as f64 + 0.85;
                Rectangle::new([(x0, 0.0), (x1, *units)], RGBColor(r, g, b).filled())
            }))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Short axis label: first letter of each word (`Pre-Paid Maintenance` → `PPM`).
pub fn initials(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '-')
        .filter_map(|w| w.chars().next())
        .collect::<String>()
        .to_uppercase()
}

/// Legend text per bar: `INITIALS  name: units`.
pub fn legend_entries(bars: &[(String, f64)]) -> Vec<String> {
    bars.iter()
        .map(|(name, units)| format!("{:<4} {name}: {units:.0}", initials(name)))
        .collect()
}

/// Legend lines with a swatch in the bar's palette color.
pub fn legend_lines(bars: &[(String, f64)]) -> Vec<Line<'static>> {
    legend_entries(bars)
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let (r, g, b) = PALETTE[i % PALETTE.len()];
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(TuiColor::Rgb(r, g, b))),
                Span::raw(text),
            ])
        })
        .collect()
}

/// Bars and y bound for the chart, with 5% headroom.
pub fn chart_bars(products: &[crate::domain::AggregatedProduct]) -> (Vec<(String, f64)>, f64) {
    let bars: Vec<(String, f64)> = products
        .iter()
        .map(|p| (p.name.clone(), p.sold_count as f64))
        .collect();
    let max = bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let y_max = if max > 0.0 { max * 1.05 } else { 1.0 };
    (bars, y_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AggregatedProduct;

    #[test]
    fn initials_split_on_spaces_and_hyphens() {
        assert_eq!(initials("Pre-Paid Maintenance"), "PPM");
        assert_eq!(initials("GAP"), "G");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn legend_tells_apart_shared_initials() {
        let bars = vec![
            ("Appearance Protection".to_string(), 102.0),
            ("Auto Protection".to_string(), 7.0),
        ];
        let entries = legend_entries(&bars);
        assert_eq!(entries[0], "AP   Appearance Protection: 102");
        assert_eq!(entries[1], "AP   Auto Protection: 7");
        assert_eq!(legend_lines(&bars).len(), 2);
    }

    #[test]
    fn chart_bounds_have_headroom() {
        let products = vec![AggregatedProduct {
            name: "GAP".to_string(),
            sold_count: 100,
            avg_price: 1.0,
            total_revenue: 100.0,
        }];
        let (bars, y_max) = chart_bars(&products);
        assert_eq!(bars, vec![("GAP".to_string(), 100.0)]);
        assert!((y_max - 105.0).abs() < 1e-9);
        assert_eq!(chart_bars(&[]).1, 1.0);
    }
}
