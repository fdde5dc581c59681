use charming::component::{Axis, Grid, Legend, Title};
use charming::element::{AxisLabel, AxisType, ItemStyle, LineStyle, SplitLine, TextStyle, Tooltip, Trigger};
use charming::series::Line;
use charming::theme::Theme;
use charming::{Chart, HtmlRenderer};
use log::debug;

use crate::errors::{Result, StockalyseError};
use crate::models::query::DayCount;
use crate::models::stock::{ChartRow, PricePoint};

pub const SERIES_LABEL: &str = "USD Value";
pub const LINE_COLOR: &str = "#f50057";
pub const BACKGROUND_COLOR: &str = "#282c34";
pub const TEXT_COLOR: &str = "white";
pub const POINT_SIZE: f64 = 7.0;
/// `dd MMM`, e.g. `02 Jan`.
pub const AXIS_DATE_FORMAT: &str = "%d %b";

/// Takes the first `day_count` points that exist; shorter series yield fewer rows.
pub fn chart_rows(series: &[PricePoint], day_count: DayCount) -> Vec<ChartRow> {
    series.iter().take(day_count.get()).map(ChartRow::from).collect()
}

pub fn chart_title(symbol: &str, day_count: DayCount) -> String {
    format!("{} Stock Report ({} Days)", symbol, day_count)
}

/// Line chart of the close prices, oldest point on the left.
pub fn build_chart(symbol: &str, day_count: DayCount, rows: &[ChartRow]) -> Chart {
    let mut rows = rows.to_vec();
    rows.sort_by_key(|row| row.date);
    debug!("Building chart for {} with {} rows", symbol, rows.len());

    let labels: Vec<String> = rows
        .iter()
        .map(|row| row.date.format(AXIS_DATE_FORMAT).to_string())
        .collect();
    let closes: Vec<f64> = rows.iter().map(|row| row.close).collect();

    Chart::new()
        .background_color(BACKGROUND_COLOR)
        .title(
            Title::new()
                .text(chart_title(symbol, day_count))
                .text_style(TextStyle::new().color(TEXT_COLOR)),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(
            Legend::new()
                .right("5%")
                .text_style(TextStyle::new().color(TEXT_COLOR))
                .data(vec![SERIES_LABEL.to_string()]),
        )
        .grid(Grid::new().bottom(60))
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .name("Date")
                .name_text_style(TextStyle::new().color(TEXT_COLOR))
                .axis_label(AxisLabel::new().color(TEXT_COLOR))
                .data(labels),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .scale(true)
                .axis_label(AxisLabel::new().color(TEXT_COLOR))
                .split_line(SplitLine::new().show(false)),
        )
        .series(
            Line::new()
                .name(SERIES_LABEL)
                .symbol_size(POINT_SIZE)
                .show_symbol(true)
                .line_style(LineStyle::new().color(LINE_COLOR))
                .item_style(ItemStyle::new().color(LINE_COLOR))
                .data(closes),
        )
}

/// Renders a standalone HTML page embedding the chart.
pub fn render_html(chart: &Chart, title: &str, width: u64, height: u64) -> Result<String> {
    HtmlRenderer::new(title, width, height)
        .theme(Theme::Default)
        .render(chart)
        .map_err(|e| StockalyseError::ChartError(format!("{:?}", e)))
}
