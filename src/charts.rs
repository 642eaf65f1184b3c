//! Line chart of daily spending for the trend view.
//!
//! The chart is generated as an ECharts configuration; its JSON can be
//! handed to any ECharts renderer via `chart.to_string()`.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, ItemStyle, JsFunction, Tooltip, Trigger,
    },
    series::Line,
};

use crate::series::DailySeries;

const SERIES_COLOR: &str = "rgba(51, 105, 30, 1)";

/// A line chart with one point per day of the series' month.
///
/// The x-axis uses the strided day labels, so only every third day is named.
pub fn daily_spend_chart(series: &DailySeries) -> Chart {
    Chart::new()
        .title(
            Title::new()
                .text(format!("{} Expenses", series.period.label()))
                .subtext(series.period.year.to_string()),
        )
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(series.labels()),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Line::new()
                .name("Expenses")
                .item_style(ItemStyle::new().color(SERIES_COLOR))
                .data(series.values.clone()),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Line))
}
