use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget},
};

use crate::trend::TrendChart;

const EMPTY_MESSAGE: &str = "Finish a round to see your trend";

/// Draw the recent-attempts chart, or a placeholder with no history
pub fn render_trend(chart: &TrendChart, area: Rect, buf: &mut Buffer) {
    if chart.is_empty() {
        Paragraph::new(Span::styled(
            EMPTY_MESSAGE,
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(area, buf);
        return;
    }

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let reaction_style = Style::default().fg(Color::Blue);
    let queue_style = Style::default().fg(Color::Magenta);

    let gridlines = chart.gridline_segments();
    let mut datasets: Vec<Dataset> = gridlines
        .iter()
        .map(|segment| {
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::DarkGray))
                .data(segment)
        })
        .collect();

    datasets.extend([
        Dataset::default()
            .name("reaction")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(reaction_style)
            .data(&chart.reaction),
        Dataset::default()
            .marker(Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(reaction_style)
            .data(&chart.reaction),
        Dataset::default()
            .name("queue (inverted)")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(queue_style)
            .data(&chart.queue),
        Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(queue_style)
            .data(&chart.queue),
    ]);

    let x_labels: Vec<Span> = chart
        .x_labels
        .iter()
        .map(|(_, label)| Span::styled(label.clone(), bold_style))
        .collect();
    let [y_bottom, y_top] = chart.y_labels();

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("attempt")
                .bounds([0.0, chart.x_max()])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .labels(vec![
                    Span::styled(y_bottom, bold_style),
                    Span::styled(y_top, bold_style),
                ]),
        )
        .render(area, buf);
}
