use itertools::Itertools;

use crate::calendar::{Cell, GridLayout, MonthSpec, Week};
use crate::config::DEFAULT_STYLESHEET;
use crate::labels::{MonthLabels, WeekdayLabel};

const SUNDAY_COLUMN: usize = GridLayout::COLUMNS - 1;

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Turns a month grid and its labels into an HTML table.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    stylesheet: String,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        HtmlRenderer {
            stylesheet: DEFAULT_STYLESHEET.to_owned(),
        }
    }
}

impl HtmlRenderer {
    pub fn stylesheet(mut self, href: &str) -> Self {
        self.stylesheet = href.to_owned();
        self
    }

    pub fn render_document(
        &self,
        spec: &MonthSpec,
        grid: &GridLayout,
        labels: &MonthLabels,
    ) -> String {
        format!(
            "<html>\n<head><link href=\"{}\" type=\"text/css\" rel=\"stylesheet\"/></head>\n<body>\n{}\n</body>\n</html>\n",
            escape(&self.stylesheet),
            self.render_table(spec, grid, labels)
        )
    }

    pub fn render_table(
        &self,
        spec: &MonthSpec,
        grid: &GridLayout,
        labels: &MonthLabels,
    ) -> String {
        [
            "<table>".to_owned(),
            self.title_row(spec, &labels.month_name),
            self.label_row(labels),
            self.day_rows(grid),
            "</table>".to_owned(),
        ]
        .join("\n")
    }

    fn title_row(&self, spec: &MonthSpec, month_name: &str) -> String {
        format!(
            "<tr class='title'><td colspan='6' class='month'> {} </td><td class='year'> {} </td></tr>",
            escape(month_name),
            spec.year()
        )
    }

    fn label_row(&self, labels: &MonthLabels) -> String {
        format!(
            "<tr class='day-labels'>{}</tr>",
            labels.weekdays.iter().map(label_cell).join("")
        )
    }

    fn day_rows(&self, grid: &GridLayout) -> String {
        grid.rows().iter().map(week_row).join("\n")
    }
}

fn label_cell(label: &WeekdayLabel) -> String {
    let class = if label.is_sunday() {
        "day-label-red"
    } else {
        "day-label"
    };

    format!("<td class='{}'>{}</td>", class, escape(&label.text))
}

fn day_cell(column: usize, cell: &Cell) -> String {
    let class = if column == SUNDAY_COLUMN {
        "day-box-red"
    } else {
        "day-box"
    };

    format!("<td class='{}'>{}</td>", class, cell)
}

fn week_row(week: &Week) -> String {
    format!(
        "\t<tr>\n\t\t{}\n\t</tr>",
        week.iter()
            .enumerate()
            .map(|(column, cell)| day_cell(column, cell))
            .join("")
    )
}
