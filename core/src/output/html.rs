//! HTML table output for rendered rows.
//!
//! Cell content is written raw: the diff, prompt and toggle fields are markup
//! by construction, and text taken from the workbook is not escaped either.
//! Callers must only feed workbooks whose text is safe to embed as HTML.

use crate::config::ViewerConfig;
use crate::rows::RenderedRow;

/// Output column names, in display order.
pub const COLUMNS: [&str; 7] = [
    "task_id",
    "prompt_html",
    "pred_highlighted",
    "target_1",
    "em",
    "es",
    "toggle_button",
];

/// Script defining `togglePrompt(index)` for elements with id `prompt_<index>`.
pub const TOGGLE_SCRIPT: &str = r#"
<script>
function togglePrompt(index) {
    var element = document.getElementById('prompt_' + index);
    if (element.style.display === 'none') {
        element.style.display = 'block';
    } else {
        element.style.display = 'none';
    }
}
window.togglePrompt = togglePrompt;
</script>
"#;

const TABLE_OPEN: &str = r#"<table border="1" class="dataframe" style="white-space: pre-wrap; word-break: break-word;">"#;

pub fn serialize_table(rows: &[RenderedRow], config: &ViewerConfig) -> String {
    let mut html = String::new();
    html.push_str(TABLE_OPEN);
    html.push('\n');

    html.push_str("  <thead>\n    <tr style=\"text-align: right;\">\n");
    for column in COLUMNS {
        match config.column_width(column) {
            Some(width) => html.push_str(&format!(
                "      <th style=\"width: {width}px;\">{column}</th>\n"
            )),
            None => html.push_str(&format!("      <th>{column}</th>\n")),
        }
    }
    html.push_str("    </tr>\n  </thead>\n");

    html.push_str("  <tbody>\n");
    for row in rows {
        html.push_str("    <tr>\n");
        for cell in row_cells(row) {
            html.push_str(&format!("      <td>{cell}</td>\n"));
        }
        html.push_str("    </tr>\n");
    }
    html.push_str("  </tbody>\n</table>");

    html
}

fn row_cells(row: &RenderedRow) -> [&str; 7] {
    [
        &row.task_id,
        &row.prompt_block,
        &row.highlighted_diff,
        &row.target_display,
        &row.em,
        &row.es,
        &row.toggle_control,
    ]
}

/// Assembles the final fragment: toggle script, then the table with markers
/// emphasized, with tabs expanded to spaces.
pub fn render_fragment(rows: &[RenderedRow], config: &ViewerConfig) -> String {
    let table = config.marker_set().apply(&serialize_table(rows, config));
    let fragment = format!("{TOGGLE_SCRIPT}{table}");
    fragment.replace('\t', &" ".repeat(config.tab_width))
}
