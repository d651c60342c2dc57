//! Self-contained HTML report
//!
//! One table, grouped Event / Heat / Lane, each lane followed by its list of
//! findings in the check's color. Opening the page with `?refresh=1` reloads
//! it after a stretch without user activity, which is how the poolside
//! display stays current in watch mode.

use crate::accumulator::LaneResult;
use crate::checkers::Reason;
use crate::error::Result;
use chrono::{DateTime, Local};
use meetcheck_common::human_time::format_swim_time_opt;
use std::fmt::Write as _;
use std::path::Path;

/// Seconds without a click/touch/mouse move before the page reloads
pub const IDLE_RELOAD_SECS: u64 = 30;

const STYLE: &str = r#"<style>
  tr.event { font-weight: bold; font-size: 1.2rem; background: #ccc; }
  tr.heat td { border-bottom: 1px solid black; }
  tr.heat td:first-of-type { padding-left: 15px; }
  tr.lane td:first-of-type { padding-left: 30px; }
  tr.reasons td:first-of-type { padding-left: 45px; }
  .breadcrumb-title { font-weight: 700; }
  .emphasis { font-weight: 700; text-decoration: underline; }
</style>"#;

/// Minimal escaping for text and double-quoted attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped reason text with emphasized parts wrapped in spans
fn reason_html(reason: &Reason) -> String {
    let mut out = String::new();
    for part in reason.parts() {
        if part.emphasis {
            let _ = write!(out, r#"<span class="emphasis">{}</span>"#, escape(&part.text));
        } else {
            out.push_str(&escape(&part.text));
        }
    }
    out
}

fn header(source: &str, generated: &DateTime<Local>) -> String {
    format!(
        r#"<h1>Meet Manager data checks report</h1>
<p><span class="breadcrumb-title">File:</span> <span class="breadcrumb-value">{}</span></p>
<p><span class="breadcrumb-title">Generated:</span> <span class="breadcrumb-value">{}</span></p>
"#,
        escape(source),
        generated.format("%Y-%m-%d %H:%M:%S")
    )
}

fn table(results: &[LaneResult]) -> String {
    let mut out = String::from(r#"<table class="meetchecker"><tbody>"#);

    for event in results.chunk_by(|a, b| a.event_no() == b.event_no()) {
        let first = &event[0];
        let _ = write!(
            out,
            r#"<tr class="event"><td colspan="5">Event {}: {}</td></tr>"#,
            first.event_no(),
            escape(first.event_name())
        );

        for heat in event.chunk_by(|a, b| a.heat() == b.heat()) {
            let _ = write!(
                out,
                r#"<tr class="heat"><td colspan="5">Heat: {}</td></tr>"#,
                heat[0].heat()
            );

            for lane in heat {
                let _ = write!(
                    out,
                    r#"<tr class="lane"><td>Lane {}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
                    lane.lane(),
                    escape(lane.display_name()),
                    escape(lane.team_abbr()),
                    format_swim_time_opt(lane.finish_time())
                );

                out.push_str(r#"<tr class="reasons"><td colspan="5"><ul>"#);
                for finding in lane.findings() {
                    let _ = write!(
                        out,
                        r#"<li class="reason" style="color: {}">{}: {}</li>"#,
                        escape(&finding.color),
                        escape(&finding.check_name),
                        reason_html(&finding.reason)
                    );
                }
                out.push_str("</ul></td></tr>");
            }
        }
    }

    out.push_str("</tbody></table>");
    out
}

fn refresh_script(idle_secs: u64) -> String {
    format!(
        r#"<script>
(function() {{
    const refresh = new URLSearchParams(window.location.search).get('refresh');
    if (!refresh || refresh === '0') {{
        return;
    }}
    const idleDurationSecs = {};
    let idleTimeout;
    const resetIdleTimeout = function() {{
        if (idleTimeout) clearTimeout(idleTimeout);
        idleTimeout = setTimeout(() => location.reload(), idleDurationSecs * 1000);
    }};
    resetIdleTimeout();
    ['click', 'touchstart', 'mousemove'].forEach(evt =>
        document.addEventListener(evt, resetIdleTimeout, false)
    );
}})();
</script>"#,
        idle_secs
    )
}

/// Render the full document
pub fn render_html(results: &[LaneResult], source: &str, generated: &DateTime<Local>) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Meet checks</title>\n{}\n</head>\n<body>\n{}{}\n{}\n</body>\n</html>\n",
        STYLE,
        header(source, generated),
        table(results),
        refresh_script(IDLE_RELOAD_SECS)
    )
}

/// Render and write to `output`
pub fn write_html_report(results: &[LaneResult], source: &str, output: &Path) -> Result<()> {
    let html = render_html(results, source, &Local::now());
    std::fs::write(output, html)?;
    Ok(())
}
