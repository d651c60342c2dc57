//! Plain-text rendering of lane results for `--console`

use crate::accumulator::LaneResult;
use meetcheck_common::human_time::format_swim_time_opt;
use std::fmt::Write as _;

pub fn render_console(results: &[LaneResult]) -> String {
    let mut out = String::new();

    for event in results.chunk_by(|a, b| a.event_no() == b.event_no()) {
        let _ = writeln!(out, "\nEvent {}: {}", event[0].event_no(), event[0].event_name());

        for heat in event.chunk_by(|a, b| a.heat() == b.heat()) {
            let _ = writeln!(out, "Heat: {}", heat[0].heat());

            for lane in heat {
                let _ = writeln!(
                    out,
                    "  Lane {} {} ({}) {}",
                    lane.lane(),
                    lane.display_name(),
                    lane.team_abbr(),
                    format_swim_time_opt(lane.finish_time())
                );
                let _ = writeln!(out, "{}", lane.checks_as_str());
            }
        }
    }

    out
}
