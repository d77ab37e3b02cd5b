use types::{DayRow, ExportStyle};

use crate::grid::{Problem, Timetable};

/// One row per configured day, one cell per slot, ready for a table renderer.
pub fn day_rows(p: &Problem<'_>, tt: &Timetable, style: ExportStyle) -> Vec<DayRow> {
    let (sep, join) = match style {
        ExportStyle::Spreadsheet => (": ", " | "),
        ExportStyle::Document => (":", "\n"),
    };

    (0..p.days())
        .map(|d| DayRow {
            day: p.day(d),
            cells: (0..p.slots())
                .map(|s| {
                    (0..p.rooms())
                        .filter_map(|r| {
                            tt.cell(d, s, r).map(|ci| {
                                format!("{}{sep}{}", p.instance.rooms[r].name, p.course(ci).code)
                            })
                        })
                        .collect::<Vec<_>>()
                        .join(join)
                })
                .collect(),
        })
        .collect()
}

/// Header row matching [`day_rows`] columns.
pub fn header(p: &Problem<'_>) -> Vec<String> {
    std::iter::once("Day".to_string())
        .chain((1..=p.slots()).map(|s| format!("Slot {s}")))
        .collect()
}
