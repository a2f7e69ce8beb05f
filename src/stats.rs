use crate::store::Answers;
use srs_engine::Summary;
use std::fmt;

#[derive(Debug)]
pub struct Stats {
    pub summary: Summary,
    /// Answers over the past month.
    pub answers: Answers,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let summary = &self.summary;
        writeln!(f, "{} / {} mastered", summary.mastered, summary.total())?;
        writeln!(
            f,
            "{} new, {} due, {} scheduled",
            summary.new, summary.due, summary.scheduled
        )?;

        if summary.leech > 0 {
            writeln!(f, "{} leeches", summary.leech)?;
        }

        let Answers { remembered, total } = &self.answers;

        writeln!(
            f,
            "Past month accuracy: {:.0}% ({remembered} / {total})",
            if *total > 0 {
                *remembered as f32 / *total as f32 * 100.0
            } else {
                100.0
            },
        )
    }
}
