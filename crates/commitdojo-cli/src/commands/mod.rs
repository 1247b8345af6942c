pub mod grade;
pub mod init;
pub mod list;
pub mod practice;
pub mod report;
pub mod validate;

use commitdojo_core::model::GradeResult;

/// Render a grade as the four feedback lines plus the total.
pub(crate) fn format_grade(grade: &GradeResult) -> String {
    let mut out = String::new();
    for score in &grade.field_scores {
        out.push_str(&format!(
            "  {:<12} {}/{}  {}\n",
            score.dimension.to_string(),
            score.points,
            score.dimension.max_points(),
            score.message
        ));
    }
    out.push_str(&format!(
        "  Score: {}/{}{}\n",
        grade.total_score,
        GradeResult::MAX_SCORE,
        if grade.is_perfect { " (perfect)" } else { "" }
    ));
    out
}
