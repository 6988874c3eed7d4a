use quiz_core::insights::{PerformanceSeries, ResultInsights};
use quiz_core::model::{Course, Question};
use quiz_core::session::{SessionProgress, SessionReport};
use storage::StoredResult;

pub fn courses(courses: &[Course]) {
    if courses.is_empty() {
        println!("No courses yet. Run `quiz seed` or `quiz add-course`.");
        return;
    }
    for course in courses {
        println!("{:<16} {:<16} {}", course.id(), course.name(), course.description());
    }
}

pub fn questions(questions: &[Question]) {
    if questions.is_empty() {
        println!("No questions.");
        return;
    }
    for q in questions {
        println!(
            "[{:>2}] {:<12} {:>4}s  {}  => {}",
            q.difficulty().value(),
            q.id(),
            q.target_time_secs(),
            q.statement(),
            q.correct_answer()
        );
    }
}

pub fn question(question: &Question, progress: &SessionProgress) {
    let position = progress.answered + 1;
    match progress.total {
        Some(total) => print!("Question {position}/{total}"),
        None => print!("Question {position}"),
    }
    println!(
        "  (level {}, {}s)",
        question.difficulty().value(),
        question.target_time_secs()
    );
    println!("{}", question.statement());
}

pub fn session_report(report: &SessionReport, saved: bool) {
    println!("Session {} ({}).", report.session_id, report.reason);
    let correct = report.attempts.iter().filter(|a| a.correct()).count();
    println!("Answered {} questions, {correct} correct.", report.attempts.len());
    println!("Final difficulty: {}", report.final_difficulty.value());

    if let Some(result) = &report.result {
        performance(
            &ResultInsights::from_result(result),
            &PerformanceSeries::from_attempts(result.attempts()),
        );
        if saved {
            println!("Result saved.");
        } else {
            println!("Result not saved.");
        }
    }
}

pub fn performance(insights: &ResultInsights, series: &PerformanceSeries) {
    println!();
    println!(
        "Skill level: {}/10 ({})",
        insights.skill_level, insights.band
    );
    println!(
        "Accuracy:    {}% ({})",
        insights.correct_percentage, insights.accuracy_remark
    );
    println!(
        "Avg time:    {}s ({})",
        insights.average_time_secs, insights.pace_remark
    );
    println!("{}", insights.recommendation);
    println!();

    let rows = series
        .labels
        .iter()
        .zip(&series.difficulty)
        .zip(&series.time_taken_secs)
        .zip(&series.correct);
    for (((label, level), secs), correct) in rows {
        let mark = if *correct { "correct" } else { "wrong" };
        println!("{label:<4} level {level:>2}  {secs:>4}s  {mark}");
    }
}

pub fn course_results(results: &[StoredResult]) {
    if results.is_empty() {
        println!("No results yet.");
        return;
    }
    for stored in results {
        println!(
            "{:<16} level {:>2}  {:>3}%  avg {:>3}s  {}",
            stored.student,
            stored.result.skill_level().value(),
            stored.result.correct_percentage(),
            stored.result.average_time_secs(),
            stored.completed_at.format("%Y-%m-%d %H:%M")
        );
    }
}
