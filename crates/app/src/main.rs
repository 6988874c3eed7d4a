use std::error::Error;

use clap::Parser;
use quiz_core::model::{CourseId, Difficulty, QuestionDraft, QuestionId, StudentId};
use services::{AppServices, Clock};
use storage::repository::Storage;
use storage::starter::load_starter;
use tracing_subscriber::EnvFilter;

mod cli;
mod interactive;
mod render;

use cli::{Cli, Command};

async fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    if cli.db_url.trim().is_empty() {
        return Err("--db must not be empty".into());
    }

    let app = AppServices::new_sqlite(&cli.db_url, Clock::default_clock()).await?;
    if app.seeded_on_launch() {
        println!("Empty database: loaded the starter courses.");
    }
    let student = StudentId::new(&cli.student)?;

    match cli.command {
        Command::Courses => render::courses(&app.courses().list_courses().await?),
        Command::Questions { course, difficulty } => {
            let level = difficulty.map(Difficulty::new).transpose()?;
            let questions = app
                .courses()
                .list_questions(&CourseId::new(course)?, level)
                .await?;
            render::questions(&questions);
        }
        Command::AddCourse { name, description } => {
            let course = app.courses().create_course(&name, &description).await?;
            println!("Created course {}", course.id());
        }
        Command::DeleteCourse { course } => {
            app.courses().delete_course(&CourseId::new(course)?).await?;
            println!("Deleted.");
        }
        Command::AddQuestion {
            course,
            statement,
            answer,
            difficulty,
            target_secs,
            id,
        } => {
            let mut draft = QuestionDraft::new(CourseId::new(course)?, statement, answer)
                .with_difficulty(difficulty)
                .with_target_time(target_secs);
            if let Some(id) = id {
                draft = draft.with_id(QuestionId::new(id)?);
            }
            let question = app.courses().add_question(draft).await?;
            println!(
                "Added question {} at level {}",
                question.id(),
                question.difficulty().value()
            );
        }
        Command::DeleteQuestion { id } => {
            app.courses().delete_question(&QuestionId::new(id)?).await?;
            println!("Deleted.");
        }
        Command::Diagnostic { course, length } => {
            let svc = app.session_loop();
            let session = svc
                .start_diagnostic(student, CourseId::new(course)?, length)
                .await?;
            let session = interactive::play(&svc, session).await?;
            if let Some(report) = session.report() {
                render::session_report(report, session.is_saved());
            }
        }
        Command::Practice { course } => {
            let svc = app.session_loop();
            let session = svc.start_practice(student, CourseId::new(course)?).await?;
            let session = interactive::play(&svc, session).await?;
            if let Some(report) = session.report() {
                render::session_report(report, session.is_saved());
            }
        }
        Command::Results { course, json, all } => {
            let course = CourseId::new(course)?;
            if all {
                let results = app.results().course_results(&course).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&results)?);
                } else {
                    render::course_results(&results);
                }
            } else {
                match app.results().student_report(&student, &course).await? {
                    Some(report) if json => println!("{}", serde_json::to_string_pretty(&report)?),
                    Some(report) => render::performance(&report.insights, &report.series),
                    None => println!("No diagnostic result for {student} in {course} yet."),
                }
            }
        }
        Command::Seed => {
            let storage = Storage::sqlite(&cli.db_url).await?;
            let summary = load_starter(&storage).await?;
            println!(
                "Seeded {} courses and {} questions into {}",
                summary.courses, summary.questions, cli.db_url
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
