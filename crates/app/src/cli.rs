use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "quiz", version, about = "Adaptive math diagnostics and practice")]
pub struct Cli {
    /// SQLite URL
    #[arg(long = "db", global = true, env = "QUIZ_DB_URL", default_value = "sqlite://quiz.sqlite3")]
    pub db_url: String,

    /// Student the session and results belong to
    #[arg(long, global = true, env = "QUIZ_STUDENT", default_value = "student")]
    pub student: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List courses
    Courses,

    /// List a course's questions by difficulty
    Questions {
        #[arg(long)]
        course: String,

        /// Only questions at this level (1-10)
        #[arg(long)]
        difficulty: Option<i64>,
    },

    /// Create a course; its id is derived from the name
    AddCourse {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: String,
    },

    /// Delete a course with its questions and results
    DeleteCourse {
        #[arg(long)]
        course: String,
    },

    /// Add a question to a course
    AddQuestion {
        #[arg(long)]
        course: String,

        #[arg(long)]
        statement: String,

        #[arg(long)]
        answer: String,

        /// 1-10; out-of-range values are clamped
        #[arg(long, default_value_t = 5)]
        difficulty: i64,

        /// Seconds a student should need
        #[arg(long, default_value_t = 60)]
        target_secs: u32,

        /// Explicit question id (generated when omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// Delete a question
    DeleteQuestion {
        #[arg(long)]
        id: String,
    },

    /// Take an adaptive diagnostic
    Diagnostic {
        #[arg(long)]
        course: String,

        /// Number of questions
        #[arg(long, env = "QUIZ_SESSION_LENGTH")]
        length: Option<usize>,
    },

    /// Practice adaptively until the questions run out or you quit
    Practice {
        #[arg(long)]
        course: String,
    },

    /// Show the latest diagnostic result
    Results {
        #[arg(long)]
        course: String,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,

        /// List every student's result in the course
        #[arg(long)]
        all: bool,
    },

    /// Load the starter courses and questions
    Seed,
}
