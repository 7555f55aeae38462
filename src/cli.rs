use clap::{Args, Parser, Subcommand};
use chrono::NaiveDate;
use crate::forms::FormKind;
use crate::models::{GroupType, StudyId};
use crate::scoring::ProblemArea;

#[derive(Parser)]
#[command(name = "trialcapture")]
#[command(about = "Capture clinical-trial participant data: VR sessions, questionnaires and study forms")]
#[command(version)]
pub struct Cli {
    /// Use an in-memory backend that answers every request with no rows
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List participants visible to the configured user
    Participants {
        /// Trial arm (study, control)
        #[arg(short, long)]
        group: Option<String>,

        /// Participant id or study id substring
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List the VR sessions of a participant
    Sessions {
        /// Participant id
        #[arg(short, long)]
        participant: String,

        /// Study id (`CS-0001`, or just the number)
        #[arg(short, long)]
        study: String,
    },

    /// Load, fill in or clear a form
    Form {
        #[command(subcommand)]
        action: FormCommand,
    },

    /// Compute questionnaire scores without touching the backend
    Score {
        #[command(subcommand)]
        scale: ScoreCommand,
    },

    /// Start the terminal interface
    Tui,
}

#[derive(Subcommand)]
pub enum FormCommand {
    /// Print the stored values of a form
    Show {
        #[command(flatten)]
        target: FormTarget,
    },

    /// Set fields and save the form
    Save {
        #[command(flatten)]
        target: FormTarget,

        /// Field assignment, repeatable (`--set severity=Mild`)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        assignments: Vec<String>,
    },

    /// Load a form, reset it to defaults and print the result (nothing is sent)
    Clear {
        #[command(flatten)]
        target: FormTarget,
    },
}

#[derive(Args)]
pub struct FormTarget {
    /// Form (adverse-event, exit-interview, informed-consent, screening,
    /// pre-vr, post-vr, study-observation, fact-g, distress)
    #[arg(short, long)]
    pub kind: String,

    /// Participant id
    #[arg(short, long)]
    pub participant: String,

    /// Study id (`CS-0001`, or just the number)
    #[arg(short, long)]
    pub study: String,

    /// Date of a dated questionnaire (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Existing record id to load and update
    #[arg(short, long)]
    pub record: Option<i64>,

    /// Participant age
    #[arg(long)]
    pub age: Option<u32>,
}

#[derive(Subcommand)]
pub enum ScoreCommand {
    /// FACT-G subscale and total scores
    FactG {
        /// Item answer, repeatable (`--answer GP1=3`)
        #[arg(short, long = "answer", value_name = "CODE=VALUE")]
        answers: Vec<String>,
    },

    /// Distress thermometer index
    Distress {
        /// Thermometer rating (0-10)
        #[arg(short, long)]
        rating: u8,

        /// Ticked problems per area, repeatable (`--problems physical=3`)
        #[arg(short, long = "problems", value_name = "AREA=COUNT")]
        problems: Vec<String>,
    },
}

impl Commands {
    pub fn parse_form_kind(kind: &str) -> Result<FormKind, anyhow::Error> {
        FormKind::parse(kind).ok_or_else(|| {
            let known: Vec<&str> = FormKind::ALL.iter().map(|k| k.as_str()).collect();
            anyhow::anyhow!("Unknown form: {}. Known forms: {}", kind, known.join(", "))
        })
    }

    pub fn parse_group(group: &str) -> Result<GroupType, anyhow::Error> {
        GroupType::parse(group)
            .ok_or_else(|| anyhow::anyhow!("Unknown group: {}. Supported groups: study, control", group))
    }

    /// Split `key=value`; the value may itself contain `=` and may be empty
    pub fn parse_assignment(assignment: &str) -> Result<(String, String), anyhow::Error> {
        match assignment.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(anyhow::anyhow!("Expected KEY=VALUE, got: {}", assignment)),
        }
    }

    /// A bare number is padded with the configured prefix (`7` -> `CS-0007`)
    pub fn parse_study_id(study: &str, prefix: &str) -> Result<StudyId, anyhow::Error> {
        let study = study.trim();
        if study.is_empty() {
            return Err(anyhow::anyhow!("Study id is empty"));
        }
        match study.parse::<u32>() {
            Ok(number) => Ok(StudyId::padded(prefix, number)),
            Err(_) => Ok(StudyId::new(study)),
        }
    }

    pub fn parse_problem_area(area: &str) -> Result<ProblemArea, anyhow::Error> {
        match area.trim().to_lowercase().as_str() {
            "practical" => Ok(ProblemArea::Practical),
            "family" => Ok(ProblemArea::Family),
            "emotional" => Ok(ProblemArea::Emotional),
            "spiritual" | "religious" | "spiritual/religious" => Ok(ProblemArea::Spiritual),
            "physical" => Ok(ProblemArea::Physical),
            other => Err(anyhow::anyhow!(
                "Unknown problem area: {}. Supported areas: practical, family, emotional, spiritual, physical",
                other
            )),
        }
    }
}
