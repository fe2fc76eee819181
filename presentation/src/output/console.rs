//! Console output formatter for sessions and results

use colored::Colorize;
use poker_application::PollReport;
use poker_domain::{
    Card, Deck, Outcome, ParticipantName, SessionResults, SessionSummary, SessionView,
    StoryStatus, StorySummary,
};
use serde::Serialize;

/// Formats planning poker read models for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The deck in play order
    pub fn format_deck() -> String {
        let faces: Vec<String> = Deck::values().iter().map(Self::card).collect();
        format!("{} {}\n", "Deck:".cyan().bold(), faces.join("  "))
    }

    /// A session as one participant sees it
    pub fn format_view(view: &SessionView) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Session {}", view.code)));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Title:".cyan().bold(), view.title));
        output.push_str(&format!(
            "{} {}  {} {}\n",
            "Mode:".cyan().bold(),
            view.mode,
            "Status:".cyan().bold(),
            view.status
        ));

        if let Some(current) = &view.current {
            output.push_str(&Self::section_header(&format!(
                "Current story: {} ({})",
                current.title, current.cursor
            )));
            if !current.content.is_empty() {
                output.push_str(&format!("{}\n", current.content));
            }
            output.push_str(&format!("{} {}\n", "State:".dimmed(), current.status));
            if let Some(card) = &current.your_vote {
                output.push_str(&format!("{} {}\n", "Your vote:".dimmed(), Self::card(card)));
            }
        }

        output.push_str(&Self::section_header("Participants"));
        if view.participants.is_empty() {
            output.push_str(&format!("  {}\n", "(nobody yet)".dimmed()));
        }
        for participant in &view.participants {
            let vote = match (&participant.vote, participant.has_voted) {
                (Some(card), _) => Self::card(card),
                (None, true) => "voted".green().to_string(),
                (None, false) => "waiting".dimmed().to_string(),
            };
            output.push_str(&format!("  * {:<20} {}\n", participant.name.as_str(), vote));
        }

        if let Some(close) = &view.last_close {
            output.push_str(&format!(
                "\n{} {}: {}\n",
                "Last close:".cyan().bold(),
                close.cursor,
                Self::outcome(&close.outcome)
            ));
        }

        output.push_str(&Self::section_header(&format!(
            "Stories ({}/{} closed)",
            view.closed_count(),
            view.stories.len()
        )));
        for story in &view.stories {
            output.push_str(&Self::story_line(story));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Final values per story
    pub fn format_results(results: &SessionResults) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Results {}", results.code)));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Title:".cyan().bold(), results.title));
        output.push_str(&format!("{} {}\n", "Mode:".cyan().bold(), results.mode));
        if !results.complete {
            output.push_str(&format!("{}\n", "Session still in progress".yellow()));
        }

        output.push_str(&Self::section_header("Stories"));
        for story in &results.stories {
            output.push_str(&Self::story_line(story));
        }
        output.push_str(&format!(
            "\n{} {}\n",
            "Total:".green().bold(),
            poker_domain::Estimate::new(results.total())
        ));

        output.push_str(&Self::footer());
        output
    }

    /// One line per session
    pub fn format_summaries(sessions: &[SessionSummary]) -> String {
        if sessions.is_empty() {
            return format!("{}\n", "No sessions".dimmed());
        }
        let mut output = String::new();
        for session in sessions {
            output.push_str(&format!(
                "{}  {:<30} {:<18} {:<12} {} stories, {} participants\n",
                session.code.as_str().yellow().bold(),
                session.title,
                session.mode.as_str(),
                session.status.as_str(),
                session.story_count,
                session.participant_count
            ));
        }
        output
    }

    /// Per-participant polling activity followed by the results
    pub fn format_simulation(
        results: &SessionResults,
        reports: &[(ParticipantName, PollReport)],
    ) -> String {
        let mut output = Self::format_results(results);

        output.push_str(&Self::section_header("Participants"));
        for (name, report) in reports {
            let mut line = format!(
                "  * {:<12} {} polls, {} votes, {} closes applied, {} replayed",
                name.as_str(),
                report.polls,
                report.votes_cast,
                report.closes_applied,
                report.closes_replayed
            );
            if report.finalized_here {
                line.push_str(&format!(", {}", "finalized".green()));
            }
            if report.interrupted {
                line.push_str(&format!(", {}", "interrupted".red()));
            }
            output.push_str(&line);
            output.push('\n');
        }
        output
    }

    /// Format any read model as pretty JSON
    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn story_line(story: &StorySummary) -> String {
        let marker = match story.status {
            StoryStatus::Closed => "x".green(),
            StoryStatus::Voting | StoryStatus::Revealed => ">".yellow(),
            StoryStatus::Pending => "-".dimmed(),
        };
        let value = story
            .final_value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "  {} {:>3}. {:<40} {}\n",
            marker,
            story.index + 1,
            story.title,
            value.bold()
        )
    }

    fn outcome(outcome: &Outcome) -> String {
        match outcome {
            Outcome::Agreed(_) => outcome.to_string().green().to_string(),
            Outcome::NotAgreed(_) => outcome.to_string().yellow().to_string(),
        }
    }

    fn card(card: &Card) -> String {
        if card.is_special() {
            card.to_string().magenta().to_string()
        } else {
            card.to_string().bold().to_string()
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poker_domain::{AgreementMode, Estimate, SessionCode, SessionStatus};

    fn results() -> SessionResults {
        SessionResults {
            code: SessionCode::from_number(4242),
            title: "Sprint 3".into(),
            mode: AgreementMode::Median,
            status: SessionStatus::Closed,
            complete: true,
            stories: vec![
                StorySummary {
                    index: 0,
                    title: "Login page".into(),
                    status: StoryStatus::Closed,
                    final_value: Some(Estimate::from(5)),
                },
                StorySummary {
                    index: 1,
                    title: "Password reset".into(),
                    status: StoryStatus::Closed,
                    final_value: Some(Estimate::new(6.5)),
                },
            ],
        }
    }

    #[test]
    fn test_format_results_lists_stories() {
        let output = ConsoleFormatter::format_results(&results());

        assert!(output.contains("004242"));
        assert!(output.contains("Login page"));
        assert!(output.contains("Password reset"));
        assert!(output.contains("6.5"));
        assert!(output.contains("11.5"));
        assert!(!output.contains("still in progress"));
    }

    #[test]
    fn test_format_deck_lists_every_card() {
        let output = ConsoleFormatter::format_deck();
        for card in Deck::values() {
            assert!(output.contains(&card.to_string()));
        }
    }

    #[test]
    fn test_format_json() {
        let json = ConsoleFormatter::format_json(&results());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["code"], "004242");
        assert_eq!(value["stories"][1]["final_value"], 6.5);
    }

    #[test]
    fn test_format_summaries_empty() {
        assert!(ConsoleFormatter::format_summaries(&[]).contains("No sessions"));
    }
}
