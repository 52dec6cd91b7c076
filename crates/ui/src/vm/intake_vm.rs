use intake_core::model::{QuestionId, Responses, Schema, Section, WordCountBand, word_count};
use intake_core::progress::{ProgressSnapshot, SectionStatus};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressBarVm {
    pub percentage: u32,
    pub section_position: usize,
    pub section_count: usize,
}

impl ProgressBarVm {
    #[must_use]
    pub fn width_style(&self) -> String {
        format!("width: {}%", self.percentage)
    }
}

#[must_use]
pub fn map_progress_bar(progress: &ProgressSnapshot, current_index: usize) -> ProgressBarVm {
    ProgressBarVm {
        percentage: progress.percentage,
        section_position: current_index + 1,
        section_count: progress.total_sections,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionTileVm {
    pub index: usize,
    pub title: String,
    pub icon: &'static str,
    pub status_class: &'static str,
    pub answered_label: String,
    pub inline_bar_style: Option<String>,
    pub is_current: bool,
}

fn status_icon(status: SectionStatus) -> &'static str {
    match status {
        SectionStatus::Completed => "✅",
        SectionStatus::InProgress => "⏳",
        SectionStatus::NotStarted => "○",
    }
}

#[must_use]
pub fn map_section_tiles(
    schema: &Schema,
    progress: &ProgressSnapshot,
    current_index: usize,
) -> Vec<SectionTileVm> {
    schema
        .sections()
        .iter()
        .zip(progress.sections.iter())
        .enumerate()
        .map(|(index, (section, figures))| SectionTileVm {
            index,
            title: section.title().to_string(),
            icon: status_icon(figures.status),
            status_class: figures.status.as_str(),
            answered_label: format!("{}/{} questions", figures.answered, figures.total),
            inline_bar_style: (figures.status == SectionStatus::InProgress)
                .then(|| format!("width: {}%", figures.percentage)),
            is_current: index == current_index,
        })
        .collect()
}

/// "Total Progress: 4 / 15 questions completed"
#[must_use]
pub fn total_progress_label(progress: &ProgressSnapshot) -> String {
    format!(
        "Total Progress: {} / {} questions completed",
        progress.answered_questions, progress.total_questions
    )
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub id: QuestionId,
    pub number: usize,
    pub text: String,
    pub hint: Option<String>,
    pub example_good: Option<String>,
    pub example_bad: Option<String>,
    pub answer: String,
    pub answered: bool,
    pub word_count_label: String,
    pub band_class: &'static str,
}

fn band_class(band: WordCountBand) -> &'static str {
    match band {
        WordCountBand::Short => "words-short",
        WordCountBand::Recommended => "words-ok",
        WordCountBand::Long => "words-long",
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

#[must_use]
pub fn map_questions(section: &Section, responses: &Responses) -> Vec<QuestionVm> {
    section
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let answer = responses.answer(question.id().as_str());
            let words = word_count(answer);
            QuestionVm {
                id: question.id().clone(),
                number: index + 1,
                text: question.text().to_string(),
                hint: question.hint().map(str::to_string),
                example_good: question.example_good().map(str::to_string),
                example_bad: question.example_bad().map(str::to_string),
                answer: answer.to_string(),
                answered: responses.is_answered(question.id().as_str()),
                word_count_label: plural(words, "word"),
                band_class: band_class(WordCountBand::classify(words)),
            }
        })
        .collect()
}

/// "3 questions" under the section heading.
#[must_use]
pub fn question_count_label(section: &Section) -> String {
    plural(section.questions().len(), "question")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::builtin().unwrap()
    }

    #[test]
    fn tiles_reflect_section_status() {
        let schema = schema();
        let mut responses = Responses::new();
        for question in schema.sections()[0].questions() {
            responses.set(question.id().clone(), "done");
        }
        let first_of_second = schema.sections()[1].questions()[0].id().clone();
        responses.set(first_of_second, "started");

        let progress = ProgressSnapshot::compute(&schema, &responses);
        let tiles = map_section_tiles(&schema, &progress, 1);

        assert_eq!(tiles[0].icon, "✅");
        assert_eq!(tiles[0].inline_bar_style, None);
        assert_eq!(tiles[1].icon, "⏳");
        assert_eq!(tiles[1].answered_label, "1/3 questions");
        assert_eq!(tiles[1].inline_bar_style.as_deref(), Some("width: 33%"));
        assert!(tiles[1].is_current);
        assert_eq!(tiles[2].icon, "○");
        assert_eq!(
            total_progress_label(&progress),
            "Total Progress: 4 / 15 questions completed"
        );
    }

    #[test]
    fn questions_carry_answer_state_and_word_band() {
        let schema = schema();
        let section = &schema.sections()[0];
        let mut responses = Responses::new();
        responses.set(section.questions()[0].id().clone(), "one");
        responses.set(section.questions()[1].id().clone(), "   ");

        let vms = map_questions(section, &responses);
        assert_eq!(vms[0].number, 1);
        assert!(vms[0].answered);
        assert_eq!(vms[0].word_count_label, "1 word");
        assert_eq!(vms[0].band_class, "words-short");
        assert!(!vms[1].answered);
        assert_eq!(vms[1].word_count_label, "0 words");
        assert_eq!(question_count_label(section), "3 questions");
    }

    #[test]
    fn progress_bar_is_one_based() {
        let schema = schema();
        let progress = ProgressSnapshot::compute(&schema, &Responses::new());
        let bar = map_progress_bar(&progress, 0);
        assert_eq!(bar.section_position, 1);
        assert_eq!(bar.section_count, 5);
        assert_eq!(bar.width_style(), "width: 0%");
    }
}
